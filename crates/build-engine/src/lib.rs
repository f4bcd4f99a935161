//! Snaplapse Build Engine
//!
//! Orchestrates the conversion of a directory of numbered frames
//! into a single compressed timelapse video via an external encoder.
//!
//! # Pipeline Architecture
//!
//! ```text
//! session dir ──► Frame Scanner ──► frame count
//!                                       │
//!                                       ▼
//!                                 Build Orchestrator ◄── frame rate
//!                                   │         ▲
//!                     per attempt   │         │ verdict + log lines
//!                                   ▼         │
//!                            Command Builder  │
//!                                   │         │
//!                                   ▼         │
//!                            Process Runner ──┘
//!                                   │
//!                                   ▼
//!                            timelapse.mp4
//! ```

pub mod command;
pub mod orchestrator;
pub mod runner;
pub mod scanner;
pub mod session;

pub use orchestrator::*;
pub use session::{FrameRate, Session};
