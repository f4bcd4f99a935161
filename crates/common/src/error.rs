//! Error types shared across Snaplapse crates.

use std::path::PathBuf;

/// Top-level error type for Snaplapse operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("No frames found in {path}")]
    NoFrames { path: PathBuf },

    #[error("All {attempts} encoder attempts failed")]
    AttemptsExhausted { attempts: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SnapError.
pub type SnapResult<T> = Result<T, SnapError>;

impl SnapError {
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
