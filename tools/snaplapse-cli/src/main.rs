//! Snaplapse CLI — Command-line interface for building and exporting timelapses.
//!
//! Usage:
//!   snaplapse build <SESSION_DIR>   Build a timelapse from a frame directory
//!   snaplapse info <SESSION_DIR>    Show session information
//!   snaplapse export <ARTIFACT>     Export an artifact to the gallery
//!   snaplapse check                 Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "snaplapse",
    about = "Turn numbered frame directories into compressed timelapse videos",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a timelapse video from a session directory
    Build {
        /// Session directory containing img_00001.jpg, img_00002.jpg, ...
        path: PathBuf,

        /// Target frames per second (clamped to 1..=120; invalid input uses 30)
        #[arg(long)]
        fps: Option<String>,

        /// Export the finished artifact to the gallery
        #[arg(long)]
        export: bool,

        /// Gallery album for --export
        #[arg(long)]
        album: Option<String>,
    },

    /// Show session information
    Info {
        /// Session directory
        path: PathBuf,
    },

    /// Export an existing artifact to the gallery
    Export {
        /// Path to the artifact file
        path: PathBuf,

        /// Gallery album name
        #[arg(long)]
        album: Option<String>,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    snaplapse_common::logging::init_logging(&snaplapse_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Build {
            path,
            fps,
            export,
            album,
        } => commands::build::run(path, fps, export, album).await,
        Commands::Info { path } => commands::info::run(path),
        Commands::Export { path, album } => commands::export::run(path, album),
        Commands::Check => commands::check::run(),
    }
}
