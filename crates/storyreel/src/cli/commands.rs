//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyreel::LogFormat;

/// Storyreel - narrated slideshow videos from images and text
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(about = "Narrated slideshow videos from images and text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file replacing ~/.config/storyreel/storyreel.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a submission into a video
    Render {
        /// Path to the submission JSON file
        #[arg(long)]
        submission: PathBuf,

        /// Status refresh interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_ms: u64,
    },

    /// Check a submission without rendering it
    Validate {
        /// Path to the submission JSON file
        #[arg(long)]
        submission: PathBuf,

        /// Also check that the configured ffmpeg runs
        #[arg(long)]
        check_encoder: bool,
    },

    /// List narration voices
    Voices {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
