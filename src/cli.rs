use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loopsmith")]
#[command(author, version)]
#[command(about = "Derives web-ready background loops and thumbnails from source videos")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create loop-optimized background variants of the configured videos
    Loops {
        /// Show what would be done without invoking ffmpeg
        #[arg(long)]
        dry_run: bool,
    },

    /// Create short thumbnail variants of the configured videos
    Thumbs {
        /// Show what would be done without invoking ffmpeg
        #[arg(long)]
        dry_run: bool,
    },

    /// Put the hero background video in place
    Hero,

    /// Probe a video file and display its duration
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
