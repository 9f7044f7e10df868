//! CLI module for mediaconv
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompt;

/// Every file converted
pub const EXIT_SUCCESS: u8 = 0;
/// Batch aborted before or instead of converting
pub const EXIT_BATCH_ERROR: u8 = 1;
/// Batch ran but some files failed
pub const EXIT_PARTIAL_FAILURE: u8 = 2;
/// Interrupted by Ctrl-C
pub const EXIT_INTERRUPTED: u8 = 130;

/// mediaconv batch media converter
///
/// Converts images through an in-process codec library and videos through
/// the ffmpeg command line.
#[derive(Parser, Debug)]
#[command(name = "mediaconv")]
#[command(about = "Batch image and video format conversion")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "MEDIACONV_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// ffmpeg binary
    #[arg(long, global = true, env = "FFMPEG_BIN", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// ffprobe binary
    #[arg(long, global = true, env = "FFPROBE_BIN", value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Directory holding ffmpeg and ffprobe
    #[arg(long, global = true, env = "MEDIACONV_TOOLS_DIR", value_name = "DIR")]
    pub tools_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert images (HEIC, PNG, JPEG, BMP, GIF, TIFF)
    Image(args::ImageArgs),
    /// Convert videos through ffmpeg
    Video(args::VideoArgs),
    /// Show what would be collected, with size and dimensions
    List(args::ListArgs),
}
