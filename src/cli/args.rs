//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::{ConflictChoice, ImageFormat, MediaKind, VideoFormat};

fn parse_image_format(value: &str) -> Result<ImageFormat, String> {
    ImageFormat::parse(value).map_err(|e| e.to_string())
}

fn parse_video_format(value: &str) -> Result<VideoFormat, String> {
    VideoFormat::parse(value).map_err(|e| e.to_string())
}

fn parse_conflict(value: &str) -> Result<ConflictChoice, String> {
    ConflictChoice::parse(value).map_err(|e| e.to_string())
}

fn parse_kind(value: &str) -> Result<MediaKind, String> {
    MediaKind::parse(value).map_err(|e| e.to_string())
}

fn parse_dimension(value: &str) -> Result<u32, String> {
    clap_num::number_range(value, 1, u32::MAX)
}

fn parse_quality(value: &str) -> Result<u8, String> {
    clap_num::number_range(value, 1, 100)
}

fn parse_crf(value: &str) -> Result<u8, String> {
    clap_num::number_range(value, 0, 51)
}

impl OutputArgs {
    /// Aspect flag from the command line, `None` when neither flag was given
    pub fn keep_aspect_flag(&self) -> Option<bool> {
        match (self.keep_aspect, self.no_keep_aspect) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Files and directories to collect
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Files or directories to convert
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

/// Resize and collision options shared by both pipelines
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output directory (default: next to each source)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Target width in pixels
    #[arg(short = 'W', long, value_parser = parse_dimension)]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(short = 'H', long, value_parser = parse_dimension)]
    pub height: Option<u32>,

    /// Preserve the aspect ratio when only one dimension is given (default)
    #[arg(long, conflicts_with = "no_keep_aspect")]
    pub keep_aspect: bool,

    /// Do not preserve the aspect ratio when only one dimension is given
    #[arg(long)]
    pub no_keep_aspect: bool,

    /// What to do when outputs already exist
    #[arg(long, value_name = "POLICY", value_parser = parse_conflict)]
    pub on_conflict: Option<ConflictChoice>,
}

/// Arguments for the image command
#[derive(Args, Debug, Clone, Default)]
pub struct ImageArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Target format: jpeg, png, bmp, gif, tiff
    #[arg(short, long, value_parser = parse_image_format)]
    pub format: Option<ImageFormat>,

    /// JPEG quality (1-100)
    #[arg(short, long, value_parser = parse_quality)]
    pub quality: Option<u8>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the video command
#[derive(Args, Debug, Clone, Default)]
pub struct VideoArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Target container: mp4, mkv, mov, avi, m4v, webm
    #[arg(short, long, value_parser = parse_video_format)]
    pub format: Option<VideoFormat>,

    /// Constant Rate Factor (0-51, lower is higher quality)
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Which pipeline to collect for
    #[arg(long, value_parser = parse_kind, default_value = "image")]
    pub kind: MediaKind,
}
