// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

mod batch;
mod collection;

pub use batch::{BatchResult, FileFailure};
pub use collection::{SourceCollection, SourceFile};

#[cfg(test)]
mod tests;

/// Valid JPEG quality range
pub const JPEG_QUALITY_RANGE: std::ops::RangeInclusive<u8> = 1..=100;
/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 95;
/// Valid constant rate factor range (lower is higher quality)
pub const CRF_RANGE: std::ops::RangeInclusive<u8> = 0..=51;
/// Default constant rate factor
pub const DEFAULT_CRF: u8 = 23;

/// Source image extensions accepted when expanding directories
pub const IMAGE_EXTENSIONS: &[&str] = &["heic", "png", "jpg", "jpeg", "bmp", "gif", "tiff"];
/// Source video extensions accepted when expanding directories
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", "m4v", "webm", "hevc", "h265", "ts", "m2ts",
];
/// Raw HEVC elementary stream extensions (no container)
pub const RAW_HEVC_EXTENSIONS: &[&str] = &["hevc", "h265"];

/// Image output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Bmp,
    Gif,
    #[serde(alias = "tif")]
    Tiff,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Bmp,
        ImageFormat::Gif,
        ImageFormat::Tiff,
    ];

    /// Output file extension (lowercased format name)
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tiff",
        }
    }

    /// Whether the encoder honours the quality setting
    pub fn uses_quality(self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }

    /// Whether the format can carry an alpha channel
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Jpeg)
    }

    /// Parse format name (case-insensitive)
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "bmp" => Ok(ImageFormat::Bmp),
            "gif" => Ok(ImageFormat::Gif),
            "tiff" | "tif" => Ok(ImageFormat::Tiff),
            other => Err(DomainError::BadArgs(format!(
                "Invalid image format: {}. Valid formats: jpeg, png, bmp, gif, tiff",
                other
            ))),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// Video codec families the transcoder is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VideoCodec {
    H264,
    Vp9,
}

impl VideoCodec {
    /// Encoder name passed to the transcoder
    pub fn encoder_name(self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::Vp9 => "libvpx-vp9",
        }
    }
}

/// Video container output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    Mp4,
    Mkv,
    Mov,
    Avi,
    M4v,
    Webm,
}

impl VideoFormat {
    pub const ALL: [VideoFormat; 6] = [
        VideoFormat::Mp4,
        VideoFormat::Mkv,
        VideoFormat::Mov,
        VideoFormat::Avi,
        VideoFormat::M4v,
        VideoFormat::Webm,
    ];

    /// Output file extension
    pub fn extension(self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mkv => "mkv",
            VideoFormat::Mov => "mov",
            VideoFormat::Avi => "avi",
            VideoFormat::M4v => "m4v",
            VideoFormat::Webm => "webm",
        }
    }

    /// Codec family used for this container
    pub fn video_codec(self) -> VideoCodec {
        match self {
            VideoFormat::Webm => VideoCodec::Vp9,
            _ => VideoCodec::H264,
        }
    }

    /// MP4-family containers get their index moved to the front
    pub fn wants_faststart(self) -> bool {
        matches!(self, VideoFormat::Mp4 | VideoFormat::Mov | VideoFormat::M4v)
    }

    /// Parse container name (case-insensitive)
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "mp4" => Ok(VideoFormat::Mp4),
            "mkv" => Ok(VideoFormat::Mkv),
            "mov" => Ok(VideoFormat::Mov),
            "avi" => Ok(VideoFormat::Avi),
            "m4v" => Ok(VideoFormat::M4v),
            "webm" => Ok(VideoFormat::Webm),
            other => Err(DomainError::BadArgs(format!(
                "Invalid video format: {}. Valid formats: mp4, mkv, mov, avi, m4v, webm",
                other
            ))),
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// Kind of media a collection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Source extensions accepted for this kind
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => IMAGE_EXTENSIONS,
            MediaKind::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Check whether a path carries an accepted extension
    pub fn accepts(self, path: &Path) -> bool {
        has_extension(path, self.extensions())
    }

    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "image" | "images" => Ok(MediaKind::Image),
            "video" | "videos" => Ok(MediaKind::Video),
            other => Err(DomainError::BadArgs(format!(
                "Invalid media kind: {}. Valid kinds: image, video",
                other
            ))),
        }
    }
}

/// Check whether the path is a raw HEVC elementary stream
pub fn is_raw_hevc(path: &Path) -> bool {
    has_extension(path, RAW_HEVC_EXTENSIONS)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|candidate| *candidate == ext)
        })
        .unwrap_or(false)
}

/// Pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Requested resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect: bool,
}

impl ResizeSpec {
    pub fn new(width: Option<u32>, height: Option<u32>, keep_aspect: bool) -> Self {
        Self {
            width,
            height,
            keep_aspect,
        }
    }

    /// No resize at all
    pub fn none() -> Self {
        Self::new(None, None, true)
    }

    /// Whether any dimension was requested
    pub fn is_requested(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Reject zero dimensions
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(DomainError::BadArgs(
                "Width and height must be positive numbers".to_string(),
            ));
        }
        Ok(())
    }
}

/// Batch-wide collision policy applied once a conflict is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Rename new output with a " (n)" suffix
    #[default]
    KeepBoth,
    /// Replace the existing file
    Overwrite,
}

/// How a batch should arrive at its collision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictChoice {
    /// Ask once when any prospective output already exists
    #[default]
    Prompt,
    KeepBoth,
    Overwrite,
}

impl ConflictChoice {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "prompt" => Ok(ConflictChoice::Prompt),
            "keep-both" | "keep" => Ok(ConflictChoice::KeepBoth),
            "overwrite" | "replace" => Ok(ConflictChoice::Overwrite),
            other => Err(DomainError::BadArgs(format!(
                "Invalid conflict policy: {}. Valid policies: prompt, keep-both, overwrite",
                other
            ))),
        }
    }

    /// Policy fixed in advance, if any
    pub fn preset(self) -> Option<CollisionPolicy> {
        match self {
            ConflictChoice::Prompt => None,
            ConflictChoice::KeepBoth => Some(CollisionPolicy::KeepBoth),
            ConflictChoice::Overwrite => Some(CollisionPolicy::Overwrite),
        }
    }
}

/// Single image conversion request
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub source: PathBuf,
    pub format: ImageFormat,
    pub output_dir: Option<PathBuf>,
    pub resize: ResizeSpec,
    pub quality: u8,
    pub policy: CollisionPolicy,
}

/// Single video conversion request
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub source: PathBuf,
    pub format: VideoFormat,
    pub output_dir: Option<PathBuf>,
    pub resize: ResizeSpec,
    pub crf: u8,
    pub policy: CollisionPolicy,
}

/// Options shared by every file of an image batch
#[derive(Debug, Clone)]
pub struct ImageBatchSettings {
    pub format: ImageFormat,
    pub output_dir: Option<PathBuf>,
    pub resize: ResizeSpec,
    pub quality: u8,
    pub conflict: ConflictChoice,
}

impl Default for ImageBatchSettings {
    fn default() -> Self {
        Self {
            format: ImageFormat::Jpeg,
            output_dir: None,
            resize: ResizeSpec::none(),
            quality: DEFAULT_JPEG_QUALITY,
            conflict: ConflictChoice::Prompt,
        }
    }
}

impl ImageBatchSettings {
    /// Validate before any file is touched
    pub fn validate(&self) -> Result<(), DomainError> {
        self.resize.validate()?;
        if !JPEG_QUALITY_RANGE.contains(&self.quality) {
            return Err(DomainError::BadArgs(format!(
                "JPEG quality {} is invalid (must be 1-100)",
                self.quality
            )));
        }
        Ok(())
    }

    /// Build the per-file request
    pub fn request_for(&self, source: &Path, policy: CollisionPolicy) -> ImageRequest {
        ImageRequest {
            source: source.to_path_buf(),
            format: self.format,
            output_dir: self.output_dir.clone(),
            resize: self.resize,
            quality: self.quality,
            policy,
        }
    }
}

/// Options shared by every file of a video batch
#[derive(Debug, Clone)]
pub struct VideoBatchSettings {
    pub format: VideoFormat,
    pub output_dir: Option<PathBuf>,
    pub resize: ResizeSpec,
    pub crf: u8,
    pub conflict: ConflictChoice,
}

impl Default for VideoBatchSettings {
    fn default() -> Self {
        Self {
            format: VideoFormat::Mp4,
            output_dir: None,
            resize: ResizeSpec::none(),
            crf: DEFAULT_CRF,
            conflict: ConflictChoice::Prompt,
        }
    }
}

impl VideoBatchSettings {
    /// Validate before any file is touched
    pub fn validate(&self) -> Result<(), DomainError> {
        self.resize.validate()?;
        if !CRF_RANGE.contains(&self.crf) {
            return Err(DomainError::BadArgs(format!(
                "CRF value {} is invalid (must be 0-51)",
                self.crf
            )));
        }
        Ok(())
    }

    /// Build the per-file request
    pub fn request_for(&self, source: &Path, policy: CollisionPolicy) -> VideoRequest {
        VideoRequest {
            source: source.to_path_buf(),
            format: self.format,
            output_dir: self.output_dir.clone(),
            resize: self.resize,
            crf: self.crf,
            policy,
        }
    }
}
