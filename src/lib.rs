//! mediaconv Batch Media Converter Library
//!
//! Collects image and video files, derives output paths under a batch-wide
//! collision policy, and converts them one at a time: images in-process,
//! videos through the ffmpeg command line with an audio copy/re-encode
//! fallback.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    BatchResult, CollisionPolicy, ConflictChoice, ImageBatchSettings, ImageFormat, ResizeSpec,
    SourceCollection, VideoBatchSettings, VideoFormat,
};
