//! Per-file conversion engines

pub mod image;
pub mod video;

pub use self::image::ImageConverter;
pub use self::video::{TranscodeCommand, VideoConverter};
