// Unit tests for domain models

use std::path::{Path, PathBuf};

use super::*;
use crate::domain::errors::*;

#[test]
fn test_image_format_parse() {
    assert_eq!(ImageFormat::parse("JPEG").unwrap(), ImageFormat::Jpeg);
    assert_eq!(ImageFormat::parse("jpg").unwrap(), ImageFormat::Jpeg);
    assert_eq!(ImageFormat::parse(" tif ").unwrap(), ImageFormat::Tiff);
    assert!(matches!(ImageFormat::parse("webp"), Err(DomainError::BadArgs(_))));
}

#[test]
fn test_image_format_extension_is_lowercased_name() {
    let extensions: Vec<_> = ImageFormat::ALL.iter().map(|f| f.extension()).collect();
    assert_eq!(extensions, vec!["jpeg", "png", "bmp", "gif", "tiff"]);
    assert_eq!(ImageFormat::Jpeg.to_string(), "JPEG");
}

#[test]
fn test_only_jpeg_uses_quality() {
    for format in ImageFormat::ALL {
        assert_eq!(format.uses_quality(), format == ImageFormat::Jpeg);
        assert_eq!(format.supports_alpha(), format != ImageFormat::Jpeg);
    }
}

#[test]
fn test_video_format_parse() {
    assert_eq!(VideoFormat::parse("WEBM").unwrap(), VideoFormat::Webm);
    assert_eq!(VideoFormat::parse("m4v").unwrap(), VideoFormat::M4v);
    assert!(VideoFormat::parse("flv").is_err());
}

#[test]
fn test_media_kind_accepts_extensions_case_insensitively() {
    assert!(MediaKind::Image.accepts(Path::new("a/IMG_0001.HEIC")));
    assert!(MediaKind::Image.accepts(Path::new("photo.jpg")));
    assert!(!MediaKind::Image.accepts(Path::new("clip.mp4")));
    assert!(MediaKind::Video.accepts(Path::new("clip.M2TS")));
    assert!(!MediaKind::Video.accepts(Path::new("noext")));
}

#[test]
fn test_raw_hevc_detection() {
    assert!(is_raw_hevc(Path::new("stream.hevc")));
    assert!(is_raw_hevc(Path::new("stream.H265")));
    assert!(!is_raw_hevc(Path::new("movie.mp4")));
}

#[test]
fn test_conflict_choice_parse_and_preset() {
    assert_eq!(ConflictChoice::parse("keep").unwrap(), ConflictChoice::KeepBoth);
    assert_eq!(ConflictChoice::parse("replace").unwrap(), ConflictChoice::Overwrite);
    assert_eq!(ConflictChoice::Prompt.preset(), None);
    assert_eq!(
        ConflictChoice::Overwrite.preset(),
        Some(CollisionPolicy::Overwrite)
    );
    assert!(ConflictChoice::parse("maybe").is_err());
}

#[test]
fn test_image_settings_validation() {
    let mut settings = ImageBatchSettings::default();
    assert!(settings.validate().is_ok());

    settings.quality = 0;
    assert!(settings.validate().is_err());

    settings.quality = 80;
    settings.resize = ResizeSpec::new(Some(0), None, true);
    assert!(settings.validate().is_err());
}

#[test]
fn test_video_settings_validation() {
    let mut settings = VideoBatchSettings::default();
    assert_eq!(settings.crf, DEFAULT_CRF);
    assert!(settings.validate().is_ok());

    settings.crf = 52;
    assert!(settings.validate().is_err());
}

#[test]
fn test_request_for_copies_settings() {
    let settings = ImageBatchSettings {
        format: ImageFormat::Png,
        output_dir: Some(PathBuf::from("out")),
        resize: ResizeSpec::new(Some(10), None, true),
        quality: 70,
        conflict: ConflictChoice::KeepBoth,
    };
    let request = settings.request_for(Path::new("a.jpg"), CollisionPolicy::Overwrite);
    assert_eq!(request.source, PathBuf::from("a.jpg"));
    assert_eq!(request.format, ImageFormat::Png);
    assert_eq!(request.output_dir, Some(PathBuf::from("out")));
    assert_eq!(request.quality, 70);
    assert_eq!(request.policy, CollisionPolicy::Overwrite);
}

#[test]
fn test_collection_rejects_duplicates_and_keeps_order() {
    let mut collection = SourceCollection::new(MediaKind::Video);
    assert!(collection.add("b.mp4"));
    assert!(collection.add("a.mp4"));
    assert!(!collection.add("b.mp4"));
    assert!(!collection.add(""));

    assert_eq!(
        collection.paths(),
        vec![PathBuf::from("b.mp4"), PathBuf::from("a.mp4")]
    );
}

#[test]
fn test_collection_missing_file_metadata_is_empty() {
    let mut collection = SourceCollection::new(MediaKind::Image);
    collection.add("does/not/exist.png");
    let file = &collection.files()[0];
    assert_eq!(file.size_bytes, None);
    assert_eq!(file.dimensions, None);
    assert_eq!(file.file_name(), "exist.png");
}

#[test]
fn test_collection_drain_empties() {
    let mut collection = SourceCollection::new(MediaKind::Video);
    assert_eq!(collection.extend(["x.mkv", "y.mkv", "x.mkv"]), 2);
    let drained = collection.drain();
    assert_eq!(drained.len(), 2);
    assert!(collection.is_empty());
    // Drained paths may be added again
    assert!(collection.add("x.mkv"));
}

#[test]
fn test_batch_result_accounting() {
    let mut result = BatchResult::new();
    result.record_success(PathBuf::from("a.png"));
    result.record_failure(
        Path::new("dir/broken.jpg"),
        &DomainError::Decode("bad header".to_string()),
    );
    result.finish();

    assert_eq!(result.attempted, 2);
    assert_eq!(result.succeeded, 1);
    assert_eq!(result.failed(), 1);
    assert!(!result.is_complete_success());
    assert_eq!(result.failures[0].file_name, "broken.jpg");
    assert_eq!(result.failures[0].kind, FailureKind::Decode);
}

#[test]
fn test_batch_level_errors() {
    assert!(DomainError::EmptyBatch.is_batch_level());
    assert!(DomainError::ToolUnavailable("ffmpeg".into()).is_batch_level());
    assert!(!DomainError::Transcode("exit 1".into()).is_batch_level());
}
