//! Image conversion engine
//!
//! Decode, optional resize, color normalization for the target encoder and
//! a staged write. Everything here is blocking; the batch orchestrator runs
//! it on the blocking pool.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{Dimensions, ImageFormat, ImageRequest};
use crate::domain::rules::ResizePlanner;
use crate::output::{apply_policy, resolve, OutputWriter};

/// Per-file image converter
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageConverter;

impl ImageConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert one image, returning the written output path
    pub fn convert(&self, request: &ImageRequest) -> Result<PathBuf, DomainError> {
        let source = decode(&request.source)?;
        let native = Dimensions::new(source.width(), source.height());

        let resized = match ResizePlanner::target_dimensions(native, &request.resize) {
            Some(target) if target != native => {
                debug!(
                    "Resizing {} from {} to {}",
                    request.source.display(),
                    native,
                    target
                );
                source.resize_exact(target.width, target.height, FilterType::Lanczos3)
            }
            _ => source,
        };

        let normalized = normalize_color(resized, request.format);

        let candidate = resolve(
            &request.source,
            request.format.extension(),
            request.output_dir.as_deref(),
        );
        let destination = apply_policy(candidate, request.policy);

        let staged = OutputWriter::stage(&destination)?;
        encode(&normalized, request.format, request.quality, staged.path())?;
        staged.commit(request.policy)
    }
}

/// Decode a source image, HEIC included when the feature is enabled
pub fn decode(path: &Path) -> Result<DynamicImage, DomainError> {
    if is_heic(path) {
        return decode_heic(path);
    }

    ImageReader::open(path)
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))
}

fn is_heic(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "heic" | "heif"))
        .unwrap_or(false)
}

/// Pixel dimensions without a full decode, HEIC included when the feature
/// is enabled. `None` when the file cannot be read.
pub fn read_dimensions(path: &Path) -> Option<Dimensions> {
    if is_heic(path) {
        return heic_dimensions(path);
    }
    image::image_dimensions(path)
        .ok()
        .map(|(width, height)| Dimensions::new(width, height))
}

#[cfg(feature = "heic")]
fn open_heic(path: &Path) -> Result<libheif_rs::HeifContext<'static>, DomainError> {
    libheif_rs::HeifContext::read_from_file(path.to_string_lossy().as_ref())
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))
}

#[cfg(feature = "heic")]
fn heic_dimensions(path: &Path) -> Option<Dimensions> {
    let ctx = open_heic(path).ok()?;
    let handle = ctx.primary_image_handle().ok()?;
    Some(Dimensions::new(handle.width(), handle.height()))
}

#[cfg(not(feature = "heic"))]
fn heic_dimensions(_path: &Path) -> Option<Dimensions> {
    None
}

#[cfg(feature = "heic")]
fn decode_heic(path: &Path) -> Result<DynamicImage, DomainError> {
    use libheif_rs::{ColorSpace, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = open_heic(path)?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))?;

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(|e| DomainError::Decode(format!("{}: {}", path.display(), e)))?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or_else(|| {
        DomainError::Decode(format!("{}: no interleaved RGBA plane", path.display()))
    })?;

    let (width, height) = (plane.width, plane.height);
    let row_len = width as usize * 4;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len.min(row.len())]);
    }

    image::RgbaImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| {
            DomainError::Decode(format!("{}: truncated HEIC pixel data", path.display()))
        })
}

#[cfg(not(feature = "heic"))]
fn decode_heic(path: &Path) -> Result<DynamicImage, DomainError> {
    Err(DomainError::Decode(format!(
        "{}: HEIC support is not compiled in (enable the `heic` feature)",
        path.display()
    )))
}

/// Convert the pixel layout to one the target encoder accepts
pub fn normalize_color(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    if !format.supports_alpha() {
        return match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
    }

    match format {
        ImageFormat::Bmp => match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        ImageFormat::Gif => match image {
            DynamicImage::ImageRgba8(_) => image,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        },
        ImageFormat::Tiff => match image {
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageRgba8(image.to_rgba8()),
            DynamicImage::ImageLumaA16(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
            DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
            DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
            other => other,
        },
        // PNG keeps the source mode; float buffers have no PNG encoding
        _ => match image {
            DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
            DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
            other => other,
        },
    }
}

fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
    }
}

/// Encode into `path`. Quality only applies to JPEG.
pub fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    path: &Path,
) -> Result<(), DomainError> {
    let file = File::create(path)
        .map_err(|e| DomainError::FsFail(format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    let encoded = if format.uses_quality() {
        image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
    } else {
        image.write_to(&mut writer, codec_format(format))
    };
    encoded.map_err(|e| DomainError::Encode(format!("{} as {}: {}", path.display(), format, e)))?;

    writer
        .flush()
        .map_err(|e| DomainError::FsFail(format!("{}: {}", path.display(), e)))
}
