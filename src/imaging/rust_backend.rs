//! Pure Rust image processing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, TIFF, WebP, GIF) | `image` crate (pure Rust decoders) |
//! | Orientation | in-crate EXIF parser + `image` flip/rotate ops |
//! | Resize | `image::DynamicImage::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality honored) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::exif;
use super::params::TransformParams;
use crate::config::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from content, not extension — a PNG renamed to
/// `.jpg` still decodes. Undecodable files are `UnsupportedFormat`.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::UnsupportedFormat(format!("failed to decode {}: {}", path.display(), e))
        })
}

/// Apply an EXIF orientation (1-8) to a decoded image.
///
/// Cameras record sensor-native pixels plus an orientation tag; honoring it
/// here means the output is upright and the tag can be dropped.
fn apply_orientation(img: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Encode an image into bytes in the requested format.
fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u32,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Cursor::new(Vec::new());
    let encode_err = |e: image::ImageError| BackendError::Encode(format!("{format}: {e}"));

    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha; flatten to RGB8 first (CMYK/palette/RGBA all land here)
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality as u8);
            rgb.write_with_encoder(encoder).map_err(encode_err)?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut buf);
            img.write_with_encoder(encoder).map_err(encode_err)?;
        }
        OutputFormat::Webp => {
            // The pure-Rust WebP encoder is lossless and takes RGB8/RGBA8 only
            let flattened = match img {
                DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img.clone(),
                other => DynamicImage::ImageRgba8(other.to_rgba8()),
            };
            let encoder = WebPEncoder::new_lossless(&mut buf);
            flattened.write_with_encoder(encoder).map_err(encode_err)?;
        }
    }

    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::UnsupportedFormat(format!(
                "failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn transform(&self, params: &TransformParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(&params.source)?;

        let img = match exif::read_exif(&params.source).orientation {
            Some(o) if o > 1 => apply_orientation(img, o),
            _ => img,
        };

        let (w, h) = calculate_fit_dimensions(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        );
        let img = if (w, h) != (img.width(), img.height()) {
            img.resize(w, h, FilterType::Lanczos3)
        } else {
            img
        };

        encode_image(&img, params.format, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_test_jpeg, create_test_png, write_jpeg_with_exif};
    use tempfile::TempDir;

    fn params(source: &Path, format: OutputFormat) -> TransformParams {
        TransformParams {
            source: source.to_path_buf(),
            max_width: 800,
            max_height: 600,
            quality: Quality::new(70),
            format,
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        assert!(
            backend
                .identify(Path::new("/nonexistent/image.jpg"))
                .is_err()
        );
    }

    #[test]
    fn transform_shrinks_to_bounds() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 1600, 1200);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();

        let out = image::load_from_memory(&bytes).unwrap();
        assert_eq!((out.width(), out.height()), (800, 600));
    }

    #[test]
    fn transform_preserves_aspect_ratio() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 1600, 900);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();

        let out = image::load_from_memory(&bytes).unwrap();
        assert_eq!((out.width(), out.height()), (800, 450));
    }

    #[test]
    fn transform_never_upscales() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 320, 240);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();

        let out = image::load_from_memory(&bytes).unwrap();
        assert_eq!((out.width(), out.height()), (320, 240));
    }

    #[test]
    fn transform_converts_png_to_jpeg() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 400, 300);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();

        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(image::ImageFormat::Jpeg));
    }

    #[test]
    fn transform_encodes_png_output() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Png))
            .unwrap();

        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(image::ImageFormat::Png));
    }

    #[test]
    fn transform_encodes_webp_output() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Webp))
            .unwrap();

        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(image::ImageFormat::WebP));
    }

    #[test]
    fn transform_garbage_is_unsupported_format() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"this is not an image at all").unwrap();

        let backend = RustBackend::new();
        let result = backend.transform(&params(&source, OutputFormat::Jpeg));
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }

    #[test]
    fn transform_missing_file_is_io_error() {
        let backend = RustBackend::new();
        let result = backend.transform(&params(Path::new("/nonexistent/a.jpg"), OutputFormat::Jpeg));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn transform_applies_exif_orientation() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("rotated.jpg");
        // 400x300 sensor pixels tagged orientation 6 (90° CW) → upright 300x400
        write_jpeg_with_exif(&source, 400, 300, None, Some(6));

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();

        let out = image::load_from_memory(&bytes).unwrap();
        assert_eq!((out.width(), out.height()), (300, 400));
    }

    #[test]
    fn orientation_values_map_to_expected_dimensions() {
        let img = DynamicImage::new_rgb8(40, 30);
        // Orientations 5-8 transpose, 1-4 keep dimensions
        for o in [1u16, 2, 3, 4] {
            let out = apply_orientation(img.clone(), o);
            assert_eq!((out.width(), out.height()), (40, 30), "orientation {o}");
        }
        for o in [5u16, 6, 7, 8] {
            let out = apply_orientation(img.clone(), o);
            assert_eq!((out.width(), out.height()), (30, 40), "orientation {o}");
        }
    }

    #[test]
    fn content_sniffing_decodes_mislabeled_extension() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("actually-png.jpg");
        create_test_png(&source, 100, 80);

        let backend = RustBackend::new();
        let bytes = backend
            .transform(&params(&source, OutputFormat::Jpeg))
            .unwrap();
        let out = image::load_from_memory(&bytes).unwrap();
        assert_eq!((out.width(), out.height()), (100, 80));
    }
}
