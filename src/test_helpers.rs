//! Shared test utilities for the photopress test suite.
//!
//! Provides synthetic image generation: plain JPEG/PNG files via the
//! `image` crate, and JPEGs with a hand-assembled EXIF APP1 segment for
//! exercising capture-date and orientation handling.

use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    synthetic_image(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    synthetic_image(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

fn synthetic_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    DynamicImage::ImageRgb8(img)
}

/// Write a decodable JPEG carrying an EXIF APP1 segment.
///
/// The segment is spliced in right after the SOI marker; decoders skip it,
/// EXIF readers find it. `date` is in EXIF format (`YYYY:MM:DD HH:MM:SS`)
/// and lands in DateTimeOriginal; `orientation` in the IFD0 tag.
pub fn write_jpeg_with_exif(
    path: &Path,
    width: u32,
    height: u32,
    date: Option<&str>,
    orientation: Option<u16>,
) {
    let mut jpeg = Vec::new();
    synthetic_image(width, height)
        .write_to(
            &mut std::io::Cursor::new(&mut jpeg),
            image::ImageFormat::Jpeg,
        )
        .unwrap();

    let app1 = build_exif_app1(date, orientation);
    let mut out = Vec::with_capacity(jpeg.len() + app1.len());
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

/// Write a JPEG whose EXIF DateTimeOriginal is `date`.
pub fn write_jpeg_with_exif_date(path: &Path, date: &str) {
    write_jpeg_with_exif(path, 16, 12, Some(date), None);
}

/// Assemble an APP1 segment: marker + length + `Exif\0\0` + TIFF block.
fn build_exif_app1(date: Option<&str>, orientation: Option<u16>) -> Vec<u8> {
    let tiff = build_exif_tiff(date, orientation);
    let mut seg = Vec::new();
    seg.extend_from_slice(&[0xFF, 0xE1]);
    seg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    seg.extend_from_slice(b"Exif\0\0");
    seg.extend_from_slice(&tiff);
    seg
}

/// Little-endian TIFF block: IFD0 (Orientation + Exif pointer) and an Exif
/// sub-IFD (DateTimeOriginal). Fixed layout:
///
/// ```text
///  0  header                      8 bytes
///  8  IFD0: count + 2 entries + next    30 bytes  (ends 38)
/// 38  Exif IFD: count + 1 entry + next  18 bytes  (ends 56)
/// 56  DateTimeOriginal string          20 bytes
/// ```
fn build_exif_tiff(date: Option<&str>, orientation: Option<u16>) -> Vec<u8> {
    let date = date.unwrap_or("2000:01:01 00:00:00");
    assert_eq!(date.len(), 19, "EXIF dates are YYYY:MM:DD HH:MM:SS");
    let orientation = orientation.unwrap_or(1);

    let mut d = Vec::new();
    d.extend_from_slice(b"II");
    d.extend_from_slice(&42u16.to_le_bytes());
    d.extend_from_slice(&8u32.to_le_bytes());

    // IFD0
    d.extend_from_slice(&2u16.to_le_bytes());
    // Orientation (SHORT, inline)
    d.extend_from_slice(&0x0112u16.to_le_bytes());
    d.extend_from_slice(&3u16.to_le_bytes());
    d.extend_from_slice(&1u32.to_le_bytes());
    d.extend_from_slice(&orientation.to_le_bytes());
    d.extend_from_slice(&0u16.to_le_bytes());
    // Exif IFD pointer (LONG → offset 38)
    d.extend_from_slice(&0x8769u16.to_le_bytes());
    d.extend_from_slice(&4u16.to_le_bytes());
    d.extend_from_slice(&1u32.to_le_bytes());
    d.extend_from_slice(&38u32.to_le_bytes());
    // next IFD
    d.extend_from_slice(&0u32.to_le_bytes());

    // Exif sub-IFD
    d.extend_from_slice(&1u16.to_le_bytes());
    // DateTimeOriginal (ASCII, 20 bytes → offset 56)
    d.extend_from_slice(&0x9003u16.to_le_bytes());
    d.extend_from_slice(&2u16.to_le_bytes());
    d.extend_from_slice(&20u32.to_le_bytes());
    d.extend_from_slice(&56u32.to_le_bytes());
    d.extend_from_slice(&0u32.to_le_bytes());

    d.extend_from_slice(date.as_bytes());
    d.push(0);
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn synthetic_jpeg_decodes_to_requested_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.jpg");
        create_test_jpeg(&path, 64, 48);
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn exif_jpeg_still_decodes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.jpg");
        write_jpeg_with_exif(&path, 64, 48, Some("2023:06:15 09:00:00"), Some(3));
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn exif_jpeg_carries_date_and_orientation() {
        use crate::imaging::exif::read_exif;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.jpg");
        write_jpeg_with_exif(&path, 32, 24, Some("2023:06:15 09:00:00"), Some(6));

        let data = read_exif(&path);
        assert_eq!(data.orientation, Some(6));
        let dt = data.date_time_original.unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2023-06-15");
    }
}
