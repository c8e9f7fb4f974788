//! Minimal EXIF parser for JPEG and TIFF files.
//!
//! Extracts the three fields the pipeline needs:
//! - DateTimeOriginal (0x9003, Exif sub-IFD) — capture timestamp
//! - DateTime (0x0132, IFD0) — fallback timestamp
//! - Orientation (0x0112, IFD0) — applied before resizing
//!
//! For JPEG: reads from the APP1 marker (`Exif\0\0` header, then TIFF data).
//! For TIFF: the file itself is the TIFF structure.
//!
//! Zero external dependencies — pure Rust. Returns default (empty) data on
//! any parse failure; a photo without usable EXIF simply falls back to the
//! file's modification time upstream.

use chrono::NaiveDateTime;
use std::path::Path;

/// EXIF fields extracted from an image file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifData {
    pub date_time_original: Option<NaiveDateTime>,
    pub date_time: Option<NaiveDateTime>,
    /// EXIF orientation value 1-8. `None` when absent; 1 means upright.
    pub orientation: Option<u16>,
}

impl ExifData {
    /// The best capture timestamp this EXIF block offers.
    pub fn capture_time(&self) -> Option<NaiveDateTime> {
        self.date_time_original.or(self.date_time)
    }
}

/// Read EXIF data from a file, dispatching by extension.
/// Returns default (empty) data on any parse failure.
pub fn read_exif(path: &Path) -> ExifData {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return ExifData::default(),
    };

    match ext.as_str() {
        "jpg" | "jpeg" => read_exif_from_jpeg(&bytes),
        "tif" | "tiff" => parse_tiff(&bytes),
        _ => ExifData::default(),
    }
}

// ---------------------------------------------------------------------------
// JPEG: locate the EXIF TIFF block inside APP1
// ---------------------------------------------------------------------------

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Extract the TIFF-structured EXIF bytes from a JPEG's APP1 segment and
/// parse them. JPEGs can carry multiple APP1 segments (XMP also uses it);
/// only the one with the `Exif\0\0` header counts.
fn read_exif_from_jpeg(data: &[u8]) -> ExifData {
    let Some(tiff) = find_jpeg_app1_exif(data) else {
        return ExifData::default();
    };
    parse_tiff(tiff)
}

/// Walk JPEG markers to the APP1 segment carrying EXIF data.
fn find_jpeg_app1_exif(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 0;
    while pos + 4 < data.len() {
        if data[pos] == 0xFF && data[pos + 1] == 0xE1 {
            let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
            let seg_start = pos + 4;
            let seg_end = (pos + 2 + seg_len).min(data.len());
            let segment = &data[seg_start..seg_end];

            if segment.starts_with(EXIF_HEADER) {
                return Some(&segment[EXIF_HEADER.len()..]);
            }
        }

        // Advance: if 0xFF, skip marker + length; otherwise byte-by-byte
        if data[pos] == 0xFF && pos + 3 < data.len() && data[pos + 1] != 0x00 {
            let marker = data[pos + 1];
            // SOS (0xDA) means image data starts — stop scanning
            if marker == 0xDA {
                break;
            }
            // Markers without length field
            if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
                pos += 2;
            } else {
                let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
                pos += 2 + len;
            }
        } else {
            pos += 1;
        }
    }
    None
}

// ---------------------------------------------------------------------------
// TIFF IFD walking
// ---------------------------------------------------------------------------

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

/// Parse a TIFF-structured EXIF block (IFD0, then the Exif sub-IFD).
fn parse_tiff(data: &[u8]) -> ExifData {
    let mut result = ExifData::default();
    if data.len() < 8 {
        return result;
    }

    // Determine byte order
    let big_endian = match &data[0..2] {
        b"MM" => true,
        b"II" => false,
        _ => return result,
    };

    let read_u16 = |offset: usize| -> Option<u16> {
        let bytes = data.get(offset..offset + 2)?;
        Some(if big_endian {
            u16::from_be_bytes([bytes[0], bytes[1]])
        } else {
            u16::from_le_bytes([bytes[0], bytes[1]])
        })
    };

    let read_u32 = |offset: usize| -> Option<u32> {
        let bytes = data.get(offset..offset + 4)?;
        Some(if big_endian {
            u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
        } else {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
        })
    };

    // Verify TIFF magic (42)
    if read_u16(2) != Some(42) {
        return result;
    }
    let Some(ifd0_offset) = read_u32(4) else {
        return result;
    };

    // TIFF type sizes: count is number of values, not bytes.
    let type_size = |typ: u16| -> usize {
        match typ {
            1 | 2 | 6 | 7 => 1, // BYTE, ASCII, SBYTE, UNDEFINED
            3 | 8 => 2,         // SHORT, SSHORT
            4 | 9 | 11 => 4,    // LONG, SLONG, FLOAT
            5 | 10 | 12 => 8,   // RATIONAL, SRATIONAL, DOUBLE
            _ => 1,
        }
    };

    // Resolve where an entry's value bytes live: inline when they fit in
    // the 4-byte value field, at the pointed-to offset otherwise.
    let value_bytes = |entry_offset: usize, typ: u16, count: usize| -> Option<&[u8]> {
        let byte_len = count * type_size(typ);
        if byte_len <= 4 {
            data.get(entry_offset + 8..entry_offset + 8 + byte_len)
        } else {
            let offset = read_u32(entry_offset + 8)? as usize;
            data.get(offset..offset + byte_len)
        }
    };

    let parse_ascii_datetime = |bytes: &[u8]| -> Option<NaiveDateTime> {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim_end_matches('\0').trim();
        NaiveDateTime::parse_from_str(trimmed, "%Y:%m:%d %H:%M:%S").ok()
    };

    // Walk one IFD, filling `result`. Returns the Exif sub-IFD pointer if
    // an entry carried one.
    let walk_ifd = |ifd_offset: usize, result: &mut ExifData| -> Option<usize> {
        let entry_count = read_u16(ifd_offset)?;
        let entries_start = ifd_offset + 2;
        let mut sub_ifd = None;

        for i in 0..entry_count as usize {
            let entry_offset = entries_start + i * 12;
            let (Some(tag), Some(typ), Some(count)) = (
                read_u16(entry_offset),
                read_u16(entry_offset + 2),
                read_u32(entry_offset + 4),
            ) else {
                return sub_ifd;
            };
            let count = count as usize;

            match tag {
                TAG_ORIENTATION => {
                    if typ == 3 {
                        result.orientation = read_u16(entry_offset + 8);
                    }
                }
                TAG_DATE_TIME => {
                    if let Some(bytes) = value_bytes(entry_offset, typ, count) {
                        result.date_time = parse_ascii_datetime(bytes);
                    }
                }
                TAG_DATE_TIME_ORIGINAL => {
                    if let Some(bytes) = value_bytes(entry_offset, typ, count) {
                        result.date_time_original = parse_ascii_datetime(bytes);
                    }
                }
                TAG_EXIF_IFD_POINTER => {
                    if let Some(offset) = read_u32(entry_offset + 8) {
                        sub_ifd = Some(offset as usize);
                    }
                }
                _ => {}
            }
        }
        sub_ifd
    };

    // IFD0 first; the Exif sub-IFD (if any) carries DateTimeOriginal
    if let Some(offset) = walk_ifd(ifd0_offset as usize, &mut result) {
        walk_ifd(offset, &mut result);
    }

    result
}
