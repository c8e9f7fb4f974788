//! Capture time resolution.
//!
//! Every photo needs a capture timestamp for the `{date}` rename
//! placeholder. Three sources exist, in decreasing order of trust:
//!
//! 1. **EXIF `DateTimeOriginal`** (or `DateTime` as an embedded fallback) —
//!    what the camera recorded at the moment of exposure. Survives copies,
//!    downloads, and backups.
//! 2. **Filesystem modification time** — scanned documents and exports from
//!    tools that strip EXIF still carry a useful mtime.
//! 3. **Now** — the degenerate fallback so the pipeline never stalls on a
//!    file with no usable date at all.
//!
//! The first available value wins. Resolution is per item and pure apart
//! from reading the file, so it can run inside the parallel phase.

use crate::imaging::exif;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;

/// Resolve the capture timestamp for a photo.
///
/// EXIF date → file modification time → current time. Never fails: a
/// completely opaque file gets the current time and processing continues.
pub fn capture_time(path: &Path) -> NaiveDateTime {
    if let Some(dt) = exif::read_exif(path).capture_time() {
        return dt;
    }
    modified_time(path).unwrap_or_else(|| Local::now().naive_local())
}

/// The file's modification time in local time, if the filesystem offers one.
fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_jpeg_with_exif_date;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn exif_date_wins_over_mtime() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        write_jpeg_with_exif_date(&path, "2023:01:01 12:30:45");

        let dt = capture_time(&path);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn falls_back_to_mtime_without_exif() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        let expected = modified_time(&path).unwrap();
        let dt = capture_time(&path);
        assert_eq!(dt, expected);
    }

    #[test]
    fn nonexistent_file_still_yields_a_timestamp() {
        let before = Local::now().naive_local();
        let dt = capture_time(Path::new("/nonexistent/photo.jpg"));
        assert!(dt >= before);
    }
}
