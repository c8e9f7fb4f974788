//! Source directory scanning.
//!
//! Stage 1 of the pipeline. Walks the source directory and produces one
//! [`PhotoItem`] per recognized image file, in a deterministic order.
//!
//! ## Recognized Files
//!
//! Selection is by extension, case-insensitive: jpg, jpeg, png, bmp, tif,
//! tiff, webp, gif. Whether a file actually decodes is decided later by the
//! transform stage — a `.jpg` full of garbage is discovered here and
//! recorded as a per-item failure there.
//!
//! ## Ordering
//!
//! Entries are sorted by filename during the walk and the final list is
//! sorted by full path, so the same source tree always yields the same
//! sequence. Destination naming depends on this: the per-date counters in
//! [`naming`](crate::naming) are assigned in discovery order.
//!
//! Hidden files and directories (leading dot) inside the tree are skipped;
//! the source root itself is exempt, so a dot-named source directory the
//! user names explicitly still scans. The scan is read-only.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("source directory not found or not a directory: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One discovered source photo and its filesystem facts.
///
/// Created during scan, read-only afterwards. The capture timestamp is
/// resolved separately by [`metadata`](crate::metadata) so discovery stays
/// cheap — EXIF parsing reads file contents, directory listing does not.
#[derive(Debug, Clone)]
pub struct PhotoItem {
    /// Absolute or caller-relative path to the source file.
    pub path: PathBuf,
    /// Path relative to the source root (used for display).
    pub rel_path: PathBuf,
    /// Filename without extension, for the `{orig}` rename placeholder.
    pub stem: String,
    /// Lowercased extension the file was recognized by.
    pub extension: String,
    /// Size on disk in bytes.
    pub byte_size: u64,
}

/// Extensions recognized as photos, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp", "gif"];

/// Walk `source` and return every recognized image file.
///
/// With `recursive` off, only the top level of the directory is listed.
/// Fails up front if `source` is missing or not a directory; individual
/// unreadable entries inside the tree fail the scan too, since a partial
/// listing would silently change destination numbering.
pub fn scan(source: &Path, recursive: bool) -> Result<Vec<PhotoItem>, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::DirectoryNotFound(source.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut items = Vec::new();

    // Depth 0 is the source root itself: a user pointing at a dot-directory
    // explicitly still gets it scanned. Hidden-skipping applies inside.
    let walker = WalkDir::new(source)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_string_lossy().as_ref()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(extension) = recognized_extension(path) else {
            continue;
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let rel_path = path.strip_prefix(source).unwrap_or(path).to_path_buf();
        let byte_size = entry.metadata()?.len();

        items.push(PhotoItem {
            path: path.to_path_buf(),
            rel_path,
            stem,
            extension,
            byte_size,
        });
    }

    items.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(items)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name.len() > 1
}

/// Return the lowercased extension if it is a recognized photo extension.
fn recognized_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
