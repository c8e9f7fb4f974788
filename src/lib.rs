//! # Photopress
//!
//! A batch photo processor. Point it at a source directory and it renames
//! each photo by capture date, resizes it to fit a bounding box, re-encodes
//! it at a configured quality and format, and writes the result to a
//! destination directory.
//!
//! # Architecture: Single-Pass Pipeline
//!
//! Every discovered photo flows through four stages exactly once:
//!
//! ```text
//! 1. Scan      source/   →  Vec<PhotoItem>     (filesystem → structured data)
//! 2. Name      items     →  destination names  (date pattern + collision suffix)
//! 3. Transform item      →  encoded bytes      (decode, orient, fit, encode)
//! 4. Write     bytes     →  dest/              (temp file + atomic rename)
//! ```
//!
//! Naming is sequential — the collision set is single-threaded by
//! construction, so destination names are deterministic in discovery order.
//! Transforms and writes are independent per item and run in parallel via
//! rayon. A per-item failure is recorded and reported; it never stops the
//! other items. Only directory-level failures (source missing, destination
//! uncreatable) abort the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the source directory, produces `PhotoItem`s |
//! | [`metadata`] | Capture time resolution: EXIF date → file mtime → now |
//! | [`naming`] | Rename pattern rendering and run-scoped collision tracking |
//! | [`imaging`] | Pure-Rust image operations: decode, orient, fit-resize, encode |
//! | [`process`] | Pipeline orchestration, output writing, run summary |
//! | [`config`] | `photopress.toml` loading, validation, CLI overrides |
//! | [`output`] | CLI output formatting — per-item events and run summary |
//!
//! # Design Decisions
//!
//! ## In-Memory Encode, Atomic Write
//!
//! The transform stage returns encoded bytes; nothing is written until the
//! whole transform has succeeded. The writer then streams the bytes to a
//! temp file in the destination directory and renames it into place. A
//! failed item leaves no trace in the destination.
//!
//! ## Pure-Rust Imaging (No ImageMagick, No Pillow)
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! decoding, resizing, and encoding, plus an in-crate EXIF parser for
//! capture dates and orientation. No system dependencies: the binary is
//! fully self-contained.
//!
//! ## Run-Scoped Collision State
//!
//! Destination-name uniqueness is owned by [`naming::UniqueNamer`], created
//! per run. There is no global counter: the same inputs in the same order
//! always produce the same names, and two photos sharing a capture date get
//! deterministic `_NNN` suffixes.

pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
