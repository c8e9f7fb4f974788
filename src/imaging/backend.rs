//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline
//! needs: identify and transform. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, zero
//! external dependencies. Tests swap in a mock that records operations
//! without touching pixels.
//!
//! `transform` returns the encoded bytes rather than writing a file. A
//! failed transform therefore has no filesystem side effects; only the
//! writer in the pipeline ever creates destination files.

use super::params::TransformParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported or unreadable image: {0}")]
    UnsupportedFormat(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because transforms run from rayon worker threads.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, orient, fit-resize, and re-encode one photo.
    ///
    /// Returns the encoded output bytes. Nothing is written to disk.
    fn transform(&self, params: &TransformParams) -> Result<Vec<u8>, BackendError>;
}
