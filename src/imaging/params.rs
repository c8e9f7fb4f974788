//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline (which decides which photos to process)
//! and the [`backend`](super::backend) (which does the actual pixel work).
//! This separation allows swapping backends (e.g. for testing with a mock)
//! without changing pipeline logic.

use crate::config::OutputFormat;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// Full specification of one transform: source file, bounding box, encoding.
///
/// The output *path* is deliberately absent — a transform produces bytes,
/// and where they land is the writer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    pub source: PathBuf,
    /// Bounding box; output fits inside, aspect preserved, never upscaled.
    pub max_width: u32,
    pub max_height: u32,
    /// Encoding quality. Only meaningful for JPEG.
    pub quality: Quality,
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_70() {
        assert_eq!(Quality::default().value(), 70);
    }
}
