//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF** | custom parser (JPEG APP1 + TIFF IFD) |
//! | **Transform** | decode → orient → Lanczos3 fit-resize → encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Exif**: capture date and orientation extraction

pub mod backend;
mod calculations;
pub mod exif;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use params::{Quality, TransformParams};
pub use rust_backend::RustBackend;
