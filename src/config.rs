//! Run configuration module.
//!
//! Handles loading and validating `photopress.toml`. Configuration is
//! layered: stock defaults are overridden by an optional config file, which
//! is in turn overridden by CLI flags (applied in `main`).
//!
//! ## Config File Location
//!
//! Pass `--config <file>` explicitly, or drop a `photopress.toml` into the
//! source directory and it is picked up automatically.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! max_width = 800           # Bounding box width in pixels
//! max_height = 600          # Bounding box height in pixels
//! quality = 70              # JPEG quality (1-100); ignored for png/webp
//! format = "jpeg"           # Output format: "jpeg", "png", or "webp"
//! recursive = true          # Walk subdirectories of the source
//! overwrite = false         # Replace existing destination files
//!
//! [rename]
//! pattern = "{date}_{counter}"  # Destination name pattern
//!
//! [processing]
//! max_threads = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Rename Pattern Placeholders
//!
//! | Placeholder | Expands to |
//! |---|---|
//! | `{date}` | Capture date, `YYYY-MM-DD` |
//! | `{counter}` | Per-date counter, 3-digit zero-padded |
//! | `{folder}` | Source directory name |
//! | `{orig}` | Original filename stem |
//!
//! Unknown placeholders and empty patterns are rejected by [`RunConfig::validate`]
//! before any file is touched.
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only lower the quality
//! quality = 55
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Output encoding format for processed photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// Destination file extension, without the dot. JPEG uses `jpg`.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Parse a user-supplied format name (`jpeg`, `jpg`, `png`, `webp`).
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(ConfigError::Validation(format!(
                "unknown output format: {other} (expected jpeg, png, or webp)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        };
        write!(f, "{name}")
    }
}

/// Run configuration loaded from `photopress.toml` and CLI flags.
///
/// All fields have defaults matching the stock behavior. Config files need
/// only specify the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Bounding box width. Output never exceeds this; images are not upscaled.
    pub max_width: u32,
    /// Bounding box height.
    pub max_height: u32,
    /// Lossy encoding quality (1-100). Only meaningful for JPEG output.
    pub quality: u32,
    /// Output encoding format.
    pub format: OutputFormat,
    /// Walk subdirectories of the source.
    pub recursive: bool,
    /// Replace existing destination files instead of suffixing around them.
    pub overwrite: bool,
    /// Destination naming settings.
    pub rename: RenameConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 600,
            quality: 70,
            format: OutputFormat::Jpeg,
            recursive: true,
            overwrite: false,
            rename: RenameConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    /// Destination name pattern. See the module docs for placeholders.
    pub pattern: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern().to_string(),
        }
    }
}

/// The stock rename pattern: capture date plus a per-date counter.
pub fn default_pattern() -> &'static str {
    "{date}_{counter}"
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum parallel workers. `None` means one per CPU core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
}

impl RunConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::Validation(
                "max_width and max_height must be non-zero".into(),
            ));
        }
        naming::validate_pattern(&self.rename.pattern)
            .map_err(|e| ConfigError::Validation(format!("rename.pattern: {e}")))?;
        Ok(())
    }
}

/// Load configuration for a run.
///
/// Resolution order:
/// 1. An explicit `--config` path (error if missing or malformed)
/// 2. `photopress.toml` in the source directory, if present
/// 3. Stock defaults
pub fn load_config(explicit: Option<&Path>, source_dir: &Path) -> Result<RunConfig, ConfigError> {
    let path: Option<PathBuf> = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let candidate = source_dir.join(CONFIG_FILENAME);
            candidate.exists().then_some(candidate)
        }
    };

    let config = match path {
        Some(p) => {
            let content = fs::read_to_string(&p)?;
            toml::from_str(&content)?
        }
        None => RunConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Filename looked up in the source directory when no `--config` is given.
pub const CONFIG_FILENAME: &str = "photopress.toml";

/// Number of worker threads to use given the processing config.
///
/// User config can constrain down, not up: the value is capped at the
/// number of available CPU cores.
pub fn effective_threads(processing: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match processing.max_threads {
        Some(n) if n >= 1 => n.min(cores),
        _ => cores,
    }
}

/// A stock `photopress.toml` with every option present and documented.
///
/// Printed by `photopress gen-config` so users can start from a complete,
/// commented file instead of the docs.
pub fn stock_config_toml() -> String {
    let defaults = RunConfig::default();
    format!(
        r#"# photopress.toml — stock configuration
# Every option is listed with its default. Delete anything you don't
# want to override; absent keys fall back to these values.

# Bounding box for the fit-resize. Aspect ratio is preserved and images
# are never upscaled: a 640x480 source stays 640x480.
max_width = {max_width}
max_height = {max_height}

# JPEG encoding quality, 1-100. PNG and WebP output is lossless and
# ignores this value.
quality = {quality}

# Output format: "jpeg" (writes .jpg), "png", or "webp".
format = "{format}"

# Walk subdirectories of the source directory.
recursive = {recursive}

# Replace existing destination files. When false (the default), a name
# that collides with a file already on disk gets a numeric suffix and
# the existing file is left untouched.
overwrite = {overwrite}

[rename]
# Destination name pattern. Placeholders:
#   {{date}}    capture date, YYYY-MM-DD (EXIF date, else file mtime)
#   {{counter}} per-date counter, 3-digit zero-padded
#   {{folder}}  source directory name
#   {{orig}}    original filename stem
pattern = "{pattern}"

[processing]
# Maximum parallel workers. Omit for one worker per CPU core.
# max_threads = 4
"#,
        max_width = defaults.max_width,
        max_height = defaults.max_height,
        quality = defaults.quality,
        format = defaults.format,
        recursive = defaults.recursive,
        overwrite = defaults.overwrite,
        pattern = defaults.rename.pattern,
    )
}
