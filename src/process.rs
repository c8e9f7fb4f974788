//! Pipeline orchestration: scan, name, transform, write.
//!
//! ## Stages
//!
//! ```text
//! scan ──► plan (naming) ──► transform + write ──► summary
//!   sequential   sequential        parallel        sequential
//! ```
//!
//! Naming runs sequentially in discovery order so destination names are
//! deterministic; the per-photo transform and write run on a rayon worker
//! pool. Each worker reports back through an mpsc channel so progress can
//! be printed live without interleaving.
//!
//! ## Failure Semantics
//!
//! Only two things abort a run: the source directory being unusable and
//! the destination directory being uncreatable. Everything after that is
//! per item — a photo that fails to decode or write is recorded in the
//! [`RunSummary`] as failed and the run continues with the rest.
//!
//! ## Write Discipline
//!
//! A transform produces encoded bytes in memory; nothing touches the
//! destination until encoding succeeded. The writer then goes through a
//! hidden `.name.partial` file and renames it into place, so a crash or
//! full disk never leaves a half-written photo under its final name.
//! Partial files start with a dot, which also keeps them out of any
//! rescan of the same tree.

use crate::config::RunConfig;
use crate::imaging::{ImageBackend, Quality, RustBackend, TransformParams};
use crate::metadata;
use crate::naming::UniqueNamer;
use crate::scan::{self, PhotoItem, ScanError};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot create destination directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One source photo with its assigned destination filename.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub item: PhotoItem,
    /// Destination filename, unique within the run.
    pub dest_name: String,
}

/// What happened to one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "detail")]
pub enum ItemOutcome {
    /// Transformed and written to the destination.
    Written,
    /// Destination file already existed and overwrite is off.
    Skipped,
    /// Transform or write failed; the message says why.
    Failed(String),
}

/// Per-photo record in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    /// Source path relative to the source root.
    pub source: String,
    /// Destination filename.
    pub dest: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// End-of-run accounting, also serialized by `--report`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub dest: String,
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub items: Vec<ItemResult>,
}

impl RunSummary {
    /// True when no item failed (skips are fine).
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Progress events emitted while a run is in flight.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started { total: usize },
    /// One photo finished, in any outcome. `index` is 1-based and reflects
    /// completion order, not discovery order.
    ItemDone {
        index: usize,
        total: usize,
        result: ItemResult,
    },
}

/// Scan the source and assign destination names, in discovery order.
///
/// This is the whole sequential half of the pipeline, shared by `run` and
/// `check`: after it, every photo knows its destination filename and the
/// rest is embarrassingly parallel.
pub fn plan(
    source: &Path,
    config: &RunConfig,
) -> Result<Vec<PlannedItem>, ProcessError> {
    let items = scan::scan(source, config.recursive)?;
    let folder = source
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = config.format.extension();

    let mut namer = UniqueNamer::new();
    let planned = items
        .into_iter()
        .map(|item| {
            let timestamp = metadata::capture_time(&item.path);
            let dest_name =
                namer.assign(&config.rename.pattern, &folder, &item.stem, timestamp, ext);
            PlannedItem { item, dest_name }
        })
        .collect();
    Ok(planned)
}

/// Run the full pipeline with the stock backend.
pub fn run(
    source: &Path,
    dest: &Path,
    config: &RunConfig,
    events: &Sender<ProcessEvent>,
) -> Result<RunSummary, ProcessError> {
    run_with_backend(&RustBackend::new(), source, dest, config, events)
}

/// Run the full pipeline with a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    dest: &Path,
    config: &RunConfig,
    events: &Sender<ProcessEvent>,
) -> Result<RunSummary, ProcessError> {
    let planned = plan(source, config)?;
    fs::create_dir_all(dest)?;

    let total = planned.len();
    let _ = events.send(ProcessEvent::Started { total });

    // Completion order is whatever the pool gives us; collect() restores
    // discovery order for the summary.
    let counter = std::sync::atomic::AtomicUsize::new(0);
    let items: Vec<ItemResult> = planned
        .par_iter()
        .map_with(events.clone(), |tx, p| {
            let outcome = process_one(backend, p, dest, config);
            let result = ItemResult {
                source: p.item.rel_path.to_string_lossy().to_string(),
                dest: p.dest_name.clone(),
                outcome,
            };
            let index = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            let _ = tx.send(ProcessEvent::ItemDone {
                index,
                total,
                result: result.clone(),
            });
            result
        })
        .collect();

    let written = items
        .iter()
        .filter(|r| r.outcome == ItemOutcome::Written)
        .count();
    let skipped = items
        .iter()
        .filter(|r| r.outcome == ItemOutcome::Skipped)
        .count();
    let failed = items.len() - written - skipped;

    Ok(RunSummary {
        source: source.display().to_string(),
        dest: dest.display().to_string(),
        total,
        written,
        skipped,
        failed,
        items,
    })
}

/// Transform and write one photo. Never panics; every failure becomes an
/// [`ItemOutcome::Failed`].
fn process_one(
    backend: &impl ImageBackend,
    planned: &PlannedItem,
    dest: &Path,
    config: &RunConfig,
) -> ItemOutcome {
    let dest_path = dest.join(&planned.dest_name);
    if dest_path.exists() && !config.overwrite {
        return ItemOutcome::Skipped;
    }

    let params = TransformParams {
        source: planned.item.path.clone(),
        max_width: config.max_width,
        max_height: config.max_height,
        quality: Quality::new(config.quality),
        format: config.format,
    };
    let bytes = match backend.transform(&params) {
        Ok(bytes) => bytes,
        Err(e) => return ItemOutcome::Failed(e.to_string()),
    };

    match write_atomic(dest, &planned.dest_name, &bytes) {
        Ok(()) => ItemOutcome::Written,
        Err(e) => ItemOutcome::Failed(format!("write failed: {e}")),
    }
}

/// Write bytes to `dir/name` via a dotted partial file and a rename.
///
/// The rename replaces an existing file, which is exactly the overwrite
/// behavior; the overwrite-off check happens before the transform. Any
/// failure, including a short write (full disk), removes the partial file.
fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<()> {
    let partial = dir.join(format!(".{name}.partial"));
    fs::write(&partial, bytes)
        .and_then(|()| fs::rename(&partial, dir.join(name)))
        .inspect_err(|_| {
            let _ = fs::remove_file(&partial);
        })
}
