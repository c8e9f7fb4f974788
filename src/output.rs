//! CLI output formatting for the pipeline.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 3 photos in photos/
//! 001 trip/IMG_0001.jpg (3.1 MB) → 2023-06-15_001.jpg
//! 002 trip/IMG_0002.jpg (2.8 MB) → 2023-06-15_002.jpg
//! 003 scan.png (412.0 KB) → 2024-01-03_001.jpg
//! ```
//!
//! ## Run
//!
//! ```text
//! Processing 3 photos
//! [1/3] trip/IMG_0001.jpg → 2023-06-15_001.jpg
//! [2/3] trip/IMG_0002.jpg → 2023-06-15_002.jpg (exists, skipped)
//! [3/3] broken.jpg FAILED: unsupported or unreadable image
//!
//! 3 photos: 1 written, 1 skipped, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::process::{ItemOutcome, PlannedItem, ProcessEvent, RunSummary};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human-readable byte size: `412.0 KB`, `3.1 MB`.
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the dry-run listing: every discovered photo and the destination
/// name it would get.
pub fn format_check_output(planned: &[PlannedItem], source: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if planned.len() == 1 { "photo" } else { "photos" };
    lines.push(format!(
        "{} {} in {}",
        planned.len(),
        noun,
        source.display()
    ));

    for (i, p) in planned.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}) \u{2192} {}",
            format_index(i + 1),
            p.item.rel_path.display(),
            format_size(p.item.byte_size),
            p.dest_name
        ));
    }
    lines
}

/// Print the check listing to stdout.
pub fn print_check_output(planned: &[PlannedItem], source: &Path) {
    for line in format_check_output(planned, source) {
        println!("{}", line);
    }
}

// ============================================================================
// Run progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => {
            let noun = if *total == 1 { "photo" } else { "photos" };
            vec![format!("Processing {total} {noun}")]
        }
        ProcessEvent::ItemDone {
            index,
            total,
            result,
        } => {
            let line = match &result.outcome {
                ItemOutcome::Written => {
                    format!("[{index}/{total}] {} \u{2192} {}", result.source, result.dest)
                }
                ItemOutcome::Skipped => format!(
                    "[{index}/{total}] {} \u{2192} {} (exists, skipped)",
                    result.source, result.dest
                ),
                ItemOutcome::Failed(msg) => {
                    format!("[{index}/{total}] {} FAILED: {msg}", result.source)
                }
            };
            vec![line]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Format the end-of-run summary line(s).
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let noun = if summary.total == 1 { "photo" } else { "photos" };
    let mut lines = vec![
        String::new(),
        format!(
            "{} {}: {} written, {} skipped, {} failed",
            summary.total, noun, summary.written, summary.skipped, summary.failed
        ),
    ];
    if summary.failed > 0 {
        lines.push("Some photos could not be processed; see the lines marked FAILED.".to_string());
    }
    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}
