//! Destination naming: pattern rendering and collision tracking.
//!
//! ## Pattern Rendering
//!
//! A rename pattern is a literal string with `{placeholder}` substitutions:
//!
//! | Placeholder | Expands to |
//! |---|---|
//! | `{date}` | capture date, `YYYY-MM-DD` |
//! | `{counter}` | per-date counter, 3-digit zero-padded |
//! | `{folder}` | source directory name |
//! | `{orig}` | original filename stem |
//!
//! Patterns are checked by [`validate_pattern`] before a run starts; a typo
//! like `{dat}` is a config error, not a silently literal filename.
//!
//! ## Collision Tracking
//!
//! [`UniqueNamer`] owns all naming state for one run: the per-date counters
//! behind `{counter}` and the set of names already handed out. When two
//! items render to the same base name (same capture date with a
//! counter-less pattern, say), the later one gets a `_NNN` suffix,
//! monotonically increasing in assignment order. Assignment is sequential
//! and deterministic: the same items in the same order always produce the
//! same names.
//!
//! The namer does not consult the destination directory. Whether an
//! already-existing file is skipped or replaced is an overwrite-policy
//! decision that belongs to the pipeline, not to naming.

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),
    #[error("unclosed '{{' in pattern")]
    UnclosedBrace,
}

const PLACEHOLDERS: &[&str] = &["date", "counter", "folder", "orig"];

/// Check a rename pattern for unknown placeholders and unbalanced braces.
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternError::Empty);
    }
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return Err(PatternError::UnclosedBrace);
        };
        let name = &after[..close];
        if !PLACEHOLDERS.contains(&name) {
            return Err(PatternError::UnknownPlaceholder(name.to_string()));
        }
        rest = &after[close + 1..];
    }
    Ok(())
}

/// Values substituted into a rename pattern for one photo.
#[derive(Debug, Clone)]
pub struct RenameContext<'a> {
    /// Source directory name (`{folder}`).
    pub folder: &'a str,
    /// Original filename stem (`{orig}`).
    pub orig: &'a str,
    /// Resolved capture timestamp (`{date}`).
    pub timestamp: NaiveDateTime,
    /// Per-date counter, assigned by [`UniqueNamer`] (`{counter}`).
    pub counter: u32,
}

/// Render a validated pattern against a context.
///
/// Unknown placeholders are rendered literally; [`validate_pattern`] has
/// already rejected them for user-supplied patterns.
pub fn render_pattern(pattern: &str, ctx: &RenameContext<'_>) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                match &after[..close] {
                    "date" => out.push_str(&ctx.timestamp.format("%Y-%m-%d").to_string()),
                    "counter" => out.push_str(&format!("{:03}", ctx.counter)),
                    "folder" => out.push_str(ctx.folder),
                    "orig" => out.push_str(ctx.orig),
                    other => {
                        out.push('{');
                        out.push_str(other);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Run-scoped destination naming state.
///
/// One instance per run; assignment happens sequentially in discovery
/// order, which is what makes the uniqueness invariant hold without locks.
#[derive(Debug, Default)]
pub struct UniqueNamer {
    /// Per-date counters feeding `{counter}`, keyed by `YYYY-MM-DD`.
    counters: HashMap<String, u32>,
    /// Every filename handed out this run.
    assigned: HashSet<String>,
}

impl UniqueNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a unique destination filename (with extension) for one photo.
    ///
    /// Renders the pattern with the next per-date counter, then resolves
    /// collisions within the run by appending `_001`, `_002`, … in
    /// assignment order.
    pub fn assign(
        &mut self,
        pattern: &str,
        folder: &str,
        orig: &str,
        timestamp: NaiveDateTime,
        ext: &str,
    ) -> String {
        let date_key = timestamp.format("%Y-%m-%d").to_string();
        let counter = self.counters.entry(date_key).or_insert(0);
        *counter += 1;

        let ctx = RenameContext {
            folder,
            orig,
            timestamp,
            counter: *counter,
        };
        let base = render_pattern(pattern, &ctx);

        let mut candidate = format!("{base}.{ext}");
        let mut suffix = 0u32;
        while self.assigned.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}_{suffix:03}.{ext}");
        }

        self.assigned.insert(candidate.clone());
        candidate
    }
}
