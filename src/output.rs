//! CLI output formatting for both generators.
//!
//! # Output Format
//!
//! ## Image metadata
//!
//! ```text
//! [metadata] Wrote: image-metadata-xcontrol.json
//! ```
//!
//! ## Media index
//!
//! ```text
//! Scanning images...
//! Generated public/_media/images.json with 42 items
//! Scanning videos...
//! Directory not found: public/videos. Skipping.
//! ```
//!
//! ## Check
//!
//! ```text
//! images: 2 items → public/_media/images.json
//!     001 2024/a.png
//!     002 hero.webp
//! Directory not found: public/videos. Skipping.
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `String` or `Vec<String>`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::media_index::{IndexEvent, MediaCategory, ScanOutcome};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Image metadata
// ============================================================================

pub fn format_metadata_written(path: &Path) -> String {
    format!("[metadata] Wrote: {}", path.display())
}

pub fn print_metadata_written(path: &Path) {
    println!("{}", format_metadata_written(path));
}

// ============================================================================
// Media index
// ============================================================================

/// Format one media index progress event as a status line.
pub fn format_index_event(event: &IndexEvent) -> String {
    match event {
        IndexEvent::Scanning { category } => format!("Scanning {}...", category),
        IndexEvent::DirectoryMissing { dir } => {
            format!("Directory not found: {}. Skipping.", dir.display())
        }
        IndexEvent::NoFiles { dir } => format!(
            "No files found in {}. Skipping generation to preserve existing index if any.",
            dir.display()
        ),
        IndexEvent::Written { path, count } => {
            format!("Generated {} with {} items", path.display(), count)
        }
    }
}

pub fn print_index_event(event: &IndexEvent) {
    println!("{}", format_index_event(event));
}

// ============================================================================
// Check
// ============================================================================

/// Format what a media index run would do for one category, without writing.
pub fn format_check_output(
    category: MediaCategory,
    outcome: &ScanOutcome,
    output_dir: &Path,
) -> Vec<String> {
    match outcome {
        // Skips read exactly as they do in a media index run.
        ScanOutcome::Missing(dir) => {
            vec![format_index_event(&IndexEvent::DirectoryMissing { dir: dir.clone() })]
        }
        ScanOutcome::Empty(dir) => {
            vec![format_index_event(&IndexEvent::NoFiles { dir: dir.clone() })]
        }
        ScanOutcome::Found(items) => {
            let mut lines = Vec::with_capacity(items.len() + 1);
            lines.push(format!(
                "{}: {} items → {}",
                category,
                items.len(),
                category.index_path(output_dir).display()
            ));
            for (i, item) in items.iter().enumerate() {
                lines.push(format!("    {} {}", format_index(i + 1), item.path));
            }
            lines
        }
    }
}

pub fn print_check_output(category: MediaCategory, outcome: &ScanOutcome, output_dir: &Path) {
    for line in format_check_output(category, outcome, output_dir) {
        println!("{}", line);
    }
}
