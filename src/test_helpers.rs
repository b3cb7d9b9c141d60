//! Shared test utilities for the pipeline-meta test suite.
//!
//! Builds throwaway asset trees and reads generated indices back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &["images/2024/a.png", "videos/intro.mp4"]);
//!
//! let items = found(scan_category(tmp.path(), MediaCategory::Images).unwrap());
//! assert_eq!(item_paths(&items), vec!["2024/a.png"]);
//! ```

use std::fs;
use std::path::Path;

use crate::media_index::{MediaItem, ScanOutcome};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create every relative file path under `root`, with parent directories.
///
/// File contents are placeholders; scanning only looks at names.
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "fake media").unwrap();
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Unwrap a `ScanOutcome::Found`. Panics on a skipped category.
pub fn found(outcome: ScanOutcome) -> Vec<MediaItem> {
    match outcome {
        ScanOutcome::Found(items) => items,
        other => panic!("expected files to be found, got {other:?}"),
    }
}

/// Parse an index file written by the generator.
pub fn read_index(path: &Path) -> Vec<MediaItem> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("index {} not readable: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("index {} is not valid JSON: {e}", path.display()))
}

/// All item paths in list order.
pub fn item_paths(items: &[MediaItem]) -> Vec<&str> {
    items.iter().map(|i| i.path.as_str()).collect()
}
