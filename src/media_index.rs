//! Media index generation for the website's public assets.
//!
//! Walks each media category under the public directory and writes a sorted
//! JSON list of the files it finds, so the site can render galleries without
//! listing directories at request time.
//!
//! ## Directory Structure
//!
//! ```text
//! public/
//! ├── images/                 # MediaCategory::Images
//! │   ├── hero.webp
//! │   └── 2024/
//! │       └── a.png           # → { "path": "2024/a.png", "ext": "png", ... }
//! ├── videos/                 # MediaCategory::Videos
//! │   └── intro.MP4           # → { "path": "intro.MP4", "ext": "mp4", "type": "video" }
//! └── _media/                 # Output
//!     ├── images.json
//!     └── videos.json
//! ```
//!
//! ## Skip Policy
//!
//! A category whose directory is missing, or which contains no qualifying
//! files, is skipped and its previous index is left untouched. A transient
//! scan failure therefore never replaces a good index with an empty one. The
//! flip side is that deleting a source directory keeps serving the stale
//! index until the file is removed by hand.
//!
//! ## Determinism
//!
//! Items are sorted by path in code-point order and serialized with a fixed
//! layout, so re-running over an unchanged tree produces identical bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The fixed set of asset classes that get an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Images,
    Videos,
}

/// Value of the `type` field on every item of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

impl MediaCategory {
    /// All categories, in processing order.
    pub const ALL: [MediaCategory; 2] = [MediaCategory::Images, MediaCategory::Videos];

    /// Directory name under the public root, also the output file stem.
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaCategory::Images => "images",
            MediaCategory::Videos => "videos",
        }
    }

    /// Lower-case extensions (without dot) accepted for this category.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaCategory::Images => IMAGE_EXTENSIONS,
            MediaCategory::Videos => VIDEO_EXTENSIONS,
        }
    }

    pub fn media_type(self) -> MediaType {
        match self {
            MediaCategory::Images => MediaType::Image,
            MediaCategory::Videos => MediaType::Video,
        }
    }

    /// Lower-cased extension of `path` if this category accepts it.
    pub fn accepts(self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        self.extensions().contains(&ext.as_str()).then_some(ext)
    }

    /// `<output_dir>/<category>.json`
    pub fn index_path(self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.json", self.dir_name()))
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One indexed media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Relative to the category root, `/`-separated, no leading slash.
    pub path: String,
    /// Extension without the dot, lower-cased.
    pub ext: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// Result of scanning one category directory.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The category directory does not exist.
    Missing(PathBuf),
    /// The directory exists but holds no file with an accepted extension.
    Empty(PathBuf),
    /// Qualifying files, sorted by path.
    Found(Vec<MediaItem>),
}

/// Progress notifications emitted by [`generate`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEvent {
    Scanning { category: MediaCategory },
    DirectoryMissing { dir: PathBuf },
    NoFiles { dir: PathBuf },
    Written { path: PathBuf, count: usize },
}

/// What happened to one category during [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub category: MediaCategory,
    /// Index file written, or `None` when the category was skipped.
    pub written: Option<PathBuf>,
    pub count: usize,
}

/// Express `path` relative to `root` with `/` separators and no leading slash.
///
/// Returns `None` if `path` is not under `root`.
pub fn normalize_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/").trim_start_matches('/').to_string())
}

/// Recursively collect the accepted files of `category` under `public_dir`.
///
/// Symlinked files are included; symlinked directories are not descended.
pub fn scan_category(
    public_dir: &Path,
    category: MediaCategory,
) -> Result<ScanOutcome, IndexError> {
    let base = public_dir.join(category.dir_name());
    if !base.exists() {
        return Ok(ScanOutcome::Missing(base));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(&base).min_depth(1) {
        let entry = entry?;
        if !is_file_entry(&entry) {
            continue;
        }
        let Some(ext) = category.accepts(entry.path()) else {
            continue;
        };
        let Some(path) = normalize_relative(&base, entry.path()) else {
            continue;
        };
        items.push(MediaItem {
            path,
            ext,
            media_type: category.media_type(),
        });
    }

    if items.is_empty() {
        return Ok(ScanOutcome::Empty(base));
    }

    items.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(ScanOutcome::Found(items))
}

fn is_file_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    // Dangling links count as files too; only links to directories are skipped.
    file_type.is_symlink() && !entry.path().is_dir()
}

/// Serialize `items` as the on-disk index format.
///
/// 2-space indent, non-ASCII left as UTF-8, trailing newline.
pub fn render_index(items: &[MediaItem]) -> Result<String, IndexError> {
    let mut json = serde_json::to_string_pretty(items)?;
    json.push('\n');
    Ok(json)
}

/// Write the index for `category` into `output_dir`. Returns the path written.
pub fn write_index(
    output_dir: &Path,
    category: MediaCategory,
    items: &[MediaItem],
) -> Result<PathBuf, IndexError> {
    let path = category.index_path(output_dir);
    fs::write(&path, render_index(items)?)?;
    Ok(path)
}

/// Scan every category and write its index, skipping missing or empty ones.
///
/// `output_dir` is created up front. `on_event` receives progress as it
/// happens so callers can stream status lines.
pub fn generate(
    public_dir: &Path,
    output_dir: &Path,
    mut on_event: impl FnMut(&IndexEvent),
) -> Result<Vec<CategoryReport>, IndexError> {
    fs::create_dir_all(output_dir)?;

    let mut reports = Vec::with_capacity(MediaCategory::ALL.len());
    for category in MediaCategory::ALL {
        on_event(&IndexEvent::Scanning { category });

        let report = match scan_category(public_dir, category)? {
            ScanOutcome::Missing(dir) => {
                on_event(&IndexEvent::DirectoryMissing { dir });
                CategoryReport {
                    category,
                    written: None,
                    count: 0,
                }
            }
            ScanOutcome::Empty(dir) => {
                on_event(&IndexEvent::NoFiles { dir });
                CategoryReport {
                    category,
                    written: None,
                    count: 0,
                }
            }
            ScanOutcome::Found(items) => {
                let path = write_index(output_dir, category, &items)?;
                let count = items.len();
                on_event(&IndexEvent::Written {
                    path: path.clone(),
                    count,
                });
                CategoryReport {
                    category,
                    written: Some(path),
                    count,
                }
            }
        };
        reports.push(report);
    }

    Ok(reports)
}
