//! Container image metadata generation.
//!
//! Turns the three values a publish job knows after pushing an image (the
//! image name, its digest, and the newline-separated tag list) into a small
//! JSON record that later pipeline steps read instead of re-querying the
//! registry.
//!
//! ## Output
//!
//! ```json
//! {
//!   "name": "xcontrol",
//!   "digest": "sha256:9f86d0…",
//!   "tags": [
//!     "v1.2",
//!     "v1.2:latest"
//!   ],
//!   "preferred_tag": "v1.2:latest",
//!   "image": "ghcr.io/cloud-neutral-toolkit/xcontrol",
//!   "image_with_digest": "ghcr.io/cloud-neutral-toolkit/xcontrol@sha256:9f86d0…"
//! }
//! ```
//!
//! The file is written to `image-metadata-<name>.json`, replacing any
//! previous file of that name.
//!
//! ## Preferred Tag
//!
//! The first tag ending in `:latest` wins. Without one, the first tag in the
//! list is used; an empty list gives an empty string.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Registry namespace images are published under.
pub const DEFAULT_REGISTRY: &str = "ghcr.io/cloud-neutral-toolkit";

const LATEST_SUFFIX: &str = ":latest";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata describing one published container image.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    pub digest: String,
    /// Tags exactly as given, in input order.
    pub tags: Vec<String>,
    /// One of `tags`, or empty when `tags` is empty.
    pub preferred_tag: String,
    /// `<registry>/<name>`
    pub image: String,
    /// `<registry>/<name>@<digest>`
    pub image_with_digest: String,
}

impl ImageMetadata {
    pub fn new(name: &str, digest: &str, tags: Vec<String>, registry: &str) -> Self {
        let preferred_tag = preferred_tag(&tags).to_string();
        let image = format!("{registry}/{name}");
        let image_with_digest = format!("{image}@{digest}");
        Self {
            name: name.to_string(),
            digest: digest.to_string(),
            tags,
            preferred_tag,
            image,
            image_with_digest,
        }
    }
}

/// Characters that end a line, on top of the `\r\n` pair.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split a tag blob into individual tags, one per line.
///
/// Any of `LINE_BREAKS` ends a line, and `\r\n` counts as one terminator.
/// A trailing terminator does not produce an empty tag, but blank lines in
/// between are kept.
pub fn parse_tags(blob: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut rest = blob;
    while !rest.is_empty() {
        let Some(pos) = rest.find(LINE_BREAKS) else {
            tags.push(rest.to_string());
            break;
        };
        tags.push(rest[..pos].to_string());
        let tail = &rest[pos..];
        let skip = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[skip..];
    }
    tags
}

/// Pick the canonical tag: first `:latest` tag, else the first tag, else "".
pub fn preferred_tag(tags: &[String]) -> &str {
    tags.iter()
        .find(|t| t.ends_with(LATEST_SUFFIX))
        .or_else(|| tags.first())
        .map(String::as_str)
        .unwrap_or("")
}

/// File name the metadata for `name` is written to.
pub fn metadata_filename(name: &str) -> String {
    format!("image-metadata-{name}.json")
}

/// Serialize `metadata` as 2-space indented, ASCII-only JSON.
///
/// Non-ASCII characters become `\uXXXX` escapes, with surrogate pairs
/// outside the Basic Multilingual Plane.
pub fn render_metadata(metadata: &ImageMetadata) -> Result<String, MetadataError> {
    let json = serde_json::to_string_pretty(metadata)?;
    Ok(escape_non_ascii(&json))
}

// serde_json only emits non-ASCII inside string literals, so escaping every
// such char keeps the document valid.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

/// Write `metadata` into `out_dir` in the [`render_metadata`] format.
///
/// Overwrites any existing file. Returns the path written.
pub fn write_metadata(metadata: &ImageMetadata, out_dir: &Path) -> Result<PathBuf, MetadataError> {
    let path = out_dir.join(metadata_filename(&metadata.name));
    fs::write(&path, render_metadata(metadata)?)?;
    Ok(path)
}
