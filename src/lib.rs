//! # pipeline-meta
//!
//! Small one-shot generators used by the build/CI pipeline. Each reads a few
//! inputs, computes a JSON document, writes it, and prints a status line.
//!
//! ```text
//! gen          name + digest + tags  →  image-metadata-<name>.json
//! media-index  public/{images,videos} →  public/_media/{images,videos}.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`image_metadata`] | Container image metadata record and preferred-tag selection |
//! | [`media_index`] | Recursive media scan, extension filtering, sorted JSON indices |
//! | [`config`] | Optional `pipeline-meta.toml` layered over stock defaults |
//! | [`output`] | CLI status line formatting |
//!
//! # Design Decisions
//!
//! ## Fail Fast
//!
//! There are no retries. Any I/O error ends the process with a diagnostic
//! and a non-zero status; the pipeline is responsible for re-running the
//! step. The only tolerated conditions are a missing or empty media
//! directory, which skip that category and keep its previous index.
//!
//! ## Deterministic Output
//!
//! Indices are sorted by path and serialized with a fixed layout so that an
//! unchanged asset tree yields byte-identical files and clean diffs.

pub mod config;
pub mod image_metadata;
pub mod media_index;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
