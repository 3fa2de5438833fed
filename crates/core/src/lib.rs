//! motif-core
//!
//! Core library for tagging epitaph records with iconographic motifs.
//!
//! This crate defines the record model, the archive fetch stage, the static
//! keyword/baseform/group lookups, the lemmatizer seam, the annotation pipeline
//! and the descriptive analysis that renders figures from annotated tables.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (the CLI today).

pub mod analysis;
pub mod annotate;
pub mod fetch;
pub mod lemma;
pub mod model;
pub mod project;
pub mod resources;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
