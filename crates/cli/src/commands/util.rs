use std::path::{Path, PathBuf};

use anyhow::Result;
use motif_core::project::{ProjectContext, ProjectLayout};

use crate::canonicalize_or_current;

/// Resolve `root` and load its config, falling back to defaults when none exists.
pub fn open_context(root: &str) -> Result<ProjectContext> {
    let root_path = canonicalize_or_current(root)?;
    ProjectContext::from_root(&root_path)
}

/// An explicit CLI path (resolved against the root) or the layout default.
pub fn resolve_or(layout: &ProjectLayout, explicit: Option<&str>, default: &Path) -> PathBuf {
    explicit.map(|p| layout.resolve(p)).unwrap_or_else(|| default.to_path_buf())
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Helper to print whether a file exists.
pub fn print_file_status(label: &str, path: &Path) {
    let exists = path.is_file();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
