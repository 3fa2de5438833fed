//! Project layout and configuration.
//!
//! A project is a directory holding the static resources (keyword list, keyword
//! groups, optional baseform overrides), the fetched and annotated tables under
//! `data/`, country geometry under `mapdata/`, and rendered figures under
//! `figures/`. Configuration lives at `.motif/project.json` (or `.yaml`).

pub mod config;
pub mod context;
pub mod layout;
pub mod util;

pub use config::*;
pub use context::*;
pub use layout::*;
pub use util::*;
