use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::project::{load_or_default_config, ProjectConfig, ProjectLayout};

/// Convenience wrapper bundling layout and config, with resolved resource paths.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Load project config (or defaults) for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let config = load_or_default_config(&layout)?;
        Ok(Self { layout, config })
    }

    pub fn keywords_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.annotate.keywords)
    }

    pub fn keyword_groups_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.annotate.keyword_groups)
    }

    pub fn baseforms_path(&self) -> Option<PathBuf> {
        self.config.annotate.baseforms.as_ref().map(|p| self.layout.resolve(p))
    }

    pub fn lexicon_path(&self) -> Option<PathBuf> {
        self.config.lemmatizer.lexicon.as_ref().map(|p| self.layout.resolve(p))
    }

    pub fn shapefile_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.analyze.shapefile)
    }
}
