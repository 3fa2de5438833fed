use serde::{Deserialize, Serialize};

use crate::annotate::ExtractionStrategy;

pub const DEFAULT_ENDPOINT: &str = "https://edh.ub.uni-heidelberg.de/data/api/inschrift/suche";

/// Query parameters for the archive search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub endpoint: String,
    /// Inscription category (`titsep` = epitaph).
    pub inscription_type: String,
    /// Earliest year (`jahr_a`).
    pub year_from: i32,
    /// Latest year (`jahr_b`).
    pub year_to: i32,
    pub limit: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            inscription_type: "titsep".to_string(),
            year_from: 200,
            year_to: 600,
            limit: 1_000_000,
        }
    }
}

/// Static resources and strategy used by the annotate stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Keyword list, one surface form per line.
    pub keywords: String,
    /// Keyword groups, `Group: motif, motif` per line.
    pub keyword_groups: String,
    /// Optional `Variant: Canonical` overrides merged over the built-in baseforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseforms: Option<String>,
    #[serde(default)]
    pub strategy: ExtractionStrategy,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            keywords: "keywords.txt".to_string(),
            keyword_groups: "keyword_groups.txt".to_string(),
            baseforms: None,
            strategy: ExtractionStrategy::default(),
        }
    }
}

/// Which lemmatizer to use and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LemmatizerConfig {
    pub backend: String,
    /// Program and arguments for the `command` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// Optional lexicon for the `builtin` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<String>,
}

impl Default for LemmatizerConfig {
    fn default() -> Self {
        Self { backend: "builtin".to_string(), command: None, lexicon: None }
    }
}

/// Inputs for the figure battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub shapefile: String,
    /// Attribute column holding the country name.
    pub name_field: String,
    /// Year splitting the before/after maps.
    pub year_threshold: i32,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            shapefile: "mapdata/ne_110m_admin_0_countries.shp".to_string(),
            name_field: "ADMIN".to_string(),
            year_threshold: 350,
        }
    }
}

/// Serializable configuration describing a motif-tagging project.
///
/// This lives at `.motif/project.json` (or `.motif/project.yaml`) in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the data.
    pub config_version: String,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub annotate: AnnotateConfig,
    #[serde(default)]
    pub lemmatizer: LemmatizerConfig,
    #[serde(default)]
    pub analyze: AnalyzeConfig,
}

impl ProjectConfig {
    /// Create a new project configuration with default stage settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            fetch: FetchConfig::default(),
            annotate: AnnotateConfig::default(),
            lemmatizer: LemmatizerConfig::default(),
            analyze: AnalyzeConfig::default(),
        }
    }
}
