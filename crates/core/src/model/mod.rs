//! Record model for archive entries and their annotated form.
//!
//! A record is the archive's JSON object kept as-is: keys stay in source order
//! and absent keys stay absent, so the annotated table is a superset of the
//! fetched one. The few fields the pipeline reads are exposed as accessors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected a JSON array or an object with an `items` array in {}", .0.display())]
    UnexpectedShape(PathBuf),
}

/// One inscription entry as returned by the archive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style insert; an existing key keeps its position.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// String value of `key`; `null`, numbers and other shapes read as `None`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get("id").filter(|v| !v.is_null())
    }

    pub fn religion(&self) -> Option<&str> {
        self.text("religion")
    }

    pub fn commentary(&self) -> Option<&str> {
        self.text("commentary")
    }

    pub fn country(&self) -> Option<&str> {
        self.text("country")
    }

    /// Commentary with surrounding whitespace removed, or `None` when absent or blank.
    pub fn trimmed_commentary(&self) -> Option<&str> {
        self.commentary().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Lower year bound; the archive sends zero-padded strings such as `"0201"`.
    pub fn not_before_year(&self) -> Option<f64> {
        parse_year(self.get("not_before"))
    }

    pub fn not_after_year(&self) -> Option<f64> {
        parse_year(self.get("not_after"))
    }

    /// Midpoint of the year bounds; `None` unless both bounds parse.
    pub fn average_date(&self) -> Option<f64> {
        Some((self.not_before_year()? + self.not_after_year()?) / 2.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Coerce a year bound to a number. Unparseable values become `None`.
pub fn parse_year(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Christian {
    Yes,
    No,
}

impl Christian {
    pub fn as_str(&self) -> &'static str {
        match self {
            Christian::Yes => "yes",
            Christian::No => "no",
        }
    }
}

impl From<bool> for Christian {
    fn from(value: bool) -> Self {
        if value {
            Christian::Yes
        } else {
            Christian::No
        }
    }
}

impl fmt::Display for Christian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record plus the fields derived by annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: Record,
    /// Sorted, de-duplicated canonical motif names joined by `", "`. Never empty.
    pub motifs: String,
    /// Sorted, de-duplicated group names joined by `", "`. May be empty.
    #[serde(default)]
    pub motif_group: String,
    pub christian: Christian,
}

impl AnnotatedRecord {
    pub fn motif_list(&self) -> Vec<&str> {
        split_joined(&self.motifs)
    }

    pub fn motif_group_list(&self) -> Vec<&str> {
        split_joined(&self.motif_group)
    }
}

/// Split a `", "`-joined field back into its entries, dropping empty ones.
pub fn split_joined(joined: &str) -> Vec<&str> {
    joined.split(", ").filter(|s| !s.is_empty()).collect()
}

/// Load a table that is either a bare JSON array or an object with an `items` array.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ModelError> {
    let body = std::fs::read_to_string(path)
        .map_err(|source| ModelError::Io { path: path.to_path_buf(), source })?;
    let value: Value = serde_json::from_str(&body)
        .map_err(|source| ModelError::Json { path: path.to_path_buf(), source })?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(ModelError::UnexpectedShape(path.to_path_buf())),
        },
        _ => return Err(ModelError::UnexpectedShape(path.to_path_buf())),
    };
    serde_json::from_value(Value::Array(items))
        .map_err(|source| ModelError::Json { path: path.to_path_buf(), source })
}

pub fn load_records(path: &Path) -> Result<Vec<Record>, ModelError> {
    load_table(path)
}

pub fn load_annotated(path: &Path) -> Result<Vec<AnnotatedRecord>, ModelError> {
    load_table(path)
}

/// Write `value` as indented JSON with non-ASCII characters left unescaped.
///
/// Parent directories are created as needed.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ModelError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|source| ModelError::Json { path: path.to_path_buf(), source })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| ModelError::Io { path: parent.to_path_buf(), source })?;
    }
    std::fs::write(path, body).map_err(|source| ModelError::Io { path: path.to_path_buf(), source })
}
