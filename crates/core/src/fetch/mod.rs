//! Archive fetch stage.
//!
//! One blocking GET against the archive search endpoint. A 200 response is
//! parsed as JSON and written verbatim (pretty-printed); any other status is
//! surfaced as [`FetchError::Status`] and nothing is written.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::model::{self, ModelError};
use crate::project::FetchConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Archive returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Archive response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Query parameters sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub inscription_type: String,
    pub year_from: i32,
    pub year_to: i32,
    pub limit: u64,
}

impl SearchQuery {
    /// Wire names as the archive expects them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("inschriftgattung", self.inscription_type.clone()),
            ("jahr_a", self.year_from.to_string()),
            ("jahr_b", self.year_to.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl From<&FetchConfig> for SearchQuery {
    fn from(config: &FetchConfig) -> Self {
        Self {
            inscription_type: config.inscription_type.clone(),
            year_from: config.year_from,
            year_to: config.year_to,
            limit: config.limit,
        }
    }
}

/// Raw HTTP outcome: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResponse {
    pub status: u16,
    pub body: String,
}

/// Transport used by the fetch stage.
pub trait ArchiveClient {
    fn search(&self, endpoint: &str, query: &SearchQuery) -> Result<ArchiveResponse, FetchError>;
}

/// Blocking reqwest client.
pub struct HttpArchiveClient {
    client: reqwest::blocking::Client,
}

impl HttpArchiveClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("motif-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ArchiveClient for HttpArchiveClient {
    fn search(&self, endpoint: &str, query: &SearchQuery) -> Result<ArchiveResponse, FetchError> {
        let response = self
            .client
            .get(endpoint)
            .query(&query.params())
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(ArchiveResponse { status, body })
    }
}

/// Written next to the project config after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMetadata {
    pub endpoint: String,
    pub query: SearchQuery,
    pub fetched_at: String,
    pub item_count: usize,
    pub output: String,
    pub sha256: String,
}

/// Issue the search and return the parsed JSON body of a 200 response.
pub fn fetch_archive(client: &dyn ArchiveClient, config: &FetchConfig) -> Result<Value, FetchError> {
    let query = SearchQuery::from(config);
    info!(endpoint = %config.endpoint, ?query, "querying archive");
    let response = client.search(&config.endpoint, &query)?;
    if response.status != 200 {
        return Err(FetchError::Status { code: response.status, body: response.body });
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Number of records in a response: the `items` array, or the top-level array.
pub fn item_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(obj) => obj.get("items").and_then(Value::as_array).map_or(0, Vec::len),
        _ => 0,
    }
}

/// Fetch, write the response to `output`, and record metadata at `metadata_path`.
pub fn fetch_to_file(
    client: &dyn ArchiveClient,
    config: &FetchConfig,
    output: &Path,
    metadata_path: &Path,
) -> Result<FetchMetadata, FetchError> {
    let data = fetch_archive(client, config)?;
    model::write_json_pretty(output, &data)?;

    let written = std::fs::read(output)
        .map_err(|source| FetchError::Hash { path: output.to_path_buf(), source })?;
    let metadata = FetchMetadata {
        endpoint: config.endpoint.clone(),
        query: SearchQuery::from(config),
        fetched_at: Utc::now().to_rfc3339(),
        item_count: item_count(&data),
        output: output.display().to_string(),
        sha256: format!("{:x}", Sha256::digest(&written)),
    };
    model::write_json_pretty(metadata_path, &metadata)?;
    info!(items = metadata.item_count, output = %output.display(), "saved archive response");
    Ok(metadata)
}
