//! Configuration management.
//!
//! Provides the data source, storage namespace and timing settings used by
//! the loader, the state store and the search debouncer.

use crate::error::{CatalogError, Result};
use crate::parser::Delimiter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Published piano repertoire sheet (tab separated)
pub const DEFAULT_DATA_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQCSexe6ZgBbSKrzyhCkq-64aLrsu6SWqVhhiuccf3EhoMHcP_oxBLdGyZWONcHl861LrX6ZltEu3O3/pub?gid=0&single=true&output=tsv";

/// Prefix keeping one instrument's stored state apart from another's
pub const DEFAULT_STORAGE_NAMESPACE: &str = "musicala_piano_";

/// Global configuration for loading and browsing a repertoire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL or local path of the delimited sheet export
    pub data_source: String,

    /// Explicit delimiter; detected from the source when unset
    pub delimiter: Option<Delimiter>,

    /// Prefix for the persisted state entries
    pub storage_namespace: String,

    /// State file location; defaults under the user data directory
    pub state_path: Option<PathBuf>,

    /// HTTP request timeout
    pub request_timeout_secs: u64,

    /// Quiet window before a search recompute runs
    pub search_debounce_ms: u64,

    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            delimiter: None,
            storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            state_path: None,
            request_timeout_secs: 30,
            search_debounce_ms: 140,
            user_agent: format!("repertoire/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = source.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_storage_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }

    pub fn with_state_path(mut self, path: PathBuf) -> Self {
        self.state_path = Some(path);
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Delimiter to parse with: the explicit one, else detected from the source
    pub fn effective_delimiter(&self) -> Delimiter {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Delimiter::detect(&self.data_source));
        debug!("Using {} delimiter for {}", delimiter, self.data_source);
        delimiter
    }

    /// Where the state store lives
    pub fn state_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.state_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir().ok_or_else(|| CatalogError::Configuration {
            message: "could not determine user data directory".to_string(),
        })?;

        Ok(data_dir.join("repertoire").join("state.json"))
    }
}
