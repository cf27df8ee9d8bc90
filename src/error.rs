//! Error handling for repertoire loading operations.
//!
//! Provides error types with context for fetching, parsing and
//! persisted-state failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot read sheet {path}: {source}")]
    SourceRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Fetch failed for {source_name}: HTTP {status}")]
    FetchFailure { source_name: String, status: u16 },

    #[error("Empty dataset: {reason}")]
    EmptyDataset { reason: String },

    #[error("Malformed persisted state in entry '{entry}': {reason}")]
    MalformedPersistedState { entry: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No song matches '{query}'")]
    SongNotFound { query: String },

    #[error("'{query}' matches {candidates} songs; be more specific")]
    AmbiguousSong { query: String, candidates: usize },

    #[error("Unknown guide: {guide}")]
    UnknownGuide { guide: String },
}

impl CatalogError {
    /// True for failures that end a load attempt (nothing gets displayed).
    ///
    /// Plain I/O errors come from the state file, not the sheet.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::Http(_)
                | CatalogError::FetchFailure { .. }
                | CatalogError::EmptyDataset { .. }
                | CatalogError::SourceRead { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
