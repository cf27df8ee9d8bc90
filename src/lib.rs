//! Repertoire Library
//!
//! Turns a published song sheet (tab or comma separated) into a browsable
//! catalog of songs with per-guide resources.
//!
//! This library provides tools for:
//! - Parsing delimited sheet exports into a cell matrix
//! - Resolving fixed metadata columns from header aliases and discovering guide columns
//! - Parsing free-form difficulty levels ("★★★", "Nivel 3", "3/5")
//! - Grouping repeated rows into unique songs
//! - Filtering and sorting songs, and a raw-row table view
//! - Persisting view settings and per-song progress

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod grouping;
pub mod header;
pub mod level;
pub mod models;
pub mod parser;
pub mod query;
pub mod source;
pub mod state;
pub mod table;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use models::{ColumnMap, FieldId, GuideDefinition, ProgressMap, ProgressStatus, SongRecord};
pub use parser::Delimiter;
pub use query::{QueryState, SortKey, ViewMode};
