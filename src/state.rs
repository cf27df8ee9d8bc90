//! Local key/value state store.
//!
//! Persists the browsing configuration and per-song progress as five named
//! string entries in a small JSON file, the way a browser's local storage
//! would hold them. Entries are namespaced so several instruments can share
//! one file. The store is read once at startup and written after every
//! state-affecting action; the last write wins.

use crate::error::{CatalogError, Result};
use crate::models::{ProgressMap, ProgressStatus};
use crate::query::{QueryState, SortKey, ViewMode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Entry names, relative to the store namespace
pub mod entries {
    pub const GUIDE: &str = "guide";
    pub const VIEW: &str = "view";
    pub const SORT: &str = "sort";
    pub const LEVEL_MIN: &str = "level_min";
    pub const PROGRESS: &str = "progress_v1";
}

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    namespace: String,
    entries: BTreeMap<String, String>,
}

impl StateStore {
    /// Open the store at `path`; a missing or unreadable file starts empty
    pub async fn open(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => parse_entries(&path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };

        Ok(Self {
            path,
            namespace: namespace.into(),
            entries,
        })
    }

    /// In-memory store that is never written to disk unless saved explicitly
    pub fn in_memory(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn full_key(&self, name: &str) -> String {
        format!("{}{}", self.namespace, name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&self.full_key(name)).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = self.full_key(name);
        self.entries.insert(key, value.into());
    }

    /// Restore the query state persisted by a previous session.
    ///
    /// Only valid values are applied; anything else keeps the default. The
    /// search term is never persisted.
    pub fn load_query_state(&self) -> QueryState {
        let mut state = QueryState::default();

        if let Some(guide) = self.get(entries::GUIDE).filter(|g| !g.is_empty()) {
            state.selected_guide_id = guide.to_string();
        }
        if let Some(view) = self.get(entries::VIEW).and_then(|v| v.parse::<ViewMode>().ok()) {
            state.view_mode = view;
        }
        if let Some(sort) = self.get(entries::SORT).filter(|s| !s.is_empty()) {
            state.sort_key = SortKey::from(sort.to_string());
        }
        if let Some(level) = self
            .get(entries::LEVEL_MIN)
            .and_then(|l| l.trim().parse::<u8>().ok())
        {
            state.min_level = level;
        }

        state
    }

    /// Restore progress; malformed JSON yields an empty map
    pub fn load_progress(&self) -> ProgressMap {
        let Some(raw) = self.get(entries::PROGRESS) else {
            return ProgressMap::new();
        };

        match parse_progress(raw) {
            Ok(progress) => progress,
            Err(e) => {
                warn!("{}; resetting progress", e);
                ProgressMap::new()
            }
        }
    }

    /// Write the query state and progress into the entries (not yet saved)
    pub fn store_session(&mut self, state: &QueryState, progress: &ProgressMap) -> Result<()> {
        self.set(entries::GUIDE, state.selected_guide_id.clone());
        self.set(entries::VIEW, state.view_mode.as_str());
        self.set(entries::SORT, state.sort_key.as_str());
        self.set(entries::LEVEL_MIN, state.min_level.to_string());
        self.set(entries::PROGRESS, serde_json::to_string(progress)?);
        Ok(())
    }

    /// Flush entries to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Store the session and flush it
    pub async fn persist(&mut self, state: &QueryState, progress: &ProgressMap) -> Result<()> {
        self.store_session(state, progress)?;
        self.save().await
    }
}

fn parse_entries(path: &Path, text: &str) -> BTreeMap<String, String> {
    match serde_json::from_str::<BTreeMap<String, String>>(text) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "State file {} is not a flat string map ({}); starting fresh",
                path.display(),
                e
            );
            BTreeMap::new()
        }
    }
}

/// Parse the progress entry, dropping statuses this version does not know
fn parse_progress(raw: &str) -> Result<ProgressMap> {
    let malformed = |reason: String| CatalogError::MalformedPersistedState {
        entry: entries::PROGRESS.to_string(),
        reason,
    };

    let map: Option<BTreeMap<String, String>> =
        serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

    Ok(map
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, status)| match status.parse::<ProgressStatus>() {
            Ok(status) => Some((key, status)),
            Err(e) => {
                debug!("Ignoring progress for '{}': {}", key, e);
                None
            }
        })
        .collect())
}
