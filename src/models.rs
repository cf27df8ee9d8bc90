//! Core data structures for the repertoire pipeline.
//!
//! Defines the raw matrix, the resolved column map, guide definitions,
//! grouped song records and per-song progress tracking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Rows x cells as produced by the tabular parser; row 0 is the header
pub type RawMatrix = Vec<Vec<String>>;

/// Fixed metadata fields resolved by alias matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Name,
    Artist,
    Genre,
    Level,
    Key,
    Content,
}

impl FieldId {
    /// Declared resolution order
    pub const ALL: [FieldId; 6] = [
        FieldId::Name,
        FieldId::Artist,
        FieldId::Genre,
        FieldId::Level,
        FieldId::Key,
        FieldId::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Artist => "artist",
            FieldId::Genre => "genre",
            FieldId::Level => "level",
            FieldId::Key => "key",
            FieldId::Content => "content",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from fixed field to column index.
///
/// `name` always resolves; every other field may be absent, which
/// downstream code treats as "no data".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    name: usize,
    artist: Option<usize>,
    genre: Option<usize>,
    level: Option<usize>,
    key: Option<usize>,
    content: Option<usize>,
}

impl ColumnMap {
    /// Build a map from per-field lookups, forcing `name` to column 0 when absent
    pub fn from_lookup(mut lookup: impl FnMut(FieldId) -> Option<usize>) -> Self {
        Self {
            name: lookup(FieldId::Name).unwrap_or(0),
            artist: lookup(FieldId::Artist),
            genre: lookup(FieldId::Genre),
            level: lookup(FieldId::Level),
            key: lookup(FieldId::Key),
            content: lookup(FieldId::Content),
        }
    }

    /// Column index for a field, `None` when the field is absent
    pub fn get(&self, field: FieldId) -> Option<usize> {
        match field {
            FieldId::Name => Some(self.name),
            FieldId::Artist => self.artist,
            FieldId::Genre => self.genre,
            FieldId::Level => self.level,
            FieldId::Key => self.key,
            FieldId::Content => self.content,
        }
    }

    pub fn name(&self) -> usize {
        self.name
    }

    /// Resolved fields with their columns, in declared order
    pub fn resolved(&self) -> Vec<(FieldId, usize)> {
        FieldId::ALL
            .iter()
            .filter_map(|&field| self.get(field).map(|idx| (field, idx)))
            .collect()
    }

    /// Every column index claimed by a resolved fixed field
    pub fn claimed(&self) -> BTreeSet<usize> {
        self.resolved().into_iter().map(|(_, idx)| idx).collect()
    }

    /// Trimmed cell for a field, empty when the field is absent or the row is short
    pub fn cell<'a>(&self, row: &'a [String], field: FieldId) -> &'a str {
        self.get(field)
            .and_then(|idx| row.get(idx))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

/// One dynamically discovered guide column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideDefinition {
    pub id: String,
    pub label: String,
    /// `None` only for the synthesized placeholder guide
    pub column_index: Option<usize>,
}

impl GuideDefinition {
    pub fn is_placeholder(&self) -> bool {
        self.column_index.is_none()
    }
}

/// Deduplicated song entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SongRecord {
    /// Normalized name, unique across the dataset
    pub key: String,
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub key_signature: String,
    pub content: String,
    pub level_raw: String,
    pub level_numeric: u8,
    /// Guide id -> non-empty value
    pub versions: HashMap<String, String>,
}

impl SongRecord {
    pub fn version(&self, guide_id: &str) -> Option<&str> {
        self.versions
            .get(guide_id)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn has_version(&self, guide_id: &str) -> bool {
        self.version(guide_id).is_some()
    }
}

/// Per-song learning progress; absence means not started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Doing,
    Done,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Doing => "doing",
            ProgressStatus::Done => "done",
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "doing" => Ok(ProgressStatus::Doing),
            "done" => Ok(ProgressStatus::Done),
            other => Err(format!("unknown progress status '{}'", other)),
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Song key -> progress status, keyed by normalized name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<String, ProgressStatus>);

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, song_key: &str) -> Option<ProgressStatus> {
        self.0.get(song_key).copied()
    }

    pub fn set(&mut self, song_key: impl Into<String>, status: ProgressStatus) {
        self.0.insert(song_key.into(), status);
    }

    pub fn clear(&mut self, song_key: &str) -> Option<ProgressStatus> {
        self.0.remove(song_key)
    }

    /// Set `status`, or clear it when the song already has that status.
    /// Returns the status now in effect.
    pub fn toggle(&mut self, song_key: &str, status: ProgressStatus) -> Option<ProgressStatus> {
        if self.get(song_key) == Some(status) {
            self.0.remove(song_key);
            None
        } else {
            self.0.insert(song_key.to_string(), status);
            Some(status)
        }
    }

    pub fn done_count(&self) -> usize {
        self.0
            .values()
            .filter(|&&s| s == ProgressStatus::Done)
            .count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ProgressStatus)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, ProgressStatus)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (String, ProgressStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Load statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub data_rows: usize,
    pub rows_skipped: usize,
    pub songs: usize,
    pub guides: usize,
}
