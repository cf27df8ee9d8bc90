//! Filtering and ordering of grouped songs.
//!
//! A [`QueryState`] holds the live filter/sort/display configuration; it is
//! applied to the grouped song list without mutating it.

use crate::models::SongRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::decompose_canonical;

/// Sort order for the visible list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    LevelAsc,
    LevelDesc,
    GenreAsc,
    /// Unrecognized key, kept verbatim; leaves the order untouched
    Other(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::LevelAsc => "level-asc",
            SortKey::LevelDesc => "level-desc",
            SortKey::GenreAsc => "genre-asc",
            SortKey::Other(raw) => raw,
        }
    }

    /// Compare two entries under this key; unknown keys compare equal
    pub fn compare(&self, a: &SortFields<'_>, b: &SortFields<'_>) -> Ordering {
        match self {
            SortKey::NameAsc => collate(a.name, b.name),
            SortKey::NameDesc => collate(b.name, a.name),
            SortKey::LevelAsc => a
                .level
                .cmp(&b.level)
                .then_with(|| collate(a.name, b.name)),
            SortKey::LevelDesc => b
                .level
                .cmp(&a.level)
                .then_with(|| collate(a.name, b.name)),
            SortKey::GenreAsc => collate(a.genre, b.genre),
            SortKey::Other(_) => Ordering::Equal,
        }
    }
}

impl From<String> for SortKey {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            "level-asc" => SortKey::LevelAsc,
            "level-desc" => SortKey::LevelDesc,
            "genre-asc" => SortKey::GenreAsc,
            _ => SortKey::Other(raw),
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SortKey::from(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values a sort key looks at
#[derive(Debug, Clone, Copy)]
pub struct SortFields<'a> {
    pub name: &'a str,
    pub genre: &'a str,
    pub level: u8,
}

impl<'a> From<&'a SongRecord> for SortFields<'a> {
    fn from(song: &'a SongRecord) -> Self {
        Self {
            name: &song.name,
            genre: &song.genre,
            level: song.level_numeric,
        }
    }
}

/// Card or table presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::Table => "table",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cards" => Ok(ViewMode::Cards),
            "table" => Ok(ViewMode::Table),
            other => Err(format!("unknown view '{}' (expected 'cards' or 'table')", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live filter, sort and display configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryState {
    pub selected_guide_id: String,
    pub view_mode: ViewMode,
    pub search_term: String,
    pub sort_key: SortKey,
    pub min_level: u8,
}

impl QueryState {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_min_level(mut self, min_level: u8) -> Self {
        self.min_level = min_level;
        self
    }
}

/// Case-insensitive substring match over name, artist, genre and key
pub fn matches_search(song: &SongRecord, term: &str) -> bool {
    search_haystack_matches(
        &[
            song.name.as_str(),
            song.artist.as_str(),
            song.genre.as_str(),
            song.key_signature.as_str(),
        ],
        term,
    )
}

pub(crate) fn search_haystack_matches(fields: &[&str], term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    fields.join(" ").to_lowercase().contains(&term.to_lowercase())
}

/// Visible songs for a query: filtered by level and search, then sorted.
/// The input slice is left untouched.
pub fn apply_query<'a>(songs: &'a [SongRecord], state: &QueryState) -> Vec<&'a SongRecord> {
    let mut visible: Vec<&SongRecord> = songs
        .iter()
        .filter(|song| song.level_numeric >= state.min_level)
        .filter(|song| matches_search(song, &state.search_term))
        .collect();

    visible.sort_by(|a, b| {
        state
            .sort_key
            .compare(&SortFields::from(*a), &SortFields::from(*b))
    });

    visible
}

/// Spanish-locale comparison at base strength: case and accents are
/// ignored, while `ñ` sorts as its own letter after `n`
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(s: &str) -> Vec<(char, u8)> {
    let mut key = Vec::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        if c == 'ñ' {
            key.push(('n', 1));
            continue;
        }
        decompose_canonical(c, |d| {
            if !('\u{0300}'..='\u{036f}').contains(&d) {
                key.push((d, 0));
            }
        });
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(name: &str, artist: &str, genre: &str, level: u8) -> SongRecord {
        SongRecord {
            key: name.to_lowercase(),
            name: name.to_string(),
            artist: artist.to_string(),
            genre: genre.to_string(),
            level_numeric: level,
            ..SongRecord::default()
        }
    }

    fn names(songs: &[&SongRecord]) -> Vec<String> {
        songs.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_level_desc_breaks_ties_by_name() {
        let songs = vec![song("B", "", "", 2), song("A", "", "", 2), song("C", "", "", 5)];
        let state = QueryState::default().with_sort(SortKey::LevelDesc);

        assert_eq!(names(&apply_query(&songs, &state)), vec!["C", "A", "B"]);
        // input order untouched
        assert_eq!(songs[0].name, "B");
    }

    #[test]
    fn test_level_asc() {
        let songs = vec![song("B", "", "", 3), song("A", "", "", 3), song("C", "", "", 1)];
        let state = QueryState::default().with_sort(SortKey::LevelAsc);

        assert_eq!(names(&apply_query(&songs, &state)), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_name_sort_ignores_case_and_accents() {
        let songs = vec![
            song("Ñandú", "", "", 0),
            song("oasis", "", "", 0),
            song("Árbol", "", "", 0),
            song("nube", "", "", 0),
            song("Bésame", "", "", 0),
        ];

        let asc = apply_query(&songs, &QueryState::default());
        assert_eq!(names(&asc), vec!["Árbol", "Bésame", "nube", "Ñandú", "oasis"]);

        let desc = apply_query(&songs, &QueryState::default().with_sort(SortKey::NameDesc));
        assert_eq!(names(&desc), vec!["oasis", "Ñandú", "nube", "Bésame", "Árbol"]);
    }

    #[test]
    fn test_genre_sort_puts_empty_first() {
        let songs = vec![song("A", "", "Rock", 0), song("B", "", "", 0), song("C", "", "bolero", 0)];
        let state = QueryState::default().with_sort(SortKey::GenreAsc);

        assert_eq!(names(&apply_query(&songs, &state)), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_unknown_sort_key_passes_through() {
        let songs = vec![song("C", "", "", 0), song("A", "", "", 0), song("B", "", "", 0)];
        let state = QueryState::default().with_sort("popularity".parse().unwrap());

        assert_eq!(state.sort_key, SortKey::Other("popularity".to_string()));
        assert_eq!(names(&apply_query(&songs, &state)), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_search_matches_artist_only() {
        let songs = vec![song("Imagine", "John Lennon", "Pop", 0), song("Hallelujah", "Cohen", "", 0)];
        let state = QueryState::default().with_search("  LENNON ");

        assert_eq!(names(&apply_query(&songs, &state)), vec!["Imagine"]);
    }

    #[test]
    fn test_min_level_filter() {
        let songs = vec![song("A", "", "", 1), song("B", "", "", 3), song("C", "", "", 0)];
        let state = QueryState::default().with_min_level(2);

        assert_eq!(names(&apply_query(&songs, &state)), vec!["B"]);
    }

    #[test]
    fn test_sort_key_round_trips_as_string() {
        let json = serde_json::to_string(&SortKey::LevelDesc).unwrap();
        assert_eq!(json, "\"level-desc\"");

        let other: SortKey = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(other.as_str(), "custom");
    }
}
