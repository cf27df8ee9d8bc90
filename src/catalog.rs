//! Loaded repertoire: the per-load pipeline context.
//!
//! A [`Catalog`] is built fresh from each successful load and owns every
//! pipeline product (raw rows, resolved columns, guides, grouped songs).
//! Callers hold it and query it with a [`QueryState`].

use crate::error::{CatalogError, Result};
use crate::grouping::group_songs;
use crate::header::{normalize_key, resolve_header};
use crate::models::{ColumnMap, GuideDefinition, LoadStats, ProgressMap, RawMatrix, SongRecord};
use crate::parser::{Delimiter, parse_delimited, validate_matrix};
use crate::query::{QueryState, apply_query};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Catalog {
    header: Vec<String>,
    data_rows: Vec<Vec<String>>,
    columns: ColumnMap,
    guides: Vec<GuideDefinition>,
    songs: Vec<SongRecord>,
    stats: LoadStats,
}

impl Catalog {
    /// Run the full pipeline over delimited text
    pub fn from_text(text: &str, delimiter: Delimiter) -> Result<Self> {
        Self::from_matrix(parse_delimited(text, delimiter))
    }

    /// Resolve, discover guides and group songs from a parsed matrix
    pub fn from_matrix(mut matrix: RawMatrix) -> Result<Self> {
        validate_matrix(&matrix)?;

        let data_rows = matrix.split_off(1);
        let header = matrix.remove(0);

        let resolution = resolve_header(&header);
        let mut stats = LoadStats {
            guides: resolution.guides.len(),
            ..LoadStats::default()
        };
        let songs = group_songs(
            &data_rows,
            &resolution.columns,
            &resolution.guides,
            &mut stats,
        );

        info!(
            "Loaded catalog: {} songs, {} guides from {} data rows",
            stats.songs, stats.guides, stats.data_rows
        );

        Ok(Self {
            header,
            data_rows,
            columns: resolution.columns,
            guides: resolution.guides,
            songs,
            stats,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.data_rows
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Guides in sheet order; never empty
    pub fn guides(&self) -> &[GuideDefinition] {
        &self.guides
    }

    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn total(&self) -> usize {
        self.songs.len()
    }

    pub fn guide(&self, guide_id: &str) -> Option<&GuideDefinition> {
        self.guides.iter().find(|g| g.id == guide_id)
    }

    /// Guide used when nothing valid is selected
    pub fn default_guide(&self) -> &GuideDefinition {
        &self.guides[0]
    }

    /// Replace a missing or stale guide selection with the first guide
    pub fn ensure_valid_guide(&self, state: &mut QueryState) {
        if self.guide(&state.selected_guide_id).is_none() {
            debug!(
                "Guide '{}' not in catalog, selecting '{}'",
                state.selected_guide_id,
                self.default_guide().id
            );
            state.selected_guide_id = self.default_guide().id.clone();
        }
    }

    /// Visible songs for the current query
    pub fn visible(&self, state: &QueryState) -> Vec<&SongRecord> {
        apply_query(&self.songs, state)
    }

    /// Per-guide availability for a song, in sheet order
    pub fn availability<'a>(&'a self, song: &SongRecord) -> Vec<(&'a GuideDefinition, bool)> {
        self.guides
            .iter()
            .map(|g| (g, song.has_version(&g.id)))
            .collect()
    }

    pub fn song_by_key(&self, key: &str) -> Option<&SongRecord> {
        self.songs.iter().find(|s| s.key == key)
    }

    /// Look a song up by normalized name, falling back to a unique
    /// case-insensitive substring match on the name
    pub fn find_song(&self, query: &str) -> Result<&SongRecord> {
        let key = normalize_key(query);
        if let Some(song) = self.song_by_key(&key) {
            return Ok(song);
        }

        let candidates: Vec<&SongRecord> = self
            .songs
            .iter()
            .filter(|s| !key.is_empty() && s.key.contains(&key))
            .collect();

        match candidates.as_slice() {
            [song] => Ok(*song),
            [] => Err(CatalogError::SongNotFound {
                query: query.to_string(),
            }),
            many => Err(CatalogError::AmbiguousSong {
                query: query.to_string(),
                candidates: many.len(),
            }),
        }
    }

    /// Songs marked done, counted against the whole catalog
    pub fn progress_summary(&self, progress: &ProgressMap) -> (usize, usize) {
        (progress.done_count(), self.total())
    }
}
