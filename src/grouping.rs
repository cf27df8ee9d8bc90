//! Folding raw sheet rows into deduplicated song records.
//!
//! Sheets often list the same song on several rows (one per guide or
//! arrangement). Rows are grouped by normalized song name; later rows only
//! fill gaps in earlier ones, except the level, which is raised whenever a
//! later row carries a higher one.

use crate::header::normalize_key;
use crate::level::parse_level;
use crate::models::{ColumnMap, FieldId, GuideDefinition, LoadStats, SongRecord};
use std::collections::HashMap;
use tracing::{debug, info};

/// Group data rows (header excluded) into unique songs.
///
/// # Arguments
///
/// * `rows` - Data rows, possibly ragged
/// * `columns` - Resolved fixed columns
/// * `guides` - Discovered guide columns
/// * `stats` - Load statistics to update
///
/// # Returns
///
/// Songs in order of first appearance
pub fn group_songs(
    rows: &[Vec<String>],
    columns: &ColumnMap,
    guides: &[GuideDefinition],
    stats: &mut LoadStats,
) -> Vec<SongRecord> {
    let mut songs: Vec<SongRecord> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for (row_num, row) in rows.iter().enumerate() {
        stats.data_rows += 1;

        let name = columns.cell(row, FieldId::Name);
        if name.is_empty() {
            stats.rows_skipped += 1;
            debug!("Skipping data row {}: empty name", row_num + 1);
            continue;
        }

        let key = normalize_key(name);
        let slot = *index_by_key.entry(key.clone()).or_insert_with(|| {
            songs.push(new_song(key, name, row, columns));
            songs.len() - 1
        });

        merge_row(&mut songs[slot], row, columns, guides);
    }

    stats.songs = songs.len();
    info!(
        "Grouped {} data rows into {} songs ({} skipped)",
        stats.data_rows, stats.songs, stats.rows_skipped
    );

    songs
}

fn new_song(key: String, name: &str, row: &[String], columns: &ColumnMap) -> SongRecord {
    let level_raw = columns.cell(row, FieldId::Level);

    SongRecord {
        key,
        name: name.to_string(),
        artist: columns.cell(row, FieldId::Artist).to_string(),
        genre: columns.cell(row, FieldId::Genre).to_string(),
        key_signature: columns.cell(row, FieldId::Key).to_string(),
        content: columns.cell(row, FieldId::Content).to_string(),
        level_raw: level_raw.to_string(),
        level_numeric: parse_level(level_raw),
        versions: HashMap::new(),
    }
}

/// Fold one row into an existing song
fn merge_row(
    song: &mut SongRecord,
    row: &[String],
    columns: &ColumnMap,
    guides: &[GuideDefinition],
) {
    if columns.get(FieldId::Level).is_some() {
        let level_raw = columns.cell(row, FieldId::Level);
        let level = parse_level(level_raw);
        if level > song.level_numeric {
            song.level_numeric = level;
            song.level_raw = level_raw.to_string();
        }
    }

    fill_if_empty(&mut song.artist, columns.cell(row, FieldId::Artist));
    fill_if_empty(&mut song.genre, columns.cell(row, FieldId::Genre));
    fill_if_empty(&mut song.key_signature, columns.cell(row, FieldId::Key));
    fill_if_empty(&mut song.content, columns.cell(row, FieldId::Content));

    for guide in guides {
        let Some(idx) = guide.column_index else {
            continue;
        };
        let value = row.get(idx).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() || song.versions.contains_key(&guide.id) {
            continue;
        }
        song.versions.insert(guide.id.clone(), value.to_string());
    }
}

/// First non-empty value wins
fn fill_if_empty(slot: &mut String, value: &str) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value.to_string();
    }
}
