//! Header resolution and guide column discovery.
//!
//! Matches the fixed metadata columns (name, artist, genre, level, key,
//! content) against a prioritized alias table after normalizing header
//! text, then turns every remaining labelled column into a guide in the
//! left-to-right order of the sheet.

use crate::models::{ColumnMap, FieldId, GuideDefinition};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Hardcode regex pattern"));

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._-]+").expect("Hardcode regex pattern"));

/// Label used when a sheet has no guide columns at all
pub const PLACEHOLDER_GUIDE_LABEL: &str = "Guía";

/// Column index marker used in the placeholder guide id
const SENTINEL_COLUMN: i64 = -1;

/// Accepted header aliases per fixed field, highest priority first
pub fn aliases(field: FieldId) -> &'static [&'static str] {
    match field {
        FieldId::Name => &[
            "nombre de la canción",
            "nombre",
            "canción",
            "cancion",
            "song",
            "title",
            "título",
            "titulo",
        ],
        FieldId::Artist => &["artista", "autor", "composer", "compositor"],
        FieldId::Genre => &["género", "genero", "genre"],
        FieldId::Level => &["nivel", "dificultad", "level"],
        FieldId::Key => &["tonalidad", "key", "tonality", "armadura"],
        FieldId::Content => &[
            "contenido",
            "observaciones",
            "comentarios",
            "notas internas",
            "content",
            "notes",
        ],
    }
}

/// Normalize header text for alias matching.
///
/// Trims, lowercases, collapses whitespace runs, turns `.`/`_`/`-` runs
/// into spaces and strips combining diacritics.
pub fn normalize_header(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    let separated = SEPARATOR_RUN.replace_all(&collapsed, " ");

    separated
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Grouping key for a song name: trimmed, lowercased, whitespace collapsed
pub fn normalize_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, " ").into_owned()
}

/// Stable guide id derived from the column position
pub fn guide_id(column_index: usize) -> String {
    format!("col:{}", column_index)
}

/// Result of resolving a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResolution {
    pub columns: ColumnMap,
    pub guides: Vec<GuideDefinition>,
}

/// Resolve fixed columns and discover guide columns from a header row
pub fn resolve_header(header: &[String]) -> HeaderResolution {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

    let columns = ColumnMap::from_lookup(|field| find_column(&normalized, aliases(field)));
    let claimed = columns.claimed();

    let mut guides: Vec<GuideDefinition> = header
        .iter()
        .enumerate()
        .filter(|(idx, _)| !claimed.contains(idx))
        .filter_map(|(idx, raw)| {
            let label = raw.trim();
            (!label.is_empty()).then(|| GuideDefinition {
                id: guide_id(idx),
                label: label.to_string(),
                column_index: Some(idx),
            })
        })
        .collect();

    if guides.is_empty() {
        debug!("No guide columns found, using placeholder guide");
        guides.push(GuideDefinition {
            id: format!("col:{}", SENTINEL_COLUMN),
            label: PLACEHOLDER_GUIDE_LABEL.to_string(),
            column_index: None,
        });
    }

    debug!(
        "Resolved columns {:?}; {} guide(s): {:?}",
        columns.resolved(),
        guides.len(),
        guides.iter().map(|g| g.label.as_str()).collect::<Vec<_>>()
    );

    HeaderResolution { columns, guides }
}

/// First header equal to any alias, trying aliases in priority order
fn find_column(normalized_header: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let target = normalize_header(alias);
        normalized_header.iter().position(|h| *h == target)
    })
}
