//! Text rendering for the catalog views.
//!
//! Turns pipeline output into terminal text: song cards with per-guide
//! availability, the raw-row table and the song detail view.

use crate::catalog::Catalog;
use crate::level::level_display;
use crate::models::{GuideDefinition, ProgressMap, ProgressStatus, SongRecord};
use crate::query::QueryState;
use crate::table::{GuideCell, TableView};
use colored::*;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static LINK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("Hardcode regex pattern"));

/// Placeholder for empty metadata
pub const EMPTY_FIELD: &str = "—";

const GENERIC_RESOURCE_LABEL: &str = "Recurso";

/// Values starting with http:// or https:// are openable resources
pub fn is_link(value: &str) -> bool {
    LINK_PREFIX.is_match(value.trim())
}

/// What a song offers for one guide
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionView {
    Unavailable,
    Link { url: String, label: String },
    Text(String),
}

/// Resolve a song's value for a guide
pub fn resolve_version(
    song: &SongRecord,
    guide: Option<&GuideDefinition>,
    guide_id: &str,
) -> VersionView {
    match song.version(guide_id) {
        None => VersionView::Unavailable,
        Some(value) if is_link(value) => VersionView::Link {
            url: value.to_string(),
            label: guide
                .map(|g| g.label.clone())
                .unwrap_or_else(|| GENERIC_RESOURCE_LABEL.to_string()),
        },
        Some(value) => VersionView::Text(value.to_string()),
    }
}

/// Artist · genre · key · level summary line
pub fn meta_line(song: &SongRecord) -> String {
    let mut parts = vec![
        non_empty_or_placeholder(&song.artist).to_string(),
        non_empty_or_placeholder(&song.genre).to_string(),
    ];
    if !song.key_signature.is_empty() {
        parts.push(format!("Tonalidad: {}", song.key_signature));
    }
    parts.push(format!(
        "Nivel: {}",
        level_display(&song.level_raw, song.level_numeric)
    ));
    parts.join(" · ")
}

fn non_empty_or_placeholder(value: &str) -> &str {
    if value.is_empty() { EMPTY_FIELD } else { value }
}

/// "Showing N of M" and "Progress: D / M" header
pub fn summary_line(visible: usize, catalog: &Catalog, progress: &ProgressMap) -> String {
    let (done, total) = catalog.progress_summary(progress);
    format!(
        "Mostrando {} de {}  ·  Progreso: {} / {}",
        visible, total, done, total
    )
}

/// Card listing: one block per visible song
pub fn render_cards(
    catalog: &Catalog,
    songs: &[&SongRecord],
    state: &QueryState,
    progress: &ProgressMap,
) -> String {
    Cards {
        catalog,
        songs,
        state,
        progress,
    }
    .to_string()
}

/// Tab-separated table with a header line
pub fn render_table(table: &TableView) -> String {
    Table(table).to_string()
}

/// Song detail for one guide
pub fn render_song_detail(catalog: &Catalog, song: &SongRecord, guide_id: &str) -> String {
    SongDetail {
        catalog,
        song,
        guide_id,
    }
    .to_string()
}

struct Cards<'a> {
    catalog: &'a Catalog,
    songs: &'a [&'a SongRecord],
    state: &'a QueryState,
    progress: &'a ProgressMap,
}

impl fmt::Display for Cards<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = summary_line(self.songs.len(), self.catalog, self.progress);
        writeln!(f, "{}", summary.bright_black())?;

        if self.songs.is_empty() {
            return writeln!(f, "\n{}", "No hay canciones que coincidan.".yellow());
        }

        for song in self.songs {
            writeln!(f)?;
            writeln!(f, "{}", song.name.bright_cyan().bold())?;
            writeln!(
                f,
                "  👤 {}  🏷️ {}  🎼 {}  ⭐ {}",
                non_empty_or_placeholder(&song.artist),
                non_empty_or_placeholder(&song.genre),
                non_empty_or_placeholder(&song.key_signature),
                level_display(&song.level_raw, song.level_numeric)
            )?;

            let versions: Vec<String> = self
                .catalog
                .availability(song)
                .into_iter()
                .map(|(guide, available)| {
                    let label = if guide.id == self.state.selected_guide_id {
                        format!("[{}]", guide.label)
                    } else {
                        guide.label.clone()
                    };
                    if available {
                        label.green().to_string()
                    } else {
                        label.bright_black().strikethrough().to_string()
                    }
                })
                .collect();
            writeln!(f, "  {}", versions.join("  "))?;

            let status = match self.progress.get(&song.key) {
                Some(ProgressStatus::Doing) => "⭐ En proceso".yellow(),
                Some(ProgressStatus::Done) => "✅ Lograda".green(),
                None => "Sin empezar".bright_black(),
            };
            writeln!(f, "  {}", status)?;
        }

        Ok(())
    }
}

struct Table<'a>(&'a TableView);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        let count = format!("Mostrando {} filas", table.rows.len());
        writeln!(f, "{}", count.bright_black())?;
        writeln!(f, "{}", table.headers.join("\t").bold())?;

        if table.rows.is_empty() {
            return writeln!(f, "{}", "No hay filas que coincidan.".yellow());
        }

        for row in &table.rows {
            write!(f, "{}\t", row.cells.join("\t"))?;
            match &row.guide {
                GuideCell::Empty => writeln!(f)?,
                GuideCell::Link(url) => writeln!(f, "{}", url.underline().blue())?,
                GuideCell::Text(text) => writeln!(f, "{}", text)?,
            }
        }

        Ok(())
    }
}

struct SongDetail<'a> {
    catalog: &'a Catalog,
    song: &'a SongRecord,
    guide_id: &'a str,
}

impl fmt::Display for SongDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let song = self.song;
        writeln!(f, "{}", song.name.bright_cyan().bold())?;
        writeln!(f, "{}", meta_line(song).bright_black())?;
        writeln!(f)?;

        match resolve_version(song, self.catalog.guide(self.guide_id), self.guide_id) {
            VersionView::Unavailable => {
                writeln!(f, "{}", "Esta versión aún no está disponible.".yellow())
            }
            VersionView::Link { url, label } => {
                writeln!(f, "Guía: {}", label)?;
                writeln!(f, "Recurso externo listo para abrir.")?;
                writeln!(f, "Abrir {}: {}", label, url.underline().blue())
            }
            VersionView::Text(text) => writeln!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Delimiter;

    fn guide(id: &str, label: &str) -> GuideDefinition {
        GuideDefinition {
            id: id.to_string(),
            label: label.to_string(),
            column_index: Some(1),
        }
    }

    #[test]
    fn test_is_link() {
        assert!(is_link("http://x"));
        assert!(is_link("  HTTPS://example.com/a "));
        assert!(!is_link("ftp://example.com"));
        assert!(!is_link("ver http://x"));
        assert!(!is_link(""));
    }

    #[test]
    fn test_resolve_version() {
        let mut song = SongRecord::default();
        song.versions.insert("col:1".to_string(), "https://v".to_string());
        song.versions.insert("col:2".to_string(), "Mano derecha sola".to_string());
        let suzuki = guide("col:1", "Suzuki");

        assert_eq!(
            resolve_version(&song, Some(&suzuki), "col:1"),
            VersionView::Link {
                url: "https://v".to_string(),
                label: "Suzuki".to_string()
            }
        );
        assert_eq!(
            resolve_version(&song, None, "col:1"),
            VersionView::Link {
                url: "https://v".to_string(),
                label: GENERIC_RESOURCE_LABEL.to_string()
            }
        );
        assert_eq!(
            resolve_version(&song, None, "col:2"),
            VersionView::Text("Mano derecha sola".to_string())
        );
        assert_eq!(resolve_version(&song, None, "col:3"), VersionView::Unavailable);
    }

    #[test]
    fn test_meta_line() {
        let song = SongRecord {
            artist: "John Lennon".to_string(),
            key_signature: "C".to_string(),
            level_raw: "3".to_string(),
            level_numeric: 3,
            ..SongRecord::default()
        };

        assert_eq!(
            meta_line(&song),
            "John Lennon · — · Tonalidad: C · Nivel: ★★★"
        );

        assert_eq!(meta_line(&SongRecord::default()), "— · — · Nivel: —");
    }

    #[test]
    fn test_render_song_detail() {
        colored::control::set_override(false);
        let catalog =
            Catalog::from_text("Nombre\tSuzuki\nImagine\thttp://s/i", Delimiter::Tab).unwrap();
        let song = catalog.find_song("imagine").unwrap();

        let detail = render_song_detail(&catalog, song, "col:1");
        assert!(detail.contains("Abrir Suzuki: http://s/i"));

        let missing = render_song_detail(&catalog, song, "col:7");
        assert!(missing.contains("no está disponible"));
    }

    #[test]
    fn test_render_table_rows() {
        colored::control::set_override(false);
        let catalog = Catalog::from_text(
            "Nombre\tNivel\tSuzuki\nImagine\t2\thttp://s/i\nYesterday\t1\tsolo texto\nLet It Be\t3\t",
            Delimiter::Tab,
        )
        .unwrap();
        let mut state = QueryState::default();
        catalog.ensure_valid_guide(&mut state);

        let text = render_table(&crate::table::build_table(&catalog, &state));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Mostrando 3 filas",
                "Nombre\tNivel\tSuzuki",
                "Imagine\t2\thttp://s/i",
                "Let It Be\t3\t",
                "Yesterday\t1\tsolo texto",
            ]
        );

        let empty = render_table(&crate::table::build_table(
            &catalog,
            &QueryState::default().with_search("zzz"),
        ));
        assert!(empty.ends_with("No hay filas que coincidan.\n"));
    }

    #[test]
    fn test_render_cards_counts() {
        colored::control::set_override(false);
        let catalog = Catalog::from_text(
            "Nombre\tSuzuki\nImagine\thttp://s/i\nYesterday\t",
            Delimiter::Tab,
        )
        .unwrap();
        let mut state = QueryState::default().with_search("imag");
        catalog.ensure_valid_guide(&mut state);
        let mut progress = ProgressMap::new();
        progress.set("imagine", ProgressStatus::Done);

        let visible = catalog.visible(&state);
        let text = render_cards(&catalog, &visible, &state, &progress);

        assert!(text.contains("Mostrando 1 de 2"));
        assert!(text.contains("Progreso: 1 / 2"));
        assert!(text.contains("[Suzuki]"));
        assert!(text.contains("Lograda"));
    }
}
