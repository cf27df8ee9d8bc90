//! Table view over the raw (ungrouped) sheet rows.
//!
//! Unlike the card listing, the table shows every data row as-is: the
//! resolved fixed columns followed by the selected guide's column. Rows are
//! filtered and sorted with the same rules as grouped songs, evaluated on
//! the row's own cells.

use crate::catalog::Catalog;
use crate::display::is_link;
use crate::header::PLACEHOLDER_GUIDE_LABEL;
use crate::level::parse_level;
use crate::models::FieldId;
use crate::query::{QueryState, SortFields, search_haystack_matches};

/// Value in the selected guide's column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideCell {
    Empty,
    Link(String),
    Text(String),
}

impl GuideCell {
    fn from_value(value: &str) -> Self {
        if value.is_empty() {
            GuideCell::Empty
        } else if is_link(value) {
            GuideCell::Link(value.to_string())
        } else {
            GuideCell::Text(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Trimmed fixed-column cells, aligned with [`TableView::headers`]
    pub cells: Vec<String>,
    pub guide: GuideCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Fixed column headers followed by the guide column header
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Build the table for the current query
pub fn build_table(catalog: &Catalog, state: &QueryState) -> TableView {
    let columns = catalog.columns();
    let fixed = columns.resolved();
    let header = catalog.header();

    let guide = catalog.guide(&state.selected_guide_id);
    let guide_index = guide.and_then(|g| g.column_index);

    let mut headers: Vec<String> = fixed
        .iter()
        .map(|&(_, idx)| header.get(idx).map(|h| h.trim().to_string()).unwrap_or_default())
        .collect();
    headers.push(guide_header(header, guide_index, guide.map(|g| g.label.as_str())));

    let mut matching: Vec<&Vec<String>> = catalog
        .data_rows()
        .iter()
        .filter(|row| row_level(catalog, row) >= state.min_level)
        .filter(|row| {
            search_haystack_matches(
                &[
                    columns.cell(row, FieldId::Name),
                    columns.cell(row, FieldId::Artist),
                    columns.cell(row, FieldId::Genre),
                    columns.cell(row, FieldId::Key),
                ],
                &state.search_term,
            )
        })
        .collect();

    matching.sort_by(|a, b| {
        state
            .sort_key
            .compare(&row_sort_fields(catalog, a), &row_sort_fields(catalog, b))
    });

    let rows = matching
        .into_iter()
        .map(|row| TableRow {
            cells: fixed
                .iter()
                .map(|&(_, idx)| row.get(idx).map(|c| c.trim().to_string()).unwrap_or_default())
                .collect(),
            guide: GuideCell::from_value(
                guide_index
                    .and_then(|idx| row.get(idx))
                    .map(|v| v.trim())
                    .unwrap_or(""),
            ),
        })
        .collect();

    TableView { headers, rows }
}

fn guide_header(header: &[String], guide_index: Option<usize>, label: Option<&str>) -> String {
    let from_sheet = guide_index
        .and_then(|idx| header.get(idx))
        .map(|h| h.trim())
        .filter(|h| !h.is_empty());

    from_sheet
        .or(label.filter(|l| !l.is_empty()))
        .unwrap_or(PLACEHOLDER_GUIDE_LABEL)
        .to_string()
}

fn row_level(catalog: &Catalog, row: &[String]) -> u8 {
    parse_level(catalog.columns().cell(row, FieldId::Level))
}

fn row_sort_fields<'a>(catalog: &Catalog, row: &'a [String]) -> SortFields<'a> {
    let columns = catalog.columns();
    SortFields {
        name: columns.cell(row, FieldId::Name),
        genre: columns.cell(row, FieldId::Genre),
        level: row_level(catalog, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Delimiter;
    use crate::query::SortKey;

    const SHEET: &str = "Nombre,Nivel,Suzuki,Video\n\
        Imagine,2,http://s/imagine,\n\
        Imagine,4,,texto\n\
        Yesterday,1,,\n\
        ,3,huérfana,\n";

    fn catalog() -> Catalog {
        Catalog::from_text(SHEET, Delimiter::Comma).unwrap()
    }

    #[test]
    fn test_table_shows_every_raw_row() {
        let catalog = catalog();
        let mut state = QueryState::default();
        catalog.ensure_valid_guide(&mut state);

        let table = build_table(&catalog, &state);

        assert_eq!(table.headers, vec!["Nombre", "Nivel", "Suzuki"]);
        assert_eq!(table.rows.len(), 4);
        // empty name sorts first under name-asc
        assert_eq!(table.rows[0].cells, vec!["", "3"]);
        assert_eq!(table.rows[0].guide, GuideCell::Text("huérfana".to_string()));
        assert_eq!(
            table.rows[1].guide,
            GuideCell::Link("http://s/imagine".to_string())
        );
        assert_eq!(table.rows[2].guide, GuideCell::Empty);
    }

    #[test]
    fn test_table_filters_by_row_level_and_sorts() {
        let catalog = catalog();
        let state = QueryState {
            selected_guide_id: "col:3".to_string(),
            sort_key: SortKey::LevelDesc,
            min_level: 2,
            ..QueryState::default()
        };

        let table = build_table(&catalog, &state);

        assert_eq!(table.headers.last().unwrap(), "Video");
        let levels: Vec<&str> = table.rows.iter().map(|r| r.cells[1].as_str()).collect();
        assert_eq!(levels, vec!["4", "3", "2"]);
        assert_eq!(table.rows[0].guide, GuideCell::Text("texto".to_string()));
    }

    #[test]
    fn test_table_search_over_row_cells() {
        let catalog = catalog();
        let state = QueryState::default().with_search("yester");

        let table = build_table(&catalog, &state);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells[0], "Yesterday");
    }

    #[test]
    fn test_unknown_guide_uses_placeholder_header() {
        let catalog = catalog();
        let state = QueryState {
            selected_guide_id: "col:42".to_string(),
            ..QueryState::default()
        };

        let table = build_table(&catalog, &state);

        assert_eq!(table.headers.last().unwrap(), PLACEHOLDER_GUIDE_LABEL);
        assert!(table.rows.iter().all(|r| r.guide == GuideCell::Empty));
    }
}
