//! Integration tests for session state persistence
//!
//! Persist the browsing state and progress to a temporary state file, reopen
//! it as a new session would, and check the catalog behaves identically.

use repertoire::state::{StateStore, entries};
use repertoire::{
    Catalog, CatalogConfig, Delimiter, ProgressMap, ProgressStatus, QueryState, SortKey, ViewMode,
};
use tempfile::tempdir;

const SHEET: &str = "Canción,Artista,Nivel,Suzuki,Video\n\
    Imagine,John Lennon,2,http://s/imagine,\n\
    Let It Be,The Beatles,★★★,,http://v/let\n\
    Yesterday,The Beatles,1,,\n\
    Hallelujah,Leonard Cohen,4,texto,\n";

fn names(catalog: &Catalog, state: &QueryState) -> Vec<String> {
    catalog
        .visible(state)
        .iter()
        .map(|s| s.name.clone())
        .collect()
}

#[tokio::test]
async fn test_state_round_trip_preserves_results() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let catalog = Catalog::from_text(SHEET, Delimiter::Comma).unwrap();

    let state = QueryState {
        selected_guide_id: "col:4".to_string(),
        view_mode: ViewMode::Table,
        search_term: String::new(),
        sort_key: SortKey::LevelDesc,
        min_level: 2,
    };
    let mut progress = ProgressMap::new();
    progress.toggle("imagine", ProgressStatus::Done);
    progress.toggle("let it be", ProgressStatus::Doing);

    let before = names(&catalog, &state);
    assert_eq!(before, vec!["Hallelujah", "Let It Be", "Imagine"]);

    let mut store = StateStore::open(&path, "musicala_piano_").await.unwrap();
    store.persist(&state, &progress).await.unwrap();

    let reopened = StateStore::open(&path, "musicala_piano_").await.unwrap();
    let mut restored_state = reopened.load_query_state();
    let restored_progress = reopened.load_progress();
    catalog.ensure_valid_guide(&mut restored_state);

    assert_eq!(restored_state, state);
    assert_eq!(names(&catalog, &restored_state), before);
    for song in catalog.songs() {
        assert_eq!(restored_progress.get(&song.key), progress.get(&song.key));
    }
    assert_eq!(catalog.progress_summary(&restored_progress), (1, 4));
}

#[tokio::test]
async fn test_namespaces_do_not_mix() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut piano = StateStore::open(&path, "musicala_piano_").await.unwrap();
    piano
        .persist(&QueryState::default().with_min_level(4), &ProgressMap::new())
        .await
        .unwrap();

    let mut guitar = StateStore::open(&path, "musicala_guitar_").await.unwrap();
    assert_eq!(guitar.load_query_state().min_level, 0);
    guitar
        .persist(&QueryState::default().with_min_level(1), &ProgressMap::new())
        .await
        .unwrap();

    let piano_again = StateStore::open(&path, "musicala_piano_").await.unwrap();
    assert_eq!(piano_again.load_query_state().min_level, 4);
}

#[tokio::test]
async fn test_malformed_progress_does_not_block_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    tokio::fs::write(
        &path,
        r#"{"musicala_piano_progress_v1": "{oops", "musicala_piano_view": "table"}"#,
    )
    .await
    .unwrap();

    let store = StateStore::open(&path, "musicala_piano_").await.unwrap();

    assert!(store.load_progress().is_empty());
    assert_eq!(store.load_query_state().view_mode, ViewMode::Table);
    assert_eq!(store.get(entries::VIEW), Some("table"));
}

#[tokio::test]
async fn test_stale_guide_falls_back_to_first() {
    let dir = tempdir().unwrap();
    let config = CatalogConfig::default().with_state_path(dir.path().join("state.json"));
    let catalog = Catalog::from_text(SHEET, Delimiter::Comma).unwrap();

    let mut store = StateStore::open(config.state_file().unwrap(), config.storage_namespace.clone())
        .await
        .unwrap();
    store.set(entries::GUIDE, "col:12");

    let mut state = store.load_query_state();
    catalog.ensure_valid_guide(&mut state);

    assert_eq!(state.selected_guide_id, "col:3");
}
