//! Command execution.
//!
//! Each command loads the catalog once, restores the previous session's
//! state, applies its own changes and persists the state again.

use crate::catalog::Catalog;
use crate::cli::{Args, Command, ListArgs};
use crate::config::CatalogConfig;
use crate::debounce::{DebounceSender, debounce_channel};
use crate::display::{render_cards, render_song_detail, render_table};
use crate::error::{CatalogError, Result};
use crate::models::{ProgressMap, ProgressStatus};
use crate::query::{QueryState, ViewMode};
use crate::source::load_text;
use crate::state::StateStore;
use crate::table::build_table;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Everything a command works with after startup
pub struct Session {
    pub config: CatalogConfig,
    pub catalog: Catalog,
    pub state: QueryState,
    pub progress: ProgressMap,
    pub store: StateStore,
}

impl Session {
    /// Restore stored state, then load the catalog.
    ///
    /// A load failure is terminal: no catalog, nothing to display.
    pub async fn start(config: CatalogConfig) -> Result<Self> {
        let store = StateStore::open(config.state_file()?, config.storage_namespace.clone()).await?;
        let mut state = store.load_query_state();
        let progress = store.load_progress();

        let catalog = load_catalog(&config).await?;
        catalog.ensure_valid_guide(&mut state);

        Ok(Self {
            config,
            catalog,
            state,
            progress,
            store,
        })
    }

    pub async fn persist(&mut self) -> Result<()> {
        self.store.persist(&self.state, &self.progress).await
    }
}

/// Fetch and run the ingestion pipeline, with a spinner while loading
pub async fn load_catalog(config: &CatalogConfig) -> Result<Catalog> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Cargando repertorio…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = match load_text(config).await {
        Ok(text) => Catalog::from_text(&text, config.effective_delimiter()),
        Err(e) => Err(e),
    };

    spinner.finish_and_clear();
    result
}

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    let Some(command) = args.command.clone() else {
        return Ok(());
    };

    let config = args.to_config();
    let mut session = match Session::start(config).await {
        Ok(session) => session,
        Err(e) if e.is_load_failure() => {
            eprintln!("{}", "No se pudo cargar el repertorio 😵".red().bold());
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    match command {
        Command::List(list) => run_list(&mut session, list).await,
        Command::Show { song, guide } => run_show(&mut session, &song, guide).await,
        Command::Guides => run_guides(&session),
        Command::Progress { song, status } => run_progress(&mut session, &song, status).await,
        Command::Browse => run_browse(&mut session).await,
    }
}

/// Apply list flags on top of the restored state
pub fn apply_list_args(state: &mut QueryState, list: ListArgs) {
    if let Some(search) = list.search {
        state.search_term = search;
    }
    if let Some(min_level) = list.min_level {
        state.min_level = min_level;
    }
    if let Some(sort) = list.sort {
        state.sort_key = sort;
    }
    if let Some(guide) = list.guide {
        state.selected_guide_id = guide;
    }
    if let Some(view) = list.view {
        state.view_mode = view;
    }
}

async fn run_list(session: &mut Session, list: ListArgs) -> Result<()> {
    apply_list_args(&mut session.state, list);
    session.catalog.ensure_valid_guide(&mut session.state);
    debug!("List with state {:?}", session.state);

    print!("{}", render_view(session));
    session.persist().await
}

fn render_view(session: &Session) -> String {
    match session.state.view_mode {
        ViewMode::Cards => {
            let visible = session.catalog.visible(&session.state);
            render_cards(&session.catalog, &visible, &session.state, &session.progress)
        }
        ViewMode::Table => render_table(&build_table(&session.catalog, &session.state)),
    }
}

async fn run_show(session: &mut Session, query: &str, guide: Option<String>) -> Result<()> {
    if let Some(guide) = guide {
        if session.catalog.guide(&guide).is_none() {
            return Err(CatalogError::UnknownGuide { guide });
        }
        session.state.selected_guide_id = guide;
    }

    let song = session.catalog.find_song(query)?;
    print!(
        "{}",
        render_song_detail(&session.catalog, song, &session.state.selected_guide_id)
    );
    session.persist().await
}

fn run_guides(session: &Session) -> Result<()> {
    for guide in session.catalog.guides() {
        let marker = if guide.id == session.state.selected_guide_id {
            "*"
        } else {
            " "
        };
        let available = session
            .catalog
            .songs()
            .iter()
            .filter(|s| s.has_version(&guide.id))
            .count();
        println!(
            "{} {:<8} {} {}",
            marker,
            guide.id.bright_yellow(),
            guide.label.bright_cyan(),
            format!("({} canciones)", available).bright_black()
        );
    }
    Ok(())
}

async fn run_progress(session: &mut Session, query: &str, status: ProgressStatus) -> Result<()> {
    let song = session.catalog.find_song(query)?;
    let key = song.key.clone();
    let name = song.name.clone();

    let now = session.progress.toggle(&key, status);
    info!("Progress for '{}' is now {:?}", key, now);

    match now {
        Some(ProgressStatus::Doing) => println!("{} ⭐ En proceso", name.bright_cyan()),
        Some(ProgressStatus::Done) => println!("{} ✅ Lograda", name.bright_cyan()),
        None => println!("{} sin empezar", name.bright_cyan()),
    }

    let (done, total) = session.catalog.progress_summary(&session.progress);
    println!("{}", format!("Progreso: {} / {}", done, total).bright_black());

    session.persist().await
}

async fn run_browse(session: &mut Session) -> Result<()> {
    let window = Duration::from_millis(session.config.search_debounce_ms);
    let (tx, mut debouncer) = debounce_channel::<String>(window);

    println!(
        "{}",
        "Escribe para buscar (línea vacía limpia la búsqueda, Ctrl+D para salir)".bright_black()
    );

    let reader = tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), tx));

    while let Some(term) = debouncer.next().await {
        session.state.search_term = term.trim().to_string();
        print!("{}", render_view(session));
        session.persist().await?;
    }

    if let Err(e) = reader.await {
        warn!("Search input task failed: {}", e);
    }
    Ok(())
}

/// Feed input lines into the debouncer until EOF, a read error or the
/// receiver going away. Returns the number of lines forwarded.
async fn forward_lines<R>(input: R, tx: DebounceSender<String>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut forwarded = 0;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if !tx.send(line) {
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped reading search input: {}", e);
                break;
            }
        }
    }

    forwarded
}
