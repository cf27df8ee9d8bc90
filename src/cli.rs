//! Command-line interface components.

use crate::config::CatalogConfig;
use crate::models::ProgressStatus;
use crate::parser::Delimiter;
use crate::query::{SortKey, ViewMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "repertoire")]
#[command(about = "Browse a song repertoire sheet: guides, levels and your progress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// URL or path of the sheet export (tab or comma separated)
    #[arg(short, long, global = true)]
    pub source: Option<String>,

    /// Field delimiter (tab, comma); detected from the source when omitted
    #[arg(short, long, global = true)]
    pub delimiter: Option<Delimiter>,

    /// State file holding view settings and progress
    #[arg(long, global = true, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Namespace prefix for stored entries
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// Enable verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List songs (cards) or raw rows (table)
    List(ListArgs),

    /// Show one song's resource for a guide
    Show {
        /// Song name (exact or unique fragment)
        song: String,

        /// Guide id (see `guides`); defaults to the selected guide
        #[arg(short, long)]
        guide: Option<String>,
    },

    /// List the guide columns found in the sheet
    Guides,

    /// Mark a song as in progress or done; repeating the same status clears it
    Progress {
        /// Song name (exact or unique fragment)
        song: String,

        /// doing or done
        status: ProgressStatus,
    },

    /// Interactive search: type terms line by line, results refresh once typing pauses
    Browse,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Search in name, artist, genre and key
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Minimum level (0-5)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub min_level: Option<u8>,

    /// Sort key: name-asc, name-desc, level-asc, level-desc, genre-asc
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Guide id to highlight / show in the table
    #[arg(short, long)]
    pub guide: Option<String>,

    /// cards or table
    #[arg(long)]
    pub view: Option<ViewMode>,
}

impl Args {
    /// Log filter level for the verbosity flag
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Configuration with command-line overrides applied
    pub fn to_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::default();
        if let Some(source) = &self.source {
            config = config.with_data_source(source.clone());
        }
        if let Some(delimiter) = self.delimiter {
            config = config.with_delimiter(delimiter);
        }
        if let Some(path) = &self.state_file {
            config = config.with_state_path(path.clone());
        }
        if let Some(namespace) = &self.namespace {
            config = config.with_storage_namespace(namespace.clone());
        }
        config
    }
}
