use clap::Parser;
use repertoire::cli::Args;
use repertoire::commands;
use std::process;
use tracing::debug;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<()> = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result.map_err(anyhow::Error::from),
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nInterrupted, exiting.");
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Set up structured logging on stderr
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repertoire={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Repertoire - song catalog browser");
    println!("=================================");
    println!();
    println!("Load a published song sheet, group repeated rows into songs and browse");
    println!("them by guide, level and your own progress.");
    println!();
    println!("USAGE:");
    println!("    repertoire [--source URL|PATH] [--delimiter tab|comma] <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list        List songs as cards, or raw rows as a table");
    println!("    show        Show a song's resource for a guide");
    println!("    guides      List the guide columns found in the sheet");
    println!("    progress    Mark a song as doing/done (repeat to clear)");
    println!("    browse      Interactive search");
    println!();
    println!("EXAMPLES:");
    println!("    repertoire list --search lennon --min-level 2 --sort level-desc");
    println!("    repertoire --source songs.csv list --view table --guide col:4");
    println!("    repertoire show \"Let It Be\" --guide col:3");
    println!("    repertoire progress imagine done");
    println!();
    println!("For detailed help on any command, use:");
    println!("    repertoire <COMMAND> --help");
}
