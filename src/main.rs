//! organizer - personal notes, tasks, contacts and finances
//!
//! Interactive menu by default; subcommands for scripting.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use organizer::commands;
use organizer::config::OrganizerPaths;
use organizer::schema::EntityKind;

#[derive(Parser)]
#[command(name = "organizer")]
#[command(author, version, about = "Personal organizer for notes, tasks, contacts and finances")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize organizer (first-time setup)
    Init,

    /// Open the interactive menu (default)
    Menu,

    /// List records of one kind
    List {
        /// notes, tasks, contacts or finance
        kind: EntityKind,

        /// Case-insensitive search term
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import records from a CSV file
    Import {
        /// notes, tasks, contacts or finance
        kind: EntityKind,

        /// CSV file with a header row
        file: PathBuf,
    },

    /// Export records to a CSV file
    Export {
        /// notes, tasks, contacts or finance
        kind: EntityKind,

        /// Output file path
        file: PathBuf,
    },

    /// Show the finance balance and totals by category
    Balance,

    /// Finance entries within a date range
    Report {
        /// Start date (DD-MM-YYYY)
        #[arg(long)]
        from: String,

        /// End date (DD-MM-YYYY)
        #[arg(long)]
        to: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "organizer=debug" } else { "organizer=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (paths, config) = OrganizerPaths::resolve()?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init => {
            commands::init(&paths)?;
        }
        Commands::Menu => {
            commands::menu(&paths, &config)?;
        }
        Commands::List { kind, search, json } => {
            let format = if json {
                commands::OutputFormat::Json
            } else {
                commands::OutputFormat::Summary
            };
            commands::list(&paths, kind, search.as_deref(), format)?;
        }
        Commands::Import { kind, file } => {
            commands::import(&paths, kind, &file)?;
        }
        Commands::Export { kind, file } => {
            commands::export(&paths, kind, &file)?;
        }
        Commands::Balance => {
            commands::balance(&paths, &config)?;
        }
        Commands::Report { from, to } => {
            commands::report(&paths, &from, &to)?;
        }
    }

    Ok(())
}
