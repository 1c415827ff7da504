//! CLI commands for organizer

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::{save_config, Config, OrganizerPaths};
use crate::console::{Console, Terminal};
use crate::interchange;
use crate::models::{Contact, FinanceEntry, Note, Task};
use crate::query;
use crate::schema::{Entity, EntityKind};
use crate::store::RecordStore;
use crate::validation;

/// Run `$func::<Entity>(args..)` for the entity behind an `EntityKind`
macro_rules! for_kind {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            EntityKind::Note => $func::<Note>($($arg),*),
            EntityKind::Task => $func::<Task>($($arg),*),
            EntityKind::Contact => $func::<Contact>($($arg),*),
            EntityKind::Finance => $func::<FinanceEntry>($($arg),*),
        }
    };
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Summary,
}

/// Initialize organizer for first-time setup
pub fn init(paths: &OrganizerPaths) -> Result<()> {
    if paths.is_initialized() {
        println!("Organizer is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing organizer at {}...", paths.root.display());

    paths.ensure_dirs()?;
    println!("  Created directory structure");

    save_config(paths, &Config::default())?;
    println!("  Created config.toml");

    println!();
    println!("Organizer initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  organizer                     Open the interactive menu");
    println!("  organizer list tasks          List all tasks");
    println!("  organizer import notes a.csv  Import notes from CSV");

    Ok(())
}

/// Open the interactive menu
pub fn menu(paths: &OrganizerPaths, config: &Config) -> Result<()> {
    let terminal = Terminal::new().context("Failed to start line editor")?;
    Console::new(terminal, paths, config).run()
}

/// List records, optionally narrowed by a search term
pub fn list(paths: &OrganizerPaths, kind: EntityKind, search: Option<&str>, format: OutputFormat) -> Result<()> {
    for_kind!(kind, list_records(paths, search.unwrap_or(""), format))
}

fn list_records<T: Entity>(paths: &OrganizerPaths, term: &str, format: OutputFormat) -> Result<()> {
    let store: RecordStore<T> = RecordStore::open(paths.collection_file(T::KIND));
    let records = query::search(store.records(), term);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Summary => {
            if records.is_empty() {
                println!("No {} found.", T::KIND.plural());
                return Ok(());
            }
            for record in records {
                println!("{}", record);
            }
        }
    }
    Ok(())
}

/// Append records from a CSV file
pub fn import(paths: &OrganizerPaths, kind: EntityKind, file: &Path) -> Result<usize> {
    for_kind!(kind, import_records(paths, file))
}

fn import_records<T: Entity>(paths: &OrganizerPaths, file: &Path) -> Result<usize> {
    let mut store: RecordStore<T> = RecordStore::open(paths.collection_file(T::KIND));
    let count = interchange::import_from(&mut store, file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    println!("✓ Imported {} {} from {}", count, T::KIND.plural(), file.display());
    Ok(count)
}

/// Write a collection to a CSV file
pub fn export(paths: &OrganizerPaths, kind: EntityKind, file: &Path) -> Result<usize> {
    for_kind!(kind, export_records(paths, file))
}

fn export_records<T: Entity>(paths: &OrganizerPaths, file: &Path) -> Result<usize> {
    let store: RecordStore<T> = RecordStore::open(paths.collection_file(T::KIND));
    let count = interchange::export_to(&store, file)
        .with_context(|| format!("Failed to export to {}", file.display()))?;
    println!("✓ Exported {} {} to {}", count, T::KIND.plural(), file.display());
    Ok(count)
}

/// Print the overall balance and per-category totals
pub fn balance(paths: &OrganizerPaths, config: &Config) -> Result<()> {
    let store: RecordStore<FinanceEntry> =
        RecordStore::open(paths.collection_file(EntityKind::Finance));

    println!(
        "Balance: {:.2} {}",
        FinanceEntry::balance(store.records()),
        config.currency
    );
    let totals = FinanceEntry::totals_by_category(store.records());
    if !totals.is_empty() {
        println!();
        for (category, total) in totals {
            println!("  {:<20} {:>12.2}", category, total);
        }
    }
    Ok(())
}

/// Finance entries dated within `[from, to]`
pub fn report(paths: &OrganizerPaths, from: &str, to: &str) -> Result<()> {
    let (_, start) = validation::parse_date("from", from)?;
    let (_, end) = validation::parse_date("to", to)?;

    let store: RecordStore<FinanceEntry> =
        RecordStore::open(paths.collection_file(EntityKind::Finance));
    let entries = query::filter(store.records(), &[FinanceEntry::period(start, end)]);

    if entries.is_empty() {
        println!("No entries between {} and {}.", from, to);
        return Ok(());
    }
    for entry in &entries {
        println!("{}", entry);
    }
    let net: f64 = entries.iter().map(|e| e.amount).sum();
    println!();
    println!("Net for period: {:.2}", net);
    Ok(())
}
