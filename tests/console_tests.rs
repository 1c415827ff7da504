// Integration tests for the interactive menu
// Drives the console with scripted answers and checks the stored collections

use anyhow::Result;
use organizer::config::{Config, OrganizerPaths};
use organizer::console::{Console, Scripted};
use organizer::models::{Contact, FinanceEntry, Note, Priority, Task};
use organizer::store::RecordStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> Result<(TempDir, OrganizerPaths, Config)> {
    let temp_dir = TempDir::new()?;
    let paths = OrganizerPaths::at(temp_dir.path());
    paths.ensure_dirs()?;
    Ok((temp_dir, paths, Config::default()))
}

fn run(paths: &OrganizerPaths, config: &Config, answers: &[&str]) -> Result<()> {
    Console::new(Scripted::new(answers.iter().copied()), paths, config).run()
}

#[test]
fn test_add_and_mark_task() -> Result<()> {
    let (_temp, paths, config) = setup()?;
    run(
        &paths,
        &config,
        &[
            "2", // tasks
            "1", "Buy tickets", "for the trip", "high", "15-07-2024",
            "3", "1", // mark done
            "9", "5",
        ],
    )?;

    let store: RecordStore<Task> = RecordStore::open_in(&paths.data);
    let task = store.find(1)?;
    assert_eq!(task.title, "Buy tickets");
    assert_eq!(task.priority, Priority::High);
    assert!(task.done);

    Ok(())
}

#[test]
fn test_blank_answers_keep_contact_fields() -> Result<()> {
    let (_temp, paths, config) = setup()?;
    run(
        &paths,
        &config,
        &[
            "3", // contacts
            "1", "Anna", "555-0101", "anna@example.com",
            "3", "1", "", "555-0202", "",
            "7", "5",
        ],
    )?;

    let store: RecordStore<Contact> = RecordStore::open_in(&paths.data);
    let anna = store.find(1)?;
    assert_eq!(anna.name, "Anna");
    assert_eq!(anna.phone, "555-0202");
    assert_eq!(anna.email, "anna@example.com");

    Ok(())
}

#[test]
fn test_invalid_input_does_not_end_session() -> Result<()> {
    let (_temp, paths, config) = setup()?;
    run(
        &paths,
        &config,
        &[
            "1", // notes
            "1", "", "no title",     // rejected: title required
            "3", "abc",              // ID must be a number
            "4", "7",                // not found
            "1", "Groceries", "milk",
            "42",                    // invalid choice
            "8", "5",
        ],
    )?;

    let store: RecordStore<Note> = RecordStore::open_in(&paths.data);
    assert_eq!(store.len(), 1);
    assert_eq!(store.find(1)?.title, "Groceries");

    Ok(())
}

#[test]
fn test_finance_import_through_menu() -> Result<()> {
    let (temp, paths, config) = setup()?;
    let csv_path = temp.path().join("bank.csv");
    fs::write(
        &csv_path,
        "amount,category,date,description\n1000,Salary,01-05-2024,May\n-250,Food,03-05-2024,market\n",
    )?;
    let csv_arg = csv_path.to_string_lossy().to_string();

    run(&paths, &config, &["4", "6", csv_arg.as_str(), "4", "10", "5"])?;

    let store: RecordStore<FinanceEntry> = RecordStore::open_in(&paths.data);
    assert_eq!(store.len(), 2);
    assert_eq!(FinanceEntry::balance(store.records()), 750.0);

    Ok(())
}

#[test]
fn test_end_of_input_exits_cleanly() -> Result<()> {
    let (_temp, paths, config) = setup()?;
    // Input ends in the middle of adding a task
    run(&paths, &config, &["2", "1", "Half-typed"])?;

    let store: RecordStore<Task> = RecordStore::open_in(&paths.data);
    assert!(store.is_empty());

    Ok(())
}

#[test]
fn test_failed_save_ends_session_with_error() -> Result<()> {
    let (_temp, paths, config) = setup()?;
    fs::remove_dir_all(&paths.data)?;
    fs::write(&paths.data, "not a directory")?;

    let result = run(&paths, &config, &["1", "1", "Groceries", "milk", "8", "5"]);
    assert!(result.is_err());

    Ok(())
}
