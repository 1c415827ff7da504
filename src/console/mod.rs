//! Interactive console menu
//!
//! Line-oriented: a numeric choice selects an operation, which then prompts
//! for each field in turn. On edits a blank answer keeps the current value.
//! Each manager opens a fresh store on entry and drops it on exit.

use anyhow::Result;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::collections::VecDeque;
use std::path::Path;

use crate::config::{Config, OrganizerPaths};
use crate::interchange;
use crate::models::{
    Contact, ContactDraft, ContactPatch, FinanceDraft, FinanceEntry, FinancePatch, Note, NoteDraft,
    NotePatch, Priority, Task, TaskDraft, TaskPatch, TaskStatus,
};
use crate::query;
use crate::schema::{Entity, FieldUpdate, RecordId};
use crate::store::{RecordStore, StoreError};
use crate::validation::{self, ValidationError};

/// Where the console reads its answers from
pub trait LineSource {
    /// Next line of input, or `None` once input is exhausted
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with history
pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim())?;
                }
                Ok(Some(line))
            }
            // Ctrl-C abandons the current answer
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Pre-recorded answers, consumed in order
#[derive(Debug, Default)]
pub struct Scripted {
    lines: VecDeque<String>,
}

impl Scripted {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for Scripted {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// The menu session
pub struct Console<'a, S: LineSource> {
    source: S,
    paths: &'a OrganizerPaths,
    config: &'a Config,
}

impl<'a, S: LineSource> Console<'a, S> {
    pub fn new(source: S, paths: &'a OrganizerPaths, config: &'a Config) -> Self {
        Self {
            source,
            paths,
            config,
        }
    }

    /// Main menu loop; returns when the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        println!("Welcome to Organizer!");
        loop {
            println!();
            println!("Choose a section:");
            println!("  1. Notes");
            println!("  2. Tasks");
            println!("  3. Contacts");
            println!("  4. Finances");
            println!("  5. Exit");

            let Some(choice) = self.ask("Choice: ")? else {
                break;
            };
            let more = match choice.as_str() {
                "1" => self.notes_menu()?,
                "2" => self.tasks_menu()?,
                "3" => self.contacts_menu()?,
                "4" => self.finance_menu()?,
                "5" => break,
                _ => {
                    println!("Invalid choice.");
                    true
                }
            };
            if !more {
                break;
            }
        }
        println!("Goodbye.");
        Ok(())
    }

    // ---- notes --------------------------------------------------------

    /// Returns `false` when input ended inside the menu
    fn notes_menu(&mut self) -> Result<bool> {
        let mut store: RecordStore<Note> = RecordStore::open_in(&self.paths.data);
        loop {
            println!();
            println!("Notes:");
            println!("  1. Create note");
            println!("  2. List notes");
            println!("  3. View note details");
            println!("  4. Edit note");
            println!("  5. Delete note");
            println!("  6. Import notes from CSV");
            println!("  7. Export notes to CSV");
            println!("  8. Back");

            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(false);
            };
            let result = match choice.as_str() {
                "1" => self.add_note(&mut store),
                "2" => {
                    print_records(store.records().iter(), "No notes yet.");
                    Ok(())
                }
                "3" => self.view_note(&store),
                "4" => self.edit_note(&mut store),
                "5" => self.delete(&mut store),
                "6" => self.import(&mut store),
                "7" => self.export(&store),
                "8" => return Ok(true),
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };
            report(result)?;
        }
    }

    fn add_note(&mut self, store: &mut RecordStore<Note>) -> Result<()> {
        let Some(title) = self.ask("Title: ")? else { return Ok(()) };
        let Some(content) = self.ask("Content: ")? else { return Ok(()) };
        let note = store.add(NoteDraft {
            title,
            content,
            timestamp: None,
        })?;
        println!("✓ Note {} added.", note.id);
        Ok(())
    }

    fn view_note(&mut self, store: &RecordStore<Note>) -> Result<()> {
        let Some(id) = self.ask_id("Note ID: ")? else { return Ok(()) };
        let note = store.find(id)?;
        println!();
        println!("Title:        {}", note.title);
        println!("Content:\n{}", note.content);
        println!("Last updated: {}", note.timestamp);
        Ok(())
    }

    fn edit_note(&mut self, store: &mut RecordStore<Note>) -> Result<()> {
        let Some(id) = self.ask_id("Note ID to edit: ")? else { return Ok(()) };
        println!("Editing note: {}", store.find(id)?.title);
        let Some(title) = self.ask_update("New title (blank to keep): ")? else { return Ok(()) };
        let Some(content) = self.ask_update("New content (blank to keep): ")? else { return Ok(()) };
        let edited = store.edit(id, NotePatch { title, content })?;
        report_rejected(&edited.rejected);
        println!("✓ Note updated.");
        Ok(())
    }

    // ---- tasks --------------------------------------------------------

    fn tasks_menu(&mut self) -> Result<bool> {
        let mut store: RecordStore<Task> = RecordStore::open_in(&self.paths.data);
        loop {
            println!();
            println!("Tasks:");
            println!("  1. Add task");
            println!("  2. List tasks");
            println!("  3. Mark task done");
            println!("  4. Edit task");
            println!("  5. Delete task");
            println!("  6. Import tasks from CSV");
            println!("  7. Export tasks to CSV");
            println!("  8. Filter tasks");
            println!("  9. Back");

            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(false);
            };
            let result = match choice.as_str() {
                "1" => self.add_task(&mut store),
                "2" => {
                    print_records(store.records().iter(), "No tasks match.");
                    Ok(())
                }
                "3" => self.mark_task(&mut store),
                "4" => self.edit_task(&mut store),
                "5" => self.delete(&mut store),
                "6" => self.import(&mut store),
                "7" => self.export(&store),
                "8" => self.filter_tasks(&store),
                "9" => return Ok(true),
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };
            report(result)?;
        }
    }

    fn add_task(&mut self, store: &mut RecordStore<Task>) -> Result<()> {
        let Some(title) = self.ask("Title: ")? else { return Ok(()) };
        let Some(description) = self.ask("Description: ")? else { return Ok(()) };
        let Some(priority) = self.ask("Priority (High, Medium, Low): ")? else { return Ok(()) };
        let Some(due_date) = self.ask("Due date (DD-MM-YYYY): ")? else { return Ok(()) };
        let task = store.add(TaskDraft {
            title,
            description,
            priority,
            due_date,
            done: false,
        })?;
        println!("✓ Task {} added.", task.id);
        Ok(())
    }

    fn mark_task(&mut self, store: &mut RecordStore<Task>) -> Result<()> {
        let Some(id) = self.ask_id("Task ID: ")? else { return Ok(()) };
        let task = store.mark(id, "done", true)?;
        println!("✓ Task '{}' marked done.", task.title);
        Ok(())
    }

    fn edit_task(&mut self, store: &mut RecordStore<Task>) -> Result<()> {
        let Some(id) = self.ask_id("Task ID to edit: ")? else { return Ok(()) };
        println!("Editing task: {}", store.find(id)?.title);
        let Some(title) = self.ask_update("New title (blank to keep): ")? else { return Ok(()) };
        let Some(description) = self.ask_update("New description (blank to keep): ")? else {
            return Ok(());
        };
        let Some(priority) = self.ask_update("New priority (High, Medium, Low): ")? else {
            return Ok(());
        };
        let Some(due_date) = self.ask_update("New due date (DD-MM-YYYY): ")? else { return Ok(()) };
        let edited = store.edit(
            id,
            TaskPatch {
                title,
                description,
                priority,
                due_date,
            },
        )?;
        report_rejected(&edited.rejected);
        println!("✓ Task updated.");
        Ok(())
    }

    fn filter_tasks(&mut self, store: &RecordStore<Task>) -> Result<()> {
        let Some(by) = self.ask("Filter by (status/priority/due_date): ")? else { return Ok(()) };
        let filter = match by.as_str() {
            "status" => {
                let Some(status) = self.ask("Status (done/pending): ")? else { return Ok(()) };
                Task::status_filter(status.parse::<TaskStatus>().map_err(anyhow::Error::msg)?)
            }
            "priority" => {
                let Some(priority) = self.ask("Priority (High, Medium, Low): ")? else {
                    return Ok(());
                };
                Task::priority_filter(priority.parse::<Priority>().map_err(anyhow::Error::msg)?)
            }
            "due_date" => {
                let Some(date) = self.ask("Due date (DD-MM-YYYY): ")? else { return Ok(()) };
                Task::due_on(&date)
            }
            _ => {
                println!("Unknown filter.");
                return Ok(());
            }
        };
        print_records(query::filter(store.records(), &[filter]).into_iter(), "No tasks match.");
        Ok(())
    }

    // ---- contacts -----------------------------------------------------

    fn contacts_menu(&mut self) -> Result<bool> {
        let mut store: RecordStore<Contact> = RecordStore::open_in(&self.paths.data);
        loop {
            println!();
            println!("Contacts:");
            println!("  1. Add contact");
            println!("  2. Search contacts");
            println!("  3. Edit contact");
            println!("  4. Delete contact");
            println!("  5. Import contacts from CSV");
            println!("  6. Export contacts to CSV");
            println!("  7. Back");

            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(false);
            };
            let result = match choice.as_str() {
                "1" => self.add_contact(&mut store),
                "2" => self.search_contacts(&store),
                "3" => self.edit_contact(&mut store),
                "4" => self.delete(&mut store),
                "5" => self.import(&mut store),
                "6" => self.export(&store),
                "7" => return Ok(true),
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };
            report(result)?;
        }
    }

    fn add_contact(&mut self, store: &mut RecordStore<Contact>) -> Result<()> {
        let Some(name) = self.ask("Name: ")? else { return Ok(()) };
        let Some(phone) = self.ask("Phone: ")? else { return Ok(()) };
        let Some(email) = self.ask("Email: ")? else { return Ok(()) };
        let contact = store.add(ContactDraft { name, phone, email })?;
        println!("✓ Contact {} added.", contact.id);
        Ok(())
    }

    fn search_contacts(&mut self, store: &RecordStore<Contact>) -> Result<()> {
        let Some(term) = self.ask("Name or phone (blank for all): ")? else { return Ok(()) };
        print_records(query::search(store.records(), &term).into_iter(), "No contacts found.");
        Ok(())
    }

    fn edit_contact(&mut self, store: &mut RecordStore<Contact>) -> Result<()> {
        let Some(id) = self.ask_id("Contact ID to edit: ")? else { return Ok(()) };
        println!("Editing contact: {}", store.find(id)?.name);
        let Some(name) = self.ask_update("New name (blank to keep): ")? else { return Ok(()) };
        let Some(phone) = self.ask_update("New phone (blank to keep): ")? else { return Ok(()) };
        let Some(email) = self.ask_update("New email (blank to keep): ")? else { return Ok(()) };
        let edited = store.edit(id, ContactPatch { name, phone, email })?;
        report_rejected(&edited.rejected);
        println!("✓ Contact updated.");
        Ok(())
    }

    // ---- finances -----------------------------------------------------

    fn finance_menu(&mut self) -> Result<bool> {
        let mut store: RecordStore<FinanceEntry> = RecordStore::open_in(&self.paths.data);
        loop {
            println!();
            println!("Finances:");
            println!("  1. Add entry");
            println!("  2. View entries");
            println!("  3. Report for a period");
            println!("  4. Balance");
            println!("  5. Totals by category");
            println!("  6. Import entries from CSV");
            println!("  7. Export entries to CSV");
            println!("  8. Edit entry");
            println!("  9. Delete entry");
            println!("  10. Back");

            let Some(choice) = self.ask("Choice: ")? else {
                return Ok(false);
            };
            let result = match choice.as_str() {
                "1" => self.add_entry(&mut store),
                "2" => self.view_entries(&store),
                "3" => self.period_report(&store),
                "4" => {
                    let balance = FinanceEntry::balance(store.records());
                    println!("Balance: {:.2} {}", balance, self.config.currency);
                    Ok(())
                }
                "5" => {
                    for (category, total) in FinanceEntry::totals_by_category(store.records()) {
                        println!("{}: {:.2} {}", category, total, self.config.currency);
                    }
                    Ok(())
                }
                "6" => self.import(&mut store),
                "7" => self.export(&store),
                "8" => self.edit_entry(&mut store),
                "9" => self.delete(&mut store),
                "10" => return Ok(true),
                _ => {
                    println!("Invalid choice.");
                    Ok(())
                }
            };
            report(result)?;
        }
    }

    fn add_entry(&mut self, store: &mut RecordStore<FinanceEntry>) -> Result<()> {
        let Some(amount) = self.ask("Amount (income positive, expense negative): ")? else {
            return Ok(());
        };
        let Some(category) = self.ask("Category (e.g. Food, Transport): ")? else { return Ok(()) };
        let Some(date) = self.ask("Date (DD-MM-YYYY): ")? else { return Ok(()) };
        let Some(description) = self.ask("Description: ")? else { return Ok(()) };
        let entry = store.add(FinanceDraft {
            amount,
            category,
            date,
            description,
        })?;
        println!("✓ Entry {} added.", entry.id);
        Ok(())
    }

    fn view_entries(&mut self, store: &RecordStore<FinanceEntry>) -> Result<()> {
        println!("  1. All entries");
        println!("  2. By category");
        println!("  3. By date");
        let Some(choice) = self.ask("Choice: ")? else { return Ok(()) };
        let filters = match choice.as_str() {
            "1" => Vec::new(),
            "2" => {
                let Some(category) = self.ask("Category: ")? else { return Ok(()) };
                vec![FinanceEntry::category_filter(&category)]
            }
            "3" => {
                let Some(date) = self.ask("Date (DD-MM-YYYY): ")? else { return Ok(()) };
                vec![FinanceEntry::on_date(&date)]
            }
            _ => {
                println!("Invalid choice.");
                return Ok(());
            }
        };
        print_records(query::filter(store.records(), &filters).into_iter(), "No entries to show.");
        Ok(())
    }

    fn period_report(&mut self, store: &RecordStore<FinanceEntry>) -> Result<()> {
        let Some(from) = self.ask("Start date (DD-MM-YYYY): ")? else { return Ok(()) };
        let Some(to) = self.ask("End date (DD-MM-YYYY): ")? else { return Ok(()) };
        let (_, start) = validation::parse_date("start", &from)?;
        let (_, end) = validation::parse_date("end", &to)?;
        let entries = query::filter(store.records(), &[FinanceEntry::period(start, end)]);
        print_records(entries.into_iter(), "No entries in that period.");
        Ok(())
    }

    fn edit_entry(&mut self, store: &mut RecordStore<FinanceEntry>) -> Result<()> {
        let Some(id) = self.ask_id("Entry ID to edit: ")? else { return Ok(()) };
        println!("Editing entry: {}", store.find(id)?);
        let Some(amount) = self.ask_update("New amount (blank to keep): ")? else { return Ok(()) };
        let Some(category) = self.ask_update("New category (blank to keep): ")? else {
            return Ok(());
        };
        let Some(date) = self.ask_update("New date (blank to keep): ")? else { return Ok(()) };
        let Some(description) = self.ask_update("New description (blank to keep): ")? else {
            return Ok(());
        };
        let edited = store.edit(
            id,
            FinancePatch {
                amount,
                category,
                date,
                description,
            },
        )?;
        report_rejected(&edited.rejected);
        println!("✓ Entry updated.");
        Ok(())
    }

    // ---- shared operations -------------------------------------------

    fn delete<T: Entity>(&mut self, store: &mut RecordStore<T>) -> Result<()> {
        let Some(id) = self.ask_id(&format!("{} ID to delete: ", capitalize(&T::KIND.to_string())))? else {
            return Ok(());
        };
        if store.delete(id)? == 0 {
            println!("Nothing to delete with ID {}.", id);
        } else {
            println!("✓ Deleted {} {}.", T::KIND, id);
        }
        Ok(())
    }

    fn import<T: Entity>(&mut self, store: &mut RecordStore<T>) -> Result<()> {
        let Some(file) = self.ask("CSV file to import: ")? else { return Ok(()) };
        let count = interchange::import_from(store, Path::new(&file))?;
        println!("✓ Imported {} {}.", count, T::KIND.plural());
        Ok(())
    }

    fn export<T: Entity>(&mut self, store: &RecordStore<T>) -> Result<()> {
        let Some(file) = self.ask("CSV file to export to: ")? else { return Ok(()) };
        let count = interchange::export_to(store, Path::new(&file))?;
        println!("✓ Exported {} {} to {}.", count, T::KIND.plural(), file);
        Ok(())
    }

    // ---- input helpers ------------------------------------------------

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self
            .source
            .read_line(prompt)?
            .map(|line| line.trim().to_string()))
    }

    fn ask_update(&mut self, prompt: &str) -> Result<Option<FieldUpdate<String>>> {
        Ok(self.ask(prompt)?.map(|line| FieldUpdate::from_input(&line)))
    }

    /// `None` when input ended or the answer was not a number
    fn ask_id(&mut self, prompt: &str) -> Result<Option<RecordId>> {
        let Some(answer) = self.ask(prompt)? else { return Ok(None) };
        match answer.parse::<RecordId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                println!("ID must be a number.");
                Ok(None)
            }
        }
    }
}

fn print_records<'r, T, I>(records: I, empty: &str)
where
    T: Entity + 'r,
    I: Iterator<Item = &'r T>,
{
    let mut any = false;
    for record in records {
        println!("{}", record);
        any = true;
    }
    if !any {
        println!("{}", empty);
    }
}

/// Print a failed operation and carry on; a failed save ends the session
fn report(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if is_save_failure(&e) => Err(e),
        Err(e) => {
            println!("✗ {}", e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn is_save_failure(e: &anyhow::Error) -> bool {
    e.downcast_ref::<StoreError>()
        .is_some_and(StoreError::is_save_failure)
}

fn report_rejected(rejected: &[ValidationError]) {
    for e in rejected {
        println!("⚠ Kept previous value of {}", e);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
