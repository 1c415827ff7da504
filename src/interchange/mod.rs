//! CSV import and export
//!
//! Columns are the entity's fields in schema order, without `id`. Imported
//! rows always become new records with fresh identifiers, so export/import is
//! an interchange format rather than a backup.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::schema::{Entity, Row};
use crate::store::{RecordStore, StoreError};

/// Append every row of a CSV file to the store.
///
/// The header must name every column of the entity (extra columns are
/// ignored). The import is all-or-nothing: a missing column or an invalid row
/// rejects the file before anything is appended.
pub fn import_from<T: Entity>(store: &mut RecordStore<T>, path: &Path) -> Result<usize, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| StoreError::Format(e.to_string()))?
        .clone();
    let indices = T::COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h.trim() == *column)
                .ok_or_else(|| StoreError::Format(format!("missing column '{}'", column)))
        })
        .collect::<Result<Vec<usize>, StoreError>>()?;

    let mut drafts = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StoreError::Format(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let values = indices.iter().map(|&i| record.get(i).unwrap_or("")).collect();
        let draft = T::draft_from_row(&Row::new(T::COLUMNS, values));

        // Placeholder id: only validation matters here
        T::create(0, draft.clone())
            .map_err(|e| StoreError::Format(format!("line {}: {}", line, e)))?;
        drafts.push(draft);
    }

    let count = store.append(drafts)?;
    tracing::info!(kind = %T::KIND, path = %path.display(), count, "Imported CSV");
    Ok(count)
}

/// Write the whole collection as CSV, overwriting `path`
pub fn export_to<T: Entity>(store: &RecordStore<T>, path: &Path) -> Result<usize, StoreError> {
    write_records(store.records(), path)?;
    tracing::info!(kind = %T::KIND, path = %path.display(), count = store.len(), "Exported CSV");
    Ok(store.len())
}

/// Write any slice of records (e.g. a filtered view) as CSV
pub fn write_records<T: Entity>(records: &[T], path: &Path) -> Result<(), StoreError> {
    let io_error = |e: csv::Error| StoreError::Io {
        path: path.to_path_buf(),
        source: io::Error::from(e),
    };

    let mut writer = csv::Writer::from_path(path).map_err(io_error)?;
    writer.write_record(T::COLUMNS).map_err(io_error)?;
    for record in records {
        writer.write_record(record.to_row()).map_err(io_error)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, ContactDraft, FinanceEntry, Task};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_column_rejects_whole_file() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("contacts.csv");
        fs::write(&csv_path, "name,phone\nAnn,555\n").unwrap();

        let mut store: RecordStore<Contact> = RecordStore::open_in(dir.path());
        let err = import_from(&mut store, &csv_path).unwrap_err();
        assert!(matches!(err, StoreError::Format(ref msg) if msg.contains("email")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let dir = TempDir::new().unwrap();
        let mut store: RecordStore<Contact> = RecordStore::open_in(dir.path());
        let err = import_from(&mut store, &dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, StoreError::File { .. }));
    }

    #[test]
    fn test_columns_in_any_order() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("contacts.csv");
        fs::write(&csv_path, "email,extra,name,phone\nann@example.com,x,Ann,555\n").unwrap();

        let mut store: RecordStore<Contact> = RecordStore::open_in(dir.path());
        assert_eq!(import_from(&mut store, &csv_path).unwrap(), 1);
        let ann = store.get(1).unwrap();
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.email, "ann@example.com");
    }

    #[test]
    fn test_invalid_row_names_line() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("tasks.csv");
        fs::write(
            &csv_path,
            "title,description,done,priority,due_date\n\
             Call,,false,High,01-01-2024\n\
             Email,,False,Someday,01-01-2024\n",
        )
        .unwrap();

        let mut store: RecordStore<Task> = RecordStore::open_in(dir.path());
        let err = import_from(&mut store, &csv_path).unwrap_err();
        assert!(matches!(err, StoreError::Format(ref msg) if msg.contains("line 3")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_quotes_and_excludes_id() {
        let dir = TempDir::new().unwrap();
        let mut store: RecordStore<Contact> = RecordStore::open_in(dir.path());
        store
            .add(ContactDraft {
                name: "Doe, Jane".to_string(),
                phone: "555".to_string(),
                email: String::new(),
            })
            .unwrap();

        let csv_path = dir.path().join("out.csv");
        assert_eq!(export_to(&store, &csv_path).unwrap(), 1);
        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content, "name,phone,email\n\"Doe, Jane\",555,\n");
    }

    #[test]
    fn test_negative_amounts_survive_export() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("finance.csv");
        fs::write(
            &csv_path,
            "amount,category,date,description\n-42.5,Food,03-04-2024,lunch\n",
        )
        .unwrap();

        let mut store: RecordStore<FinanceEntry> = RecordStore::open_in(dir.path());
        import_from(&mut store, &csv_path).unwrap();
        assert_eq!(store.get(1).unwrap().amount, -42.5);

        export_to(&store, &csv_path).unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        assert!(content.contains("-42.5,Food,03-04-2024,lunch"));
    }
}
