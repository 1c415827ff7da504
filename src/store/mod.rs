//! In-memory record store backed by a JSON document
//!
//! A `RecordStore` is opened for one menu session, owns the authoritative
//! collection for that session, and flushes the full collection to disk after
//! every mutation.

use std::io;
use std::path::{Path, PathBuf};

use crate::schema::{Entity, RecordId};
use crate::storage::JsonFile;
use crate::validation::ValidationError;

/// Errors surfaced by store, persistence and CSV operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No record with ID {0}")]
    NotFound(RecordId),

    #[error("Invalid {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot open {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },

    #[error("Invalid CSV: {0}")]
    Format(String),

    #[error("Failed to write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to save {}: {source}", path.display())]
    Save { path: PathBuf, source: io::Error },

    #[error("No identifiers left for new records")]
    IdsExhausted,

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// True when the collection could not be written back to disk
    pub fn is_save_failure(&self) -> bool {
        matches!(self, StoreError::Save { .. } | StoreError::Serialize(_))
    }
}

/// Outcome of a partial edit
#[derive(Debug, Clone)]
pub struct Edited<T> {
    pub record: T,
    /// Values that failed validation and were left unchanged
    pub rejected: Vec<ValidationError>,
    pub changed: bool,
}

/// The authoritative collection for one record kind
#[derive(Debug)]
pub struct RecordStore<T: Entity> {
    file: JsonFile,
    records: Vec<T>,
    next_id: RecordId,
}

impl<T: Entity> RecordStore<T> {
    /// Load the collection at `path`; never fails
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = JsonFile::new(path);
        let loaded = file.load::<T>();
        let max_id = loaded.records.iter().map(|r| r.id()).max().unwrap_or(0);
        // The counter never moves backwards, even if the sidecar is stale or lost
        let next_id = loaded.next_id.unwrap_or(1).max(max_id.saturating_add(1));
        Self {
            file,
            records: loaded.records,
            next_id,
        }
    }

    /// Open the kind's default file inside `dir`
    pub fn open_in(dir: &Path) -> Self {
        Self::open(dir.join(T::KIND.file_name()))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifier the next added record will receive
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn find(&self, id: RecordId) -> Result<&T, StoreError> {
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    /// Validate and append a new record
    pub fn add(&mut self, draft: T::Draft) -> Result<T, StoreError> {
        let next_id = self.reserve(1)?;
        let record = T::create(self.next_id, draft)?;
        let mut records = self.records.clone();
        records.push(record.clone());
        self.commit(records, next_id)?;
        tracing::debug!(kind = %T::KIND, id = record.id(), "Added record");
        Ok(record)
    }

    /// Validate every draft, then append them all with fresh ids.
    ///
    /// Nothing is appended if any draft is invalid.
    pub fn append(&mut self, drafts: Vec<T::Draft>) -> Result<usize, StoreError> {
        let count = drafts.len();
        if count == 0 {
            return Ok(0);
        }
        let next_id = self.reserve(count as RecordId)?;
        let mut records = self.records.clone();
        for (id, draft) in (self.next_id..next_id).zip(drafts) {
            records.push(T::create(id, draft)?);
        }
        self.commit(records, next_id)?;
        tracing::debug!(kind = %T::KIND, count, "Appended records");
        Ok(count)
    }

    /// Apply a partial edit; saves only when something changed
    pub fn edit(&mut self, id: RecordId, patch: T::Patch) -> Result<Edited<T>, StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        let mut updated = self.records[idx].clone();
        let rejected = updated.apply(patch);
        let changed = updated != self.records[idx];
        if changed {
            self.replace(idx, updated.clone())?;
            tracing::debug!(kind = %T::KIND, id, "Edited record");
        }
        Ok(Edited {
            record: updated,
            rejected,
            changed,
        })
    }

    /// Remove every record with `id`; a missing id removes nothing
    pub fn delete(&mut self, id: RecordId) -> Result<usize, StoreError> {
        let records: Vec<T> = self.records.iter().filter(|r| r.id() != id).cloned().collect();
        let removed = self.records.len() - records.len();
        if removed > 0 {
            self.commit(records, self.next_id)?;
            tracing::debug!(kind = %T::KIND, id, "Deleted record");
        }
        Ok(removed)
    }

    /// Set a boolean/status field; saves only when the value changes
    pub fn mark(&mut self, id: RecordId, field: &str, value: bool) -> Result<T, StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        let mut updated = self.records[idx].clone();
        updated.set_flag(field, value)?;
        if updated != self.records[idx] {
            self.replace(idx, updated.clone())?;
        }
        Ok(updated)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Counter value after handing out `count` ids
    fn reserve(&self, count: RecordId) -> Result<RecordId, StoreError> {
        self.next_id
            .checked_add(count)
            .ok_or(StoreError::IdsExhausted)
    }

    fn replace(&mut self, idx: usize, record: T) -> Result<(), StoreError> {
        let mut records = self.records.clone();
        records[idx] = record;
        self.commit(records, self.next_id)
    }

    /// Save first; memory only moves forward once the disk has
    fn commit(&mut self, records: Vec<T>, next_id: RecordId) -> Result<(), StoreError> {
        self.file.save(&records, next_id)?;
        self.records = records;
        self.next_id = next_id;
        Ok(())
    }
}
