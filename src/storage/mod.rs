//! JSON document persistence for one collection
//!
//! A collection lives in a single JSON array (`notes.json`, `tasks.json`, ...)
//! next to a small sidecar (`notes.meta.json`) holding the identifier
//! high-water mark. Loading never fails: a missing or corrupt document loads
//! as an empty collection. Saving rewrites the whole document through a
//! temporary file and a rename.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::schema::RecordId;
use crate::store::StoreError;

/// Identifier counter stored beside the collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Meta {
    next_id: RecordId,
}

/// Result of reading a collection from disk
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Persisted high-water mark, if the sidecar was readable
    pub next_id: Option<RecordId>,
}

/// A collection's backing file
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta_path(&self) -> PathBuf {
        self.path.with_extension("meta.json")
    }

    /// Read the collection; missing or malformed content yields an empty one
    pub fn load<T: DeserializeOwned>(&self) -> Loaded<T> {
        let records = read_json::<Vec<T>>(&self.path).unwrap_or_default();
        let next_id = read_json::<Meta>(&self.meta_path()).map(|meta| meta.next_id);
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded collection"
        );
        Loaded { records, next_id }
    }

    /// Overwrite the collection and its counter
    pub fn save<T: Serialize>(&self, records: &[T], next_id: RecordId) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Save {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        // Counter first: a stale document with a newer counter only skips ids
        atomic_write(&self.meta_path(), &to_pretty_json(&Meta { next_id })?)?;
        atomic_write(&self.path, &to_pretty_json(records)?)?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            next_id,
            "Flushed collection"
        );
        Ok(())
    }
}

fn read_json<V: DeserializeOwned>(path: &Path) -> Option<V> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable file, starting empty");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed JSON, starting empty");
            None
        }
    }
}

/// Pretty JSON with four-space indentation
fn to_pretty_json<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Write through a sibling temp file, then rename over the target
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content).map_err(|source| StoreError::Save {
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| StoreError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u64,
        name: String,
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("items.json"));
        let loaded: Loaded<Item> = file.load();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.next_id, None);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        fs::write(&path, "[{\"id\": 1, \"name\": ").unwrap();
        let loaded: Loaded<Item> = JsonFile::new(&path).load();
        assert!(loaded.records.is_empty());
    }

    #[test]
    fn test_save_writes_array_and_counter() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("nested/items.json"));
        let items = vec![Item { id: 1, name: "a".to_string() }];
        file.save(&items, 5).unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.starts_with("[\n    {"));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], "a");

        let loaded: Loaded<Item> = file.load();
        assert_eq!(loaded.records, items);
        assert_eq!(loaded.next_id, Some(5));
        assert!(!dir.path().join("nested/items.json.tmp").exists());
    }
}
