//! Field schema shared by every record kind
//!
//! A record kind declares its column order, which fields are searchable, and
//! how raw input becomes a validated record. The store, query engine and CSV
//! interchange only ever talk to records through [`Entity`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::validation::ValidationError;

/// Record identifier, unique within one collection
pub type RecordId = u64;

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Note,
    Task,
    Contact,
    Finance,
}

impl EntityKind {
    /// Name of the backing JSON document
    pub fn file_name(&self) -> &'static str {
        match self {
            EntityKind::Note => "notes.json",
            EntityKind::Task => "tasks.json",
            EntityKind::Contact => "contacts.json",
            EntityKind::Finance => "finance.json",
        }
    }

    /// Plural label used in messages
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Note => "notes",
            EntityKind::Task => "tasks",
            EntityKind::Contact => "contacts",
            EntityKind::Finance => "finance entries",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Note => write!(f, "note"),
            EntityKind::Task => write!(f, "task"),
            EntityKind::Contact => write!(f, "contact"),
            EntityKind::Finance => write!(f, "finance"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "note" | "notes" => Ok(EntityKind::Note),
            "task" | "tasks" => Ok(EntityKind::Task),
            "contact" | "contacts" => Ok(EntityKind::Contact),
            "finance" | "finances" => Ok(EntityKind::Finance),
            _ => Err(format!(
                "Invalid kind: {}. Use: notes, tasks, contacts, finance",
                s
            )),
        }
    }
}

/// A single field value as seen by queries and CSV export
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Flat text form used for CSV cells and grouping keys
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// One field of a partial edit: keep the stored value or replace it.
///
/// An explicit `Set(String::new())` is a legitimate empty value and is
/// distinct from `Keep`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
}

impl FieldUpdate<String> {
    /// Console convention: blank input keeps the current value
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            FieldUpdate::Keep
        } else {
            FieldUpdate::Set(trimmed.to_string())
        }
    }
}

/// A flat row of named cells, laid out in an entity's column order
#[derive(Debug, Clone)]
pub struct Row<'a> {
    columns: &'static [&'static str],
    values: Vec<&'a str>,
}

impl<'a> Row<'a> {
    pub fn new(columns: &'static [&'static str], values: Vec<&'a str>) -> Self {
        Self { columns, values }
    }

    /// Cell for `column`, or an empty string when absent
    pub fn get(&self, column: &str) -> &'a str {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|idx| self.values.get(idx).copied())
            .unwrap_or("")
    }
}

/// A record kind managed by a [`crate::store::RecordStore`]
pub trait Entity: Clone + PartialEq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned {
    /// Raw input for a new record
    type Draft: Clone;
    /// Partial edit
    type Patch: Default;

    const KIND: EntityKind;
    /// Exported fields in CSV column order (`id` excluded)
    const COLUMNS: &'static [&'static str];
    /// Fields matched by free-text search
    const SEARCHABLE: &'static [&'static str];

    fn id(&self) -> RecordId;

    /// Validate a draft and build the record under `id`
    fn create(id: RecordId, draft: Self::Draft) -> Result<Self, ValidationError>;

    /// Apply a partial edit in place.
    ///
    /// Invalid values are skipped and returned; every other field still
    /// applies.
    fn apply(&mut self, patch: Self::Patch) -> Vec<ValidationError>;

    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Set a boolean/status field
    fn set_flag(&mut self, name: &str, _value: bool) -> Result<(), ValidationError> {
        Err(ValidationError::new(
            name,
            format!("{} has no flag named '{}'", Self::KIND, name),
        ))
    }

    fn to_row(&self) -> Vec<String> {
        Self::COLUMNS
            .iter()
            .map(|column| self.field(column).map(|v| v.render()).unwrap_or_default())
            .collect()
    }

    /// Build a draft from an imported row; cells are validated by `create`
    fn draft_from_row(row: &Row<'_>) -> Self::Draft;
}

/// Apply a text update to a required field
pub(crate) fn update_required(
    target: &mut String,
    field: &str,
    update: FieldUpdate<String>,
    rejected: &mut Vec<ValidationError>,
) -> bool {
    match update {
        FieldUpdate::Keep => false,
        FieldUpdate::Set(value) => match crate::validation::require_text(field, &value) {
            Ok(value) => replace(target, value),
            Err(e) => {
                rejected.push(e);
                false
            }
        },
    }
}

/// Apply a text update to a free-form field
pub(crate) fn update_text(target: &mut String, update: FieldUpdate<String>) -> bool {
    match update {
        FieldUpdate::Keep => false,
        FieldUpdate::Set(value) => replace(target, value),
    }
}

pub(crate) fn replace<T: PartialEq>(target: &mut T, value: T) -> bool {
    if *target == value {
        return false;
    }
    *target = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_keeps() {
        assert_eq!(FieldUpdate::from_input("   "), FieldUpdate::Keep);
        assert_eq!(
            FieldUpdate::from_input(" new "),
            FieldUpdate::Set("new".to_string())
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Notes".parse::<EntityKind>().unwrap(), EntityKind::Note);
        assert_eq!("finance".parse::<EntityKind>().unwrap(), EntityKind::Finance);
        assert!("calendar".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_row_lookup_by_column() {
        const COLUMNS: &[&str] = &["name", "phone"];
        let row = Row::new(COLUMNS, vec!["Ann", "555"]);
        assert_eq!(row.get("phone"), "555");
        assert_eq!(row.get("email"), "");
    }

    #[test]
    fn test_render_values() {
        assert_eq!(FieldValue::Number(-12.5).render(), "-12.5");
        assert_eq!(FieldValue::Number(100.0).render(), "100");
        assert_eq!(FieldValue::Flag(true).render(), "true");
    }
}
