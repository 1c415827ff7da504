use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{self, Entity, EntityKind, FieldUpdate, FieldValue, RecordId, Row};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    /// Last update, `DD-MM-YYYY HH:MM:SS` local time
    pub timestamp: String,
}

#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// Kept as-is on import; stamped with the current time otherwise
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: FieldUpdate<String>,
    pub content: FieldUpdate<String>,
}

impl Entity for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;

    const KIND: EntityKind = EntityKind::Note;
    const COLUMNS: &'static [&'static str] = &["title", "content", "timestamp"];
    const SEARCHABLE: &'static [&'static str] = &["title", "content"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, draft: NoteDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: validation::require_text("title", &draft.title)?,
            content: draft.content,
            timestamp: draft.timestamp.unwrap_or_else(validation::now_timestamp),
        })
    }

    fn apply(&mut self, patch: NotePatch) -> Vec<ValidationError> {
        let mut rejected = Vec::new();
        let mut changed = schema::update_required(&mut self.title, "title", patch.title, &mut rejected);
        changed |= schema::update_text(&mut self.content, patch.content);
        if changed {
            self.timestamp = validation::now_timestamp();
        }
        rejected
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(self.title.as_str().into()),
            "content" => Some(self.content.as_str().into()),
            "timestamp" => Some(self.timestamp.as_str().into()),
            _ => None,
        }
    }

    fn draft_from_row(row: &Row<'_>) -> NoteDraft {
        NoteDraft {
            title: row.get("title").to_string(),
            content: row.get("content").to_string(),
            timestamp: Some(row.get("timestamp").to_string()),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - Last updated: {}", self.id, self.title, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        Note::create(
            1,
            NoteDraft {
                title: "Shopping".to_string(),
                content: "milk".to_string(),
                timestamp: Some("01-01-2024 10:00:00".to_string()),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_title_required() {
        let result = Note::create(1, NoteDraft::default());
        assert_eq!(result.unwrap_err().field, "title");
    }

    #[test]
    fn test_empty_patch_keeps_timestamp() {
        let mut n = note();
        let rejected = n.apply(NotePatch::default());
        assert!(rejected.is_empty());
        assert_eq!(n, note());
    }

    #[test]
    fn test_edit_refreshes_timestamp() {
        let mut n = note();
        n.apply(NotePatch {
            content: FieldUpdate::Set("milk, bread".to_string()),
            ..Default::default()
        });
        assert_eq!(n.content, "milk, bread");
        assert_ne!(n.timestamp, "01-01-2024 10:00:00");
    }
}
