use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{self, Entity, EntityKind, FieldUpdate, FieldValue, RecordId, Row};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: FieldUpdate<String>,
    pub phone: FieldUpdate<String>,
    pub email: FieldUpdate<String>,
}

impl Entity for Contact {
    type Draft = ContactDraft;
    type Patch = ContactPatch;

    const KIND: EntityKind = EntityKind::Contact;
    const COLUMNS: &'static [&'static str] = &["name", "phone", "email"];
    const SEARCHABLE: &'static [&'static str] = &["name", "phone"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, draft: ContactDraft) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validation::require_text("name", &draft.name)?,
            phone: draft.phone,
            email: draft.email,
        })
    }

    fn apply(&mut self, patch: ContactPatch) -> Vec<ValidationError> {
        let mut rejected = Vec::new();
        schema::update_required(&mut self.name, "name", patch.name, &mut rejected);
        schema::update_text(&mut self.phone, patch.phone);
        schema::update_text(&mut self.email, patch.email);
        rejected
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            _ => None,
        }
    }

    fn draft_from_row(row: &Row<'_>) -> ContactDraft {
        ContactDraft {
            name: row.get("name").to_string(),
            phone: row.get("phone").to_string(),
            email: row.get("email").to_string(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - Phone: {}, Email: {}",
            self.id, self.name, self.phone, self.email
        )
    }
}
