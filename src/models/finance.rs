use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::query::{self, Filter};
use crate::schema::{self, Entity, EntityKind, FieldUpdate, FieldValue, RecordId, Row};
use crate::validation::{self, ValidationError};

/// A single income (positive) or expense (negative) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: RecordId,
    pub amount: f64,
    pub category: String,
    /// `DD-MM-YYYY`
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct FinanceDraft {
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct FinancePatch {
    pub amount: FieldUpdate<String>,
    pub category: FieldUpdate<String>,
    pub date: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
}

impl FinanceEntry {
    /// Categories match regardless of case
    pub fn category_filter(category: &str) -> Filter {
        Filter::EqualsIgnoreCase {
            field: "category",
            text: category.trim().to_string(),
        }
    }

    pub fn on_date(date: &str) -> Filter {
        Filter::Equals {
            field: "date",
            value: date.trim().into(),
        }
    }

    /// Inclusive period used by reports
    pub fn period(start: NaiveDate, end: NaiveDate) -> Filter {
        Filter::DateBetween {
            field: "date",
            start,
            end,
        }
    }

    /// Income minus expenses
    pub fn balance(entries: &[FinanceEntry]) -> f64 {
        query::total(entries, "amount")
    }

    /// Net amount per category, in order of first appearance
    pub fn totals_by_category(entries: &[FinanceEntry]) -> Vec<(String, f64)> {
        query::aggregate(entries, "amount", "category")
    }
}

impl Entity for FinanceEntry {
    type Draft = FinanceDraft;
    type Patch = FinancePatch;

    const KIND: EntityKind = EntityKind::Finance;
    const COLUMNS: &'static [&'static str] = &["amount", "category", "date", "description"];
    const SEARCHABLE: &'static [&'static str] = &["category", "description"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, draft: FinanceDraft) -> Result<Self, ValidationError> {
        let amount = validation::parse_amount("amount", &draft.amount)?;
        let (date, _) = validation::parse_date("date", &draft.date)?;
        Ok(Self {
            id,
            amount,
            category: draft.category,
            date,
            description: draft.description,
        })
    }

    fn apply(&mut self, patch: FinancePatch) -> Vec<ValidationError> {
        let mut rejected = Vec::new();
        if let FieldUpdate::Set(value) = patch.amount {
            match validation::parse_amount("amount", &value) {
                Ok(amount) => self.amount = amount,
                Err(e) => rejected.push(e),
            }
        }
        schema::update_text(&mut self.category, patch.category);
        if let FieldUpdate::Set(value) = patch.date {
            match validation::parse_date("date", &value) {
                Ok((date, _)) => self.date = date,
                Err(e) => rejected.push(e),
            }
        }
        schema::update_text(&mut self.description, patch.description);
        rejected
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "amount" => Some(FieldValue::Number(self.amount)),
            "category" => Some(self.category.as_str().into()),
            "date" => Some(self.date.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            _ => None,
        }
    }

    fn draft_from_row(row: &Row<'_>) -> FinanceDraft {
        FinanceDraft {
            amount: row.get("amount").to_string(),
            category: row.get("category").to_string(),
            date: row.get("date").to_string(),
            description: row.get("description").to_string(),
        }
    }
}

impl fmt::Display for FinanceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | {} | {}",
            self.id, self.amount, self.category, self.date, self.description
        )
    }
}
