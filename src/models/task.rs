use serde::{Deserialize, Serialize};
use std::fmt;

use super::Priority;
use crate::query::Filter;
use crate::schema::{self, Entity, EntityKind, FieldUpdate, FieldValue, RecordId, Row};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub priority: Priority,
    /// `DD-MM-YYYY`
    pub due_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
    pub done: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub priority: FieldUpdate<String>,
    pub due_date: FieldUpdate<String>,
}

/// Completion status used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Done,
    Pending,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "done" | "completed" | "выполнено" => Ok(TaskStatus::Done),
            "pending" | "not done" | "не выполнено" => Ok(TaskStatus::Pending),
            _ => Err(format!("Invalid status: {}. Use: done, pending", s)),
        }
    }
}

impl Task {
    pub fn status_filter(status: TaskStatus) -> Filter {
        Filter::Equals {
            field: "done",
            value: FieldValue::Flag(status == TaskStatus::Done),
        }
    }

    pub fn priority_filter(priority: Priority) -> Filter {
        Filter::Equals {
            field: "priority",
            value: FieldValue::Text(priority.to_string()),
        }
    }

    pub fn due_on(date: &str) -> Filter {
        Filter::Equals {
            field: "due_date",
            value: date.trim().into(),
        }
    }
}

impl Entity for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const KIND: EntityKind = EntityKind::Task;
    const COLUMNS: &'static [&'static str] = &["title", "description", "done", "priority", "due_date"];
    const SEARCHABLE: &'static [&'static str] = &["title", "description"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn create(id: RecordId, draft: TaskDraft) -> Result<Self, ValidationError> {
        let title = validation::require_text("title", &draft.title)?;
        let priority = validation::parse_priority("priority", &draft.priority)?;
        let (due_date, _) = validation::parse_date("due_date", &draft.due_date)?;
        Ok(Self {
            id,
            title,
            description: draft.description,
            done: draft.done,
            priority,
            due_date,
        })
    }

    fn apply(&mut self, patch: TaskPatch) -> Vec<ValidationError> {
        let mut rejected = Vec::new();
        schema::update_required(&mut self.title, "title", patch.title, &mut rejected);
        schema::update_text(&mut self.description, patch.description);

        if let FieldUpdate::Set(value) = patch.priority {
            match validation::parse_priority("priority", &value) {
                Ok(priority) => self.priority = priority,
                Err(e) => rejected.push(e),
            }
        }
        if let FieldUpdate::Set(value) = patch.due_date {
            match validation::parse_date("due_date", &value) {
                Ok((due_date, _)) => self.due_date = due_date,
                Err(e) => rejected.push(e),
            }
        }
        rejected
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(self.title.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "done" => Some(FieldValue::Flag(self.done)),
            "priority" => Some(FieldValue::Text(self.priority.to_string())),
            "due_date" => Some(self.due_date.as_str().into()),
            _ => None,
        }
    }

    fn set_flag(&mut self, name: &str, value: bool) -> Result<(), ValidationError> {
        match name {
            "done" => {
                self.done = value;
                Ok(())
            }
            _ => Err(ValidationError::new(name, "task has no such flag")),
        }
    }

    fn draft_from_row(row: &Row<'_>) -> TaskDraft {
        TaskDraft {
            title: row.get("title").to_string(),
            description: row.get("description").to_string(),
            priority: row.get("priority").to_string(),
            due_date: row.get("due_date").to_string(),
            done: validation::parse_flag(row.get("done")),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.done { "Done" } else { "Not done" };
        write!(
            f,
            "[{}] {} - {}, Priority: {}, Due: {}",
            self.id, self.title, status, self.priority, self.due_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "Pay rent".to_string(),
            description: "before the 5th".to_string(),
            priority: "High".to_string(),
            due_date: "05-02-2024".to_string(),
            done: false,
        }
    }

    #[test]
    fn test_rejects_unknown_priority() {
        let result = Task::create(1, TaskDraft { priority: "Urgent".to_string(), ..draft() });
        assert_eq!(result.unwrap_err().field, "priority");
    }

    #[test]
    fn test_rejects_bad_due_date() {
        let result = Task::create(1, TaskDraft { due_date: "2024-02-05".to_string(), ..draft() });
        assert_eq!(result.unwrap_err().field, "due_date");
    }

    #[test]
    fn test_bad_date_skipped_other_fields_apply() {
        let mut task = Task::create(1, draft()).unwrap();
        let rejected = task.apply(TaskPatch {
            title: FieldUpdate::Set("Pay rent early".to_string()),
            due_date: FieldUpdate::Set("32-01-2024".to_string()),
            priority: FieldUpdate::Set("low".to_string()),
            ..Default::default()
        });
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].field, "due_date");
        assert_eq!(task.title, "Pay rent early");
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, "05-02-2024");
    }

    #[test]
    fn test_only_done_is_a_flag() {
        let mut task = Task::create(1, draft()).unwrap();
        assert!(task.set_flag("done", true).is_ok());
        assert!(task.done);
        assert!(task.set_flag("archived", true).is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("выполнено".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert_eq!("Not done".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
    }
}
