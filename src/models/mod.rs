//! Record kinds managed by the organizer
//!
//! Each submodule is a thin schema declaration on top of [`crate::schema::Entity`].

use serde::{Deserialize, Serialize};

pub mod contact;
pub mod finance;
pub mod note;
pub mod task;

pub use contact::{Contact, ContactDraft, ContactPatch};
pub use finance::{FinanceDraft, FinanceEntry, FinancePatch};
pub use note::{Note, NoteDraft, NotePatch};
pub use task::{Task, TaskDraft, TaskPatch, TaskStatus};

/// Task priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    #[serde(alias = "Высокий")]
    High,
    #[serde(alias = "Средний")]
    Medium,
    #[serde(alias = "Низкий")]
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "высокий" => Ok(Priority::High),
            "medium" | "средний" => Ok(Priority::Medium),
            "low" | "низкий" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {}. Use: High, Medium, Low", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_accepts_legacy_labels() {
        assert_eq!("Высокий".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serializes_as_label() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }

    #[test]
    fn test_priority_deserializes_legacy_labels() {
        let parsed: Vec<Priority> =
            serde_json::from_str(r#"["Высокий", "Средний", "Низкий", "Low"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Priority::High, Priority::Medium, Priority::Low, Priority::Low]
        );
    }
}
