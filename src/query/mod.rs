//! Read-only queries over a collection
//!
//! All queries are linear scans that return borrowed records in collection
//! order. Nothing here mutates a store.

use chrono::NaiveDate;

use crate::schema::{Entity, FieldValue};
use crate::validation;

/// A single-field predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact match; text comparison is case-sensitive
    Equals {
        field: &'static str,
        value: FieldValue,
    },
    EqualsIgnoreCase {
        field: &'static str,
        text: String,
    },
    /// Inclusive date range over a `DD-MM-YYYY` field
    DateBetween {
        field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Filter {
    pub fn matches<T: Entity>(&self, record: &T) -> bool {
        match self {
            Filter::Equals { field, value } => record.field(field).as_ref() == Some(value),
            Filter::EqualsIgnoreCase { field, text } => record
                .field(field)
                .and_then(|v| v.as_text().map(|s| s.to_lowercase() == text.to_lowercase()))
                .unwrap_or(false),
            Filter::DateBetween { field, start, end } => record
                .field(field)
                .and_then(|v| v.as_text().and_then(validation::stored_date))
                .map(|date| *start <= date && date <= *end)
                .unwrap_or(false),
        }
    }
}

/// Case-insensitive substring search over the searchable fields.
///
/// An empty term matches every record.
pub fn search<'a, T: Entity>(records: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            T::SEARCHABLE.iter().any(|name| {
                record
                    .field(name)
                    .map(|v| v.render().to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
        .collect()
}

/// Records matching every filter
pub fn filter<'a, T: Entity>(records: &'a [T], filters: &[Filter]) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| filters.iter().all(|f| f.matches(*record)))
        .collect()
}

/// Sum `value_field` per distinct `group_field`, in first-occurrence order
pub fn aggregate<T: Entity>(records: &[T], value_field: &str, group_field: &str) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for record in records {
        let Some(value) = record.field(value_field).and_then(|v| v.as_number()) else {
            continue;
        };
        let key = record
            .field(group_field)
            .map(|v| v.render())
            .unwrap_or_default();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, sum)) => *sum += value,
            None => groups.push((key, value)),
        }
    }
    groups
}

/// Sum of a numeric field over all records
pub fn total<T: Entity>(records: &[T], value_field: &str) -> f64 {
    records
        .iter()
        .filter_map(|r| r.field(value_field).and_then(|v| v.as_number()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, FinanceEntry, Priority, Task};

    fn contact(id: u64, name: &str, phone: &str) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            email: String::new(),
        }
    }

    fn expense(id: u64, category: &str, date: &str) -> FinanceEntry {
        FinanceEntry {
            id,
            amount: -10.0,
            category: category.to_string(),
            date: date.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let contacts = vec![contact(1, "Anna Petrova", "555-01"), contact(2, "Boris", "777-02")];
        let hits = search(&contacts, "anna");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let hits = search(&contacts, "777");
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_empty_term_matches_all() {
        let contacts = vec![contact(1, "Anna", ""), contact(2, "Boris", "")];
        assert_eq!(search(&contacts, "").len(), 2);
    }

    #[test]
    fn test_category_filters() {
        let entries = vec![expense(1, "Food", "01-01-2024"), expense(2, "food", "02-01-2024")];
        let exact = filter(
            &entries,
            &[Filter::Equals { field: "category", value: "Food".into() }],
        );
        assert_eq!(exact.len(), 1);
        assert_eq!(filter(&entries, &[FinanceEntry::category_filter("FOOD")]).len(), 2);
    }

    #[test]
    fn test_date_range_compares_calendar_dates() {
        // 15-01-2024 sorts after 01-02-2024 as text but is earlier as a date
        let entries = vec![
            expense(1, "Food", "15-01-2024"),
            expense(2, "Food", "01-02-2024"),
            expense(3, "Food", "01-03-2024"),
        ];
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let ids: Vec<u64> = filter(&entries, &[FinanceEntry::period(start, end)])
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_filters_combine() {
        let tasks = vec![
            Task {
                id: 1,
                title: "a".to_string(),
                description: String::new(),
                done: true,
                priority: Priority::High,
                due_date: "01-01-2024".to_string(),
            },
            Task {
                id: 2,
                title: "b".to_string(),
                description: String::new(),
                done: false,
                priority: Priority::High,
                due_date: "01-01-2024".to_string(),
            },
        ];
        let hits = filter(
            &tasks,
            &[
                Task::priority_filter(Priority::High),
                Task::status_filter(crate::models::TaskStatus::Pending),
            ],
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }
}
