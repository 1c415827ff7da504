//! Field validators for organizer records
//!
//! Every validator takes raw user (or CSV) input and returns the normalized
//! value, or a `ValidationError` naming the offending field.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Priority;

/// Storage format for every calendar date
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Storage format for note timestamps
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("date pattern is valid"));

/// A rejected field value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Require a non-empty (after trimming) text value
pub fn require_text(field: &str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Parse a zero-padded `DD-MM-YYYY` date.
///
/// Returns the canonical string that gets stored alongside the parsed date.
/// Unpadded input such as `1-2-2024` is rejected so that every stored date has
/// the same shape.
pub fn parse_date(field: &str, input: &str) -> Result<(String, NaiveDate), ValidationError> {
    let trimmed = input.trim();
    if !DATE_PATTERN.is_match(trimmed) {
        return Err(ValidationError::new(
            field,
            format!("'{}' is not in DD-MM-YYYY format", trimmed),
        ));
    }
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ValidationError::new(field, format!("'{}' is not a calendar date", trimmed))
    })?;
    Ok((trimmed.to_string(), date))
}

/// Parse a stored date without reporting why it failed
pub fn stored_date(value: &str) -> Option<NaiveDate> {
    parse_date("date", value).ok().map(|(_, date)| date)
}

pub fn parse_priority(field: &str, input: &str) -> Result<Priority, ValidationError> {
    input
        .trim()
        .parse::<Priority>()
        .map_err(|e| ValidationError::new(field, e))
}

/// Parse a signed, non-zero amount (income positive, expense negative)
pub fn parse_amount(field: &str, input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", trimmed)))?;
    if !amount.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if amount == 0.0 {
        return Err(ValidationError::new(field, "must not be zero"));
    }
    Ok(amount)
}

/// Only a case-insensitive "true" counts as set
pub fn parse_flag(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("true")
}

/// Current local time in note timestamp format
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
