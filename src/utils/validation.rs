use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

use crate::utils::error::AppError;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Not a valid choice.";
const INVALID_URL: &str = "Invalid URL.";

/// Widths of the `VARCHAR` columns the forms write into.
pub const SHORT_TEXT: usize = 120;
pub const LONG_TEXT: usize = 500;

/// Field errors collected over a whole form submission.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(&'static str, Vec<String>)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.errors.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
        }
    }

    pub fn choice(&mut self, field: &'static str, value: &str, allowed: fn(&str) -> bool) {
        if value.trim().is_empty() {
            self.add(field, REQUIRED);
        } else if !allowed(value) {
            self.add(field, INVALID_CHOICE);
        }
    }

    pub fn choices(&mut self, field: &'static str, values: &[String], allowed: fn(&str) -> bool) {
        if values.is_empty() {
            self.add(field, REQUIRED);
        } else if values.iter().any(|value| !allowed(value)) {
            self.add(field, INVALID_CHOICE);
        }
    }

    pub fn url(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            if !is_valid_url(value) {
                self.add(field, INVALID_URL);
            }
        }
    }

    /// Counts characters, matching `VARCHAR(n)`.
    pub fn max_len(&mut self, field: &'static str, value: Option<&str>, limit: usize) {
        if value.is_some_and(|value| value.chars().count() > limit) {
            self.add(
                field,
                format!("Field cannot be longer than {} characters.", limit),
            );
        }
    }

    /// Renders as `name This field is required., state Not a valid choice.`
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|(field, messages)| format!("{} {}", field, messages.join("|")))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn into_error(self) -> AppError {
        AppError::ValidationError(format!("Errors: {}", self.message()))
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

/// Accepts RFC 3339 or `YYYY-MM-DD HH:MM[:SS]` (read as UTC).
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Positive integer identifier submitted in a form field.
pub fn parse_reference(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|id| *id > 0)
}
