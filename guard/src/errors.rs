//! Field errors and the validation failure type
//!
//! A failed validation always carries at least one [`FieldError`];
//! [`ValidationErrors`] cannot be built empty.

use serde::Serialize;
use thiserror::Error;

use crate::messages::{ErrorCode, Locale, Message};

/// A field-level validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Dotted/indexed locator of the offending field, e.g. `items[2].name`.
    /// Empty for the root value.
    pub path: String,
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }

    pub fn from_message(path: impl Into<String>, message: &Message, locale: Locale) -> Self {
        Self::new(path, message.code(), message.render(locale))
    }
}

/// Non-empty list of field errors returned by a failed validation
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    if errors.len() == 1 {
        format!("Validation failed for field '{}'", errors[0].path)
    } else {
        format!("Validation failed for {} fields", errors.len())
    }
}

impl ValidationErrors {
    /// Returns `None` when `errors` is empty
    pub fn new(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Errors reported for one field path
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path == path)
    }

    pub fn has_code(&self, path: &str, code: ErrorCode) -> bool {
        self.for_path(path).any(|e| e.code == code)
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            error: "ValidationError".to_string(),
            message: summary(&self.errors),
            errors: self.errors.clone(),
        }
    }
}

/// Serializable body describing a failed validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub error: String,
    pub message: String,
    pub errors: Vec<FieldError>,
}

/// Result of validating an input against a schema
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Builder for accumulating validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    locale: Locale,
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            errors: vec![],
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Add a localized error for `path`
    pub fn add(&mut self, path: &str, message: &Message) -> &mut Self {
        self.errors
            .push(FieldError::from_message(path, message, self.locale));
        self
    }

    /// Add error if condition is true
    pub fn check_condition(&mut self, condition: bool, path: &str, message: &Message) -> &mut Self {
        if condition {
            self.add(path, message);
        }
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Finish building, handing back `value` when nothing was reported
    pub fn finish<T>(self, value: T) -> ValidationResult<T> {
        match ValidationErrors::new(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(value),
        }
    }
}
