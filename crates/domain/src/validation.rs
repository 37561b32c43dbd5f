//! Response validation
//!
//! Serde enforces the structural part of every response shape (required
//! fields, unknown-field rejection). `Validate` covers the refinements serde
//! cannot express: date formats, bounding boxes, URLs and numeric ranges.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("ISO_DATE should compile - this is a bug"));

// page;x;y;w;h
static BBOX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:;-?\d+(?:\.\d+)?){4}$").expect("BBOX should compile - this is a bug")
});

/// A single refinement failure, located by field path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    /// Prefix the field path with its parent
    #[must_use]
    pub fn within(mut self, parent: impl AsRef<str>) -> Self {
        self.field = format!("{}.{}", parent.as_ref(), self.field);
        self
    }
}

/// Post-deserialization checks for response types
pub trait Validate {
    /// # Errors
    /// Returns the first refinement that does not hold.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        for (index, item) in self.iter().enumerate() {
            item.validate().map_err(|e| e.within(format!("[{index}]")))?;
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

pub(crate) fn iso_date(field: &str, value: &str) -> Result<(), ValidationError> {
    if ISO_DATE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, format!("'{value}' is not a YYYY-MM-DD date")))
    }
}

pub(crate) fn bounding_box(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || BBOX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, format!("'{value}' is not a page;x;y;w;h bounding box")))
    }
}

pub(crate) fn absolute_url(field: &str, value: &str) -> Result<(), ValidationError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ValidationError::new(field, format!("invalid URL: {e}")))
}

pub(crate) fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}
