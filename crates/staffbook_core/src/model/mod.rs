//! Domain model for employees and their postal addresses.
//!
//! # Responsibility
//! - Define the records the stores persist and the service orchestrates.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - A postal code uniquely identifies an `Address`.
//! - An `Employee` references its address by postal code; it does not own it.

pub mod address;
pub mod employee;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure for model records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    EmptyField(&'static str),
    /// A text field exceeds its storage limit.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "field `{field}` exceeds {max_chars} characters")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    limit_text(field, value, max_chars)
}

pub(crate) fn limit_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}
