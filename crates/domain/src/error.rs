//! Unified error types for the domain layer
//!
//! Client-side validation failures are rejected before any network call and
//! surface synchronously through this type.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A numeric value fell outside the legal range for its field
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A field name did not match any known field of its kind
    #[error("Unknown {kind}: {name}")]
    UnknownField { kind: &'static str, name: String },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if gold < 0 {
    ///     return Err(DomainError::validation("Gold cannot be negative"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an out-of-range error for a named field.
    pub fn out_of_range(field: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Creates an unknown-field error.
    pub fn unknown_field(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownField {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = DomainError::out_of_range("gold", -5, 0, i64::from(i32::MAX));
        let msg = err.to_string();
        assert!(msg.starts_with("gold must be between 0 and"));
        assert!(msg.ends_with("(got -5)"));
    }

    #[test]
    fn unknown_field_message() {
        let err = DomainError::unknown_field("ability", "Luck");
        assert_eq!(err.to_string(), "Unknown ability: Luck");
    }
}
