//! # Error Types
//!
//! Structured error types for diet_core. Validation failures carry one
//! [`FieldError`] per offending field so a front end can show every message
//! next to its input at once.
//!
//! ## Example
//!
//! ```rust
//! use diet_core::errors::{CalcError, CalcResult};
//!
//! fn check_height(height_cm: f64) -> CalcResult<()> {
//!     if height_cm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height_cm",
//!             height_cm.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for diet_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// A single rejected form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    /// Form field name (e.g. "age_years")
    pub field: String,
    /// Message suitable for showing next to the input
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Structured error type for screening operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// One or more form fields failed validation
    #[error("Validation failed: {}", join_field_errors(errors))]
    Validation { errors: Vec<FieldError> },

    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Healthy-individual and hospitalized-patient factors were both set
    #[error("Conflicting inputs: activity level '{activity_level}' cannot be combined with inpatient factors ({inpatient})")]
    ConflictingTracks {
        activity_level: String,
        inpatient: String,
    },

    /// Export was requested before any successful calculation
    #[error("Nothing to export: run a calculation first")]
    NotCalculated,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (report compilation, etc.)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Field errors carried by a validation failure (empty for other variants)
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CalcError::Validation { errors } => errors,
            _ => &[],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Validation { .. } => "VALIDATION_FAILED",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ConflictingTracks { .. } => "CONFLICTING_TRACKS",
            CalcError::NotCalculated => "NOT_CALCULATED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::Config { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for CalcError {
    fn from(err: config::ConfigError) -> Self {
        CalcError::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::Validation {
            errors: vec![
                FieldError::new("age_years", "Please enter your age"),
                FieldError::new("weight_kg", "Please enter your weight"),
            ],
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Validation\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let error = CalcError::Validation {
            errors: vec![
                FieldError::new("age_years", "Please enter your age"),
                FieldError::new("height_cm", "Please enter your height"),
            ],
        };
        let msg = error.to_string();
        assert!(msg.contains("age_years: Please enter your age"));
        assert!(msg.contains("height_cm: Please enter your height"));
        assert_eq!(error.field_errors().len(), 2);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_input("file_name", "", "empty").error_code(), "INVALID_INPUT");
        assert_eq!(CalcError::NotCalculated.error_code(), "NOT_CALCULATED");
        assert!(CalcError::NotCalculated.field_errors().is_empty());
    }
}
