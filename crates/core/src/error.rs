//! Error types for Dynaform
//!
//! This module provides unified error handling across the form engine,
//! including schema import errors, write-time type errors, propagation
//! errors, and submit-time validation errors.

use thiserror::Error;

/// The main error type for Dynaform
#[derive(Debug, Error)]
pub enum FormError {
    // ========================================================================
    // Schema Import Errors
    // ========================================================================
    /// The raw input was not valid JSON text
    #[error("Parse error: {0}")]
    Parse(String),

    /// The top-level JSON value was not an array of field objects
    #[error("Shape error: {0}")]
    Shape(String),

    /// A single field entry violated the schema shape
    #[error("Field {index}: {reason}")]
    Field { index: usize, reason: String },

    // ========================================================================
    // Write-Time Errors
    // ========================================================================
    /// A value was written to a field name not present in the schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A written value's tag did not match the field's declared type
    #[error("Type mismatch for '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    // ========================================================================
    // Propagation Errors
    // ========================================================================
    /// Propagation tried to re-mutate a field that already settled in
    /// the same wave (self-referencing or conflicting schema)
    #[error("Conflicting propagation into '{0}': field depends on itself")]
    ConflictingPropagation(String),

    // ========================================================================
    // Submit-Time Errors
    // ========================================================================
    /// A required field had no value at submit
    #[error("Required field missing: {0}")]
    RequiredFieldMissing(String),

    /// A select field's stored value is no longer in its narrowed options
    #[error("Stale selection for '{field}': '{value}' is not in the current option list")]
    StaleSelection { field: String, value: String },

    // ========================================================================
    // Infrastructure Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FormError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        FormError::Parse(msg.into())
    }

    /// Create a shape error
    pub fn shape(msg: impl Into<String>) -> Self {
        FormError::Shape(msg.into())
    }

    /// Create a per-field schema error
    pub fn field(index: usize, reason: impl Into<String>) -> Self {
        FormError::Field {
            index,
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        FormError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a stale selection error
    pub fn stale(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormError::StaleSelection {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        FormError::Internal(msg.into())
    }

    /// Check if this error blocks schema import
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            FormError::Parse(_) | FormError::Shape(_) | FormError::Field { .. }
        )
    }

    /// Check if this error is raised at submit time
    pub fn is_submit(&self) -> bool {
        matches!(
            self,
            FormError::RequiredFieldMissing(_) | FormError::StaleSelection { .. }
        )
    }
}

/// Result type alias using FormError
pub type FormResult<T> = Result<T, FormError>;

// ============================================================================
// ErrorReport
// ============================================================================

/// An ordered collection of errors, surfaced together.
///
/// Schema import and submit both report every failure at once rather than
/// stopping at the first, so the caller can display a complete report.
#[derive(Debug, Default)]
pub struct ErrorReport {
    errors: Vec<FormError>,
}

impl ErrorReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the report
    pub fn push(&mut self, error: FormError) {
        self.errors.push(error);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ErrorReport) {
        self.errors.extend(other.errors);
    }

    /// Check if any errors were recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors recorded
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the recorded errors in order
    pub fn iter(&self) -> std::slice::Iter<'_, FormError> {
        self.errors.iter()
    }

    /// Consume the report, returning the errors
    pub fn into_errors(self) -> Vec<FormError> {
        self.errors
    }

    /// Convert into a Result: `Ok(value)` when empty, `Err(self)` otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, ErrorReport> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<FormError> for ErrorReport {
    fn from(error: FormError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<FormError> for ErrorReport {
    fn from_iter<I: IntoIterator<Item = FormError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ErrorReport {}

// ============================================================================
// Tests
// ============================================================================
