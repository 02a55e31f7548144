//! # Error Types
//!
//! Validation error types for bozor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bozor-core errors (this file)                                         │
//! │  ├── ValidationError   - One field-attributed failure                  │
//! │  ├── ValidationErrors  - All failures of one entity                    │
//! │  └── CheckError<E>     - Invalid input OR lookup collaborator failure  │
//! │                                                                         │
//! │  bozor-db errors (separate crate)                                      │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → DbError → Rejection        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant names the field it belongs to, so an API layer can render
//! `{ "field": ["reason"] }` without parsing messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or blank after trimming.
    #[error("{field}: This field is required.")]
    Required { field: String },

    /// Phone number does not match either accepted regional format.
    #[error("{field}: The phone number must start with '+998' (Uzbekistan) or '+7' (Russia) and contain the correct number of digits.")]
    InvalidPhoneFormat { field: String },

    /// A foreign id does not resolve to an existing record.
    ///
    /// ## When This Occurs
    /// - SellerRequest.category_id points to a deleted or never-created Category
    #[error("{field}: {entity} not exists: {id}")]
    ReferenceNotFound {
        field: String,
        entity: String,
        id: i64,
    },

    /// Value could not be coerced into a string (arrays, objects).
    #[error("{field}: expected a string, got {found}")]
    InvalidFieldType { field: String, found: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value has the wrong exact length.
    #[error("{field} must be exactly {expected} characters")]
    InvalidLength { field: String, expected: usize },

    /// Numeric value must be zero or positive.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is well-formed but not permitted in this context.
    #[error("{field}: {reason}")]
    NotAllowed { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field this error is attributed to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidPhoneFormat { field }
            | ValidationError::ReferenceNotFound { field, .. }
            | ValidationError::InvalidFieldType { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidLength { field, .. }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }

    /// Human-readable reason without the field prefix.
    pub fn reason(&self) -> String {
        match self {
            ValidationError::Required { .. } => "This field is required.".to_string(),
            ValidationError::InvalidPhoneFormat { .. } => "The phone number must start with '+998' (Uzbekistan) or '+7' (Russia) and contain the correct number of digits.".to_string(),
            ValidationError::ReferenceNotFound { entity, .. } => format!("{entity} not exists"),
            ValidationError::InvalidFieldType { found, .. } => {
                format!("Expected a string, got {found}.")
            }
            ValidationError::InvalidFormat { reason, .. } => reason.clone(),
            ValidationError::TooLong { max, .. } => {
                format!("Ensure this field has no more than {max} characters.")
            }
            ValidationError::InvalidLength { expected, .. } => {
                format!("Ensure this field has exactly {expected} characters.")
            }
            ValidationError::MustBeNonNegative { .. } => {
                "Ensure this value is greater than or equal to 0.".to_string()
            }
            ValidationError::NotAllowed { reason, .. } => reason.clone(),
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// All field failures collected while validating one entity.
///
/// ## Serialization
/// ```json
/// {
///   "email": ["This field is required."],
///   "phone_number": ["The phone number must start with ..."]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors::default()
    }

    /// Records a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Runs a field check, recording its error (if any) and returning the value on success.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// True when any recorded error belongs to `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Groups reasons by field name.
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for err in &self.errors {
            map.entry(err.field().to_string())
                .or_default()
                .push(err.reason());
        }
        map
    }

    /// Returns `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let grouped = self.by_field();
        let mut map = serializer.serialize_map(Some(grouped.len()))?;
        for (field, reasons) in &grouped {
            map.serialize_entry(field, reasons)?;
        }
        map.end()
    }
}

// =============================================================================
// Check Error
// =============================================================================

/// Outcome of a validation step that consults a lookup collaborator.
///
/// Keeps "the input is wrong" apart from "the storage could not answer".
#[derive(Debug, Error)]
pub enum CheckError<E> {
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error("lookup failed: {0}")]
    Lookup(#[source] E),
}

impl<E> From<ValidationErrors> for CheckError<E> {
    fn from(errors: ValidationErrors) -> Self {
        CheckError::Invalid(errors)
    }
}

impl<E> From<ValidationError> for CheckError<E> {
    fn from(error: ValidationError) -> Self {
        CheckError::Invalid(error.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result of validating one field.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
