//! # Rejections
//!
//! The response shape a caller receives when an operation fails.
//!
//! ```text
//! DbError::Validation        → VALIDATION_ERROR  { fields: { "phone_number": ["..."] } }
//! DbError::NotFound          → NOT_FOUND
//! DbError::UniqueViolation   → CONFLICT          { fields: { "email": ["... already exists."] } }
//! everything else            → DATABASE_ERROR
//! ```

use serde::Serialize;

use bozor_core::{ValidationError, ValidationErrors};

use crate::error::DbError;

/// Machine-readable failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    DatabaseError,
}

/// Serializable failure with optional per-field reasons.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl Rejection {
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

impl From<DbError> for Rejection {
    fn from(err: DbError) -> Self {
        let message = err.to_string();
        match err {
            DbError::Validation(errors) => Rejection {
                code: ErrorCode::ValidationError,
                message: "Validation failed".to_string(),
                fields: Some(errors),
            },
            DbError::NotFound { .. } => Rejection {
                code: ErrorCode::NotFound,
                message,
                fields: None,
            },
            DbError::UniqueViolation { field, .. } => {
                let reason = format!("A record with this {} already exists.", field.replace('_', " "));
                Rejection {
                    code: ErrorCode::Conflict,
                    message,
                    fields: Some(
                        ValidationError::NotAllowed { field, reason }.into(),
                    ),
                }
            }
            _ => Rejection {
                code: ErrorCode::DatabaseError,
                message,
                fields: None,
            },
        }
    }
}
