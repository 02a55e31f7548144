//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationErrors (bozor-core) ──┐                                     │
//! │                                  ├──► DbError (this module)            │
//! │  SQLite Error (sqlx::Error) ─────┘         │                           │
//! │                                            ▼                           │
//! │                                  Rejection (code + field map)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A UNIQUE violation raised by SQLite is how duplicate usernames, emails
//! and phone numbers surface. It is always returned to the caller.

use bozor_core::{CheckError, ValidationError, ValidationErrors};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Input was rejected before any SQL ran.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate username / email / phone_number
    /// - Duplicate ad slug
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Ad referencing a non-existent sub-category or address
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            DbError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DbError {
    fn from(errors: ValidationErrors) -> Self {
        DbError::Validation(errors)
    }
}

impl From<ValidationError> for DbError {
    fn from(error: ValidationError) -> Self {
        DbError::Validation(error.into())
    }
}

impl From<CheckError<DbError>> for DbError {
    fn from(err: CheckError<DbError>) -> Self {
        match err {
            CheckError::Invalid(errors) => DbError::Validation(errors),
            CheckError::Lookup(db_err) => db_err,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if let Some(target) = msg.split("UNIQUE constraint failed: ").nth(1) {
                    DbError::UniqueViolation {
                        field: unique_column(target),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// `"users.email"` → `"email"`. Composite targets keep their first column.
fn unique_column(target: &str) -> String {
    let first = target.split(',').next().unwrap_or(target).trim();
    first
        .rsplit_once('.')
        .map(|(_, column)| column)
        .unwrap_or(first)
        .to_string()
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_column() {
        assert_eq!(unique_column("users.email"), "email");
        assert_eq!(unique_column("users.username, users.email"), "username");
        assert_eq!(unique_column("slug"), "slug");
    }

    #[test]
    fn test_check_error_conversion() {
        let invalid: CheckError<DbError> = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(DbError::from(invalid), DbError::Validation(_)));

        let lookup: CheckError<DbError> = CheckError::Lookup(DbError::PoolExhausted);
        assert!(matches!(DbError::from(lookup), DbError::PoolExhausted));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(DbError::not_found("Ad", 7).to_string(), "Ad not found: 7");
        assert_eq!(
            DbError::duplicate("email", "a@b.uz").to_string(),
            "Duplicate email: 'a@b.uz' already exists"
        );
    }
}
