pub mod field_service;
pub mod list_service;
pub mod schema_service;
pub mod tag_service;
pub mod value_service;
pub mod video_service;

use std::collections::HashMap;

use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::fields::FieldConfigError;

/// Errors shared by the service layer. Storage constraint violations are
/// translated here so driver-specific text never reaches handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation { message: message.into(), field_errors: HashMap::new() }
    }

    pub fn validation_for(field: impl Into<String>, error: impl ToString) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), error.to_string());
        ServiceError::Validation {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }
}

impl From<FieldConfigError> for ServiceError {
    fn from(err: FieldConfigError) -> Self {
        ServiceError::validation_for("config", err)
    }
}

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Translate a unique-constraint violation into a Conflict with a
/// human-readable message; anything else passes through untouched.
pub(crate) fn unique_conflict(err: sqlx::Error, message: impl Into<String>) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            ServiceError::Conflict(message.into())
        }
        _ => ServiceError::Sqlx(err),
    }
}
