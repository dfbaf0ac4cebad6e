//! Structured error types for database operations and HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,

    // Not found errors
    BoardNotFound,
    JobNotFound,
    TaskNotFound,
    BoardJobNotFound,
    PriorityNotFound,

    // Conflict errors
    AlreadyExists,
    DuplicateLink,

    // Internal errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredField | ErrorCode::InvalidFieldValue => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::BoardNotFound
            | ErrorCode::JobNotFound
            | ErrorCode::TaskNotFound
            | ErrorCode::BoardJobNotFound
            | ErrorCode::PriorityNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists | ErrorCode::DuplicateLink => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_not_found(self) -> bool {
        self.status() == StatusCode::NOT_FOUND
    }
}

/// Structured error carried through the database layer and rendered by handlers.
#[derive(Debug, Error, Serialize)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn board_not_found(board_id: i64) -> Self {
        Self::new(
            ErrorCode::BoardNotFound,
            format!("Board not found: {}", board_id),
        )
    }

    pub fn job_not_found(job_id: i64) -> Self {
        Self::new(ErrorCode::JobNotFound, format!("Job not found: {}", job_id))
    }

    pub fn task_not_found(task_id: i64) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn board_job_not_found(board_id: i64, job_id: i64) -> Self {
        Self::new(
            ErrorCode::BoardJobNotFound,
            format!("Job {} is not on board {}", job_id, board_id),
        )
    }

    pub fn priority_not_found(code: &str) -> Self {
        Self::new(
            ErrorCode::PriorityNotFound,
            format!("Priority not found: {} (run `kanban seed`)", code),
        )
    }

    pub fn duplicate_link(board_id: i64, job_id: i64, count: usize) -> Self {
        Self::new(
            ErrorCode::DuplicateLink,
            format!(
                "Found {} links for board {} and job {}, expected at most one",
                count, board_id, job_id
            ),
        )
    }

    pub fn already_exists(what: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::AlreadyExists,
            format!("{} '{}' already exists", what, value),
        )
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app_err) => app_err,
            Err(err) => match err.downcast::<rusqlite::Error>() {
                Ok(sql_err) => AppError::database(sql_err),
                Err(err) => AppError::internal(err),
            },
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, "{}", self.message);
        } else {
            tracing::warn!(code = ?self.code, "{}", self.message);
        }
        (status, Json(self)).into_response()
    }
}

/// Extract the structured error code from an `anyhow` error, if it carries one.
pub fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.downcast_ref::<AppError>().map(|e| e.code)
}

/// Result type for handler operations.
pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_http_statuses() {
        assert_eq!(ErrorCode::BoardJobNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DuplicateLink.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::MissingRequiredField.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(ErrorCode::TaskNotFound.is_not_found());
        assert!(ErrorCode::PriorityNotFound.is_not_found());
        assert!(!ErrorCode::AlreadyExists.is_not_found());
    }

    #[test]
    fn anyhow_round_trip_keeps_code() {
        let err: anyhow::Error = AppError::job_not_found(7).into();
        assert_eq!(error_code(&err), Some(ErrorCode::JobNotFound));

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::JobNotFound);
        assert_eq!(app.message, "Job not found: 7");
    }

    #[test]
    fn foreign_errors_become_internal() {
        let app: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(app.code, ErrorCode::InternalError);

        let app: AppError = anyhow::Error::from(rusqlite::Error::InvalidQuery).into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn serializes_field_only_when_present() {
        let json = serde_json::to_string(&AppError::missing_field("title")).unwrap();
        assert!(json.contains("\"MISSING_REQUIRED_FIELD\""));
        assert!(json.contains("\"field\":\"title\""));

        let json = serde_json::to_string(&AppError::board_not_found(1)).unwrap();
        assert!(!json.contains("field"));
    }
}
