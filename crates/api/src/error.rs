//! HTTP error type.
//!
//! Every failure leaves the API as `{"error": <message>, "code": <CODE>}`.
//! Server-side failures are logged in full and answered with a fixed
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gridops_core::error::CoreError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unparseable body or parameter (as opposed to a well-formed body with
    /// bad values, which is a `CoreError::Validation`).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged, never echoed.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// PostgreSQL SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => core_error_parts(core),
            AppError::Database(err) => database_error_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        };
        (status, Json(body)).into_response()
    }
}

fn core_error_parts(err: &CoreError) -> (StatusCode, ErrorBody) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", format!("{entity} with id {id} not found")),
        ),
        CoreError::NotFoundByKey { .. } => {
            (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", err.to_string()))
        }
        // Names the field: "missing field <name>".
        CoreError::MissingField(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("VALIDATION_ERROR", err.to_string()),
        ),
        CoreError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", msg))
        }
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
        CoreError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, ErrorBody::new("UNAUTHORIZED", msg))
        }
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

/// `RowNotFound` is a 404 and a violated `uq_*` constraint a 409. Anything
/// else is a logged 500.
fn database_error_parts(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        let unique_constraint = db_err
            .constraint()
            .filter(|name| name.starts_with("uq_"))
            .filter(|_| db_err.code().as_deref() == Some(UNIQUE_VIOLATION));
        if let Some(constraint) = unique_constraint {
            return (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
            );
        }
    }

    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
}
