//! Request failures mapped to HTTP responses.
//!
//! Storage failures are not recoverable within a request: they are logged
//! with their full context and surfaced as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts_core::db::DbError;
use contacts_core::{RepoError, ServiceError};
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WebError {
    /// Connection acquisition failed at request start.
    Db(DbError),
    /// Handler hit a storage failure.
    Service(ServiceError),
    /// Blocking worker panicked or was cancelled.
    Join(String),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database unavailable: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Join(message) => write!(f, "request worker failed: {message}"),
        }
    }
}

impl std::error::Error for WebError {}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let code = match &self {
            Self::Db(_) => "db_unavailable",
            Self::Service(_) => "storage_failed",
            Self::Join(_) => "worker_failed",
        };
        error!("event=request_failed module=web status=error error_code={code} error={self}");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "an internal error occurred"
            })),
        )
            .into_response()
    }
}

impl From<DbError> for WebError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for WebError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        Self::Service(ServiceError::Repo(value))
    }
}
