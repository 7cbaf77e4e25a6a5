//! Unified error type for the application.
//!
//! Validation and not-found errors are ordinary control flow: handlers
//! inspect them and re-render or redirect. Nothing here unwinds.

use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// I/O error (socket bind, listener setup)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rejected user input. The message is shown verbatim in the form.
    #[error("{0}")]
    Validation(String),

    /// Stale list or todo id. Callers redirect to the list index.
    #[error("{0}")]
    NotFound(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Fallback mapping for errors a handler did not intercept. Validation and
/// NotFound normally never reach this point.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Io(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::validation("List name must be unique.");
        assert_eq!(err.to_string(), "List name must be unique.");

        let err = AppError::not_found("The specified list was not found.");
        assert_eq!(err.to_string(), "The specified list was not found.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::AddrInUse, "port taken");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }
}
