//! # Error Handling Middleware
//!
//! Axum integration for converting [`AppError`] values into HTTP responses.
//!
//! ## Usage
//!
//! ```rust
//! use axum::response::IntoResponse;
//! use error::{AppError, ErrorHandler};
//!
//! let handler = ErrorHandler::new(false);
//! let error = AppError::not_found("Repair not found");
//! let response = handler.to_response(&error);
//! ```

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{response::ApiResponse, AppError};

/// Error handler that converts errors to HTTP responses.
///
/// Internal detail is stripped from 500-class responses unless
/// `include_details` is set; the full message is always logged server-side.
#[derive(Clone)]
pub struct ErrorHandler {
    /// Whether to include error details in response.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Convert an error to a response.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let code = err.code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %code, message = %err.message(), "Request failed");
        }

        let message = if self.include_details || status != StatusCode::INTERNAL_SERVER_ERROR {
            err.message()
        }
        else {
            "Internal server error".to_string()
        };

        let body = ApiResponse::<()>::error(code, message);

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::to_string(&body).unwrap_or_else(|_| "{\"success\":false}".to_string()),
            ))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let handler = ErrorHandler::new(self.status() != StatusCode::INTERNAL_SERVER_ERROR);
        handler.to_response(&self)
    }
}
