//! # Logging Macros
//!
//! Convenience macros for structured logging.
//! These macros provide additional metadata and structured fields.

/// Log with request ID and target.
///
/// # Example
///
/// ```rust
/// use logging::{info_with_request, RequestId};
///
/// let request_id = RequestId::new();
/// info_with_request!(target: "api", request_id, "Request processed");
/// ```
#[macro_export]
macro_rules! info_with_request {
    (target: $target:expr, $request_id:expr, $($arg:tt)*) => {
        tracing::info!(target: $target, request_id = %$request_id, $($arg)*)
    };
}

/// Log an error with request ID and error details.
#[macro_export]
macro_rules! error_with_request {
    (target: $target:expr, $request_id:expr, $err:expr, $($arg:tt)*) => {
        tracing::error!(target: $target, request_id = %$request_id, error = %$err, $($arg)*)
    };
}

/// Log a warning with request ID.
#[macro_export]
macro_rules! warn_with_request {
    (target: $target:expr, $request_id:expr, $($arg:tt)*) => {
        tracing::warn!(target: $target, request_id = %$request_id, $($arg)*)
    };
}

/// Log an API request with method, path, and status.
#[macro_export]
macro_rules! log_api_request {
    ($method:expr, $path:expr, $status:expr, $duration:expr) => {
        tracing::info!(
            target: "api",
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration,
            "API request"
        )
    };
}
