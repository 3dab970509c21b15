//! # Error Traits
//!
//! Conversion traits for error handling.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Repair rep_x1"));
        let result = result.context("Submitting finish phase");

        let err = result.unwrap_err();
        assert!(err.message().contains("Submitting finish phase"));
        assert!(err.message().contains("rep_x1"));
    }

    #[test]
    fn test_log_error_passes_through() {
        let result: Result<i32> = Err(AppError::database("timeout"));
        assert!(result.log_error().is_err());

        let result: Result<i32> = Ok(7);
        assert_eq!(result.log_error().unwrap(), 7);
    }
}
