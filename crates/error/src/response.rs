//! # API Response Types
//!
//! Generic API response types for the Plumbline application.
//! Provides a consistent response format for all API endpoints.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "success": true,
//!   "data": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total: u64,

    /// Total number of pages.
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Maximum allowed page number to prevent integer overflow and excessive memory allocation
    const MAX_PAGE: u64 = 1_000_000;

    /// Create a new pagination meta with overflow protection.
    ///
    /// # Arguments
    ///
    /// * `page` - Page number (1-based)
    /// * `per_page` - Items per page
    /// * `total` - Total number of items
    ///
    /// Clamps `page` into `1..=MAX_PAGE`.
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let page = if page > Self::MAX_PAGE {
            tracing::warn!(
                "Page number {} exceeds maximum allowed value {}, clamping to max",
                page,
                Self::MAX_PAGE
            );
            Self::MAX_PAGE
        }
        else {
            page.max(1)
        };

        let total_pages = if total == 0 {
            0
        }
        else {
            total.div_ceil(per_page.max(1))
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Calculate offset for database queries with overflow protection.
    ///
    /// Returns `None` if the offset calculation would overflow.
    pub fn offset(&self) -> Option<u64> {
        self.page.checked_sub(1)?.checked_mul(self.per_page)
    }

    /// Calculate limit.
    pub fn limit(&self) -> u64 { self.per_page }

    /// An empty page: used by the authorization short-circuit, which must
    /// report zero results rather than an error.
    #[must_use]
    pub fn empty(page: u64, per_page: u64) -> Self { Self::new(page, per_page, 0) }
}

/// API response type.
///
/// This is the generic response type used for all API responses.
/// It provides a consistent format with a success flag and either data or an
/// error code/message pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Whether the operation was successful (always `true`).
        success: bool,

        /// Response data.
        data: T,
    },

    /// Error response.
    Error {
        /// Whether the operation was successful (always `false`).
        success: bool,

        /// Error code.
        code: String,

        /// Error message.
        message: String,
    },
}

impl<T> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            success: true,
            data,
        }
    }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        ApiResponse::Error {
            success: false,
            code:    code.to_string(),
            message: message.to_string(),
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data,
                ..
            } => Some(data),
            ApiResponse::Error {
                ..
            } => None,
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }

    /// Check if this is an error response.
    #[inline]
    pub fn is_error(&self) -> bool { matches!(self, ApiResponse::Error { .. }) }

    /// Convert to a Result type.
    #[inline]
    pub fn into_result(self) -> Result<T, (String, String)> {
        match self {
            ApiResponse::Success {
                data,
                ..
            } => Ok(data),
            ApiResponse::Error {
                code,
                message,
                ..
            } => Err((code, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok() {
        let response = ApiResponse::ok("repair data");
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&"repair data"));
    }

    #[test]
    fn test_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "Repair not found");
        match response {
            ApiResponse::Error {
                success,
                code,
                message,
            } => {
                assert!(!success);
                assert_eq!(code, "NOT_FOUND");
                assert_eq!(message, "Repair not found");
            },
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = ApiResponse::ok(42);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":42"));

        let response: ApiResponse<()> = ApiResponse::error("FORBIDDEN", "denied");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"code\":\"FORBIDDEN\""));
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResponse<&str> = ApiResponse::ok("data");
        assert_eq!(ok.into_result(), Ok("data"));

        let err: ApiResponse<String> = ApiResponse::error("CODE", "msg");
        assert_eq!(
            err.into_result(),
            Err(("CODE".to_string(), "msg".to_string()))
        );
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 45);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, 20);
        assert_eq!(meta.total, 45);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_pagination_total_pages_is_ceil() {
        assert_eq!(PaginationMeta::new(1, 20, 40).total_pages, 2);
        assert_eq!(PaginationMeta::new(1, 20, 41).total_pages, 3);
        assert_eq!(PaginationMeta::new(1, 20, 1).total_pages, 1);
    }

    #[test]
    fn test_pagination_empty() {
        let meta = PaginationMeta::empty(1, 20);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_pagination_offset() {
        let meta = PaginationMeta::new(3, 10, 100);
        assert_eq!(meta.offset(), Some(20));
        assert_eq!(meta.limit(), 10);
    }

    #[test]
    fn test_pagination_page_zero_clamped() {
        let meta = PaginationMeta::new(0, 10, 100);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.offset(), Some(0));
    }

    #[test]
    fn test_pagination_page_exceeds_max() {
        let meta = PaginationMeta::new(PaginationMeta::MAX_PAGE + 1, 10, 1000);
        assert_eq!(meta.page, PaginationMeta::MAX_PAGE);
        assert!(meta.offset().is_some());
    }
}
