//! # Request ID Tracking
//!
//! Utilities for generating and propagating request IDs across the application.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use std::cell::RefCell;

thread_local! {
    /// Thread-local storage for request ID.
    static REQUEST_ID: RefCell<Option<RequestId>> = const { RefCell::new(None) };
}

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String { self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Set the current request ID for this thread.
pub fn set_request_id(id: RequestId) {
    REQUEST_ID.with(|cell| {
        *cell.borrow_mut() = Some(id);
    });
}

/// Get the current request ID for this thread.
pub fn get_request_id() -> Option<RequestId> { REQUEST_ID.with(|cell| cell.borrow().clone()) }

/// Get the current request ID, or generate a new one if none exists.
pub fn get_or_init_request_id() -> RequestId { get_request_id().unwrap_or_else(RequestId::new) }

/// Clear the current request ID.
pub fn clear_request_id() {
    REQUEST_ID.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Try to parse a request ID from an incoming header value.
///
/// CUID2 ids are alphanumeric and at least 20 characters; anything else is
/// replaced rather than propagated.
pub fn try_from_header(value: &str) -> Option<RequestId> {
    let value = value.trim();
    if value.len() >= 20 && value.len() <= 64 && value.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        Some(RequestId(value.to_string()))
    }
    else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_set_get() {
        let id = RequestId::new();
        set_request_id(id.clone());
        assert_eq!(get_request_id(), Some(id));
        clear_request_id();
        assert_eq!(get_request_id(), None);
    }

    #[test]
    fn test_get_or_init() {
        clear_request_id();
        let id = get_or_init_request_id();
        assert!(!id.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_try_from_header() {
        let value = "k192v2g4w3zq8h6j5k12345678";
        let result = try_from_header(value);
        assert_eq!(result.unwrap().as_str(), value);
    }

    #[test]
    fn test_try_from_header_invalid() {
        assert!(try_from_header("short").is_none());
        assert!(try_from_header("invalid!@#characters-here-yes").is_none());
    }
}
