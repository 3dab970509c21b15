//! HTTP middleware for the API server.

pub mod auth;
pub mod request_id;
