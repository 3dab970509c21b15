//! Authentication support for the API server.

pub mod jwt;
