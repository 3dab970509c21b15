//! HTTP request handlers.

pub mod projects;
pub mod repairs;
pub mod users;
