//! Request and response data transfer objects.

pub mod projects;
pub mod repairs;
pub mod users;
