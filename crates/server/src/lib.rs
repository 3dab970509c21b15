//! # Plumbline API Server
//!
//! Axum-based HTTP API server for Plumbline repair tracking.
//!
//! ## Modules
//!
//! - [`auth`]: JWT validation
//! - [`dto`]: Request/response data transfer objects
//! - [`handlers`]: Request handlers for users, projects and repairs
//! - [`middleware`]: HTTP middleware (authentication)
//! - [`phases`]: The repair phase state machine
//! - [`repair_query`]: The role-scoped repair query/filter engine
//! - [`router`]: API route configuration

use std::sync::Arc;

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod phases;
pub mod repair_query;
pub mod router;
pub mod utils;

pub use router::create_app_router;

use crate::{auth::jwt::JwtConfig, phases::PhaseConfig};

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:           sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config:   JwtConfig,
    /// Phase-ordering configuration
    pub phase_config: PhaseConfig,
    /// External-uid to internal-user resolution
    pub identity:     Arc<dyn ::auth::IdentityResolver>,
    /// Server start time for uptime calculation
    pub start_time:   std::time::Instant,
}

impl AppState {
    /// Assemble application state with the database-backed identity resolver.
    #[must_use]
    pub fn new(db: sea_orm::DbConn, jwt_config: JwtConfig, phase_config: PhaseConfig) -> Self {
        let identity = Arc::new(::auth::SeaOrmIdentityResolver::new(db.clone()));
        Self {
            db,
            jwt_config,
            phase_config,
            identity,
            start_time: std::time::Instant::now(),
        }
    }
}
