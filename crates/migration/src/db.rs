//! # Database Connection Management
//!
//! This module provides database connection utilities for establishing and
//! maintaining PostgreSQL connections using Sea-ORM.

use std::time::Duration;

use error::{AppError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Database connection configuration
///
/// This struct holds all configuration options for establishing a database connection.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host address
    pub host:            String,
    /// Database port number
    pub port:            u16,
    /// Database name
    pub database:        String,
    /// Database username
    pub username:        String,
    /// Database password
    pub password:        String,
    /// SSL mode for connection
    pub ssl_mode:        SslMode,
    /// Maximum connections in pool
    pub pool_size:       u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

/// SSL mode options for PostgreSQL connections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    /// No SSL - only use for development
    Disable,
    /// Prefer SSL if available
    Prefer,
    /// Require SSL connection
    #[default]
    Require,
}

impl SslMode {
    /// Converts the SSL mode to a PostgreSQL connection string value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }

    /// Parse an SSL mode from its connection string value.
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "disable" => Some(SslMode::Disable),
            "prefer" => Some(SslMode::Prefer),
            "require" => Some(SslMode::Require),
            _ => None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self { Self::from_env() }
}

impl DatabaseConfig {
    /// Build configuration from `PLUMBLINE_DATABASE_*` environment variables,
    /// falling back to development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host:            std::env::var("PLUMBLINE_DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port:            std::env::var("PLUMBLINE_DATABASE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            database:        std::env::var("PLUMBLINE_DATABASE_NAME").unwrap_or_else(|_| "plumbline".to_string()),
            username:        std::env::var("PLUMBLINE_DATABASE_USER").unwrap_or_else(|_| "plumbline".to_string()),
            password:        std::env::var("PLUMBLINE_DATABASE_PASSWORD").unwrap_or_default(),
            ssl_mode:        std::env::var("PLUMBLINE_DATABASE_SSL_MODE")
                .ok()
                .and_then(|v| SslMode::from_string(&v))
                .unwrap_or_default(),
            pool_size:       std::env::var("PLUMBLINE_DATABASE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            connect_timeout: 30,
        }
    }

    /// Render the PostgreSQL connection URL for this configuration.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password,
            self.host,
            self.port,
            self.database,
            self.ssl_mode.as_str()
        )
    }
}

/// A connected database handle.
///
/// `DATABASE_URL` overrides the discrete `PLUMBLINE_DATABASE_*` variables
/// when set, which is what the test environment and most hosting platforms
/// provide.
pub struct SeaDb {
    pub inner: DatabaseConnection,
}

impl SeaDb {
    /// Connect using environment configuration.
    pub async fn new() -> Result<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => DatabaseConfig::from_env().connection_url(),
        };
        Self::from_url(&url).await
    }

    /// Connect to an explicit URL.
    pub async fn from_url(url: &str) -> Result<Self> {
        let config = DatabaseConfig::from_env();

        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(config.pool_size)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(false);

        let inner = Database::connect(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!(database = %config.database, "Database connection established");

        Ok(Self {
            inner,
        })
    }
}
