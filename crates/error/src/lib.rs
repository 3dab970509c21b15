//! # Plumbline Error Infrastructure
//!
//! Error types and API response handling for the Plumbline application.

pub mod middleware;
pub mod response;
pub mod traits;

pub use middleware::ErrorHandler;
pub use response::{ApiResponse, PaginationMeta};
pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("JwtExpired: Token has expired")]
    JwtExpired,

    #[error("JwtInvalidSignature: Invalid token signature")]
    JwtInvalidSignature,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        use http::StatusCode;

        match self {
            AppError::NotFound {
                ..
            } => StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => StatusCode::UNAUTHORIZED,
            AppError::JwtExpired | AppError::JwtInvalidSignature | AppError::JwtInvalidToken => {
                StatusCode::UNAUTHORIZED
            },
            AppError::Forbidden {
                ..
            } => StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal {
                ..
            }
            | AppError::Database {
                ..
            }
            | AppError::Io {
                ..
            }
            | AppError::Config {
                ..
            }
            | AppError::Migration {
                ..
            } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::JwtExpired => "JWT_EXPIRED",
            AppError::JwtInvalidSignature => "JWT_INVALID_SIGNATURE",
            AppError::JwtInvalidToken => "JWT_INVALID_TOKEN",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::JwtExpired => "Token has expired".to_string(),
            AppError::JwtInvalidSignature => "Invalid token signature".to_string(),
            AppError::JwtInvalidToken => "Invalid token".to_string(),
            AppError::NotFound {
                message,
            }
            | AppError::BadRequest {
                message,
            }
            | AppError::Unauthorized {
                message,
            }
            | AppError::Forbidden {
                message,
            }
            | AppError::Conflict {
                message,
            }
            | AppError::Validation {
                message,
            }
            | AppError::Internal {
                message,
            }
            | AppError::Database {
                message,
            }
            | AppError::Io {
                message,
            }
            | AppError::Config {
                message,
            }
            | AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Add context to the error.
    ///
    /// The JWT variants carry no message and are returned unchanged.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let prefix = context.to_string();
        let with = |message: String| format!("{}: {}", prefix, message);

        match self {
            AppError::JwtExpired | AppError::JwtInvalidSignature | AppError::JwtInvalidToken => self,
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: with(message),
                }
            },
            AppError::BadRequest {
                message,
            } => {
                Self::BadRequest {
                    message: with(message),
                }
            },
            AppError::Unauthorized {
                message,
            } => {
                Self::Unauthorized {
                    message: with(message),
                }
            },
            AppError::Forbidden {
                message,
            } => {
                Self::Forbidden {
                    message: with(message),
                }
            },
            AppError::Conflict {
                message,
            } => {
                Self::Conflict {
                    message: with(message),
                }
            },
            AppError::Validation {
                message,
            } => {
                Self::Validation {
                    message: with(message),
                }
            },
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: with(message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: with(message),
                }
            },
            AppError::Io {
                message,
            } => {
                Self::Io {
                    message: with(message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: with(message),
                }
            },
            AppError::Migration {
                message,
            } => {
                Self::Migration {
                    message: with(message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", field))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}
