//! # JWT Token Management
//!
//! JWT validation for API authentication. Tokens are issued by the external
//! identity provider; the claims carry its opaque uid in `sub`, which the
//! auth middleware resolves to an internal user. Token creation is kept for
//! tooling and tests.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use error::AppError;
use jsonwebtoken::{EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use error::Result;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded signing secret
    pub secret:             String,
    /// Access token lifetime in seconds
    pub expiration_seconds: u64,
    /// Expected token issuer
    pub issuer:             String,
    /// Expected token audience
    pub audience:           String,
}

impl JwtConfig {
    /// Load configuration from `PLUMBLINE_JWT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a config error if the secret is not set.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            secret:             std::env::var("PLUMBLINE_JWT_SECRET")
                .map_err(|_| AppError::config("PLUMBLINE_JWT_SECRET is not set"))?,
            expiration_seconds: std::env::var("PLUMBLINE_JWT_EXPIRATION_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            issuer:             std::env::var("PLUMBLINE_JWT_ISSUER").unwrap_or_else(|_| "plumbline".to_string()),
            audience:           std::env::var("PLUMBLINE_JWT_AUDIENCE").unwrap_or_else(|_| "plumbline-api".to_string()),
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity provider's auth uid
    pub sub: String,

    /// User email
    pub email: String,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new JWT access token
///
/// # Arguments
///
/// * `config` - JWT configuration
/// * `auth_uid` - The identity provider's uid for the user
/// * `email` - The user's email address
///
/// # Errors
///
/// Returns an error if token encoding fails.
pub fn create_access_token(config: &JwtConfig, auth_uid: &str, email: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub:   auth_uid.to_string(),
        email: email.to_string(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   expiration.as_secs(),
        iat:   issued_at,
        jti:   cuid2::create_id(),
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_base64_secret(&config.secret)
            .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))?;

    Ok(token)
}

/// Validates a JWT token and returns the claims
///
/// # Errors
///
/// Returns an error if token validation fails.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = jsonwebtoken::DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    let mut iss_set = HashSet::new();
    iss_set.insert(config.issuer.clone());
    validation.iss = Some(iss_set);
    let mut aud = HashSet::new();
    aud.insert(config.audience.clone());
    validation.aud = Some(aud);
    validation.validate_exp = true;

    let claims = jsonwebtoken::decode(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::JwtExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::JwtInvalidSignature,
            _ => AppError::JwtInvalidToken,
        }
    })?;

    Ok(claims.claims)
}

/// Extracts the Bearer token from the Authorization header
///
/// # Returns
///
/// The token string if present, or None if missing/invalid.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    if !auth_header.starts_with("Bearer ") {
        return None;
    }

    let token = auth_header.trim_start_matches("Bearer ").trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;

    fn test_config() -> JwtConfig {
        let secret = "test-secret-key-that-is-at-least-32-bytes-long";
        JwtConfig {
            secret:             base64::engine::general_purpose::STANDARD.encode(secret),
            expiration_seconds: 3600,
            issuer:             "test-issuer".to_string(),
            audience:           "test-audience".to_string(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = test_config();

        let token = create_access_token(&config, "ext-uid-123", "tess@example.com").expect("Failed to create token");
        assert!(!token.is_empty());

        let claims = validate_token(&config, &token).expect("Failed to validate token");

        assert_eq!(claims.sub, "ext-uid-123");
        assert_eq!(claims.email, "tess@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-audience");
    }

    #[test]
    fn test_validate_rejects_wrong_audience() {
        let config = test_config();
        let token = create_access_token(&config, "ext-uid-123", "tess@example.com").unwrap();

        let mut other = test_config();
        other.audience = "another-api".to_string();

        assert!(validate_token(&other, &token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token("Bearer abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_bearer_token("Bearer   abc123   "),
            Some("abc123".to_string())
        );
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
