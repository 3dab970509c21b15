//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints. The token's
//! `sub` is the identity provider's opaque uid; it is resolved to an internal
//! user through the [`IdentityResolver`](::auth::IdentityResolver) port
//! before any handler runs.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use ::auth::IdentityResolver as _;
use entity::users::UserRole;
use serde_json::json;

use crate::{
    auth::jwt::{extract_bearer_token, validate_token},
    AppState,
};

/// User information resolved from the JWT token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Internal user ID
    pub id:        String,
    /// Identity provider uid
    pub auth_uid:  String,
    /// User email
    pub email:     String,
    /// Display name
    pub full_name: String,
    /// User role
    pub role:      UserRole,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT token
/// 3. Resolves the token's auth uid to an internal user
/// 4. Adds the authenticated user to request extensions
/// 5. Rejects requests with invalid/missing tokens or unresolvable uids
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    // Extract Authorization header
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => {
            match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return create_auth_error_response("Invalid authorization header encoding");
                },
            }
        },
        None => {
            return create_auth_error_response("Missing authorization header");
        },
    };

    // Extract Bearer token
    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return create_auth_error_response("Invalid authorization header format");
        },
    };

    // Validate token
    let claims = match validate_token(&state.jwt_config, &token) {
        Ok(claims) => claims,
        Err(e) => {
            return create_auth_error_response(&e.message());
        },
    };

    // Resolve the external uid to an internal user
    let identity = match state.identity.resolve(&claims.sub).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            return create_auth_error_response("No active user for this identity");
        },
        Err(e) => {
            // Fail-closed: deny the request if the lookup itself failed
            tracing::error!(error = %e, "Identity resolution failed, denying request");
            return create_auth_error_response("Authentication service temporarily unavailable");
        },
    };

    let user = AuthenticatedUser {
        id:        identity.user_id,
        auth_uid:  claims.sub,
        email:     identity.email,
        full_name: identity.full_name,
        role:      identity.role,
    };

    // Add user to request extensions
    request.extensions_mut().insert(user);

    // Continue with the request
    next.run(request).await
}

/// Create standardized authentication error response
fn create_auth_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({
            "success": false,
            "code": "AUTHENTICATION_ERROR",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::extract_bearer_token;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token("Bearer abc123"),
            Some("abc123".to_string())
        );
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("").is_none());
    }

    #[test]
    fn test_auth_error_response_is_401() {
        let response = create_auth_error_response("Missing authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
