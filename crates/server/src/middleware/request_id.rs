//! # Request ID Middleware
//!
//! Propagates an `X-Request-Id` header through the request: an incoming id
//! is kept if it is well-formed, otherwise a fresh CUID2 is generated. The
//! id is attached to request extensions and echoed on the response.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use logging::{request_id, RequestId};

/// The header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID middleware
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(request_id::try_from_header)
        .unwrap_or_else(RequestId::new);

    tracing::debug!(request_id = %id, method = %request.method(), path = %request.uri().path(), "Request received");

    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
