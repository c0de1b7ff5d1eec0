//! Session-token authentication for the HTTP layer.
//!
//! Clients obtain an opaque token from `POST /login` and present it on the
//! `x-session-id` header (a `session_id` cookie is also accepted). The
//! [`require_auth`] middleware gates every mutating request routed through
//! it: safe methods (GET, HEAD, OPTIONS) pass untouched, anything else must
//! carry a token that the [`AuthGate`] recognizes, and is rejected with 401
//! before reaching a handler.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::session::{AuthError, AuthGate};

use super::handlers::ErrorResponse;

/// Request/response header carrying the session token.
pub const SESSION_HEADER: &str = "x-session-id";

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

// =============================================================================
// Token Extraction
// =============================================================================

/// Pull the session token from the `x-session-id` header, falling back to
/// the `session_id` cookie. Absence is not an error.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

// =============================================================================
// Error Responses
// =============================================================================

/// Rejection for gated routes: 401 with the standard error envelope.
#[derive(Debug, Clone, Copy)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new("Not authorized. Please log in.");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            AuthError::InvalidCredential => {
                warn!(status = status.as_u16(), "login failed: invalid password");
            }
            AuthError::Storage(message) => {
                tracing::error!(status = status.as_u16(), "session storage error: {}", message);
            }
        }

        let body = ErrorResponse::new(self.to_string());
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware gating mutating requests on a valid session.
///
/// Applied to a router, it lets safe methods through untouched and requires
/// `authorize` to pass for everything else, rejecting with 401 before the
/// handler (and thus before any side effect) runs.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Result<Response, Unauthorized> {
    let method = request.method();
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(request.headers()).unwrap_or_default();
    if !gate.authorize(&token).await {
        debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected unauthenticated mutating request"
        );
        return Err(Unauthorized);
    }

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
