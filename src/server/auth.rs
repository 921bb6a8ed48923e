//! Bearer-token authentication.
//!
//! Every protected endpoint requires `Authorization: Bearer <token>` where
//! the token is the configured shared secret.
//!
//! # Security Properties
//!
//! - **Fails closed**: an empty or unset secret denies ALL requests. An
//!   operator who forgets to configure the token gets a locked service,
//!   never an open one.
//! - **Exact match**: the header must equal `"Bearer " + secret` exactly —
//!   case-sensitive, no trimming.
//! - **Constant-time comparison**: header comparison uses constant-time
//!   equality to prevent timing attacks.
//! - **Generic failure body**: clients get `{"error": "Unauthorized"}` with
//!   no hint of why; the reason is only logged.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

// =============================================================================
// Types
// =============================================================================

/// Authentication error kinds.
///
/// Distinguished internally for logging; all of them produce the same
/// generic 401 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No secret is configured, so nothing can ever authenticate
    NoSecretConfigured,

    /// Request carried no usable Authorization header
    MissingHeader,

    /// Header present but did not match the expected value
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NoSecretConfigured => write!(f, "no bearer token configured"),
            AuthError::MissingHeader => write!(f, "missing Authorization header"),
            AuthError::InvalidToken => write!(f, "bearer token mismatch"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // A mismatching token could indicate probing, log at warn.
        // A missing header is common and expected, log at debug.
        match &self {
            AuthError::InvalidToken => {
                warn!(status = 401, "Authentication failed: {}", self);
            }
            AuthError::NoSecretConfigured => {
                warn!(
                    status = 401,
                    "Authentication failed: {} - all requests are denied", self
                );
            }
            AuthError::MissingHeader => {
                debug!(status = 401, "Authentication failed: {}", self);
            }
        }

        // The body never explains the rejection
        let body = ErrorResponse::new("Unauthorized");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

// =============================================================================
// Bearer Authentication
// =============================================================================

/// Bearer-token authenticator.
///
/// Holds the full expected header value (`"Bearer " + secret`) so each
/// check is a single constant-time comparison.
#[derive(Clone)]
pub struct BearerAuth {
    /// Expected header bytes; empty when no secret is configured
    expected: Vec<u8>,
}

impl BearerAuth {
    /// Create an authenticator from the configured secret.
    ///
    /// An empty secret produces an authenticator that rejects everything.
    pub fn new(secret: impl AsRef<str>) -> Self {
        let secret = secret.as_ref();
        let expected = if secret.is_empty() {
            Vec::new()
        } else {
            format!("Bearer {secret}").into_bytes()
        };
        Self { expected }
    }

    /// Check an incoming Authorization header value.
    pub fn check(&self, header: Option<&str>) -> Result<(), AuthError> {
        // Unset secret fails closed, before looking at the request at all
        if self.expected.is_empty() {
            return Err(AuthError::NoSecretConfigured);
        }

        let header = header.ok_or(AuthError::MissingHeader)?;

        if header.as_bytes().ct_eq(&self.expected).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware enforcing bearer-token authentication.
///
/// Applied to the protected routes; rejects with a generic 401 before the
/// handler runs.
pub async fn auth_middleware(
    State(auth): State<BearerAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    auth.check(header)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
