//! Router configuration for rastertrace.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health    - Health check (public)
//! POST /upscale   - Upscale endpoint (bearer token)
//! POST /trace     - Trace endpoint (bearer token)
//! ```
//!
//! There is no auth-disabled mode: an empty token means the protected
//! routes reject everything, never that they are open.
//!
//! # Example
//!
//! ```ignore
//! use rastertrace::server::{create_router, RouterConfig};
//! use rastertrace::trace::TraceService;
//!
//! let service = TraceService::new("python3", "/opt/trace.py");
//! let router = create_router(service, RouterConfig::new("my-secret"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, BearerAuth};
use super::handlers::{health_handler, trace_handler, upscale_handler, AppState};
use crate::trace::TraceService;

/// Maximum accepted request body size.
///
/// Base64-encoded images are large; the axum default of 2MB is too small.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Bearer token shared secret; empty rejects all protected requests
    pub token: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with the given bearer token.
    ///
    /// By default CORS allows any origin and tracing is enabled.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router.
///
/// Builds the Axum router with the public health route, the two protected
/// image routes behind bearer-token middleware, CORS, and optional request
/// tracing.
pub fn create_router(trace_service: TraceService, config: RouterConfig) -> Router {
    let app_state = AppState::new(trace_service);
    let auth = BearerAuth::new(&config.token);
    let cors = build_cors_layer(&config);

    // Auth middleware is layered onto the protected routes only; /health
    // stays reachable without a token
    let protected_routes = Router::new()
        .route("/upscale", post(upscale_handler))
        .route("/trace", post(trace_handler))
        .with_state(app_state.clone())
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state);

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
