//! HTTP server layer for rastertrace.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /upscale          POST /trace        GET /health    │
//! │                                                                 │
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────────────┐ │
//! │  │  handlers   │  │  auth        │  │       routes            │ │
//! │  │ (requests)  │  │ (bearer)     │  │  (router config)        │ │
//! │  └─────────────┘  └──────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod validate;

pub use auth::{auth_middleware, AuthError, BearerAuth};
pub use handlers::{
    health_handler, trace_handler, upscale_handler, AppState, ErrorResponse, HealthResponse,
    TraceResponse, UpscaleFailure, UpscaleResponse,
};
pub use routes::{create_router, RouterConfig};
pub use validate::{parse_body, parse_trace, parse_upscale, TraceRequest, UpscaleRequest, ValidationError};
