//! # rastertrace
//!
//! An authenticated HTTP backend exposing two operations on images:
//! upscaling (decode, resample, re-encode as PNG) and vectorization
//! (delegated to an external tracing tool that turns rasters into SVG).
//!
//! Each request is processed synchronously and independently. There is no
//! persistent state: the only process-wide data is the immutable
//! configuration loaded at startup.
//!
//! ## Features
//!
//! - **Bearer-token auth**: shared-secret authentication that fails closed
//!   when no secret is configured
//! - **Upscale pipeline**: strict base64 handling, RGB normalization,
//!   Lanczos resampling, PNG output
//! - **Trace pipeline**: scoped temporary workspace, time-boxed external
//!   process invocation, bounded diagnostic capture
//!
//! ## Architecture
//!
//! - [`config`] - CLI/environment configuration
//! - [`mime`] - the fixed table of accepted image MIME types
//! - [`codec`] - base64 transport and the upscale codec
//! - [`trace`] - workspace management, process invocation, trace pipeline
//! - [`server`] - Axum routes, handlers, validation, authentication
//!
//! ## Example
//!
//! ```rust,no_run
//! use rastertrace::server::{create_router, RouterConfig};
//! use rastertrace::trace::TraceService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = TraceService::new("python3", "/opt/tools/trace.py");
//!     let router = create_router(service, RouterConfig::new("my-secret"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8787")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod mime;
pub mod server;
pub mod trace;

// Re-export commonly used types
pub use codec::{
    decode_base64, encode_base64, is_valid_scale, ImageUpscaler, DEFAULT_SCALE, MAX_SCALE,
    MIN_SCALE,
};
pub use config::Config;
pub use error::{CodecError, TraceError};
pub use mime::ImageMime;
pub use server::{
    auth_middleware, create_router, health_handler, trace_handler, upscale_handler, AppState,
    AuthError, BearerAuth, ErrorResponse, HealthResponse, RouterConfig, TraceRequest,
    TraceResponse, UpscaleRequest, UpscaleResponse, ValidationError,
};
pub use trace::{
    invoke_trace, ProcessResult, TraceService, TraceWorkspace, STREAM_TAIL_CHARS,
    TRACE_TIMEOUT_SECS,
};
