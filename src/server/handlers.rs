//! HTTP request handlers for the rastertrace API.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check, reports the configured trace script
//! - `POST /upscale` - Resize an image and return it as base64 PNG
//! - `POST /trace` - Vectorize an image via the external tracing tool

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::codec::ImageUpscaler;
use crate::error::{CodecError, TraceError};
use crate::trace::TraceService;

use super::validate;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The stateless upscale codec
    pub upscaler: ImageUpscaler,

    /// The trace pipeline service
    pub trace_service: Arc<TraceService>,
}

impl AppState {
    /// Create application state around a trace service.
    pub fn new(trace_service: TraceService) -> Self {
        Self {
            upscaler: ImageUpscaler::new(),
            trace_service: Arc::new(trace_service),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
///
/// The stream fields are only present on trace-tool failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Tail of the tool's stderr, when a trace process failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    /// Tail of the tool's stdout, when a trace process failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
}

impl ErrorResponse {
    /// Create a plain error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stderr: None,
            stdout: None,
        }
    }

    /// Create an error response carrying captured stream tails.
    pub fn with_streams(
        error: impl Into<String>,
        stderr: impl Into<String>,
        stdout: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            stderr: Some(stderr.into()),
            stdout: Some(stdout.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always true when the process is serving
    pub ok: bool,

    /// Configured path to the external trace script
    #[serde(rename = "traceScript")]
    pub trace_script: String,
}

/// Successful upscale response.
#[derive(Debug, Serialize)]
pub struct UpscaleResponse {
    /// Base64-encoded PNG output
    #[serde(rename = "bytesBase64Encoded")]
    pub bytes_base64_encoded: String,

    /// Always "image/png"; output is re-encoded regardless of input format
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Successful trace response.
#[derive(Debug, Serialize)]
pub struct TraceResponse {
    /// Raw textual contents of the SVG the tool produced
    pub svg: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Wrapper mapping codec failures in the upscale path to HTTP responses.
///
/// Every codec failure here — bad base64 included — folds into a generic
/// 500 "Upscale failed" message. The trace path maps bad base64 to 400
/// instead; the asymmetry is inherited behavior, kept deliberately.
pub struct UpscaleFailure(pub CodecError);

impl From<CodecError> for UpscaleFailure {
    fn from(err: CodecError) -> Self {
        UpscaleFailure(err)
    }
}

impl IntoResponse for UpscaleFailure {
    fn into_response(self) -> Response {
        let message = format!("Upscale failed: {}", self.0);
        error!(status = 500, "{}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(message)),
        )
            .into_response()
    }
}

/// Convert trace pipeline failures to HTTP responses.
///
/// 4xx failures are logged at WARN, 5xx at ERROR. A non-zero tool exit
/// attaches both stream tails to the body for diagnosis.
impl IntoResponse for TraceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            TraceError::InvalidBase64 => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(self.to_string()),
            ),

            TraceError::ScriptFailed { stdout, stderr, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_streams("Trace script failed", stderr.clone(), stdout.clone()),
            ),

            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(self.to_string()),
            ),
        };

        if status.is_server_error() {
            match &self {
                TraceError::ScriptFailed { exit_code, .. } => {
                    error!(
                        status = status.as_u16(),
                        exit_code = exit_code,
                        "Trace failed: {}",
                        self
                    );
                }
                _ => {
                    error!(status = status.as_u16(), "Trace failed: {}", self);
                }
            }
        } else {
            warn!(status = status.as_u16(), "Trace rejected: {}", self);
        }

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// Auth-independent: always 200 with the configured trace script path, so
/// deployment probes work before a token is provisioned.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        trace_script: state.trace_service.script_path().display().to_string(),
    })
}

/// Handle upscale requests.
///
/// # Endpoint
///
/// `POST /upscale`
///
/// # Body Fields
///
/// - `imageBase64`: base64 image data (required)
/// - `mimeType`: one of image/png, image/jpeg, image/webp (default png)
/// - `scale`: resize factor in [1, 4] (default 2)
///
/// # Response
///
/// - `200 OK`: `{"bytesBase64Encoded": ..., "mimeType": "image/png"}`
/// - `400 Bad Request`: missing/invalid fields
/// - `500 Internal Server Error`: decode or resize failure
pub async fn upscale_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let body = validate::parse_body(&body);

    let request = match validate::parse_upscale(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    match state
        .upscaler
        .upscale_base64(&request.image_base64, request.scale)
    {
        Ok(encoded) => Json(UpscaleResponse {
            bytes_base64_encoded: encoded,
            mime_type: "image/png".to_string(),
        })
        .into_response(),
        Err(err) => UpscaleFailure(err).into_response(),
    }
}

/// Handle trace requests.
///
/// # Endpoint
///
/// `POST /trace`
///
/// # Body Fields
///
/// - `imageBase64`: base64 image data (required)
/// - `mimeType`: one of image/png, image/jpeg, image/webp (default png)
///
/// # Response
///
/// - `200 OK`: `{"svg": ...}`
/// - `400 Bad Request`: missing/invalid fields, malformed base64
/// - `500 Internal Server Error`: missing script, launch failure or
///   timeout, non-zero tool exit (with stream tails), missing output
pub async fn trace_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let body = validate::parse_body(&body);

    let request = match validate::parse_trace(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    match state
        .trace_service
        .trace(&request.image_base64, request.mime)
        .await
    {
        Ok(svg) => Json(TraceResponse { svg }).into_response(),
        Err(err) => err.into_response(),
    }
}

// =============================================================================
// Tests
// =============================================================================
