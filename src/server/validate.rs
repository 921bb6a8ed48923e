//! Request body parsing and validation.
//!
//! Bodies are parsed leniently: a missing or malformed JSON body is
//! treated as an empty object, and each field is then validated on its
//! own. Validation runs before any expensive work (decode, workspace
//! creation, subprocess launch). Unknown fields are ignored.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::codec::{is_valid_scale, DEFAULT_SCALE};
use crate::mime::ImageMime;

use super::handlers::ErrorResponse;

// =============================================================================
// Validated Requests
// =============================================================================

/// A validated upscale request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpscaleRequest {
    /// Base64 image payload, trimmed, known non-empty
    pub image_base64: String,

    /// Declared input MIME type
    pub mime: ImageMime,

    /// Scale factor, within [1, 4]
    pub scale: f64,
}

/// A validated trace request.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRequest {
    /// Base64 image payload, trimmed, known non-empty
    pub image_base64: String,

    /// Declared input MIME type, used for the workspace input extension
    pub mime: ImageMime,
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Field validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `imageBase64` absent or empty after trimming
    MissingImage,

    /// `mimeType` outside the fixed MIME table
    UnsupportedMime,

    /// `scale` outside the closed interval [1, 4]
    ScaleOutOfRange,

    /// `scale` present but not coercible to a number.
    ///
    /// Surfaced as a generic server failure, never silently defaulted.
    InvalidScale,
}

impl ValidationError {
    /// The HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::InvalidScale => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingImage => write!(f, "imageBase64 is required"),
            ValidationError::UnsupportedMime => write!(f, "Unsupported mimeType"),
            ValidationError::ScaleOutOfRange => write!(f, "scale must be between 1 and 4"),
            ValidationError::InvalidScale => write!(f, "Upscale failed: invalid scale value"),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Validation error: {}", message);
        } else {
            warn!(status = status.as_u16(), "Validation error: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Body Parsing
// =============================================================================

/// Parse raw body bytes into a JSON object, leniently.
///
/// Anything that is not a JSON object (absent body, parse error, array,
/// scalar) becomes an empty object; the field validators then report the
/// actual problem, e.g. a missing `imageBase64`.
pub fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

/// Validate an upscale request body.
///
/// Scale coercion runs first: a non-numeric `scale` fails before the field
/// presence checks, while the range check runs last, after presence and
/// MIME membership.
pub fn parse_upscale(body: &Value) -> Result<UpscaleRequest, ValidationError> {
    let scale = coerce_scale(body)?;
    let image_base64 = require_image(body)?;
    let mime = parse_mime(body)?;

    if !is_valid_scale(scale) {
        return Err(ValidationError::ScaleOutOfRange);
    }

    Ok(UpscaleRequest {
        image_base64,
        mime,
        scale,
    })
}

/// Validate a trace request body. No scale field.
pub fn parse_trace(body: &Value) -> Result<TraceRequest, ValidationError> {
    let image_base64 = require_image(body)?;
    let mime = parse_mime(body)?;

    Ok(TraceRequest { image_base64, mime })
}

fn require_image(body: &Value) -> Result<String, ValidationError> {
    let image = body
        .get("imageBase64")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();

    if image.is_empty() {
        Err(ValidationError::MissingImage)
    } else {
        Ok(image.to_string())
    }
}

fn parse_mime(body: &Value) -> Result<ImageMime, ValidationError> {
    let raw = body.get("mimeType").and_then(Value::as_str).unwrap_or("");
    let normalized = raw.to_lowercase();
    let normalized = normalized.trim();

    if normalized.is_empty() {
        return Ok(ImageMime::default());
    }

    ImageMime::from_mime(normalized).ok_or(ValidationError::UnsupportedMime)
}

/// Coerce the `scale` field to a number.
///
/// Accepts a JSON number or a numeric string; absent defaults to 2.0.
/// Anything else (null included) is an error, not a default.
fn coerce_scale(body: &Value) -> Result<f64, ValidationError> {
    match body.get("scale") {
        None => Ok(DEFAULT_SCALE),
        Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::InvalidScale),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidScale),
        Some(_) => Err(ValidationError::InvalidScale),
    }
}

// =============================================================================
// Tests
// =============================================================================
