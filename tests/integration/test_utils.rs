//! Test utilities for integration tests.
//!
//! Provides image builders, stub trace scripts, and request helpers shared
//! across the test modules.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use serde_json::Value;

use rastertrace::server::{create_router, RouterConfig};
use rastertrace::trace::TraceService;

/// Bearer token used by the test routers.
pub const TEST_TOKEN: &str = "test-bearer-token";

// =============================================================================
// Image Builders
// =============================================================================

/// Create an RGB PNG of the given dimensions.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 8) as u8, (y * 8) as u8, 200])
    });

    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Create a JPEG of the given dimensions.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 8) as u8, (y * 8) as u8, 100])
    });

    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 90);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Base64-encode image bytes the way clients do.
pub fn to_base64(bytes: &[u8]) -> String {
    rastertrace::codec::encode_base64(bytes)
}

/// Decode PNG bytes and return their dimensions.
pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}

/// Check for the PNG signature.
pub fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() >= 8 && bytes[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
}

// =============================================================================
// Stub Trace Scripts
// =============================================================================

/// Write a stub trace script (run via `sh`) into `dir`.
///
/// The script receives the input path as `$1` and the output path as `$2`,
/// like the real tracing tool.
pub fn write_stub_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// A stub that writes a fixed SVG and exits zero.
pub fn svg_writing_script(dir: &Path) -> PathBuf {
    write_stub_script(dir, "trace-ok.sh", "printf '<svg>traced</svg>' > \"$2\"\n")
}

// =============================================================================
// Routers
// =============================================================================

/// Router with the standard test token and a `sh`-run stub script.
pub fn router_with_script(script: &Path) -> Router {
    router_with_service(TraceService::new("sh", script))
}

/// Router with the standard test token around an arbitrary service.
pub fn router_with_service(service: TraceService) -> Router {
    create_router(service, RouterConfig::new(TEST_TOKEN).with_tracing(false))
}

/// Router whose configured token is the given one (possibly empty).
pub fn router_with_token(script: &Path, token: &str) -> Router {
    create_router(
        TraceService::new("sh", script),
        RouterConfig::new(token).with_tracing(false),
    )
}

// =============================================================================
// Requests
// =============================================================================

/// Build an authenticated POST with a JSON body.
pub fn authed_post(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build an unauthenticated POST with a JSON body.
pub fn anon_post(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
