//! Upscale and health endpoint integration tests.
//!
//! Tests verify:
//! - Health contract (auth-independent, reports the trace script path)
//! - Upscale dimension math, default scale, and PNG-only output
//! - Error cases (missing fields, bad scale, unsupported MIME, the
//!   500-on-decode-failure mapping)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use rastertrace::codec::decode_base64;

use super::test_utils::{
    authed_post, create_test_jpeg, create_test_png, is_valid_png, json_body, png_dimensions,
    router_with_script, svg_writing_script, to_base64,
};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_ok_and_script_path() {
    let dir = tempfile::tempdir().unwrap();
    let script = svg_writing_script(dir.path());
    let router = router_with_script(&script);

    // No Authorization header at all
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["traceScript"], script.display().to_string());
}

// =============================================================================
// Upscale Success Paths
// =============================================================================

#[tokio::test]
async fn test_upscale_doubles_dimensions_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({"imageBase64": to_base64(&create_test_png(8, 6))});
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["mimeType"], "image/png");

    let output = decode_base64(body["bytesBase64Encoded"].as_str().unwrap()).unwrap();
    assert!(is_valid_png(&output));
    assert_eq!(png_dimensions(&output), (16, 12));
}

#[tokio::test]
async fn test_upscale_explicit_scale() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({"imageBase64": to_base64(&create_test_png(4, 4)), "scale": 4});
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let output = decode_base64(body["bytesBase64Encoded"].as_str().unwrap()).unwrap();
    assert_eq!(png_dimensions(&output), (16, 16));
}

#[tokio::test]
async fn test_upscale_fractional_scale_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    // 5 * 1.5 = 7.5, truncated to 7
    let body = json!({"imageBase64": to_base64(&create_test_png(5, 5)), "scale": 1.5});
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let output = decode_base64(body["bytesBase64Encoded"].as_str().unwrap()).unwrap();
    assert_eq!(png_dimensions(&output), (7, 7));
}

#[tokio::test]
async fn test_upscale_jpeg_input_becomes_png_output() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({
        "imageBase64": to_base64(&create_test_jpeg(10, 10)),
        "mimeType": "image/jpeg",
        "scale": 2,
    });
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["mimeType"], "image/png");

    let output = decode_base64(body["bytesBase64Encoded"].as_str().unwrap()).unwrap();
    assert!(is_valid_png(&output));
    assert_eq!(png_dimensions(&output), (20, 20));
}

#[tokio::test]
async fn test_upscale_mime_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({
        "imageBase64": to_base64(&create_test_png(4, 4)),
        "mimeType": "Image/PNG",
    });
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Upscale Validation Errors
// =============================================================================

#[tokio::test]
async fn test_upscale_missing_image_400() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let response = router
        .oneshot(authed_post("/upscale", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "imageBase64 is required");
}

#[tokio::test]
async fn test_upscale_whitespace_image_400() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let response = router
        .oneshot(authed_post("/upscale", &json!({"imageBase64": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upscale_unsupported_mime_400() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({
        "imageBase64": to_base64(&create_test_png(4, 4)),
        "mimeType": "image/gif",
    });
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Unsupported mimeType");
}

#[tokio::test]
async fn test_upscale_scale_out_of_range_400() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));
    let image = to_base64(&create_test_png(4, 4));

    for bad_scale in [json!(0.5), json!(5), json!(0), json!(-1)] {
        let body = json!({"imageBase64": image.clone(), "scale": bad_scale});
        let response = router
            .clone()
            .oneshot(authed_post("/upscale", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "scale must be between 1 and 4");
    }
}

#[tokio::test]
async fn test_upscale_boundary_scales_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));
    let image = to_base64(&create_test_png(4, 4));

    for scale in [json!(1), json!(4), json!(1.0), json!(4.0)] {
        let body = json!({"imageBase64": image.clone(), "scale": scale});
        let response = router
            .clone()
            .oneshot(authed_post("/upscale", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_upscale_non_numeric_scale_500() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({
        "imageBase64": to_base64(&create_test_png(4, 4)),
        "scale": "huge",
    });
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upscale_numeric_string_scale_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({
        "imageBase64": to_base64(&create_test_png(4, 4)),
        "scale": "3",
    });
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let output = decode_base64(body["bytesBase64Encoded"].as_str().unwrap()).unwrap();
    assert_eq!(png_dimensions(&output), (12, 12));
}

#[tokio::test]
async fn test_upscale_malformed_json_body_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let request = Request::builder()
        .method("POST")
        .uri("/upscale")
        .header("authorization", format!("Bearer {}", super::test_utils::TEST_TOKEN))
        .header("content-type", "application/json")
        .body(Body::from("this is not json"))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"], "imageBase64 is required");
}

// =============================================================================
// Upscale Decode Failures (500, not 400)
// =============================================================================

#[tokio::test]
async fn test_upscale_invalid_base64_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    // Bad base64 in the upscale path folds into a generic 500, unlike the
    // trace path's 400
    let body = json!({"imageBase64": "@@@not-base64@@@"});
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Upscale failed"), "got: {message}");
}

#[tokio::test]
async fn test_upscale_non_image_bytes_500() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_with_script(&svg_writing_script(dir.path()));

    let body = json!({"imageBase64": to_base64(b"valid base64, not an image")});
    let response = router.oneshot(authed_post("/upscale", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Upscale failed"));
}
