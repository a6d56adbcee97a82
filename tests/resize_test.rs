//! Integration tests for `POST /resize`.

mod common;

use axum::http::{header, StatusCode};
use common::*;
use image::{GenericImageView, ImageFormat};
use tf_core::config::Config;

fn content_type(response: &axum::http::Response<axum::body::Body>) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn resize_png_keeps_format_and_exact_size() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request("?width=100&height=50", "photo.png", &png(400, 300)))
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "image/png");

    let bytes = body_bytes(resp).await;
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!(img.dimensions(), (100, 50));
}

#[tokio::test]
async fn resize_jpeg_stays_jpeg_and_ignores_aspect() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request("?width=30&height=300", "photo.jpg", &jpeg(200, 100)))
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "image/jpeg");

    let img = image::load_from_memory(&body_bytes(resp).await).unwrap();
    assert_eq!(img.dimensions(), (30, 300));
}

#[tokio::test]
async fn resize_ignores_client_file_name() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request("?width=10&height=10", "not-really.gif", &png(20, 20)))
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "image/png");
}

#[tokio::test]
async fn resize_accepts_upper_bound() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request("?width=4096&height=1", "wide.png", &png(64, 64)))
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let img = image::load_from_memory(&body_bytes(resp).await).unwrap();
    assert_eq!(img.dimensions(), (4096, 1));
}

#[tokio::test]
async fn resize_rejects_dimension_over_limit() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request("?width=4097&height=10", "photo.png", &png(10, 10)))
        .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "invalid_dimensions");
}

#[tokio::test]
async fn resize_rejects_zero_and_negative_dimensions() {
    let h = TestHarness::new();
    for query in ["?width=0&height=10", "?width=10&height=-5"] {
        let resp = h
            .send(resize_request(query, "photo.png", &png(10, 10)))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query {query}");
        assert_eq!(body_json(resp).await["code"], "invalid_dimensions");
    }
}

#[tokio::test]
async fn resize_requires_both_query_parameters() {
    let h = TestHarness::new();
    for query in ["", "?width=10", "?width=abc&height=10"] {
        let resp = h
            .send(resize_request(query, "photo.png", &png(10, 10)))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "query {query:?}");
        assert_eq!(body_json(resp).await["code"], "validation_error");
    }
}

#[tokio::test]
async fn resize_rejects_undecodable_upload() {
    let h = TestHarness::new();
    let resp = h
        .send(resize_request(
            "?width=10&height=10",
            "notes.png",
            b"definitely not an image",
        ))
        .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "decode_error");
}

#[tokio::test]
async fn resize_without_file_field_is_rejected() {
    let h = TestHarness::new();
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
    );
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/resize?width=10&height=10")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let resp = h.send(request).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "validation_error");
}

#[tokio::test]
async fn resize_rejects_non_multipart_body() {
    let h = TestHarness::new();
    let resp = h
        .send(json_request(
            "/resize?width=10&height=10",
            serde_json::json!({"file": "abc"}),
        ))
        .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resize_rejects_oversized_upload() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let h = TestHarness::with_config(config);

    let payload = vec![0u8; 4096];
    let resp = h
        .send(resize_request("?width=10&height=10", "big.png", &payload))
        .await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(resp).await["code"], "payload_too_large");
}
