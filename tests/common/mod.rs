//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary base directory, default
//! config and full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use metrics_exporter_prometheus::PrometheusHandle;
use tempfile::TempDir;
use tower::ServiceExt;

use tf_core::config::Config;
use tf_server::context::AppContext;
use tf_server::router::build_router;

pub const BOUNDARY: &str = "thumbforge-test-boundary";

/// Test harness wrapping a fully-constructed [`AppContext`] rooted in a
/// temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. `storage.base_dir`
    /// is always replaced by a fresh temp dir.
    pub fn with_config(config: Config) -> Self {
        Self::with_metrics(config, None)
    }

    /// Create a harness whose `/metrics` renders from `metrics`.
    pub fn with_metrics(mut config: Config, metrics: Option<PrometheusHandle>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.base_dir = dir.path().to_path_buf();

        let ctx = AppContext::new(config, metrics);
        std::fs::create_dir_all(ctx.storage.uploads_dir()).expect("failed to create uploads dir");

        Self { ctx, dir }
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    /// Send one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Drop `bytes` into the uploads directory and return its public path.
    pub fn upload(&self, name: &str, bytes: &[u8]) -> String {
        std::fs::write(self.ctx.storage.uploads_dir().join(name), bytes)
            .expect("failed to write upload");
        format!("/uploads/{name}")
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.ctx.storage.thumbnails_dir()
    }

    /// Names of the files currently in the thumbnails directory.
    pub fn thumbnail_files(&self) -> Vec<String> {
        match std::fs::read_dir(self.thumbnails_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A horizontal red-to-blue gradient.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let t = (x * 255 / width.max(1)) as u8;
        Rgb([255 - t, 0, t])
    });
    DynamicImage::ImageRgb8(img)
}

/// A fully transparent RGBA image.
pub fn transparent(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

/// Build a `multipart/form-data` body with a single file field.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST /resize with `data` as the uploaded file.
pub fn resize_request(query: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let body = multipart_body("file", filename, "application/octet-stream", data);
    Request::builder()
        .method("POST")
        .uri(format!("/resize{query}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
