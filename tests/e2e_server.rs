//! Server end-to-end tests
//!
//! Tests the full server lifecycle over real TCP connections.

mod common;

use common::*;
use image::GenericImageView;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn serve_until_cancelled() {
    let h = TestHarness::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let cancel = CancellationToken::new();
    let server = tokio::spawn(tf_server::serve(listener, h.ctx.clone(), cancel.clone()));

    let resp = reqwest::get(format!("http://{addr}/hi")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Hello, World!");

    cancel.cancel();
    let result = timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());

    assert!(reqwest::get(format!("http://{addr}/hi")).await.is_err());
}

#[tokio::test]
async fn resize_over_http() {
    let (_h, addr) = TestHarness::with_server().await;

    let part = reqwest::multipart::Part::bytes(png(120, 80))
        .file_name("photo.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/resize?width=60&height=20"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );
    let img = image::load_from_memory(&resp.bytes().await.unwrap()).unwrap();
    assert_eq!(img.dimensions(), (60, 20));
}

#[tokio::test]
async fn thumbnail_over_http() {
    let (h, addr) = TestHarness::with_server().await;
    let filepath = h.upload("999-landscape.jpg", &jpeg(800, 600));

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/generate-thumbnail"))
        .json(&serde_json::json!({ "filepath": filepath }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["thumbnail_path"],
        "/uploads/thumbnails/thumb-999-landscape.jpg"
    );
    assert!(h.thumbnails_dir().join("thumb-999-landscape.jpg").exists());
}

#[tokio::test]
async fn concurrent_thumbnails_for_distinct_files() {
    let (h, addr) = TestHarness::with_server().await;
    let paths: Vec<String> = (0..8)
        .map(|i| h.upload(&format!("{i}-img.png"), &png(64 + i, 48)))
        .collect();

    let client = reqwest::Client::new();
    let tasks = paths.into_iter().map(|filepath| {
        let client = client.clone();
        async move {
            client
                .post(format!("http://{addr}/generate-thumbnail"))
                .json(&serde_json::json!({ "filepath": filepath, "width": 16, "height": 16 }))
                .send()
                .await
                .unwrap()
                .status()
        }
    });

    for status in spawn_all(tasks).await {
        assert_eq!(status, 200);
    }

    let mut files = h.thumbnail_files();
    files.sort();
    assert_eq!(files.len(), 8);
    assert!(files.iter().all(|f| f.starts_with("thumb-") && f.ends_with("-img.jpg")));
}

async fn spawn_all<F, T>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}
