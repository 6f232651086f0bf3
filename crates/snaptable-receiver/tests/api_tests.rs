//! Router-level tests for the receiver API
//!
//! Each test builds the real router over a [`MockSender`], a
//! [`StubVisionModel`] and scratch directories, and drives it with
//! `tower::ServiceExt::oneshot`.

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use snaptable_core::{
    config::DEFAULT_MAX_BODY_BYTES, extract::TableExtractor, screenshot::ScreenshotClient,
    util::image_store::ImageStore,
};
use snaptable_receiver::{AppState, create_router};
use snaptable_test_utils::{
    fixtures::{png_data_uri, sample_png, to_base64},
    mock_sender::MockSender,
    stub_vision::StubVisionModel,
};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    dir:    TempDir,
    model:  Arc<StubVisionModel>,
}

impl TestApp {
    fn new(sender_url: &str, model: StubVisionModel) -> Self {
        Self::with_body_limit(sender_url, model, DEFAULT_MAX_BODY_BYTES)
    }

    fn with_body_limit(sender_url: &str, model: StubVisionModel, max_body_bytes: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>Screenshot to Table</h1>").unwrap();
        std::fs::write(static_dir.join("main.js"), "console.log('ok');").unwrap();

        let model = Arc::new(model);
        let state = AppState::new(
            ScreenshotClient::new(
                sender_url,
                dir.path().join("screenshots"),
                Duration::from_secs(5),
            )
            .unwrap(),
            ImageStore::new(dir.path().join("cropped"), dir.path().join("temp")),
            TableExtractor::new(model.clone()),
            static_dir,
        )
        .with_max_body_bytes(max_body_bytes);

        Self {
            router: create_router(state),
            dir,
            model,
        }
    }

    fn offline(model: StubVisionModel) -> Self {
        Self::new("http://127.0.0.1:9", model)
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

// ============================================================================
// GET /request-screenshot
// ============================================================================

#[tokio::test]
async fn test_request_screenshot_proxies_png() {
    let png = sample_png(10, 5);
    let sender = MockSender::serving_png(png.clone()).await;
    let app = TestApp::new(&sender.base_url(), StubVisionModel::replying("{}"));

    let response = app.get("/request-screenshot").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, png);
    assert_eq!(file_count(&app.path("screenshots")), 1);
}

#[tokio::test]
async fn test_request_screenshot_sender_failure() {
    let sender = MockSender::failing_with(500).await;
    let app = TestApp::new(&sender.base_url(), StubVisionModel::replying("{}"));

    let response = app.get("/request-screenshot").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"success": false, "error": "Failed to capture screenshot. Status code: 500"})
    );
}

#[tokio::test]
async fn test_request_screenshot_sender_down() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let response = app.get("/request-screenshot").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error connecting to sender at http://127.0.0.1:9/capture")
    );
}

// ============================================================================
// POST /save-cropped
// ============================================================================

#[tokio::test]
async fn test_save_cropped_writes_archive() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));
    let png = sample_png(3, 3);

    let (status, json) = app
        .post_json("/save-cropped", json!({"image": png_data_uri(&png)}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let filename = json["filename"].as_str().unwrap();
    assert!(filename.contains("cropped_"));
    assert_eq!(std::fs::read(filename).unwrap(), png);
}

#[tokio::test]
async fn test_save_cropped_accepts_bare_base64() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, _) = app
        .post_json("/save-cropped", json!({"image": to_base64(b"raw")}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(file_count(&app.path("cropped")), 1);
}

#[tokio::test]
async fn test_save_cropped_accepts_multi_megabyte_image() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));
    // 3 MiB of image bytes is about 4 MiB once base64 encoded
    let image = vec![0x5a_u8; 3 * 1024 * 1024];

    let (status, json) = app
        .post_json(
            "/save-cropped",
            json!({"image": format!("data:image/png;base64,{}", to_base64(&image))}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let filename = json["filename"].as_str().unwrap();
    assert_eq!(std::fs::metadata(filename).unwrap().len(), image.len() as u64);
}

#[tokio::test]
async fn test_save_cropped_over_body_limit() {
    let app =
        TestApp::with_body_limit("http://127.0.0.1:9", StubVisionModel::replying("{}"), 1024);

    let (status, json) = app
        .post_json("/save-cropped", json!({"image": to_base64(&[1_u8; 4096])}))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Request body too large"), "{error}");
    assert_ne!(error, "No image data provided");
    assert_eq!(file_count(&app.path("cropped")), 0);
}

#[tokio::test]
async fn test_save_cropped_missing_image() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app.post_json("/save-cropped", json!({"img": "x"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"success": false, "error": "No image data provided"}));
}

#[tokio::test]
async fn test_save_cropped_without_json_body() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/save-cropped")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No image data provided");
}

#[tokio::test]
async fn test_save_cropped_invalid_base64() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app
        .post_json("/save-cropped", json!({"image": "data:image/png;base64,@@@"}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error decoding image data")
    );
    assert_eq!(file_count(&app.path("cropped")), 0);
}

// ============================================================================
// POST /extract-table
// ============================================================================

#[tokio::test]
async fn test_extract_table_returns_normalized_table() {
    let app = TestApp::offline(StubVisionModel::replying(
        r#"{"columns": ["a", "b"], "rows": [{"a": 1}]}"#,
    ));

    let (status, json) = app
        .post_json("/extract-table", json!({"image": png_data_uri(&sample_png(4, 4))}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "table_data": {"columns": ["a", "b"], "rows": [{"a": 1, "b": null}]}
        })
    );
    assert_eq!(app.model.calls(), 1);
    assert_eq!(file_count(&app.path("temp")), 0);
}

#[tokio::test]
async fn test_extract_table_cleans_up_on_failure() {
    let app = TestApp::offline(StubVisionModel::replying("not json"));

    let (status, json) = app
        .post_json("/extract-table", json!({"image": png_data_uri(&sample_png(4, 4))}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Error parsing JSON response from OpenAI")
    );
    assert_eq!(file_count(&app.path("temp")), 0);
}

#[tokio::test]
async fn test_extract_table_without_api_key() {
    let app = TestApp::offline(StubVisionModel::replying("{}").without_credentials());

    let (status, json) = app
        .post_json("/extract-table", json!({"image": png_data_uri(&sample_png(4, 4))}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json["error"],
        "OpenAI API key is not configured. Please set OPENAI_API_KEY in config."
    );
    assert_eq!(app.model.calls(), 0);
    assert_eq!(file_count(&app.path("temp")), 0);
}

#[tokio::test]
async fn test_extract_table_missing_image() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app.post_json("/extract-table", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No image data provided");
    assert_eq!(app.model.calls(), 0);
}

// ============================================================================
// POST /download-csv
// ============================================================================

#[tokio::test]
async fn test_download_csv() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app
        .post_json(
            "/download-csv",
            json!({"table_data": {"columns": ["a", "b"], "rows": [{"a": 1, "b": "x"}, {"a": 2}]}}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "a,b\r\n1,x\r\n2,\r\n");

    let filename = json["filename"].as_str().unwrap();
    assert!(filename.starts_with("table_data_"));
    assert!(filename.ends_with(".csv"));
    // table_data_YYYYmmdd_HHMMSS.csv
    assert_eq!(filename.len(), "table_data_".len() + 15 + ".csv".len());
}

#[tokio::test]
async fn test_download_csv_malformed_table_is_empty() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app
        .post_json("/download-csv", json!({"table_data": {}}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], "");
}

#[tokio::test]
async fn test_download_csv_null_table_is_empty() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app
        .post_json("/download-csv", json!({"table_data": null}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "");
    assert!(json["filename"].as_str().unwrap().starts_with("table_data_"));
}

#[tokio::test]
async fn test_download_csv_missing_table() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let (status, json) = app.post_json("/download-csv", json!({"rows": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"success": false, "error": "No table data provided"}));
}

// ============================================================================
// Front end
// ============================================================================

#[tokio::test]
async fn test_index_page() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"<h1>Screenshot to Table</h1>");
}

#[tokio::test]
async fn test_static_passthrough() {
    let app = TestApp::offline(StubVisionModel::replying("{}"));

    assert_eq!(app.get("/static/main.js").await.status(), StatusCode::OK);
    assert_eq!(
        app.get("/static/missing.js").await.status(),
        StatusCode::NOT_FOUND
    );
}
