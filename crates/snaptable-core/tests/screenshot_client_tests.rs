//! Integration tests for the sender client
//!
//! Each test starts an in-process [`MockSender`] on an ephemeral port.

use std::time::Duration;

use snaptable_core::{ServiceError, screenshot::ScreenshotClient};
use snaptable_test_utils::{
    fixtures::sample_png,
    mock_sender::{CaptureReply, MockSender, unresponsive_endpoint},
    timing::{assert_duration_below, measure_async},
};

fn archived_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_capture_returns_and_archives_png() {
    let png = sample_png(16, 9);
    let sender = MockSender::serving_png(png.clone()).await;
    let archive = tempfile::tempdir().unwrap();
    let client =
        ScreenshotClient::new(sender.base_url(), archive.path(), Duration::from_secs(5)).unwrap();

    let bytes = client.capture().await.unwrap();

    assert_eq!(bytes.as_ref(), png.as_slice());
    assert_eq!(sender.captures(), 1);

    let files = archived_files(archive.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("screenshot_"), "unexpected name {}", name);
    assert!(name.ends_with(".png"));
    assert_eq!(std::fs::read(&files[0]).unwrap(), png);
}

#[tokio::test]
async fn test_repeated_captures_get_distinct_files() {
    let sender = MockSender::serving_png(sample_png(2, 2)).await;
    let archive = tempfile::tempdir().unwrap();
    let client =
        ScreenshotClient::new(sender.base_url(), archive.path(), Duration::from_secs(5)).unwrap();

    client.capture().await.unwrap();
    client.capture().await.unwrap();

    assert_eq!(archived_files(archive.path()).len(), 2);
}

#[tokio::test]
async fn test_capture_non_200_status() {
    let sender = MockSender::failing_with(500).await;
    let archive = tempfile::tempdir().unwrap();
    let client =
        ScreenshotClient::new(sender.base_url(), archive.path(), Duration::from_secs(5)).unwrap();

    let err = client.capture().await.unwrap_err();

    assert!(matches!(err, ServiceError::SenderStatus { status: 500 }));
    assert_eq!(err.to_string(), "Failed to capture screenshot. Status code: 500");
    assert!(archived_files(archive.path()).is_empty());
}

#[tokio::test]
async fn test_capture_recovers_after_sender_fixes_itself() {
    let sender = MockSender::failing_with(503).await;
    let archive = tempfile::tempdir().unwrap();
    let client =
        ScreenshotClient::new(sender.base_url(), archive.path(), Duration::from_secs(5)).unwrap();

    assert!(client.capture().await.is_err());
    sender.set_reply(CaptureReply::Png(sample_png(3, 3)));
    assert!(client.capture().await.is_ok());
    assert_eq!(sender.captures(), 2);
}

#[tokio::test]
async fn test_capture_unresponsive_sender_times_out() {
    let (_listener, url) = unresponsive_endpoint().await;
    let archive = tempfile::tempdir().unwrap();
    let client = ScreenshotClient::new(url, archive.path(), Duration::from_millis(300)).unwrap();

    let (result, elapsed) = measure_async("unresponsive capture", client.capture()).await;

    match result {
        Err(ServiceError::SenderUnreachable { reason, .. }) => {
            assert!(reason.contains("timed out"), "reason was {}", reason);
        }
        other => panic!("expected SenderUnreachable, got {:?}", other),
    }
    assert_duration_below(elapsed, Duration::from_secs(5), "unresponsive capture");
}

#[tokio::test]
async fn test_status_reports_sender_state() {
    let sender = MockSender::serving_png(sample_png(2, 2)).await;
    let archive = tempfile::tempdir().unwrap();
    let client =
        ScreenshotClient::new(sender.base_url(), archive.path(), Duration::from_secs(5)).unwrap();

    client.capture().await.unwrap();
    let status = client.status().await.unwrap();

    assert_eq!(status.status, "running");
    assert_eq!(status.screenshots_captured, 1);
}
