//! In-process screenshot sender
//!
//! Serves `/capture` and `/status` the way the real sender does, with a
//! configurable capture reply and a capture counter.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use snaptable_core::SenderStatus;
use tokio::{net::TcpListener, task::JoinHandle};

/// How `/capture` answers
#[derive(Debug, Clone)]
pub enum CaptureReply {
    /// 200 with these PNG bytes
    Png(Vec<u8>),
    /// The given status with an `{"error": ...}` body
    Status(u16),
}

#[derive(Debug)]
struct SenderState {
    reply:    Mutex<CaptureReply>,
    captures: AtomicUsize,
}

/// A running mock sender; stops when dropped
#[derive(Debug)]
pub struct MockSender {
    addr:  SocketAddr,
    state: Arc<SenderState>,
    task:  JoinHandle<()>,
}

impl MockSender {
    /// Starts a sender on an ephemeral localhost port
    pub async fn start(reply: CaptureReply) -> Self {
        let state = Arc::new(SenderState {
            reply:    Mutex::new(reply),
            captures: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/capture", get(capture))
            .route("/status", get(status))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock sender");
        let addr = listener.local_addr().expect("mock sender has no address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Starts a sender that answers every capture with `png`
    pub async fn serving_png(png: Vec<u8>) -> Self {
        Self::start(CaptureReply::Png(png)).await
    }

    /// Starts a sender whose captures fail with `status`
    pub async fn failing_with(status: u16) -> Self {
        Self::start(CaptureReply::Status(status)).await
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of `/capture` requests served
    pub fn captures(&self) -> usize {
        self.state.captures.load(Ordering::SeqCst)
    }

    /// Changes the capture reply for subsequent requests
    pub fn set_reply(&self, reply: CaptureReply) {
        *self.state.reply.lock().expect("sender lock poisoned") = reply;
    }
}

impl Drop for MockSender {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn capture(State(state): State<Arc<SenderState>>) -> Response {
    state.captures.fetch_add(1, Ordering::SeqCst);
    let reply = state.reply.lock().expect("sender lock poisoned").clone();

    match reply {
        CaptureReply::Png(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        CaptureReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"error": "mock capture failure"}))).into_response()
        }
    }
}

async fn status(State(state): State<Arc<SenderState>>) -> Json<SenderStatus> {
    Json(SenderStatus::running(
        "127.0.0.1".to_string(),
        5000,
        state.captures.load(Ordering::SeqCst),
    ))
}

/// A bound listener that never accepts
///
/// Connections complete the TCP handshake but never get a response, so
/// requests against the returned URL run into their timeout. Keep the
/// listener alive for the duration of the test.
pub async fn unresponsive_endpoint() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind silent listener");
    let url = format!(
        "http://{}",
        listener.local_addr().expect("silent listener has no address")
    );
    (listener, url)
}
