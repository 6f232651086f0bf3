//! In-process chat completions endpoint
//!
//! Answers `POST /v1/chat/completions` with a canned message and records
//! the authorization header and JSON body of each request.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

/// How the endpoint answers
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// A single choice whose message content is this value (`None` = null)
    Content(Option<String>),
    /// An error status with a plain-text body
    Error(u16, String),
}

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body:          Value,
}

#[derive(Debug)]
struct ChatState {
    reply:    ChatReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running mock chat completions server; stops when dropped
#[derive(Debug)]
pub struct MockChatServer {
    addr:  SocketAddr,
    state: Arc<ChatState>,
    task:  JoinHandle<()>,
}

impl MockChatServer {
    pub async fn start(reply: ChatReply) -> Self {
        let state = Arc::new(ChatState {
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock chat server");
        let addr = listener.local_addr().expect("mock chat server has no address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Starts a server replying with `content`
    pub async fn replying(content: impl Into<String>) -> Self {
        Self::start(ChatReply::Content(Some(content.into()))).await
    }

    /// Base URL to put in `VisionConfig::base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("chat lock poisoned").clone()
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn completions(
    State(state): State<Arc<ChatState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .expect("chat lock poisoned")
        .push(RecordedRequest {
            authorization,
            body,
        });

    match &state.reply {
        ChatReply::Content(content) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        ChatReply::Error(code, message) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, message.clone()).into_response()
        }
    }
}
