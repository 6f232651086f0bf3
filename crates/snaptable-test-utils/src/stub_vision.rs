//! Canned [`VisionModel`] for extraction tests

use std::sync::Mutex;

use async_trait::async_trait;
use snaptable_core::{
    ServiceError, ServiceResult,
    extract::{VisionModel, VisionRequest},
};

/// What the stub answers with
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Message content, returned verbatim
    Content(String),
    /// A reply with no content
    Empty,
    /// A failed model call
    Failure(String),
}

/// A vision model that replays one answer and records every request
#[derive(Debug)]
pub struct StubVisionModel {
    reply:       StubReply,
    credentials: bool,
    requests:    Mutex<Vec<VisionRequest>>,
}

impl StubVisionModel {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            credentials: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `content`
    pub fn replying(content: impl Into<String>) -> Self {
        Self::new(StubReply::Content(content.into()))
    }

    /// Answers every request without content
    pub fn empty() -> Self {
        Self::new(StubReply::Empty)
    }

    /// Fails every request with a model error
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(StubReply::Failure(reason.into()))
    }

    /// Reports no credential configured
    pub fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    /// Number of requests received
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("stub lock poisoned").len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<VisionRequest> {
        self.requests
            .lock()
            .expect("stub lock poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl VisionModel for StubVisionModel {
    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn complete_json(&self, request: &VisionRequest) -> ServiceResult<Option<String>> {
        self.requests
            .lock()
            .expect("stub lock poisoned")
            .push(request.clone());

        match &self.reply {
            StubReply::Content(content) => Ok(Some(content.clone())),
            StubReply::Empty => Ok(None),
            StubReply::Failure(reason) => Err(ServiceError::ModelRequest {
                reason: reason.clone(),
            }),
        }
    }
}
