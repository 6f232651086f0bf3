//! Vision model client abstraction
//!
//! [`VisionModel`] is the seam between the extraction service and whatever
//! answers image prompts. [`OpenAiVisionClient`] implements it against any
//! OpenAI-compatible `/chat/completions` endpoint. Clients are constructed
//! explicitly and handed to
//! [`TableExtractor`](crate::extract::TableExtractor); nothing is global.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::VisionConfig,
    error::{ServiceError, ServiceResult},
};

/// A single image prompt: system instruction, user text and inline image
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    /// System instruction
    pub system:       String,
    /// User text sent alongside the image
    pub instruction:  String,
    /// Base64-encoded image bytes (no data-URI header)
    pub image_base64: String,
    /// MIME type of the encoded image
    pub mime_type:    String,
}

impl VisionRequest {
    /// Image as a `data:` URI
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_base64)
    }
}

/// Something that can answer an image prompt with JSON text
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Whether a credential is configured
    ///
    /// Extraction refuses to run when this is false.
    fn has_credentials(&self) -> bool;

    /// Sends the prompt asking for a JSON-object reply
    ///
    /// Returns the raw message content, or `None` when the model answered
    /// without any.
    async fn complete_json(&self, request: &VisionRequest) -> ServiceResult<Option<String>>;
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model:           &'a str,
    messages:        Vec<ChatMessage<'a>>,
    max_tokens:      u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role:    &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat completions response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Vision client for OpenAI-compatible chat completion APIs
#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    config: VisionConfig,
    client: Client,
}

impl OpenAiVisionClient {
    /// Creates a client from configuration
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(config: VisionConfig) -> ServiceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ServiceError::InvalidConfig {
            key:    "OPENAI_BASE_URL".to_string(),
            reason: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self { config, client })
    }

    /// Returns the config
    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    fn chat_request<'a>(&'a self, request: &'a VisionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model:           &self.config.model,
            messages:        vec![
                ChatMessage {
                    role:    "system",
                    content: MessageContent::Text(&request.system),
                },
                ChatMessage {
                    role:    "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: &request.instruction,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: request.data_uri(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens:      self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete_json(&self, request: &VisionRequest) -> ServiceResult<Option<String>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.config.base_url);

        debug!("POST {} (model {})", url, self.config.model);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.chat_request(request))
            .send()
            .await
            .map_err(|e| ServiceError::ModelRequest {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ModelRequest {
                reason: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ModelRequest {
                reason: format!("unreadable response body: {}", e),
            })?;

        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
