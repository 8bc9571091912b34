//! Chat completion client for OpenAI-compatible APIs

use crate::config::LlmConfig;
use crate::error::{Error, ModelError, Result};
use crate::extraction::truncate_chars;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// One non-streaming completion: system instruction plus user payload
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the first choice's message content (empty if none)
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// reqwest client for `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Build from config; fails when no usable credential is configured
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .credential()
            .ok_or_else(|| Error::internal("no model credential configured"))?
            .to_string();

        let client = Client::builder()
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        info!(
            "Model client configured: base_url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    /// Get the model name
    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout("model call", self.timeout_ms())
                } else {
                    ModelError::Transport(e.to_string()).into()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: truncate_chars(&body, 500),
            }
            .into());
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        if let Some(usage) = &chat.usage {
            debug!("Completion used {} tokens", usage.total_tokens);
        }

        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, system, user), fields(model = %self.model, user_len = user.len()))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
        };

        // Dropping the in-flight future on timeout aborts the request.
        let content = tokio::time::timeout(self.timeout, self.send(&request))
            .await
            .map_err(|_| Error::timeout("model call", self.timeout_ms()))??;

        info!("Completion received: {} chars", content.len());
        Ok(content)
    }
}
