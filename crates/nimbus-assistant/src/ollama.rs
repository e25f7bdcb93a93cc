//! Ollama chat backend

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::chat::{ChatCompletion, ChatMessage};
use crate::error::AssistantError;
use crate::Result;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl OllamaClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let endpoint = Url::parse(base_url)?.join("/api/chat")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ChatCompletion for OllamaClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        tracing::debug!(model = %model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssistantError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.message.content)
    }
}
