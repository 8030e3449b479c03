//! OpenAI chat-completions adapter.
//!
//! Uses the `/v1/chat/completions` endpoint. A `system_prompt` becomes a
//! separate system message ahead of the user message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use super::traits::CompletionBackend;
use crate::types::CompletionOptions;
use crate::{GatewayError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiBackend {
    api_key: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiBackend {
    /// Create an adapter; `base_url: None` uses the public API endpoint.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        http: Client,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &options.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let response = check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
