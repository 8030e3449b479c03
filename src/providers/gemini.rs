//! Google Gemini adapter.
//!
//! Uses the `generateContent` endpoint. A `system_prompt` is sent as a
//! `systemInstruction` block, per Gemini's calling convention.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use super::traits::CompletionBackend;
use crate::types::CompletionOptions;
use crate::{GatewayError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiBackend {
    api_key: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiBackend {
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
impl CompletionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: options.system_prompt.as_deref().map(|text| Content {
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let response = check_status(response).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}
