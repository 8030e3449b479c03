//! HuggingFace Inference API adapter.
//!
//! Uses the serverless text-generation endpoint. The API has no system
//! role, so a `system_prompt` is prepended to the prompt as a preamble.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use super::traits::CompletionBackend;
use crate::types::CompletionOptions;
use crate::{GatewayError, Result};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

pub struct HuggingFaceBackend {
    api_key: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HuggingFaceBackend {
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
impl CompletionBackend for HuggingFaceBackend {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let inputs = match &options.system_prompt {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };

        let request = GenerateRequest {
            inputs: &inputs,
            parameters: Parameters {
                max_new_tokens: options.max_tokens,
                temperature: options.temperature,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(format!("{}/models/{}", self.base_url, model))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let response = check_status(response).await?;

        // Response is [{"generated_text": "..."}]
        let body: Vec<Generated> = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        body.into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}
