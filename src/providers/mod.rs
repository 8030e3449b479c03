//! Provider abstraction, concrete backend adapters, and the manager.
//!
//! [`CompletionBackend`] is the network seam: one thin reqwest adapter
//! per [`ProviderKind`], none of which retry internally (retry and
//! fallback are the manager's responsibility, to avoid double backoff).
//! [`Provider`] couples a backend with its configuration and quota
//! window; [`ProviderManager`] owns the active working set and the
//! select/call/retry loop.

mod factory;
mod gemini;
mod huggingface;
mod manager;
mod openai;
mod provider;
mod traits;

pub use factory::{ProviderKind, backend_for};
pub use gemini::GeminiBackend;
pub use huggingface::HuggingFaceBackend;
pub use manager::ProviderManager;
pub use openai::OpenAiBackend;
pub use provider::Provider;
pub use traits::CompletionBackend;

use crate::{GatewayError, Result};

/// Turn a non-success HTTP response into an [`GatewayError::Api`] error.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{ProviderConfig, RateLimit, UsageWindow};

    use super::ProviderKind;

    /// A generous default configuration for unit tests.
    pub(crate) fn sample_config(name: &str) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            kind: ProviderKind::OpenAi,
            api_key: "test-key".to_string(),
            endpoint: None,
            model: "test-model".to_string(),
            rate_limit: RateLimit {
                requests_per_minute: 60,
                tokens_per_day: 100_000,
            },
            enabled: true,
            priority: 1,
            usage: UsageWindow::default(),
        }
    }
}
