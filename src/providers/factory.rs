//! Static provider factory.
//!
//! The set of backend kinds is closed: a configuration names one of the
//! known kinds and the factory constructs the matching adapter. Unknown
//! names are rejected when the kind string is parsed, not at call time.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gemini::GeminiBackend;
use super::huggingface::HuggingFaceBackend;
use super::openai::OpenAiBackend;
use super::traits::CompletionBackend;
use crate::GatewayError;
use crate::config::ProviderConfig;

/// The closed set of supported backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    HuggingFace,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::HuggingFace => "huggingface",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "huggingface" => Ok(ProviderKind::HuggingFace),
            other => Err(GatewayError::UnknownProvider(other.to_string())),
        }
    }
}

/// Construct the backend adapter for one provider configuration.
///
/// `http` is shared across adapters; `timeout` applies per call.
pub fn backend_for(
    config: &ProviderConfig,
    http: reqwest::Client,
    timeout: Duration,
) -> Arc<dyn CompletionBackend> {
    match config.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiBackend::new(
            &config.api_key,
            config.endpoint.as_deref(),
            http,
            timeout,
        )),
        ProviderKind::Gemini => Arc::new(GeminiBackend::new(
            &config.api_key,
            config.endpoint.as_deref(),
            http,
            timeout,
        )),
        ProviderKind::HuggingFace => Arc::new(HuggingFaceBackend::new(
            &config.api_key,
            config.endpoint.as_deref(),
            http,
            timeout,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_known_names() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(
            "huggingface".parse::<ProviderKind>().unwrap(),
            ProviderKind::HuggingFace
        );
    }

    #[test]
    fn kind_rejects_unknown_names() {
        let err = "mystery".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, GatewayError::UnknownProvider(name) if name == "mystery"));
    }

    #[test]
    fn serde_form_matches_as_str() {
        let json = serde_json::to_string(&ProviderKind::HuggingFace).unwrap();
        assert_eq!(json, "\"huggingface\"");
        let parsed: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(parsed, ProviderKind::OpenAi);
    }

    #[test]
    fn factory_builds_the_matching_adapter() {
        let config = crate::providers::test_support::sample_config("a");
        let backend = backend_for(&config, reqwest::Client::new(), Duration::from_secs(5));
        assert_eq!(backend.name(), "openai");
    }
}
