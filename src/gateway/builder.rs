//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::CompletionService;
use crate::cache::{CacheConfig, CacheStore, MemoryCacheStore};
use crate::config::ProviderConfigStore;
use crate::history::{InteractionStore, MemoryInteractionStore};
use crate::providers::ProviderManager;
use crate::{GatewayError, Result};

/// Default per-call timeout applied to provider backends (seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main entry point for creating gateway instances.
pub struct Traingate;

impl Traingate {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> TraingateBuilder {
        TraingateBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// A provider configuration store is required; the cache and interaction
/// stores default to the in-memory implementations.
pub struct TraingateBuilder {
    config_store: Option<Arc<dyn ProviderConfigStore>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    interaction_store: Option<Arc<dyn InteractionStore>>,
    http_client: Option<reqwest::Client>,
    timeout_secs: u64,
}

impl TraingateBuilder {
    pub fn new() -> Self {
        Self {
            config_store: None,
            cache_store: None,
            interaction_store: None,
            http_client: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the provider configuration store (required).
    pub fn config_store(mut self, store: Arc<dyn ProviderConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Set the response cache store (default: in-memory).
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Set the interaction log store (default: in-memory).
    pub fn interaction_store(mut self, store: Arc<dyn InteractionStore>) -> Self {
        self.interaction_store = Some(store);
        self
    }

    /// Share an existing HTTP client across provider backends.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the per-call timeout for provider backends (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build the gateway.
    ///
    /// Loads enabled provider configurations, instantiates their
    /// backends, and wires the completion service. Fails with
    /// [`GatewayError::ProviderUnavailable`] if no enabled provider
    /// exists — an empty gateway could never serve a request.
    pub async fn build(self) -> Result<CompletionService> {
        let store = self.config_store.ok_or_else(|| {
            GatewayError::Configuration("a provider configuration store is required".into())
        })?;
        let http = self.http_client.unwrap_or_default();
        let timeout = Duration::from_secs(self.timeout_secs);

        let manager = ProviderManager::initialize(store, http, timeout).await?;
        if manager.active_count().await == 0 {
            return Err(GatewayError::ProviderUnavailable);
        }

        let cache = self
            .cache_store
            .unwrap_or_else(|| Arc::new(MemoryCacheStore::new(CacheConfig::default())));
        let history = self
            .interaction_store
            .unwrap_or_else(|| Arc::new(MemoryInteractionStore::new()));

        Ok(CompletionService::new(Arc::new(manager), cache, history))
    }
}

impl Default for TraingateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
