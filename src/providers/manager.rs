//! Provider manager: selection, fallback, and backoff.
//!
//! The manager holds the active working set of providers, ordered by
//! ascending priority (ties keep configuration insertion order). Each
//! completion call walks a select/call/retry sequence:
//!
//! ```text
//! SELECTING ──► CALLING ──► SUCCEEDED
//!     ▲            │
//!     │            ▼ (provider removed from working set)
//!     └──────── RETRYING ──► EXHAUSTED
//! ```
//!
//! - Selection refreshes every provider's quota window, then returns the
//!   first available provider by priority. None available raises
//!   [`GatewayError::ProviderUnavailable`] without entering the retry loop.
//! - A failed provider is removed from the working set for the remainder
//!   of the process lifetime; only a fresh [`ProviderManager::initialize`]
//!   repopulates it.
//! - Retries are bounded by the number of providers available at call
//!   start, so the loop terminates exactly when every known provider has
//!   been tried once. Attempts are separated by an exponential backoff
//!   capped at [`MAX_BACKOFF`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::factory::backend_for;
use super::provider::Provider;
use crate::config::ProviderConfigStore;
use crate::telemetry;
use crate::types::{CompletionOptions, ProviderHealth};
use crate::usage::UsageTracker;
use crate::{GatewayError, Result};

/// Base backoff delay before the first fallback attempt.
pub const BASE_BACKOFF: Duration = Duration::from_millis(1000);

/// Ceiling for the exponential backoff between fallback attempts.
pub const MAX_BACKOFF: Duration = Duration::from_millis(5000);

/// Backoff before re-selection: `min(1000 * 2^attempt, 5000)` ms,
/// attempt counted from 0.
pub fn backoff_delay(attempt: usize) -> Duration {
    let factor = 1u32 << attempt.min(16) as u32;
    BASE_BACKOFF.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Owns the active provider working set and executes completions with
/// automatic fallback.
pub struct ProviderManager {
    active: RwLock<Vec<Arc<Provider>>>,
    tracker: UsageTracker,
    last_provider: RwLock<Option<String>>,
}

impl ProviderManager {
    /// Build a manager over an already-constructed provider set.
    ///
    /// Providers are sorted by ascending priority; the sort is stable,
    /// so equal priorities keep their insertion order.
    pub fn new(mut providers: Vec<Arc<Provider>>, tracker: UsageTracker) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self {
            active: RwLock::new(providers),
            tracker,
            last_provider: RwLock::new(None),
        }
    }

    /// Load enabled configurations from the store and instantiate their
    /// backends through the static factory.
    pub async fn initialize(
        store: Arc<dyn ProviderConfigStore>,
        http: reqwest::Client,
        timeout: Duration,
    ) -> Result<Self> {
        let configs = store.load_enabled().await?;
        let providers = configs
            .into_iter()
            .map(|config| {
                let backend = backend_for(&config, http.clone(), timeout);
                Arc::new(Provider::new(config, backend))
            })
            .collect();
        Ok(Self::new(providers, UsageTracker::new(store)))
    }

    /// Number of providers currently in the working set.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }

    /// Name of the provider that served the most recent success.
    pub async fn last_successful_provider(&self) -> Option<String> {
        self.last_provider.read().await.clone()
    }

    /// Availability and remaining quota per provider, after a window
    /// refresh pass.
    pub async fn provider_health(&self) -> Vec<ProviderHealth> {
        let active = self.active.read().await;
        let mut health = Vec::with_capacity(active.len());
        for provider in active.iter() {
            self.tracker.refresh(provider).await;
            health.push(ProviderHealth {
                name: provider.name().to_string(),
                available: provider.is_available().await,
                remaining: provider.remaining_quota().await,
            });
        }
        health
    }

    /// Execute a completion with automatic cross-provider fallback.
    #[instrument(skip(self, prompt, options))]
    pub async fn execute_with_fallback(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let start = Instant::now();
        let total = self.active.read().await.len();
        let mut attempts = 0usize;
        let mut last_err: Option<GatewayError> = None;

        loop {
            let provider = match self.select().await {
                Ok(provider) => provider,
                Err(e) => {
                    Self::record_request("none", start, false);
                    return Err(e);
                }
            };

            match provider.generate(prompt, options).await {
                Ok(text) => {
                    let name = provider.name();
                    let tokens = self.tracker.record(&provider, prompt, &text).await;
                    metrics::counter!(telemetry::TOKENS_TOTAL, "provider" => name.to_owned())
                        .increment(tokens);
                    *self.last_provider.write().await = Some(name.to_string());
                    Self::record_request(name, start, true);
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, removing from working set"
                    );
                    metrics::counter!(telemetry::FALLBACKS_TOTAL,
                        "provider" => provider.name().to_owned(),
                    )
                    .increment(1);
                    self.remove(provider.name()).await;
                    attempts += 1;
                    last_err = Some(e);

                    if attempts >= total {
                        Self::record_request("none", start, false);
                        let last_error = last_err
                            .map(|e| e.to_string())
                            .unwrap_or_default();
                        return Err(GatewayError::AllProvidersExhausted {
                            attempts,
                            last_error,
                        });
                    }
                    tokio::time::sleep(backoff_delay(attempts - 1)).await;
                }
            }
        }
    }

    /// One selection pass: refresh quota windows, then return the first
    /// available provider by priority.
    async fn select(&self) -> Result<Arc<Provider>> {
        let active = self.active.read().await;
        for provider in active.iter() {
            self.tracker.refresh(provider).await;
        }
        for provider in active.iter() {
            if provider.is_available().await {
                debug!(provider = provider.name(), "selected provider");
                return Ok(provider.clone());
            }
        }
        Err(GatewayError::ProviderUnavailable)
    }

    /// Remove a provider from the working set for the process lifetime.
    async fn remove(&self, name: &str) {
        self.active.write().await.retain(|p| p.name() != name);
    }

    fn record_request(provider: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
        )
        .record(start.elapsed().as_secs_f64());
    }
}
