//! Quota-window accounting.
//!
//! The tracker answers the quota questions behind provider availability
//! and writes usage windows back to the configuration store. Persistence
//! is best-effort: a completion that already succeeded is never failed
//! by a usage write, the error is logged and swallowed.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::config::{ProviderConfigStore, RateLimit, UsageWindow};
use crate::providers::Provider;

/// Estimate the token cost of a completion.
///
/// `ceil(chars(prompt + response) / 4)` — a deliberate rough
/// approximation. Quota thresholds are tuned against this estimate, so
/// it must not be replaced by a real tokenizer.
pub fn estimate_tokens(prompt: &str, response: &str) -> u64 {
    ((prompt.chars().count() + response.chars().count()) as u64).div_ceil(4)
}

/// Remaining quota for a provider: whichever window is closest to empty.
///
/// Negative when a counter has overshot its limit.
pub fn remaining_quota(limit: &RateLimit, window: &UsageWindow) -> i64 {
    let requests_left =
        i64::from(limit.requests_per_minute) - i64::from(window.requests_this_minute);
    let tokens_left = limit.tokens_per_day as i64 - window.tokens_today as i64;
    requests_left.min(tokens_left)
}

/// Maintains per-provider usage windows against the configuration store.
#[derive(Clone)]
pub struct UsageTracker {
    store: Arc<dyn ProviderConfigStore>,
}

impl UsageTracker {
    pub fn new(store: Arc<dyn ProviderConfigStore>) -> Self {
        Self { store }
    }

    /// Apply any due window resets for a provider, persisting on change.
    pub async fn refresh(&self, provider: &Provider) {
        let now = Utc::now();
        let changed = provider.with_usage(|w| w.refresh(now)).await;
        if changed {
            self.persist(provider).await;
        }
    }

    /// Account a successful completion: one request, estimated tokens.
    ///
    /// Returns the token estimate that was charged.
    pub async fn record(&self, provider: &Provider, prompt: &str, response: &str) -> u64 {
        let tokens = estimate_tokens(prompt, response);
        provider
            .with_usage(|w| {
                w.requests_this_minute += 1;
                w.tokens_today += tokens;
            })
            .await;
        self.persist(provider).await;
        tokens
    }

    async fn persist(&self, provider: &Provider) {
        let window = provider.usage_snapshot().await;
        if let Err(e) = self.store.save_usage(provider.name(), &window).await {
            warn!(
                provider = provider.name(),
                error = %e,
                "failed to persist usage window"
            );
        }
    }
}
