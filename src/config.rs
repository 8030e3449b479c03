//! Provider configuration and the configuration store contract.
//!
//! One [`ProviderConfig`] exists per third-party backend, seeded by an
//! administrative step and read by the manager at initialisation. The
//! embedded [`UsageWindow`] carries the rolling quota counters and is
//! written back through [`ProviderConfigStore::save_usage`] after every
//! accounting step (best-effort — see the usage module).

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::providers::ProviderKind;
use crate::{GatewayError, Result};

/// Per-provider rate and quota limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimit {
    pub requests_per_minute: u32,
    pub tokens_per_day: u64,
}

/// Rolling quota counters embedded in a provider configuration.
///
/// The per-minute and per-day counters reset independently: the minute
/// counter zeroes once ≥60 s have passed since `last_reset`, the token
/// counter zeroes when the calendar day of `last_reset` differs from
/// the current one. Either reset advances `last_reset`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UsageWindow {
    pub requests_this_minute: u32,
    pub tokens_today: u64,
    pub last_reset: DateTime<Utc>,
}

impl Default for UsageWindow {
    fn default() -> Self {
        Self {
            requests_this_minute: 0,
            tokens_today: 0,
            last_reset: Utc::now(),
        }
    }
}

impl UsageWindow {
    /// Apply any due window resets against `now`.
    ///
    /// Returns `true` if either counter was reset (the caller should
    /// then persist the window).
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if now - self.last_reset >= TimeDelta::seconds(60) {
            self.requests_this_minute = 0;
            changed = true;
        }
        if now.date_naive() != self.last_reset.date_naive() {
            self.tokens_today = 0;
            changed = true;
        }
        if changed {
            self.last_reset = now;
        }
        changed
    }
}

/// Configuration for one completion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique identifier, also used as the metric label and audit reference.
    pub name: String,
    /// Which concrete adapter serves this configuration.
    pub kind: ProviderKind,
    pub api_key: String,
    /// Base URL override; `None` uses the adapter's default endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Model identifier passed through to the backend.
    pub model: String,
    pub rate_limit: RateLimit,
    pub enabled: bool,
    /// Lower = tried first. Ties keep configuration insertion order.
    pub priority: u32,
    #[serde(default)]
    pub usage: UsageWindow,
}

/// Read/write contract for the provider configuration store.
///
/// The concrete storage engine is an external collaborator; the gateway
/// only needs enabled configurations at initialisation and a place to
/// persist usage windows afterwards.
#[async_trait]
pub trait ProviderConfigStore: Send + Sync {
    /// Load all enabled provider configurations, in insertion order.
    async fn load_enabled(&self) -> Result<Vec<ProviderConfig>>;

    /// Persist the usage window of the named provider.
    async fn save_usage(&self, name: &str, window: &UsageWindow) -> Result<()>;
}

/// In-memory configuration store, for embedding and tests.
pub struct MemoryConfigStore {
    configs: RwLock<Vec<ProviderConfig>>,
}

impl MemoryConfigStore {
    pub fn new(configs: Vec<ProviderConfig>) -> Self {
        Self {
            configs: RwLock::new(configs),
        }
    }

    /// Current usage window of the named provider, if present.
    pub async fn usage_of(&self, name: &str) -> Option<UsageWindow> {
        self.configs
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.usage)
    }
}

#[async_trait]
impl ProviderConfigStore for MemoryConfigStore {
    async fn load_enabled(&self) -> Result<Vec<ProviderConfig>> {
        Ok(self
            .configs
            .read()
            .await
            .iter()
            .filter(|c| c.enabled)
            .cloned()
            .collect())
    }

    async fn save_usage(&self, name: &str, window: &UsageWindow) -> Result<()> {
        let mut configs = self.configs.write().await;
        let config = configs
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| GatewayError::Configuration(format!("unknown provider '{name}'")))?;
        config.usage = *window;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(last_reset: DateTime<Utc>) -> UsageWindow {
        UsageWindow {
            requests_this_minute: 5,
            tokens_today: 400,
            last_reset,
        }
    }

    #[test]
    fn refresh_is_noop_within_the_minute() {
        let now = Utc::now();
        let mut w = window(now - TimeDelta::seconds(30));
        assert!(!w.refresh(now));
        assert_eq!(w.requests_this_minute, 5);
        assert_eq!(w.tokens_today, 400);
    }

    #[test]
    fn refresh_resets_minute_counter_after_sixty_seconds() {
        let now = Utc::now();
        let mut w = window(now - TimeDelta::seconds(61));
        assert!(w.refresh(now));
        assert_eq!(w.requests_this_minute, 0);
        assert_eq!(w.last_reset, now);
    }

    #[test]
    fn refresh_resets_tokens_on_day_boundary_only() {
        // 30 seconds across midnight: the day changed but the minute did not.
        let last = "2026-03-01T23:59:45Z".parse::<DateTime<Utc>>().unwrap();
        let now = "2026-03-02T00:00:15Z".parse::<DateTime<Utc>>().unwrap();
        let mut w = window(last);
        assert!(w.refresh(now));
        assert_eq!(w.tokens_today, 0);
        assert_eq!(w.requests_this_minute, 5);
        assert_eq!(w.last_reset, now);
    }

    #[test]
    fn refresh_resets_both_counters_after_a_long_gap() {
        let now = Utc::now();
        let mut w = window(now - TimeDelta::days(2));
        assert!(w.refresh(now));
        assert_eq!(w.requests_this_minute, 0);
        assert_eq!(w.tokens_today, 0);
    }

    #[tokio::test]
    async fn memory_store_filters_disabled_configs() {
        let mut enabled = crate::providers::test_support::sample_config("a");
        enabled.enabled = true;
        let mut disabled = crate::providers::test_support::sample_config("b");
        disabled.enabled = false;

        let store = MemoryConfigStore::new(vec![enabled, disabled]);
        let loaded = store.load_enabled().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "a");
    }

    #[tokio::test]
    async fn memory_store_persists_usage() {
        let store =
            MemoryConfigStore::new(vec![crate::providers::test_support::sample_config("a")]);
        let window = UsageWindow {
            requests_this_minute: 3,
            tokens_today: 120,
            last_reset: Utc::now(),
        };
        store.save_usage("a", &window).await.unwrap();
        let saved = store.usage_of("a").await.unwrap();
        assert_eq!(saved.requests_this_minute, 3);
        assert_eq!(saved.tokens_today, 120);
    }

    #[tokio::test]
    async fn memory_store_rejects_unknown_provider() {
        let store = MemoryConfigStore::new(vec![]);
        let err = store
            .save_usage("ghost", &UsageWindow::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }
}
