//! A configured provider: backend + quota window.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::traits::CompletionBackend;
use crate::config::{ProviderConfig, RateLimit, UsageWindow};
use crate::types::CompletionOptions;
use crate::usage::remaining_quota;
use crate::{GatewayError, Result};

/// One enabled provider in the manager's working set.
///
/// Couples a [`CompletionBackend`] with its configuration and its
/// in-memory [`UsageWindow`]. The window sits behind a lock so that
/// concurrent completion calls account quota atomically.
pub struct Provider {
    name: String,
    model: String,
    priority: u32,
    limit: RateLimit,
    usage: Mutex<UsageWindow>,
    backend: Arc<dyn CompletionBackend>,
}

impl Provider {
    pub fn new(config: ProviderConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            name: config.name,
            model: config.model,
            priority: config.priority,
            limit: config.rate_limit,
            usage: Mutex::new(config.usage),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Remaining quota: whichever of the minute/day windows is tighter.
    pub async fn remaining_quota(&self) -> i64 {
        let window = self.usage.lock().await;
        remaining_quota(&self.limit, &window)
    }

    /// A provider with zero or negative remaining quota is unavailable
    /// regardless of network reachability.
    pub async fn is_available(&self) -> bool {
        self.remaining_quota().await > 0
    }

    /// Call the backend once. Never retries.
    ///
    /// Any backend failure is surfaced as
    /// [`GatewayError::ProviderExecution`] carrying this provider's
    /// configured name and the original message.
    pub async fn generate(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        self.backend
            .complete(&self.model, prompt, options)
            .await
            .map_err(|e| GatewayError::ProviderExecution {
                provider: self.name.clone(),
                message: e.to_string(),
            })
    }

    /// Copy of the current usage window.
    pub async fn usage_snapshot(&self) -> UsageWindow {
        *self.usage.lock().await
    }

    /// Run `f` with the usage window locked.
    pub(crate) async fn with_usage<R>(&self, f: impl FnOnce(&mut UsageWindow) -> R) -> R {
        let mut window = self.usage.lock().await;
        f(&mut window)
    }
}
