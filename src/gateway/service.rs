//! Completion service façade.
//!
//! The top-level surface used by business-layer callers. Wraps the
//! provider manager with a cache-first lookup, writes one interaction
//! record for every call outcome, and serves the read-side operations
//! (history, usage statistics, cache management, provider health).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::cache::{self, CacheStats, CacheStore, DEFAULT_TTL};
use crate::history::{CACHED_PROVIDER, InteractionRecord, InteractionStore, NO_PROVIDER};
use crate::providers::ProviderManager;
use crate::telemetry;
use crate::types::{AnalysisType, CompletionOptions, ProviderHealth, UsageStats};
use crate::usage::estimate_tokens;
use crate::Result;

/// Top-level completion façade.
///
/// Explicitly constructed and dependency-injected; build one via
/// [`Traingate::builder()`](crate::Traingate::builder) at process start
/// and share it by reference.
pub struct CompletionService {
    manager: Arc<ProviderManager>,
    cache: Arc<dyn CacheStore>,
    history: Arc<dyn InteractionStore>,
}

impl std::fmt::Debug for CompletionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionService").finish_non_exhaustive()
    }
}

impl CompletionService {
    pub fn new(
        manager: Arc<ProviderManager>,
        cache: Arc<dyn CacheStore>,
        history: Arc<dyn InteractionStore>,
    ) -> Self {
        Self {
            manager,
            cache,
            history,
        }
    }

    /// Generate a completion for one user request.
    ///
    /// Cache-first: a hit is returned without invoking the manager and
    /// logged with `provider = "cached"`. On a miss the manager's
    /// fallback execution runs, the response is cached under the request
    /// fingerprint, and the interaction is logged. Terminal failures are
    /// logged (the record's response field holds the error message) and
    /// then re-raised — never silently swallowed.
    #[instrument(skip(self, prompt, options), fields(user = user_id, analysis = %analysis))]
    pub async fn generate_completion(
        &self,
        user_id: &str,
        analysis: AnalysisType,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let fingerprint = cache::fingerprint(prompt, options);
        let key = cache::cache_key(user_id, analysis, &fingerprint);

        if let Some(text) = self.cache.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "analysis" => analysis.as_str())
                .increment(1);
            self.log(user_id, analysis, prompt, &text, CACHED_PROVIDER, 0, true)
                .await;
            return Ok(text);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "analysis" => analysis.as_str())
            .increment(1);

        match self.manager.execute_with_fallback(prompt, options).await {
            Ok(text) => {
                let provider = self
                    .manager
                    .last_successful_provider()
                    .await
                    .unwrap_or_else(|| "unknown".to_string());
                let tokens = estimate_tokens(prompt, &text);
                self.cache.set(&key, text.clone(), DEFAULT_TTL).await;
                self.log(user_id, analysis, prompt, &text, &provider, tokens, false)
                    .await;
                Ok(text)
            }
            Err(e) => {
                self.log(user_id, analysis, prompt, &e.to_string(), NO_PROVIDER, 0, false)
                    .await;
                Err(e)
            }
        }
    }

    /// A user's interaction history, most recent first.
    pub async fn user_history(
        &self,
        user_id: &str,
        analysis: Option<AnalysisType>,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>> {
        self.history.by_user(user_id, analysis, limit).await
    }

    /// Aggregate usage statistics, optionally scoped to one user.
    pub async fn usage_stats(&self, user_id: Option<&str>) -> Result<UsageStats> {
        let records = self.history.records(user_id).await?;
        let mut stats = UsageStats {
            total_requests: records.len() as u64,
            ..UsageStats::default()
        };
        let mut by_type: HashMap<String, u64> = HashMap::new();
        let mut by_provider: HashMap<String, u64> = HashMap::new();
        for record in &records {
            if record.cached {
                stats.cache_hits += 1;
            }
            stats.total_tokens += record.tokens_used;
            *by_type
                .entry(record.analysis_type.as_str().to_string())
                .or_default() += 1;
            *by_provider.entry(record.provider.clone()).or_default() += 1;
        }
        if stats.total_requests > 0 {
            stats.cache_hit_rate = stats.cache_hits as f64 / stats.total_requests as f64;
        }
        stats.by_type = by_type;
        stats.by_provider = by_provider;
        Ok(stats)
    }

    /// Invalidate every cached completion owned by one user.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_user_cache(&self, user_id: &str) -> u64 {
        self.cache.delete_by_prefix(&cache::user_scope(user_id)).await
    }

    /// Per-provider availability, for the diagnostics surface.
    pub async fn provider_health(&self) -> Vec<ProviderHealth> {
        self.manager.provider_health().await
    }

    /// Cache store statistics, for the diagnostics surface.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Append an interaction record, best-effort.
    ///
    /// A log-store outage must not fail a completion that already
    /// succeeded, so append errors are warned and swallowed.
    async fn log(
        &self,
        user_id: &str,
        analysis: AnalysisType,
        prompt: &str,
        response: &str,
        provider: &str,
        tokens_used: u64,
        cached: bool,
    ) {
        let record = InteractionRecord::new(
            user_id, analysis, prompt, response, provider, tokens_used, cached,
        );
        if let Err(e) = self.history.append(record).await {
            warn!(user = user_id, error = %e, "failed to append interaction record");
        }
    }
}
