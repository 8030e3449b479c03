//! Read-side aggregation and diagnostics types.

use std::collections::HashMap;

use serde::Serialize;

/// Aggregated usage statistics computed from the interaction log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageStats {
    /// Total logged interactions (successes, cache hits, and failures).
    pub total_requests: u64,
    /// Interactions served from the response cache.
    pub cache_hits: u64,
    /// `cache_hits / total_requests`, or 0.0 with no requests.
    pub cache_hit_rate: f64,
    /// Sum of estimated tokens across all interactions.
    pub total_tokens: u64,
    /// Request counts grouped by analysis type.
    pub by_type: HashMap<String, u64>,
    /// Request counts grouped by provider name ("cached" and "none" included).
    pub by_provider: HashMap<String, u64>,
}

/// Point-in-time availability of one provider in the working set.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealth {
    pub name: String,
    pub available: bool,
    /// Remaining quota: `min(requests left this minute, tokens left today)`.
    pub remaining: i64,
}
