//! Telemetry metric name constants.
//!
//! Centralised metric names for traingate operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `traingate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name from configuration (e.g. "openai-primary")
//! - `analysis` — analysis type of the request (e.g. "chat", "workout_analysis")
//! - `status` — outcome: "ok" or "error"

/// Total completion requests dispatched through the manager.
///
/// Labels: `provider` (or "none" on terminal failure), `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "traingate_requests_total";

/// Completion request duration in seconds, including fallback and backoff.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "traingate_request_duration_seconds";

/// Total fallbacks: a provider failed and was removed from the working set.
///
/// Labels: `provider` (the provider that failed).
pub const FALLBACKS_TOTAL: &str = "traingate_fallbacks_total";

/// Total estimated tokens accounted against provider quotas.
///
/// Labels: `provider`.
pub const TOKENS_TOTAL: &str = "traingate_tokens_total";

/// Total response cache hits.
///
/// Labels: `analysis`.
pub const CACHE_HITS_TOTAL: &str = "traingate_cache_hits_total";

/// Total response cache misses.
///
/// Labels: `analysis`.
pub const CACHE_MISSES_TOTAL: &str = "traingate_cache_misses_total";
