//! Response caching subsystem.
//!
//! Maps a deterministic request fingerprint to a previously generated
//! completion. The cache sits in [`CompletionService`](crate::CompletionService),
//! above the provider manager: a hit bypasses provider selection,
//! fallback, and usage accounting entirely.
//!
//! The cache is an optimisation, never a correctness dependency — the
//! [`CacheStore`] contract is infallible, and an implementation backed
//! by an unreachable store must degrade to misses and silent no-ops.
//!
//! # Key scheme
//!
//! `ai:{user_id}:{analysis_type}:{fingerprint}` — entries are scoped to
//! the requesting user (no cross-user sharing) and to the analysis type,
//! which also enables per-user bulk invalidation by key prefix.
//!
//! # Fingerprint
//!
//! Canonical JSON of `{prompt, options}` digested with SHA-256 and
//! hex-encoded. Used only for key derivation, not for security.

mod memory;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{AnalysisType, CompletionOptions};

pub use memory::{CacheConfig, MemoryCacheStore};

/// Default TTL for cached completions: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Prefix shared by every key this subsystem writes.
pub const KEY_PREFIX: &str = "ai:";

/// Compute the request fingerprint for a prompt and its options.
pub fn fingerprint(prompt: &str, options: &CompletionOptions) -> String {
    #[derive(Serialize)]
    struct Input<'a> {
        prompt: &'a str,
        options: &'a CompletionOptions,
    }

    // Struct serialisation is declaration-ordered, so the byte string is
    // canonical for identical inputs.
    let canonical = serde_json::to_vec(&Input { prompt, options })
        .expect("prompt and options serialise to JSON");
    hex::encode(Sha256::digest(&canonical))
}

/// Build the full cache key for one user-scoped request.
pub fn cache_key(user_id: &str, analysis: AnalysisType, fingerprint: &str) -> String {
    format!("{KEY_PREFIX}{user_id}:{analysis}:{fingerprint}")
}

/// Key prefix covering every cache entry owned by one user.
pub fn user_scope(user_id: &str) -> String {
    format!("{KEY_PREFIX}{user_id}:")
}

/// Cache store statistics for the diagnostics surface.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    /// Keys currently held by the backing store.
    pub total_keys: u64,
    /// Keys under the gateway's [`KEY_PREFIX`].
    pub scoped_keys: u64,
    /// Approximate memory used by cached entries, in bytes.
    pub memory_used: u64,
}

/// Key-value contract for the response cache backing store.
///
/// Second-granularity TTL, prefix enumeration for bulk delete. All
/// operations are infallible: store outages are absorbed by the
/// implementation (miss on read, no-op on write).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a cached completion. `None` on miss or store outage.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a completion under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Remove a single entry.
    async fn delete(&self, key: &str);

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    async fn delete_by_prefix(&self, prefix: &str) -> u64;

    /// Store statistics for diagnostics.
    async fn stats(&self) -> CacheStats;
}
