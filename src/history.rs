//! Append-only interaction log.
//!
//! One [`InteractionRecord`] is written for every completion attempt —
//! success, cache hit, or terminal failure — so every outcome is
//! auditable. Records are never mutated or deleted by this subsystem;
//! the read side serves per-user history and the usage-statistics
//! aggregation in the service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;
use crate::types::AnalysisType;

/// Provider label recorded for cache hits.
pub const CACHED_PROVIDER: &str = "cached";

/// Provider label recorded for terminal failures.
pub const NO_PROVIDER: &str = "none";

/// Stored prompts are truncated to this many characters.
const MAX_PROMPT_CHARS: usize = 500;

/// Stored responses (or error messages) are truncated to this many characters.
const MAX_RESPONSE_CHARS: usize = 1000;

/// Audit record of one completion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: String,
    pub analysis_type: AnalysisType,
    /// Truncated prompt text.
    pub prompt: String,
    /// Truncated response text, or the error message on terminal failure.
    pub response: String,
    /// Serving provider name, [`CACHED_PROVIDER`], or [`NO_PROVIDER`].
    pub provider: String,
    pub tokens_used: u64,
    pub cached: bool,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Build a record with truncation applied and `timestamp = now`.
    pub fn new(
        user_id: &str,
        analysis_type: AnalysisType,
        prompt: &str,
        response: &str,
        provider: &str,
        tokens_used: u64,
        cached: bool,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            analysis_type,
            prompt: truncate_chars(prompt, MAX_PROMPT_CHARS),
            response: truncate_chars(response, MAX_RESPONSE_CHARS),
            provider: provider.to_string(),
            tokens_used,
            cached,
            timestamp: Utc::now(),
        }
    }
}

/// Char-boundary-safe truncation.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Append-only contract for the interaction log store.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Append one record. Never mutates existing records.
    async fn append(&self, record: InteractionRecord) -> Result<()>;

    /// Records for one user, most recent first, optionally filtered by
    /// analysis type, limited to `limit` entries.
    async fn by_user(
        &self,
        user_id: &str,
        analysis: Option<AnalysisType>,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>>;

    /// All records, or all records for one user, for aggregation.
    async fn records(&self, user_id: Option<&str>) -> Result<Vec<InteractionRecord>>;
}

/// In-memory interaction store, for embedding and tests.
#[derive(Default)]
pub struct MemoryInteractionStore {
    records: RwLock<Vec<InteractionRecord>>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn append(&self, record: InteractionRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn by_user(
        &self,
        user_id: &str,
        analysis: Option<AnalysisType>,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>> {
        let records = self.records.read().await;
        // Walk newest-appended first, then stable-sort by timestamp so
        // same-instant appends keep recency order.
        let mut matching: Vec<InteractionRecord> = records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .filter(|r| analysis.is_none_or(|a| r.analysis_type == a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn records(&self, user_id: Option<&str>) -> Result<Vec<InteractionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| user_id.is_none_or(|u| r.user_id == u))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_char_boundary_safe() {
        let long = "é".repeat(600);
        let record = InteractionRecord::new(
            "u1",
            AnalysisType::Chat,
            &long,
            &long,
            "openai",
            10,
            false,
        );
        assert_eq!(record.prompt.chars().count(), 500);
        assert_eq!(record.response.chars().count(), 600);
    }

    #[tokio::test]
    async fn by_user_filters_and_limits() {
        let store = MemoryInteractionStore::new();
        for i in 0..5 {
            store
                .append(InteractionRecord::new(
                    "u1",
                    AnalysisType::Chat,
                    &format!("prompt {i}"),
                    "reply",
                    "openai",
                    2,
                    false,
                ))
                .await
                .unwrap();
        }
        store
            .append(InteractionRecord::new(
                "u1",
                AnalysisType::WorkoutAnalysis,
                "workout",
                "reply",
                "openai",
                2,
                false,
            ))
            .await
            .unwrap();
        store
            .append(InteractionRecord::new(
                "u2",
                AnalysisType::Chat,
                "other user",
                "reply",
                "openai",
                2,
                false,
            ))
            .await
            .unwrap();

        let chats = store
            .by_user("u1", Some(AnalysisType::Chat), 3)
            .await
            .unwrap();
        assert_eq!(chats.len(), 3);
        assert!(chats.iter().all(|r| r.analysis_type == AnalysisType::Chat));
        // Most recent first.
        assert_eq!(chats[0].prompt, "prompt 4");

        let all = store.by_user("u1", None, 100).await.unwrap();
        assert_eq!(all.len(), 6);
    }

    #[tokio::test]
    async fn records_scopes_by_user() {
        let store = MemoryInteractionStore::new();
        store
            .append(InteractionRecord::new(
                "u1",
                AnalysisType::Chat,
                "p",
                "r",
                "openai",
                1,
                false,
            ))
            .await
            .unwrap();
        store
            .append(InteractionRecord::new(
                "u2",
                AnalysisType::Chat,
                "p",
                "r",
                "openai",
                1,
                false,
            ))
            .await
            .unwrap();

        assert_eq!(store.records(None).await.unwrap().len(), 2);
        assert_eq!(store.records(Some("u1")).await.unwrap().len(), 1);
    }
}
