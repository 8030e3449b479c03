//! Traingate - AI-completion gateway
//!
//! Orchestrates text-completion requests across several interchangeable
//! third-party providers: selects a provider by priority under
//! per-provider quota windows, falls back across providers on failure
//! with exponential backoff, caches responses per user to avoid repeat
//! calls, and logs every interaction for auditing and statistics.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use traingate::{
//!     AnalysisType, CompletionOptions, MemoryConfigStore, ProviderConfig, ProviderKind,
//!     RateLimit, Traingate, UsageWindow,
//! };
//!
//! #[tokio::main]
//! async fn main() -> traingate::Result<()> {
//!     let configs = vec![ProviderConfig {
//!         name: "openai-primary".into(),
//!         kind: ProviderKind::OpenAi,
//!         api_key: "sk-your-key".into(),
//!         endpoint: None,
//!         model: "gpt-4o-mini".into(),
//!         rate_limit: RateLimit { requests_per_minute: 60, tokens_per_day: 500_000 },
//!         enabled: true,
//!         priority: 1,
//!         usage: UsageWindow::default(),
//!     }];
//!
//!     let service = Traingate::builder()
//!         .config_store(Arc::new(MemoryConfigStore::new(configs)))
//!         .build()
//!         .await?;
//!
//!     let reply = service
//!         .generate_completion(
//!             "user-42",
//!             AnalysisType::WorkoutAnalysis,
//!             "Summarise this week's training load.",
//!             &CompletionOptions::default().max_tokens(300),
//!         )
//!         .await?;
//!
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod providers;
pub mod telemetry;
pub mod types;
pub mod usage;

// Re-export main types at crate root
pub use error::{GatewayError, Result};
pub use gateway::{CompletionService, Traingate, TraingateBuilder};

pub use cache::{CacheConfig, CacheStats, CacheStore, DEFAULT_TTL, MemoryCacheStore};
pub use config::{
    MemoryConfigStore, ProviderConfig, ProviderConfigStore, RateLimit, UsageWindow,
};
pub use history::{
    CACHED_PROVIDER, InteractionRecord, InteractionStore, MemoryInteractionStore, NO_PROVIDER,
};
pub use providers::{
    CompletionBackend, Provider, ProviderKind, ProviderManager, backend_for,
};
pub use types::{AnalysisType, CompletionOptions, ProviderHealth, UsageStats};
pub use usage::{UsageTracker, estimate_tokens};
