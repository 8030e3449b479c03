//! Core data types shared across the gateway.

mod analysis;
mod options;
mod stats;

pub use analysis::AnalysisType;
pub use options::CompletionOptions;
pub use stats::{ProviderHealth, UsageStats};
