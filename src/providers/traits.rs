//! The completion backend trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::CompletionOptions;

/// One third-party text-completion backend.
///
/// Implementations are thin transport adapters: they issue a single
/// call, apply their own timeout, and surface any network, auth, or
/// validation failure as an error without retrying. A `system_prompt`
/// in the options is merged according to each backend's own calling
/// convention.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Adapter name, e.g. "openai".
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` against `model`.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String>;
}
