//! Traingate error types

/// Traingate error types
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from provider")]
    EmptyResponse,

    /// No provider in the active working set is currently available.
    ///
    /// Fatal for the call: the manager raises this without entering the
    /// retry loop, since every remaining provider was already over quota
    /// (or the working set was empty).
    #[error("no completion provider available")]
    ProviderUnavailable,

    /// One specific provider's completion call failed.
    ///
    /// Recovered by the manager: the provider is removed from the active
    /// working set and the next one is attempted.
    #[error("provider '{provider}' failed: {message}")]
    ProviderExecution { provider: String, message: String },

    /// Every active provider was tried and failed.
    ///
    /// Wraps the last observed [`ProviderExecution`](Self::ProviderExecution)
    /// message for auditing.
    #[error("all providers exhausted after {attempts} attempts: {last_error}")]
    AllProvidersExhausted { attempts: usize, last_error: String },

    // Configuration errors
    #[error("unknown provider kind: {0}")]
    UnknownProvider(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether this error terminates the completion call as a whole.
    ///
    /// Per-provider failures are recoverable (the manager falls back);
    /// everything else is surfaced to the caller.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GatewayError::ProviderExecution { .. })
    }
}

/// Result type alias for Traingate operations
pub type Result<T> = std::result::Result<T, GatewayError>;
