//! Switchyard error types

use std::time::Duration;

/// Switchyard error types
#[derive(Debug, thiserror::Error)]
pub enum SwitchyardError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Backend errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Wrapped llm crate error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A cache tier could not serve a request. Never surfaced to callers of
    /// the orchestrator; only logged and counted.
    #[error("cache degraded: {0}")]
    CacheDegraded(String),
}

impl SwitchyardError {
    /// Whether this error originated from the generation backend.
    ///
    /// Backend errors are the only kind that reach the caller, and only as
    /// a terminal chunk on the output channel.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            SwitchyardError::Http(_)
                | SwitchyardError::RateLimited { .. }
                | SwitchyardError::AuthenticationFailed
                | SwitchyardError::ModelNotFound(_)
                | SwitchyardError::Stream(_)
                | SwitchyardError::EmptyResponse
                | SwitchyardError::Llm(_)
        )
    }
}

impl From<llm::error::LLMError> for SwitchyardError {
    fn from(err: llm::error::LLMError) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("rate limit") || lower.contains("429") {
            SwitchyardError::RateLimited { retry_after: None }
        } else if lower.contains("authentication")
            || lower.contains("401")
            || lower.contains("invalid api key")
        {
            SwitchyardError::AuthenticationFailed
        } else if lower.contains("not found") || lower.contains("404") {
            SwitchyardError::ModelNotFound(msg)
        } else {
            SwitchyardError::Llm(msg)
        }
    }
}

/// Result type alias for Switchyard operations
pub type Result<T> = std::result::Result<T, SwitchyardError>;
