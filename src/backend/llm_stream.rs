//! [`GenerationBackend`] over the llm crate.
//!
//! The llm crate bakes the model and system prompt into the provider at
//! build time, so [`LlmBackend`] stores connection settings and builds a
//! provider per request.

use async_trait::async_trait;
use futures_util::StreamExt;
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, StreamChunk};
use tracing::instrument;

use super::{GenerationBackend, TextStream};
use crate::{Result, SwitchyardError};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Map a provider name (as used in config files) to an llm backend.
pub fn backend_from_name(name: &str) -> Result<LLMBackend> {
    match name.to_ascii_lowercase().as_str() {
        "google" | "gemini" => Ok(LLMBackend::Google),
        "openrouter" => Ok(LLMBackend::OpenRouter),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "openai" => Ok(LLMBackend::OpenAI),
        "ollama" => Ok(LLMBackend::Ollama),
        other => Err(SwitchyardError::Configuration(format!(
            "unknown backend provider: {other}"
        ))),
    }
}

/// Streams answers from a remote provider through the llm crate.
///
/// # Example
///
/// ```ignore
/// use llm::builder::LLMBackend;
/// use switchyard::backend::LlmBackend;
///
/// let backend = LlmBackend::new(LLMBackend::Google, Some("your-key"), "google");
/// ```
pub struct LlmBackend {
    backend: LLMBackend,
    api_key: Option<String>,
    name: String,
    /// Base URL override (Ollama or self-hosted gateways).
    base_url: Option<String>,
    timeout_secs: u64,
}

impl LlmBackend {
    /// Create a backend for the given provider.
    ///
    /// * `backend` - The LLM backend to use (Google, OpenRouter, ...)
    /// * `api_key` - API key for the backend (`None` for keyless access)
    /// * `name` - Human-readable name for logging/debugging
    pub fn new(
        backend: LLMBackend,
        api_key: Option<impl Into<String>>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            api_key: api_key.map(|k| k.into()),
            name: name.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn build_provider(
        &self,
        invocation_target: &str,
        system_preamble: Option<&str>,
    ) -> Result<Box<dyn LLMProvider>> {
        let mut builder = LLMBuilder::new()
            .backend(self.backend.clone())
            .model(invocation_target)
            .timeout_seconds(self.timeout_secs);
        if let Some(ref key) = self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(sys) = system_preamble {
            builder = builder.system(sys);
        }
        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url.clone());
        }

        builder
            .build()
            .map_err(|e| SwitchyardError::Configuration(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for LlmBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "llm.generate_stream", skip(self, prompt, system_preamble), fields(backend = %self.name))]
    async fn generate_stream(
        &self,
        invocation_target: &str,
        prompt: &str,
        system_preamble: Option<&str>,
    ) -> Result<TextStream> {
        let provider = self.build_provider(invocation_target, system_preamble)?;
        let messages = vec![ChatMessage::user().content(prompt.to_string()).build()];

        let stream = provider
            .chat_stream_with_tools(&messages, None)
            .await
            .map_err(SwitchyardError::from)?;

        // Only text reaches the caller; thinking and tool events are dropped.
        let text = stream.filter_map(|result| async move {
            match result {
                Ok(StreamChunk::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(SwitchyardError::from(e))),
            }
        });

        Ok(Box::pin(text))
    }
}
