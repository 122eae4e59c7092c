//! Generation backends.
//!
//! The orchestrator talks to model inference through [`GenerationBackend`]:
//! given a backend model name, a prompt and an optional system preamble it
//! yields a lazy, finite, non-restartable stream of text fragments.
//! Failures are reported as backend-kind [`SwitchyardError`](crate::SwitchyardError)s
//! and mapped to an error chunk by the orchestrator; backends never retry
//! on the orchestrator's behalf.

mod llm_stream;

pub use llm_stream::{LlmBackend, backend_from_name};

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::Result;

/// Stream of generated text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Streaming text generation capability.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Start generating an answer to `prompt` with the model named
    /// `invocation_target`.
    ///
    /// An `Err` here means the stream could not be opened; errors inside
    /// the stream mean it failed part-way.
    async fn generate_stream(
        &self,
        invocation_target: &str,
        prompt: &str,
        system_preamble: Option<&str>,
    ) -> Result<TextStream>;

    /// Whether `invocation_target` is currently reachable.
    async fn health(&self, _invocation_target: &str) -> bool {
        true
    }
}
