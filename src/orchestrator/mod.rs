//! Request orchestration: route, consult the cache, stream, populate.
//!
//! [`Orchestrator::handle`] is the single entry point frontends drive. One
//! call runs the whole request lifecycle:
//!
//! 1. route the prompt to a catalog model (the chosen id is used from here on)
//! 2. look the answer up in the [`TieredCache`]; a hit is delivered as one chunk
//! 3. on a miss, stream from the [`GenerationBackend`], forwarding fragments
//! 4. after a complete, non-empty stream, store the full answer
//!
//! Backend failures never escape as errors: the caller receives one
//! terminal chunk starting with [`ERROR_CHUNK_PREFIX`] and nothing is
//! cached. A caller that returns [`ControlFlow::Break`] from its chunk
//! callback (or drops the `handle` future) abandons the request; partial
//! output of an abandoned stream is never cached either.

mod builder;
mod race;

pub use builder::{Switchyard, SwitchyardBuilder};
pub use race::RaceEntry;

use std::ops::ControlFlow;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, instrument, warn};

use crate::backend::GenerationBackend;
use crate::cache::{TieredCache, make_key};
use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::features::CallerProfile;
use crate::router::{Router, RoutingDecision};
use crate::{Result, SwitchyardError, telemetry};

/// Prefix of the terminal chunk delivered when the backend fails.
pub const ERROR_CHUNK_PREFIX: &str = "\n[error] ";

/// Where a request's answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from either cache tier, without calling the backend.
    Cache,
    /// Streamed from the backend and cached.
    Backend,
    /// The backend failed; an error chunk was delivered.
    Failed,
    /// The caller stopped accepting chunks.
    Abandoned,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Backend => "backend",
            ResponseSource::Failed => "failed",
            ResponseSource::Abandoned => "abandoned",
        }
    }
}

/// Summary of one handled request, for observability.
///
/// Errors are not reported here; they travel through the chunk channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub decision: RoutingDecision,
    pub source: ResponseSource,
}

/// How a backend stream ended without an error.
enum StreamEnd {
    Completed(String),
    Abandoned,
}

/// Ties routing, caching and backend streaming into one request lifecycle.
///
/// Built with [`Switchyard::builder()`]. Cheap to share behind an `Arc`;
/// independent requests may run concurrently.
pub struct Orchestrator {
    router: Router,
    cache: Arc<TieredCache>,
    backend: Arc<dyn GenerationBackend>,
}

impl Orchestrator {
    pub(crate) fn new(
        router: Router,
        cache: Arc<TieredCache>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            router,
            cache,
            backend,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        self.router.catalog()
    }

    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    /// Answer `prompt`, delivering fragments to `on_chunk` in order.
    ///
    /// The concatenation of all delivered chunks is the full answer (or,
    /// on failure, whatever was streamed followed by the error chunk).
    #[instrument(
        name = "switchyard.handle",
        skip(self, prompt, profile, on_chunk),
        fields(requested = requested_model_id)
    )]
    pub async fn handle<F>(
        &self,
        prompt: &str,
        requested_model_id: &str,
        profile: &CallerProfile,
        mut on_chunk: F,
    ) -> Outcome
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let started = Instant::now();
        let (decision, model) = self
            .router
            .route_with_model(prompt, requested_model_id, profile);

        let key = make_key(prompt, &model.id);
        if let Some(payload) = self.cache.get(&key).await {
            debug!(model = %model.id, "serving cached answer");
            // a single chunk; abandonment has nothing left to stop
            let _ = on_chunk(&payload);
            return self.finish(decision, ResponseSource::Cache, started);
        }

        let source = match self.stream_from_backend(model, prompt, &mut on_chunk).await {
            Ok(StreamEnd::Completed(answer)) => {
                self.cache.set(key, answer);
                ResponseSource::Backend
            }
            Ok(StreamEnd::Abandoned) => {
                debug!(model = %model.id, "caller abandoned request");
                ResponseSource::Abandoned
            }
            Err(e) => {
                warn!(model = %model.id, backend = self.backend.name(), error = %e, "generation failed");
                metrics::counter!(telemetry::BACKEND_ERRORS_TOTAL, "model" => model.id.clone())
                    .increment(1);
                let _ = on_chunk(&error_chunk(&e));
                ResponseSource::Failed
            }
        };

        self.finish(decision, source, started)
    }

    /// Like [`handle`](Self::handle), delivering chunks as a stream.
    ///
    /// The request runs on a spawned task. Dropping the returned stream
    /// abandons it.
    pub fn handle_stream(
        self: &Arc<Self>,
        prompt: impl Into<String>,
        requested_model_id: impl Into<String>,
        profile: CallerProfile,
    ) -> UnboundedReceiverStream<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = Arc::clone(self);
        let prompt = prompt.into();
        let requested = requested_model_id.into();

        tokio::spawn(async move {
            this.handle(&prompt, &requested, &profile, |chunk| {
                match tx.send(chunk.to_string()) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(()),
                }
            })
            .await;
        });

        UnboundedReceiverStream::new(rx)
    }

    /// Whether the backend behind `model_id` is reachable.
    ///
    /// Unknown ids report `false`.
    pub async fn health(&self, model_id: &str) -> bool {
        match self.catalog().get(model_id) {
            Some(model) => self.backend.health(&model.invocation_target).await,
            None => false,
        }
    }

    async fn stream_from_backend<F>(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
        on_chunk: &mut F,
    ) -> Result<StreamEnd>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let mut stream = self
            .backend
            .generate_stream(
                &model.invocation_target,
                prompt,
                model.system_preamble.as_deref(),
            )
            .await?;

        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if fragment.is_empty() {
                continue;
            }
            answer.push_str(&fragment);
            if on_chunk(&fragment).is_break() {
                return Ok(StreamEnd::Abandoned);
            }
        }

        if answer.is_empty() {
            return Err(SwitchyardError::EmptyResponse);
        }
        Ok(StreamEnd::Completed(answer))
    }

    fn finish(&self, decision: RoutingDecision, source: ResponseSource, started: Instant) -> Outcome {
        let model = decision.chosen_model_id.clone();
        metrics::counter!(
            telemetry::REQUESTS_TOTAL,
            "model" => model.clone(),
            "source" => source.as_str()
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "model" => model)
            .record(started.elapsed().as_secs_f64());

        Outcome { decision, source }
    }
}

/// The terminal chunk describing a backend failure.
pub fn error_chunk(err: &SwitchyardError) -> String {
    format!("{ERROR_CHUNK_PREFIX}generation failed: {err}")
}
