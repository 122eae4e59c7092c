//! Multi-model race: one prompt, several requested models, ranked by
//! completion.

use std::ops::ControlFlow;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::time::Instant;

use super::{Orchestrator, ResponseSource};
use crate::features::CallerProfile;
use crate::router::RoutingDecision;

/// One contestant's result.
#[derive(Debug, Clone)]
pub struct RaceEntry {
    /// The model id the contestant requested.
    pub requested_model_id: String,
    /// How the request was routed.
    pub decision: RoutingDecision,
    /// Everything delivered to the contestant, error chunk included.
    pub text: String,
    pub source: ResponseSource,
    /// Time from race start until this contestant finished.
    pub elapsed: Duration,
    /// Finishing position, starting at 1.
    pub rank: usize,
}

impl RaceEntry {
    /// Whether the contestant's backend failed.
    pub fn failed(&self) -> bool {
        self.source == ResponseSource::Failed
    }
}

impl Orchestrator {
    /// Run `prompt` once per requested model, concurrently.
    ///
    /// Each contestant goes through the full [`handle`](Self::handle)
    /// lifecycle, so it may be routed away from the model it requested and
    /// may be served from cache. Entries come back in finishing order.
    pub async fn race(
        &self,
        prompt: &str,
        requested_model_ids: &[&str],
        profile: &CallerProfile,
    ) -> Vec<RaceEntry> {
        let started = Instant::now();

        let mut contestants: FuturesUnordered<_> = requested_model_ids
            .iter()
            .map(|&requested| async move {
                let mut text = String::new();
                let outcome = self
                    .handle(prompt, requested, profile, |chunk| {
                        text.push_str(chunk);
                        ControlFlow::Continue(())
                    })
                    .await;
                (requested, outcome, text, started.elapsed())
            })
            .collect();

        let mut entries = Vec::with_capacity(requested_model_ids.len());
        while let Some((requested, outcome, text, elapsed)) = contestants.next().await {
            entries.push(RaceEntry {
                requested_model_id: requested.to_string(),
                decision: outcome.decision,
                text,
                source: outcome.source,
                elapsed,
                rank: entries.len() + 1,
            });
        }
        entries
    }
}
