//! Feature-scoring model router.
//!
//! The router is a hand-weighted linear classifier: every catalog model is
//! scored against the prompt's [`FeatureVector`], the requested model gets a
//! small stickiness bonus, and the highest total wins. Ties go to the model
//! that appears first in the catalog.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use switchyard::{CallerProfile, ModelCatalog, Router, RoutingWeights};
//! let router = Router::new(Arc::new(ModelCatalog::builtin()), RoutingWeights::default());
//! let decision = router.route("مرحبا، كيف حالك؟", "omni", &CallerProfile::default());
//! assert_eq!(decision.chosen_model_id, "arabic");
//! assert!(decision.caused_switch);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::features::{self, CallerProfile, FeatureVector};
use crate::telemetry;

/// Weights of the scoring function plus the stickiness bonus.
///
/// These are configuration, not learned parameters. Used by both the
/// builder and the TOML `[routing]` section:
///
/// ```toml
/// [routing]
/// language = 0.6
/// stickiness = 0.1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingWeights {
    /// Weight of complexity closeness. Default: 0.4.
    pub complexity: f64,
    /// Weight of code demand × code affinity. Default: 0.3.
    pub code: f64,
    /// Weight of language signal × language affinity. Default: 0.5, the
    /// highest, since answering in the wrong language is the most visible
    /// failure.
    pub language: f64,
    /// Weight of cost sensitivity × cost efficiency. Default: 0.2.
    pub cost: f64,
    /// Bonus added to the requested model's score. Default: 0.05.
    pub stickiness: f64,
}

impl Default for RoutingWeights {
    fn default() -> Self {
        Self {
            complexity: 0.4,
            code: 0.3,
            language: 0.5,
            cost: 0.2,
            stickiness: 0.05,
        }
    }
}

impl RoutingWeights {
    /// Create weights with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the complexity weight.
    pub fn complexity(mut self, w: f64) -> Self {
        self.complexity = w;
        self
    }

    /// Set the code weight.
    pub fn code(mut self, w: f64) -> Self {
        self.code = w;
        self
    }

    /// Set the language weight.
    pub fn language(mut self, w: f64) -> Self {
        self.language = w;
        self
    }

    /// Set the cost weight.
    pub fn cost(mut self, w: f64) -> Self {
        self.cost = w;
        self
    }

    /// Set the stickiness bonus.
    pub fn stickiness(mut self, bonus: f64) -> Self {
        self.stickiness = bonus;
        self
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Catalog id of the model that should answer.
    pub chosen_model_id: String,
    /// Winning score, including the stickiness bonus if the winner was the
    /// requested model.
    pub score: f64,
    /// True iff the chosen model differs from the requested one.
    pub caused_switch: bool,
}

/// Scores catalog models against prompts. Stateless and cheap to clone.
#[derive(Debug, Clone)]
pub struct Router {
    catalog: Arc<ModelCatalog>,
    weights: RoutingWeights,
}

impl Router {
    pub fn new(catalog: Arc<ModelCatalog>, weights: RoutingWeights) -> Self {
        Self { catalog, weights }
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn weights(&self) -> &RoutingWeights {
        &self.weights
    }

    /// Pick the model that should answer `prompt`.
    ///
    /// `requested_model_id` need not be in the catalog; if it isn't, it
    /// receives no bonus and the decision always reports a switch.
    pub fn route(
        &self,
        prompt: &str,
        requested_model_id: &str,
        profile: &CallerProfile,
    ) -> RoutingDecision {
        self.route_with_model(prompt, requested_model_id, profile).0
    }

    /// Like [`route`](Self::route), also returning the chosen descriptor.
    pub fn route_with_model(
        &self,
        prompt: &str,
        requested_model_id: &str,
        profile: &CallerProfile,
    ) -> (RoutingDecision, &ModelDescriptor) {
        let features = features::extract(prompt, profile);
        debug!(?features, requested = requested_model_id, "extracted prompt features");

        let mut best: Option<(&ModelDescriptor, f64)> = None;
        for model in self.catalog.iter() {
            let mut total = self.score(&features, model);
            if model.id == requested_model_id {
                total += self.weights.stickiness;
            }
            // strict comparison: the first maximal element keeps the lead
            if best.is_none_or(|(_, top)| total > top) {
                best = Some((model, total));
            }
        }

        let (winner, score) = best.unwrap_or((self.catalog.first(), 0.0));
        let caused_switch = winner.id != requested_model_id;

        if caused_switch {
            info!(
                from = requested_model_id,
                to = %winner.id,
                score = format_args!("{score:.3}"),
                "switching model"
            );
        }
        metrics::counter!(
            telemetry::ROUTING_DECISIONS_TOTAL,
            "model" => winner.id.clone(),
            "switched" => if caused_switch { "true" } else { "false" }
        )
        .increment(1);

        let decision = RoutingDecision {
            chosen_model_id: winner.id.clone(),
            score,
            caused_switch,
        };
        (decision, winner)
    }

    /// Weighted similarity between a prompt and a model, without any bonus.
    pub fn score(&self, features: &FeatureVector, model: &ModelDescriptor) -> f64 {
        let w = &self.weights;
        let m = &model.embedding;
        w.complexity * (1.0 - (features.complexity - m.complexity).abs())
            + w.code * (features.code_density * m.code_affinity)
            + w.language * (features.language_signal * m.language_affinity)
            + w.cost * (features.cost_sensitivity * m.cost_efficiency)
    }
}
