//! Model catalog: the fixed set of candidate models the router picks from.
//!
//! A [`ModelCatalog`] is built once at startup and shared read-only (behind
//! an `Arc`) by the router and orchestrator. Construction fails fast on an
//! empty catalog or duplicate ids, so routing itself can never fail.
//!
//! Catalog order matters: it is the tie-break order for equal scores.

mod builtin;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Result, SwitchyardError};

/// A model's fitness profile, one component per routing feature.
///
/// Components are conventionally in `[0, 1]` but are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityEmbedding {
    /// How well the model handles hard, long or reasoning-heavy prompts.
    pub complexity: f64,
    /// Strength on code and shell prompts.
    pub code_affinity: f64,
    /// Arabic-language specialisation.
    pub language_affinity: f64,
    /// Cheapness; rewarded for cost-sensitive callers.
    pub cost_efficiency: f64,
}

impl CapabilityEmbedding {
    pub const fn new(
        complexity: f64,
        code_affinity: f64,
        language_affinity: f64,
        cost_efficiency: f64,
    ) -> Self {
        Self {
            complexity,
            code_affinity,
            language_affinity,
            cost_efficiency,
        }
    }
}

/// A routable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Human-facing name.
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub embedding: CapabilityEmbedding,
    /// Name of the real backend model to call. Forwarded, never inspected.
    pub invocation_target: String,
    /// Optional instruction passed to the backend alongside the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_preamble: Option<String>,
}

impl ModelDescriptor {
    /// Create a descriptor with the given id, embedding and backend target.
    pub fn new(
        id: impl Into<String>,
        embedding: CapabilityEmbedding,
        invocation_target: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            description: String::new(),
            embedding,
            invocation_target: invocation_target.into(),
            system_preamble: None,
        }
    }

    /// Set the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the system preamble.
    pub fn system_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = Some(preamble.into());
        self
    }
}

/// Immutable, ordered registry of candidate models.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Build a catalog.
    ///
    /// Fails with [`SwitchyardError::Configuration`] if `models` is empty or
    /// contains duplicate ids.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self> {
        if models.is_empty() {
            return Err(SwitchyardError::Configuration(
                "model catalog is empty".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(models.len());
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(SwitchyardError::Configuration(format!(
                    "duplicate model id in catalog: {}",
                    model.id
                )));
            }
        }
        Ok(Self { models })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            models: builtin::models(),
        }
    }

    /// Look up a model by id.
    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Whether `id` names a catalog model.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate models in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, ModelDescriptor> {
        self.models.iter()
    }

    /// The first model in catalog order.
    pub fn first(&self) -> &ModelDescriptor {
        // non-empty by construction
        &self.models[0]
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModelCatalog {
    type Item = &'a ModelDescriptor;
    type IntoIter = std::slice::Iter<'a, ModelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
