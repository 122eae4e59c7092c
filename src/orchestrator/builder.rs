//! Builder for configuring orchestrator instances

use std::sync::Arc;

use super::Orchestrator;
use crate::backend::GenerationBackend;
use crate::cache::{CacheConfig, TieredCache, WarmStore};
use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::router::{Router, RoutingWeights};
use crate::{Result, SwitchyardError};

/// Main entry point for creating orchestrator instances.
pub struct Switchyard;

impl Switchyard {
    /// Create a new builder for configuring the orchestrator.
    pub fn builder() -> SwitchyardBuilder {
        SwitchyardBuilder::new()
    }
}

/// Builder for configuring orchestrator instances.
///
/// ```rust,ignore
/// let orchestrator = Switchyard::builder()
///     .backend(LlmBackend::new(LLMBackend::Google, Some(key), "google"))
///     .cache(CacheConfig::new().ttl(Duration::from_secs(600)))
///     .build()?;
/// ```
pub struct SwitchyardBuilder {
    models: Option<Vec<ModelDescriptor>>,
    weights: RoutingWeights,
    cache_config: CacheConfig,
    warm_store: Option<Arc<dyn WarmStore>>,
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl SwitchyardBuilder {
    pub fn new() -> Self {
        Self {
            models: None,
            weights: RoutingWeights::default(),
            cache_config: CacheConfig::default(),
            warm_store: None,
            backend: None,
        }
    }

    /// Route across `models` instead of the built-in catalog.
    ///
    /// Validated at [`build`](Self::build): an empty list or duplicate ids
    /// fail with a configuration error.
    pub fn models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = Some(models);
        self
    }

    /// Set the routing weights.
    pub fn weights(mut self, weights: RoutingWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Replace the in-memory warm tier.
    pub fn warm_store(mut self, store: Arc<dyn WarmStore>) -> Self {
        self.warm_store = Some(store);
        self
    }

    /// Set the generation backend.
    pub fn backend(self, backend: impl GenerationBackend + 'static) -> Self {
        self.shared_backend(Arc::new(backend))
    }

    /// Set a generation backend that is shared with other owners.
    pub fn shared_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator> {
        let backend = self.backend.ok_or_else(|| {
            SwitchyardError::Configuration("no generation backend configured".into())
        })?;

        let catalog = match self.models {
            Some(models) => ModelCatalog::new(models)?,
            None => ModelCatalog::builtin(),
        };

        let cache = match self.warm_store {
            Some(store) => TieredCache::with_warm_store(&self.cache_config, store),
            None => TieredCache::new(&self.cache_config),
        };

        Ok(Orchestrator::new(
            Router::new(Arc::new(catalog), self.weights),
            Arc::new(cache),
            backend,
        ))
    }
}

impl Default for SwitchyardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
