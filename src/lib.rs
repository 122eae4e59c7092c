//! Switchyard - prompt router and two-tier response cache for LLM backends
//!
//! Switchyard sits between a chat frontend and one or more generative-model
//! backends. For every prompt it picks the catalog model best suited to
//! answer (a hand-weighted linear classifier over prompt features and model
//! capability embeddings) and skips the backend entirely when the same
//! prompt was recently answered by the same model.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::ops::ControlFlow;
//!
//! use llm::builder::LLMBackend;
//! use switchyard::{CallerProfile, LlmBackend, Switchyard};
//!
//! #[tokio::main]
//! async fn main() -> switchyard::Result<()> {
//!     let orchestrator = Switchyard::builder()
//!         .backend(LlmBackend::new(LLMBackend::Google, Some("your-key"), "google"))
//!         .build()?;
//!
//!     let outcome = orchestrator
//!         .handle(
//!             "Explain recursion step-by-step",
//!             "omni",
//!             &CallerProfile::default(),
//!             |chunk| {
//!                 print!("{chunk}");
//!                 ControlFlow::Continue(())
//!             },
//!         )
//!         .await;
//!
//!     println!("\nanswered by {}", outcome.decision.chosen_model_id);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod orchestrator;
pub mod router;
pub mod telemetry;

// Re-export main types at crate root
pub use backend::{GenerationBackend, LlmBackend, TextStream};
pub use cache::{CacheConfig, CacheEntry, CacheKey, MemoryWarmStore, TieredCache, WarmStore, make_key};
pub use catalog::{CapabilityEmbedding, ModelCatalog, ModelDescriptor};
pub use config::Config;
pub use error::{Result, SwitchyardError};
pub use features::{CallerProfile, FeatureVector};
pub use orchestrator::{
    ERROR_CHUNK_PREFIX, Orchestrator, Outcome, RaceEntry, ResponseSource, Switchyard,
    SwitchyardBuilder,
};
pub use router::{Router, RoutingDecision, RoutingWeights};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
