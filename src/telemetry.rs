//! Telemetry metric name constants.
//!
//! Centralised metric names for switchyard operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `switchyard_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `model`: catalog id of the model that served the request
//! - `source`: where the answer came from: "cache", "backend", "failed", "abandoned"
//! - `tier`: cache tier: "hot" or "warm"

/// Total routing decisions.
///
/// Labels: `model` (chosen), `switched` ("true" | "false").
pub const ROUTING_DECISIONS_TOTAL: &str = "switchyard_routing_decisions_total";

/// Total requests handled by the orchestrator.
///
/// Labels: `model`, `source`.
pub const REQUESTS_TOTAL: &str = "switchyard_requests_total";

/// Request duration in seconds, from routing to the last delivered chunk.
///
/// Labels: `model`.
pub const REQUEST_DURATION_SECONDS: &str = "switchyard_request_duration_seconds";

/// Total backend failures surfaced as error chunks.
///
/// Labels: `model`.
pub const BACKEND_ERRORS_TOTAL: &str = "switchyard_backend_errors_total";

/// Total cache hits.
///
/// Labels: `tier`.
pub const CACHE_HITS_TOTAL: &str = "switchyard_cache_hits_total";

/// Total cache misses (absent or expired in both tiers).
pub const CACHE_MISSES_TOTAL: &str = "switchyard_cache_misses_total";

/// Total warm-to-hot promotions.
pub const CACHE_PROMOTIONS_TOTAL: &str = "switchyard_cache_promotions_total";

/// Total swallowed cache failures.
///
/// Labels: `op` ("get" | "propagate" | "evict").
pub const CACHE_DEGRADED_TOTAL: &str = "switchyard_cache_degraded_total";
