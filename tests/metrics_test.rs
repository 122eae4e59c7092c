//! Tests for metrics emission.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::ops::ControlFlow;

use async_trait::async_trait;
use futures_util::stream;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use switchyard::{
    CacheConfig, CallerProfile, GenerationBackend, Orchestrator, Switchyard, SwitchyardError,
    TextStream, TieredCache, make_key, telemetry,
};

// ============================================================================
// Mock backends
// ============================================================================

struct EchoBackend;

#[async_trait]
impl GenerationBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate_stream(
        &self,
        _invocation_target: &str,
        prompt: &str,
        _system_preamble: Option<&str>,
    ) -> switchyard::Result<TextStream> {
        let answer = format!("echo: {prompt}");
        Ok(Box::pin(stream::iter([Ok::<_, SwitchyardError>(answer)])))
    }
}

struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate_stream(
        &self,
        _invocation_target: &str,
        _prompt: &str,
        _system_preamble: Option<&str>,
    ) -> switchyard::Result<TextStream> {
        Err(SwitchyardError::AuthenticationFailed)
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    counter_with_label(snapshot, name, None)
}

/// Sum counter values matching a name and, optionally, one label pair.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| match label {
            Some((k, v)) => key.key().labels().any(|l| l.key() == k && l.value() == v),
            None => true,
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

async fn ask(o: &Orchestrator, prompt: &str) {
    o.handle(prompt, "omni", &CallerProfile::default(), |_| {
        ControlFlow::Continue(())
    })
    .await;
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn backend_then_cache_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let o = Switchyard::builder().backend(EchoBackend).build().unwrap();
                ask(&o, "hello there").await;
                ask(&o, "hello there").await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, Some(("source", "backend"))),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, Some(("source", "cache"))),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::ROUTING_DECISIONS_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, Some(("tier", "hot"))),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::BACKEND_ERRORS_TOTAL), 0);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn backend_failure_records_error_counter() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let o = Switchyard::builder().backend(FailingBackend).build().unwrap();
                ask(&o, "hello there").await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::BACKEND_ERRORS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, Some(("source", "failed"))),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn warm_hit_records_promotion() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let cache = TieredCache::new(&CacheConfig::default());
                let key = make_key("q", "omni");
                cache
                    .warm()
                    .insert(key.clone(), switchyard::CacheEntry::new("a"))
                    .await
                    .unwrap();
                assert!(cache.get(&key).await.is_some());
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_PROMOTIONS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, Some(("tier", "warm"))),
        1
    );
}

#[test]
fn no_recorder_is_a_noop() {
    // Without a recorder installed, metric calls are no-ops and must not panic.
    let cache = TieredCache::new(&CacheConfig::default());
    cache.set(make_key("q", "omni"), "a");
}
