//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (counts and latency per operation)
//! - Screens (superseded results that were discarded)
//! - Watch state persistence (write failures, unreadable blobs, playback ticks)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use tracing::warn;

/// Registry holding every metric in [`all_metrics`].
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

// =============================================================================
// Catalog
// =============================================================================

/// Catalog requests total by operation and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bloxwave_catalog_requests_total",
            "Total movie catalog requests",
        ),
        &["operation", "result"], // result: "ok" or a CatalogError kind
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bloxwave_catalog_request_duration_seconds",
            "Duration of movie catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Screens
// =============================================================================

/// Results discarded because a newer request had been issued.
pub static STALE_RESULTS_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bloxwave_stale_results_dropped_total",
            "Responses discarded because a newer request superseded them",
        ),
        &["screen"], // "browse", "genre"
    )
    .unwrap()
});

// =============================================================================
// Watch state
// =============================================================================

/// Failed writes by storage key.
pub static STORAGE_WRITE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bloxwave_storage_write_failures_total",
            "Watch state writes rejected by the storage backend",
        ),
        &["key"],
    )
    .unwrap()
});

/// Reads that fell back to an empty collection.
pub static STORAGE_READ_RECOVERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bloxwave_storage_read_recoveries_total",
            "Watch state reads that failed or held malformed data",
        ),
        &["key"],
    )
    .unwrap()
});

/// Playback ticks recorded.
pub static PLAYBACK_TICKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bloxwave_playback_ticks_total",
        "Simulated playback seconds recorded",
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Catalog
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        // Screens
        Box::new(STALE_RESULTS_DROPPED.clone()),
        // Watch state
        Box::new(STORAGE_WRITE_FAILURES.clone()),
        Box::new(STORAGE_READ_RECOVERIES.clone()),
        Box::new(PLAYBACK_TICKS.clone()),
    ]
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
