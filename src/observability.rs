//! Observability stubs (metrics, tracing)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    configs_selected: AtomicU64,
    frames_loaded: AtomicU64,
    frames_failed: AtomicU64,
    urls_rejected: AtomicU64,
    rewrites_applied: AtomicU64,
    searches_issued: AtomicU64,
    stale_results_dropped: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_selected(&self) {
        self.configs_selected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "configs_selected", "Metric incremented");
    }

    pub fn frame_loaded(&self) {
        self.frames_loaded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "frames_loaded", "Metric incremented");
    }

    pub fn frame_failed(&self) {
        self.frames_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "frames_failed", "Metric incremented");
    }

    pub fn url_rejected(&self) {
        self.urls_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "urls_rejected", "Metric incremented");
    }

    pub fn rewrite_applied(&self) {
        self.rewrites_applied.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "rewrites_applied", "Metric incremented");
    }

    pub fn search_issued(&self) {
        self.searches_issued.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "searches_issued", "Metric incremented");
    }

    pub fn stale_result_dropped(&self) {
        self.stale_results_dropped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "stale_results_dropped", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            configs_selected: self.configs_selected.load(Ordering::Relaxed),
            frames_loaded: self.frames_loaded.load(Ordering::Relaxed),
            frames_failed: self.frames_failed.load(Ordering::Relaxed),
            urls_rejected: self.urls_rejected.load(Ordering::Relaxed),
            rewrites_applied: self.rewrites_applied.load(Ordering::Relaxed),
            searches_issued: self.searches_issued.load(Ordering::Relaxed),
            stale_results_dropped: self.stale_results_dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub configs_selected: u64,
    pub frames_loaded: u64,
    pub frames_failed: u64,
    pub urls_rejected: u64,
    pub rewrites_applied: u64,
    pub searches_issued: u64,
    pub stale_results_dropped: u64,
}
