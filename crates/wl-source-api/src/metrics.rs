//! Request outcome counters, exposed as JSON on `GET /metrics`.

use crate::domain::outcome::UpdateOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Update handler metrics
#[derive(Debug, Default)]
pub struct HandlerMetrics {
    pub requests_total: AtomicU64,
    pub requests_accepted: AtomicU64,
    pub requests_unauthorized: AtomicU64,
    pub requests_not_found: AtomicU64,
    pub dispatch_failed: AtomicU64,
    pub registry_unavailable: AtomicU64,

    // Latency tracking (sum and count, no histogram)
    pub total_latency_us: AtomicU64,
}

impl HandlerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the terminal outcome of one request
    pub fn record(&self, outcome: &UpdateOutcome, elapsed: Duration) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            UpdateOutcome::Unauthorized => &self.requests_unauthorized,
            UpdateOutcome::SourceNotFound => &self.requests_not_found,
            UpdateOutcome::UpdateRequested(_) => &self.requests_accepted,
            UpdateOutcome::DispatchFailed(_) => &self.dispatch_failed,
            UpdateOutcome::RegistryUnavailable => &self.registry_unavailable,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.total_latency_us.fetch_add(micros, Ordering::Relaxed);
    }

    /// Average handling time in milliseconds
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64 / 1000.0
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "accepted": self.requests_accepted.load(Ordering::Relaxed),
                "unauthorized": self.requests_unauthorized.load(Ordering::Relaxed),
                "not_found": self.requests_not_found.load(Ordering::Relaxed),
                "dispatch_failed": self.dispatch_failed.load(Ordering::Relaxed),
                "registry_unavailable": self.registry_unavailable.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}
