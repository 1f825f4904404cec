//! Shared counters for the /health endpoint.
//! Updated by the generate and export handlers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Pipeline outcome counters. Handlers record, /health reads.
#[derive(Default)]
pub struct HealthState {
    pub reports_generated: AtomicU64,
    pub generate_failures: AtomicU64,
    pub exports_served: AtomicU64,
    pub export_failures: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generate(&self, ok: bool) {
        let counter = if ok {
            &self.reports_generated
        } else {
            &self.generate_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_export(&self, ok: bool) {
        let counter = if ok {
            &self.exports_served
        } else {
            &self.export_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reports_generated(&self) -> u64 {
        self.reports_generated.load(Ordering::Relaxed)
    }

    pub fn generate_failures(&self) -> u64 {
        self.generate_failures.load(Ordering::Relaxed)
    }

    pub fn exports_served(&self) -> u64 {
        self.exports_served.load(Ordering::Relaxed)
    }

    pub fn export_failures(&self) -> u64 {
        self.export_failures.load(Ordering::Relaxed)
    }
}
