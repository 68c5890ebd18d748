use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::shell::{HierarchyPanel, SearchOutcome};

pub struct Metrics {
    // Counters
    total_searches: AtomicUsize,
    warnings: AtomicUsize,
    errors: AtomicUsize,
    found: AtomicUsize,
    hierarchy_tables: AtomicUsize,

    // Timing (in microseconds)
    total_search_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_searches: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            found: AtomicUsize::new(0),
            hierarchy_tables: AtomicUsize::new(0),
            total_search_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_search(&self, outcome: &SearchOutcome, duration: Duration) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
        self.total_search_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        match outcome {
            SearchOutcome::Warning { .. } => {
                self.warnings.fetch_add(1, Ordering::Relaxed);
            }
            SearchOutcome::Error { .. } => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            SearchOutcome::Found { hierarchy, .. } => {
                self.found.fetch_add(1, Ordering::Relaxed);
                if matches!(hierarchy, HierarchyPanel::Table { .. }) {
                    self.hierarchy_tables.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_searches = self.total_searches.load(Ordering::Relaxed);
        let total_us = self.total_search_time_us.load(Ordering::Relaxed) as f64;

        MetricsSnapshot {
            total_searches,
            warnings: self.warnings.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            hierarchy_tables: self.hierarchy_tables.load(Ordering::Relaxed),
            avg_search_time_ms: if total_searches > 0 {
                total_us / total_searches as f64 / 1000.0 // Convert to ms
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: usize,
    pub warnings: usize,
    pub errors: usize,
    pub found: usize,
    pub hierarchy_tables: usize,
    pub avg_search_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
