//! Process-wide count of orchestrated operations.

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;

pub const REQUESTS_TOTAL: &str = "lectern_requests_total";

/// Monotonic request counter shared by every service.
///
/// Increments are atomic, so concurrent callers never lose an update.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one operation and return the new total.
    pub fn increment(&self) -> u64 {
        counter!(REQUESTS_TOTAL).increment(1);
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Snapshot of the current total.
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Reset to zero and return the total observed just before.
    pub fn reset(&self) -> u64 {
        self.count.swap(0, Ordering::Relaxed)
    }
}
