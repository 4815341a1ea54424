use std::time::Duration;

/// Per-run counters, updated by the control thread at batch boundaries.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Completed (fully folded) batches.
    pub batches: u64,
    /// Time spent inside batch dispatch, barrier included.
    pub compute_time: Duration,
    /// Wall-clock duration of the whole run.
    pub elapsed: Duration,
}

impl RunMetrics {
    #[inline]
    pub fn bump_batch(&mut self) {
        self.batches += 1;
    }

    #[inline]
    pub fn add_compute_time(&mut self, d: Duration) {
        self.compute_time += d;
    }
}
