use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use log::debug;
use rayon::{ThreadPool, prelude::*};

use crate::{
    config::{RunBudget, RunConfig},
    error::{AccumulatorError, Result},
    metrics::RunMetrics,
    series::{self, ChunkRange},
};

/// What one accumulator run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub workers: usize,
    /// Total series terms summed; always an exact multiple of
    /// `chunk_size * workers`.
    pub iterations: u64,
    pub pi_estimate: f64,
    pub metrics: RunMetrics,
}

/// Running totals owned exclusively by the control thread. Mutated only
/// after a full batch of partial sums has been collected, so the iteration
/// count never reflects a partially folded batch.
#[derive(Debug, Default)]
struct AccumulatorState {
    iterations: u64,
    running_sum: f64,
}

impl AccumulatorState {
    fn fold_batch(&mut self, batch_sum: f64, batch_iterations: u64) {
        self.running_sum += batch_sum;
        self.iterations += batch_iterations;
    }

    fn pi_estimate(&self) -> f64 {
        self.running_sum * 4.0
    }
}

/// Issues strictly increasing, non-overlapping chunk ranges for one run.
/// Never reset between batches, so no series index is ever summed twice.
#[derive(Debug)]
struct ChunkCursor {
    next_index: u64,
    chunk_size: u64,
}

impl ChunkCursor {
    fn new(chunk_size: u64) -> Self {
        Self {
            next_index: 0,
            chunk_size,
        }
    }

    /// Builds the next batch of `workers` contiguous ranges and advances the
    /// cursor past them. Checked arithmetic: exhausting the `u64` index
    /// space surfaces as an error instead of wrapping.
    fn next_batch(&mut self, workers: usize) -> Result<Vec<ChunkRange>> {
        let span = self
            .chunk_size
            .checked_mul(workers as u64)
            .ok_or(AccumulatorError::IndexSpaceExhausted)?;
        let batch_end = self
            .next_index
            .checked_add(span)
            .ok_or(AccumulatorError::IndexSpaceExhausted)?;

        let ranges = (0..workers as u64)
            .map(|k| {
                let start = self.next_index + k * self.chunk_size;
                ChunkRange {
                    start,
                    end: start + self.chunk_size,
                }
            })
            .collect();

        self.next_index = batch_end;
        Ok(ranges)
    }
}

/// Time-bounded parallel accumulator for the Gregory–Leibniz series.
///
/// Each `run` owns a pool of exactly `workers` threads for its whole
/// duration. Batches of `workers` chunks are dispatched concurrently and
/// folded in atomically behind a barrier; the budget is re-checked only at
/// batch boundaries.
pub struct Accumulator<E> {
    config: RunConfig,
    evaluate: E,
}

impl Accumulator<fn(ChunkRange) -> f64> {
    /// Accumulator over the Gregory–Leibniz series itself.
    pub fn leibniz(config: RunConfig) -> Self {
        Self {
            config,
            evaluate: series::partial_sum,
        }
    }
}

impl<E> Accumulator<E>
where
    E: Fn(ChunkRange) -> f64 + Send + Sync,
{
    /// Accumulator with a custom chunk evaluator. The evaluator must be a
    /// pure function of its range; results within a batch are combined by
    /// addition only.
    pub fn with_evaluator(config: RunConfig, evaluate: E) -> Self {
        Self { config, evaluate }
    }

    /// Runs one budgeted accumulation with a pool of exactly `workers`
    /// threads, torn down when the run returns.
    ///
    /// Partial sums may complete in any order but are folded in chunk
    /// order, so `pi_estimate` depends only on `(workers, chunk_size,
    /// batches completed)`, never on scheduling.
    ///
    /// # Errors
    /// `InvalidConfig` before any work if `workers` or `chunk_size` is
    /// zero; `WorkerFailure` if an evaluator panics (the run aborts, no
    /// retries); `PoolBuild` / `IndexSpaceExhausted` for resource limits.
    pub fn run(&self, workers: usize) -> Result<RunOutcome> {
        self.config.validate(workers)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pi-worker-{i}"))
            .build()?;

        let batch_iterations = self
            .config
            .chunk_size
            .checked_mul(workers as u64)
            .ok_or(AccumulatorError::IndexSpaceExhausted)?;

        let started = Instant::now();
        let mut cursor = ChunkCursor::new(self.config.chunk_size);
        let mut state = AccumulatorState::default();
        let mut metrics = RunMetrics::default();

        loop {
            let ranges = cursor.next_batch(workers)?;

            let dispatched = Instant::now();
            let partials =
                self.dispatch(&pool, &ranges)
                    .map_err(|reason| AccumulatorError::WorkerFailure {
                        batch: metrics.batches,
                        reason,
                    })?;
            metrics.add_compute_time(dispatched.elapsed());

            // Fold in chunk order: bit-deterministic for a fixed batch count.
            let batch_sum: f64 = partials.into_iter().sum();
            state.fold_batch(batch_sum, batch_iterations);
            metrics.bump_batch();

            debug!(batch = metrics.batches, iterations = state.iterations; "batch folded");

            if self.budget_exhausted(started, metrics.batches) {
                break;
            }
        }

        metrics.elapsed = started.elapsed();
        Ok(RunOutcome {
            workers,
            iterations: state.iterations,
            pi_estimate: state.pi_estimate(),
            metrics,
        })
    }

    /// Barrier dispatch: every chunk of the batch is evaluated on the pool
    /// concurrently and the call returns only once all partial sums are in,
    /// ordered by chunk. A panicking evaluator fails the whole batch.
    fn dispatch(
        &self,
        pool: &ThreadPool,
        ranges: &[ChunkRange],
    ) -> std::result::Result<Vec<f64>, String> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(|| {
                ranges
                    .par_iter()
                    .map(|range| (self.evaluate)(*range))
                    .collect()
            })
        }))
        .map_err(panic_reason)
    }

    fn budget_exhausted(&self, started: Instant, batches: u64) -> bool {
        match self.config.budget {
            RunBudget::TimeLimit(limit) => started.elapsed() >= limit,
            RunBudget::Batches(n) => batches >= n.get(),
        }
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_issues_contiguous_non_overlapping_batches() {
        const CHUNK_SIZE: u64 = 10;
        const WORKERS: usize = 3;

        let mut cursor = ChunkCursor::new(CHUNK_SIZE);
        let first = cursor.next_batch(WORKERS).unwrap();
        let second = cursor.next_batch(WORKERS).unwrap();

        let mut expected_start = 0;
        for range in first.iter().chain(second.iter()) {
            assert_eq!(range.start, expected_start);
            assert_eq!(range.len(), CHUNK_SIZE);
            expected_start = range.end;
        }
    }

    #[test]
    fn cursor_reports_index_space_exhaustion() {
        let mut cursor = ChunkCursor::new(u64::MAX / 2);
        cursor.next_batch(1).unwrap();
        assert!(matches!(
            cursor.next_batch(2),
            Err(AccumulatorError::IndexSpaceExhausted)
        ));
    }
}
