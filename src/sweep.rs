use std::{ops::RangeInclusive, time::Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{accumulator::Accumulator, config::RunConfig, error::Result};

/// Throughput observed for one worker count: how many series terms were
/// summed within the run budget, and what the estimate looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingResult {
    pub workers: usize,
    pub iterations: u64,
    pub pi_estimate: f64,
    /// Wall-clock duration of the run, including pool setup and teardown.
    pub elapsed_secs: f64,
}

/// Which worker counts to measure, and with what run parameters.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub worker_counts: RangeInclusive<usize>,
    pub run: RunConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            worker_counts: 1..=20,
            run: RunConfig::default(),
        }
    }
}

/// Runs the accumulator once per worker count, in ascending order, and
/// collects the results. Runs are strictly sequential so they never compete
/// for cores.
///
/// # Errors
/// Returns the first failed run's error; earlier results are discarded,
/// since a partial sweep cannot be compared across worker counts.
pub fn run_sweep(config: &SweepConfig) -> Result<Vec<ScalingResult>> {
    let counts = config.worker_counts.clone();
    let mut results = Vec::with_capacity(counts.size_hint().0);

    for workers in counts {
        info!("measuring {workers} worker(s)");
        let accumulator = Accumulator::leibniz(config.run.clone());

        let started = Instant::now();
        let outcome = accumulator.run(workers)?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        info!(
            workers = workers,
            iterations = outcome.iterations,
            batches = outcome.metrics.batches;
            "run complete"
        );

        results.push(ScalingResult {
            workers,
            iterations: outcome.iterations,
            pi_estimate: outcome.pi_estimate,
            elapsed_secs,
        });
    }

    Ok(results)
}
