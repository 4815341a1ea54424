use std::{num::NonZeroU64, time::Duration};

use crate::error::{AccumulatorError, Result};

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000_000;

/// How long a run keeps dispatching batches.
///
/// The budget is checked only after a completed batch, never mid-batch, so a
/// `TimeLimit` run always folds in at least one full batch (a zero limit is
/// valid and yields exactly one) and may overshoot the limit by one batch's
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunBudget {
    /// Stop once the elapsed wall-clock time reaches the limit.
    TimeLimit(Duration),
    /// Stop after exactly this many completed batches. Wall-clock
    /// independent, so repeated runs are bit-for-bit reproducible.
    Batches(NonZeroU64),
}

/// Immutable parameters for one accumulator run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Series indices per chunk; every worker gets exactly one chunk per batch.
    pub chunk_size: u64,
    pub budget: RunBudget,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            budget: RunBudget::TimeLimit(DEFAULT_TIME_LIMIT),
        }
    }
}

impl RunConfig {
    pub fn with_time_limit(time_limit: Duration, chunk_size: u64) -> Self {
        Self {
            chunk_size,
            budget: RunBudget::TimeLimit(time_limit),
        }
    }

    pub fn with_batches(batches: NonZeroU64, chunk_size: u64) -> Self {
        Self {
            chunk_size,
            budget: RunBudget::Batches(batches),
        }
    }

    /// Rejects parameter combinations before any worker is spawned.
    pub fn validate(&self, workers: usize) -> Result<()> {
        if workers == 0 {
            return Err(AccumulatorError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(AccumulatorError::InvalidConfig(
                "chunk size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_minute_and_a_million_terms() {
        let config = RunConfig::default();
        assert_eq!(config.chunk_size, 1_000_000);
        assert_eq!(config.budget, RunBudget::TimeLimit(Duration::from_secs(60)));
    }

    #[test]
    fn validate_rejects_degenerate_parameters() {
        assert!(RunConfig::default().validate(0).is_err());
        assert!(
            RunConfig::with_time_limit(Duration::from_secs(1), 0)
                .validate(4)
                .is_err()
        );
        assert!(RunConfig::default().validate(1).is_ok());
    }
}
