use std::{error::Error, fmt, io};

/// The accumulator's result type.
pub type Result<T> = std::result::Result<T, AccumulatorError>;

/// All errors that can abort an accumulator run.
#[derive(Debug)]
pub enum AccumulatorError {
    /// Invalid run parameters — caught before the pool is built.
    InvalidConfig(String),
    /// A worker failed while evaluating a chunk. The run is aborted and no
    /// partial-batch result is ever folded in.
    WorkerFailure { batch: u64, reason: String },
    /// The chunk cursor ran out of `u64` index space.
    IndexSpaceExhausted,
    /// The worker pool could not be created.
    PoolBuild(rayon::ThreadPoolBuildError),
}

impl fmt::Display for AccumulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::WorkerFailure { batch, reason } => {
                write!(f, "worker failed in batch {batch}: {reason}")
            }
            Self::IndexSpaceExhausted => {
                write!(f, "series index space exhausted (u64 cursor overflow)")
            }
            Self::PoolBuild(e) => write!(f, "failed to build worker pool: {e}"),
        }
    }
}

impl Error for AccumulatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PoolBuild(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for AccumulatorError {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Self::PoolBuild(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<AccumulatorError> for io::Error {
    fn from(value: AccumulatorError) -> Self {
        match value {
            AccumulatorError::InvalidConfig(msg) => {
                io::Error::new(io::ErrorKind::InvalidInput, msg)
            }
            other => io::Error::other(other),
        }
    }
}
