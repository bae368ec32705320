use crate::Algorithm;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`crate::HashProvider`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} is not supported by this provider")]
    Unsupported(Algorithm),

    #[error("{algorithm} failed: {reason}")]
    Failed { algorithm: Algorithm, reason: String },
}

/// Errors that end a benchmark invocation.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("run count must be at least 1, got {0}")]
    InvalidRunCount(usize),

    /// A row was appended to a table whose header assumes a different run count.
    #[error("table expects rows for {expected} runs, got a row for {actual} runs")]
    RunCountMismatch { expected: usize, actual: usize },

    #[error("hashing failed on run {run}")]
    Provider {
        run: usize,
        #[source]
        source: ProviderError,
    },

    #[error("cannot write results to {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BenchError {
    /// True for errors caused by caller input rather than by the run itself.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            BenchError::InvalidRunCount(_) | BenchError::RunCountMismatch { .. }
        )
    }
}
