use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::BenchError;
use crate::provider::HashProvider;
use crate::table::ResultRow;
use crate::Algorithm;

/// Reported in place of an average when no samples survive trimming.
pub const NO_AVERAGE: f64 = -1.0;

/// One benchmark request: which algorithm, how many timed runs, what to hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    algorithm: Algorithm,
    runs: usize,
    phrase: String,
}

impl Invocation {
    pub fn new(
        algorithm: Algorithm,
        runs: usize,
        phrase: impl Into<String>,
    ) -> Result<Self, BenchError> {
        if runs == 0 {
            return Err(BenchError::InvalidRunCount(runs));
        }
        Ok(Self {
            algorithm,
            runs,
            phrase: phrase.into(),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

/// Per-run elapsed nanoseconds, in call order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingSeries(Vec<u64>);

impl TimingSeries {
    pub fn samples(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn aggregate(&self) -> Aggregate {
        aggregate(&self.0)
    }
}

impl From<Vec<u64>> for TimingSeries {
    fn from(samples: Vec<u64>) -> Self {
        Self(samples)
    }
}

/// A series with its first sample dropped, and the mean of what remains.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    pub trimmed: Vec<u64>,
    pub average: f64,
}

/// Drops sample 0 (cold caches, lazy init) and averages the rest.
///
/// Returns [`NO_AVERAGE`] when fewer than two samples are given.
pub fn aggregate(series: &[u64]) -> Aggregate {
    let trimmed = series.get(1..).unwrap_or_default().to_vec();
    let average = if trimmed.is_empty() {
        NO_AVERAGE
    } else {
        let total: u128 = trimmed.iter().map(|&ns| u128::from(ns)).sum();
        total as f64 / trimmed.len() as f64
    };
    Aggregate { trimmed, average }
}

fn duration_ns(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
}

/// Times `invocation.runs()` sequential hash calls, one fresh timer per call.
///
/// The first provider failure aborts the whole series.
pub fn run<P: HashProvider + ?Sized>(
    provider: &P,
    invocation: &Invocation,
) -> Result<TimingSeries, BenchError> {
    let algorithm = invocation.algorithm();
    let input = invocation.phrase().as_bytes();
    let mut samples = Vec::with_capacity(invocation.runs());

    for run in 0..invocation.runs() {
        let start = Instant::now();
        let digest = provider.hash(algorithm, input);
        let elapsed = start.elapsed();

        let digest = digest.map_err(|source| BenchError::Provider { run, source })?;
        black_box(digest);
        samples.push(duration_ns(elapsed));
    }

    Ok(TimingSeries(samples))
}

/// Runs, trims and renders one invocation as a result row.
pub fn benchmark<P: HashProvider + ?Sized>(
    provider: &P,
    invocation: &Invocation,
) -> Result<ResultRow, BenchError> {
    info!(
        algorithm = %invocation.algorithm(),
        runs = invocation.runs(),
        input_bytes = invocation.phrase().len(),
        "timing hash"
    );
    let series = run(provider, invocation)?;
    let stats = series.aggregate();
    debug!(
        algorithm = %invocation.algorithm(),
        first_ns = series.samples().first().copied(),
        kept = stats.trimmed.len(),
        average_ns = stats.average,
        "series aggregated"
    );
    Ok(ResultRow::new(invocation.algorithm(), &stats))
}
