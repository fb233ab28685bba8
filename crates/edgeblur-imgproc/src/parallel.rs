use std::{fmt, str::FromStr};

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The strategy name could not be parsed.
    #[error("unknown execution strategy: {0}")]
    UnknownStrategy(String),
}

/// Controls how the stencil engine walks the image.
///
/// Every strategy produces byte-identical output; they only differ in how the
/// rows are partitioned and scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Visit every pixel in row-major order on the current thread, resolving
    /// all nine neighbours through the border policy.
    ///
    /// Slowest, but the reference for correctness.
    Serial,

    /// Run on the current thread, computing the interior from row windows with
    /// no per-neighbour bounds handling and the border in a separate pass.
    SerialRows,

    /// Use the global Rayon thread pool to process interior rows in parallel.
    #[default]
    ParallelRows,

    /// Run on a local thread pool with `n` threads, splitting the interior
    /// into `n` contiguous row ranges.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether the strategy runs on more than the calling thread.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::ParallelRows | Self::Fixed(_))
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::SerialRows => write!(f, "serial-rows"),
            Self::ParallelRows => write!(f, "parallel"),
            Self::Fixed(n) => write!(f, "parallel({n} threads)"),
        }
    }
}

impl FromStr for ExecutionStrategy {
    type Err = ParallelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "serial-rows" => Ok(Self::SerialRows),
            "parallel" => Ok(Self::ParallelRows),
            _ => Err(ParallelError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Split `rows` rows into `units` contiguous ranges and return the number of
/// rows per range. The last range may be shorter.
pub fn rows_per_unit(rows: usize, units: usize) -> Result<usize, ParallelError> {
    if units == 0 {
        return Err(ParallelError::InvalidThreadCount(units));
    }
    Ok(rows.div_ceil(units).max(1))
}

/// Apply `f` to disjoint blocks of `rows_per_block` rows in parallel.
///
/// `f` receives the index of the first row of the block (relative to `dst`)
/// and the block itself. The blocks never overlap, so no synchronization is
/// needed for the writes.
pub fn par_iter_row_blocks(
    dst: &mut [u8],
    cols: usize,
    rows_per_block: usize,
    f: impl Fn(usize, &mut [u8]) + Send + Sync,
) {
    let block_len = cols * rows_per_block;
    if block_len == 0 {
        return;
    }
    dst.par_chunks_mut(block_len)
        .enumerate()
        .for_each(|(i, block)| f(i * rows_per_block, block));
}

/// Run `op` inside a local thread pool with `num_threads` threads.
pub fn with_thread_pool<R, F>(num_threads: usize, op: F) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if num_threads == 0 {
        return Err(ParallelError::InvalidThreadCount(num_threads));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))?;

    Ok(pool.install(op))
}
