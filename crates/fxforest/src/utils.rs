//! Parallelism configuration and thread-pool setup.
//!
//! Inference has two parallel shapes: a fan-out over trees followed by a sum
//! (one row), and independent blocks of rows (batches). Both are expressed as
//! `maybe_par_*` helpers that fall back to plain iteration when sequential.

use rayon::prelude::*;
use tracing::warn;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// When `Parallel`, helpers may use `rayon` parallel iterators on the current
/// pool. The pool itself is set up by [`run_with_threads`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map every item to a count and sum the counts.
    ///
    /// Integer addition is associative, so the result does not depend on how
    /// rayon splits the work.
    #[inline]
    pub fn maybe_par_sum<T, I, F>(self, iter: I, f: F) -> usize
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> usize + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).sum()
        } else {
            iter.into_iter().map(f).sum()
        }
    }

    /// Call `f(chunk_idx, chunk)` for each `chunk_size` chunk of `data`.
    ///
    /// The last chunk may be shorter.
    #[inline]
    pub fn maybe_par_chunks_mut_for_each<T, F>(self, data: &mut [T], chunk_size: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        if self.is_parallel() {
            data.par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(idx, chunk)| f(idx, chunk));
        } else {
            data.chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(idx, chunk)| f(idx, chunk));
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created, the closure runs sequentially.
///
/// # Example
///
/// ```
/// use fxforest::run_with_threads;
///
/// let result = run_with_threads(1, |_| 40 + 2);
/// assert_eq!(result, 42);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    warn!(n_threads, %err, "failed to build thread pool, running sequentially");
                    f(Parallelism::Sequential)
                }
            }
        }
    }
}
