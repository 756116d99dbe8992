//! Ensemble predictor.
//!
//! [`Predictor`] is generic over a [`TreeTraversal`] strategy. It builds the
//! per-tree state once and then answers single-row and batch queries.
//!
//! # Usage
//!
//! ```ignore
//! use fxforest::inference::{Predictor, UnrolledTraversal};
//! use fxforest::Parallelism;
//!
//! let predictor = Predictor::<UnrolledTraversal>::new(&ensemble);
//! let label = predictor.predict(&features, Parallelism::Sequential);
//! ```
//!
//! # Choosing a Traversal Strategy
//!
//! - [`StandardTraversal`]: no setup cost, path-length loop.
//! - [`UnrolledTraversal`]: precomputed perfect-tree layouts, fixed step count.
//!   Best for batches.
//!
//! # Parallelism
//!
//! For one row, `Parallelism::Parallel` fans the trees out over the rayon pool
//! and sums the votes. For batches, blocks of rows are processed in parallel
//! and each block walks trees sequentially. Either way the result is the same
//! as sequential evaluation.

use ndarray::ArrayView2;

use crate::repr::{Ensemble, Label};
use crate::utils::Parallelism;

use super::features::{self, FeatureError, FeatureVector};
use super::traversal::{StandardTraversal, TreeTraversal, UnrolledTraversal};
use super::vote::{decide, VoteCount};

/// Default block size for batch processing.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Predictor for a validated [`Ensemble`].
///
/// # Type Parameters
///
/// - `T`: Traversal strategy ([`StandardTraversal`] or [`UnrolledTraversal`])
#[derive(Debug)]
pub struct Predictor<'e, T: TreeTraversal> {
    ensemble: &'e Ensemble,
    /// Pre-computed state for each tree (e.g., unrolled layouts)
    tree_states: Box<[T::TreeState]>,
    /// Number of rows to process together
    block_size: usize,
}

impl<'e, T: TreeTraversal> Predictor<'e, T> {
    /// Create a new predictor, building per-tree state upfront.
    pub fn new(ensemble: &'e Ensemble) -> Self {
        let tree_states: Box<[_]> = ensemble.trees().iter().map(T::build_tree_state).collect();
        Self {
            ensemble,
            tree_states,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Set the number of rows processed together in batch prediction.
    ///
    /// A block size of zero is treated as one.
    #[inline]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn ensemble(&self) -> &Ensemble {
        self.ensemble
    }

    /// Number of trees voting positive for `features`.
    pub fn vote_count(&self, features: &FeatureVector, parallelism: Parallelism) -> VoteCount {
        let trees = self.ensemble.trees();
        let sum = parallelism.maybe_par_sum(0..trees.len(), |idx| {
            T::traverse_tree(&trees[idx], &self.tree_states[idx], features).as_u8() as usize
        });
        VoteCount::from_sum(sum)
    }

    /// Classify one feature vector.
    #[inline]
    pub fn predict(&self, features: &FeatureVector, parallelism: Parallelism) -> Label {
        decide(self.vote_count(features, parallelism))
    }

    /// Classify every row of a `[n_rows, N_FEATURES]` matrix.
    ///
    /// Fails only if the column count is wrong; the i-th output is the
    /// classification of the i-th row.
    pub fn predict_batch(
        &self,
        rows: ArrayView2<'_, i16>,
        parallelism: Parallelism,
    ) -> Result<Vec<Label>, FeatureError> {
        Ok(self
            .vote_count_batch(rows, parallelism)?
            .into_iter()
            .map(decide)
            .collect())
    }

    /// Vote counts for every row of a `[n_rows, N_FEATURES]` matrix.
    pub fn vote_count_batch(
        &self,
        rows: ArrayView2<'_, i16>,
        parallelism: Parallelism,
    ) -> Result<Vec<VoteCount>, FeatureError> {
        features::check_batch(&rows)?;

        let mut output = vec![VoteCount::ZERO; rows.nrows()];
        parallelism.maybe_par_chunks_mut_for_each(&mut output, self.block_size, |block_idx, out| {
            let start = block_idx * self.block_size;
            let block: Vec<FeatureVector> = (start..start + out.len())
                .map(|row| features::row_at(&rows, row))
                .collect();
            self.vote_count_block(&block, out);
        });
        Ok(output)
    }

    /// Accumulate votes for one block of rows, one tree at a time.
    fn vote_count_block(&self, block: &[FeatureVector], output: &mut [VoteCount]) {
        let mut sums = vec![0usize; block.len()];
        let mut labels = vec![Label::Negative; block.len()];

        for (tree, state) in self.ensemble.trees().iter().zip(self.tree_states.iter()) {
            T::traverse_block(tree, state, block, &mut labels);
            for (sum, label) in sums.iter_mut().zip(&labels) {
                *sum += label.as_u8() as usize;
            }
        }

        for (out, sum) in output.iter_mut().zip(sums) {
            *out = VoteCount::from_sum(sum);
        }
    }
}

// =============================================================================
// Type Aliases and Entry Point
// =============================================================================

/// Predictor using node-by-node traversal (no pre-computation).
pub type SimplePredictor<'e> = Predictor<'e, StandardTraversal>;

/// Predictor using the padded perfect-tree layout.
pub type UnrolledPredictor<'e> = Predictor<'e, UnrolledTraversal>;

/// Classify one feature vector with sequential standard traversal.
///
/// Total for every validated ensemble; does not allocate.
pub fn predict(ensemble: &Ensemble, features: &FeatureVector) -> Label {
    let sum: usize = ensemble
        .trees()
        .iter()
        .map(|tree| super::traversal::evaluate(tree, features).as_u8() as usize)
        .sum();
    decide(VoteCount::from_sum(sum))
}
