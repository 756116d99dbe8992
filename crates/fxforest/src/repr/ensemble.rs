//! Canonical ensemble representation (fixed-size collection of trees).

use tracing::debug;

use crate::{N_FEATURES, N_TREES, VOTE_REQUIRED};

use super::tree::{FlatTreeArrays, Tree, TreeValidationError};

/// Structural validation errors for [`Ensemble`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnsembleError {
    #[error("ensemble needs exactly {expected} trees, got {actual}")]
    TreeCountMismatch { expected: usize, actual: usize },

    #[error("tree {tree_idx} is invalid: {error}")]
    InvalidTree {
        tree_idx: usize,
        #[source]
        error: TreeValidationError,
    },
}

/// Validated ensemble of exactly [`N_TREES`] binary-vote trees.
///
/// Tree order carries no meaning: the vote sum is commutative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensemble {
    trees: Box<[Tree]>,
    max_depth: usize,
    n_nodes: usize,
}

impl Ensemble {
    /// Assemble an ensemble from already-validated trees.
    pub fn new(trees: Vec<Tree>) -> Result<Self, EnsembleError> {
        if trees.len() != N_TREES {
            return Err(EnsembleError::TreeCountMismatch {
                expected: N_TREES,
                actual: trees.len(),
            });
        }
        Ok(Self::from_validated(trees.into_boxed_slice()))
    }

    /// Import every tree from flat exported arrays, then assemble.
    pub fn from_flat_arrays(arrays: &[FlatTreeArrays<'_>]) -> Result<Self, EnsembleError> {
        if arrays.len() != N_TREES {
            return Err(EnsembleError::TreeCountMismatch {
                expected: N_TREES,
                actual: arrays.len(),
            });
        }
        let trees = arrays
            .iter()
            .enumerate()
            .map(|(tree_idx, &tree)| {
                Tree::from_flat_arrays(tree)
                    .map_err(|error| EnsembleError::InvalidTree { tree_idx, error })
            })
            .collect::<Result<Box<[_]>, _>>()?;
        Ok(Self::from_validated(trees))
    }

    fn from_validated(trees: Box<[Tree]>) -> Self {
        let max_depth = trees.iter().map(Tree::depth).max().unwrap_or(0);
        let n_nodes = trees.iter().map(Tree::n_nodes).sum();
        debug!(n_trees = trees.len(), max_depth, n_nodes, "assembled ensemble");
        Self { trees, max_depth, n_nodes }
    }

    /// All trees, in storage order.
    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        N_FEATURES
    }

    /// Minimum number of positive votes for a positive decision.
    #[inline]
    pub fn vote_required(&self) -> usize {
        VOTE_REQUIRED
    }

    /// Depth of the deepest tree.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Total node count across all trees.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }
}

impl From<[Tree; N_TREES]> for Ensemble {
    fn from(trees: [Tree; N_TREES]) -> Self {
        Self::from_validated(Box::new(trees))
    }
}
