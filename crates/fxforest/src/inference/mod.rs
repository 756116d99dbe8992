//! Inference over validated ensembles.
//!
//! # Module Structure
//!
//! - [`features`]: Feature vector type and boundary conversions
//! - [`traversal`]: Single-tree evaluation and traversal strategies
//! - [`unrolled`]: Padded perfect-tree layout used by [`UnrolledTraversal`]
//! - [`vote`]: Vote counting and the decision rule
//! - [`predictor`]: Ensemble-level prediction (single row and batch)
//!
//! # Quick Start
//!
//! ```
//! use fxforest::inference::{self, features};
//! use fxforest::repr::{Ensemble, Label, Tree};
//!
//! let ensemble = Ensemble::new(vec![Tree::leaf(Label::Positive); fxforest::N_TREES]).unwrap();
//! let fv = features::from_raw([0; fxforest::N_FEATURES]);
//! assert_eq!(inference::predict(&ensemble, &fv), Label::Positive);
//! ```

pub mod features;
pub mod predictor;
pub mod traversal;
pub mod unrolled;
pub mod vote;

pub use features::{FeatureError, FeatureVector};
pub use predictor::{predict, Predictor, SimplePredictor, UnrolledPredictor, DEFAULT_BLOCK_SIZE};
pub use traversal::{
    evaluate, evaluate_counted, traverse_from_node, StandardTraversal, TreeTraversal,
    UnrolledTraversal,
};
pub use unrolled::UnrolledTreeLayout;
pub use vote::{decide, VoteCount};
