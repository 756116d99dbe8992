//! fxforest: fixed-point random-forest inference for a binary anomaly detector.
//!
//! A trained ensemble of exactly [`N_TREES`] shallow decision trees votes on a
//! [`N_FEATURES`]-wide vector of signed 16-bit fixed-point features. The input
//! is classified positive when at least [`VOTE_REQUIRED`] trees vote positive.
//! Everything on the inference path is integer-only, allocation-free for
//! single rows, and deterministic.
//!
//! # Key Types
//!
//! - [`Ensemble`] / [`Tree`] - Validated, immutable model representation
//! - [`Predictor`] - Ensemble inference over a [`TreeTraversal`] strategy
//! - [`ForestClassifier`] / [`ClassifierConfig`] - High-level wrapper
//! - [`Q16`] / [`FeatureVector`] - Fixed-point values and inputs
//!
//! # Building a Model
//!
//! Trees are built with [`TreeBuilder`], from a list of [`repr::Node`]s, or
//! imported from flat exported arrays with [`Tree::from_flat_arrays`]. Every
//! path validates structure, feature indices, and depth; a model that does not
//! satisfy them is rejected before any prediction is made.
//!
//! # Example
//!
//! ```
//! use fxforest::{inference, Ensemble, Label, N_TREES};
//! use fxforest::repr::{Node, Tree};
//!
//! // Each tree votes positive iff feature 0 is above 10.
//! let tree = Tree::from_nodes([
//!     Node::split(0, 10i16, 1, 2),
//!     Node::leaf(Label::Negative),
//!     Node::leaf(Label::Positive),
//! ])?;
//! let ensemble = Ensemble::new(vec![tree; N_TREES])?;
//!
//! let low = inference::features::from_raw([10, 0, 0, 0, 0, 0]);
//! let high = inference::features::from_raw([11, 0, 0, 0, 0, 0]);
//! assert_eq!(inference::predict(&ensemble, &low), Label::Negative);
//! assert_eq!(inference::predict(&ensemble, &high), Label::Positive);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod inference;
pub mod model;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Model Constants
// =============================================================================

/// Number of features in a feature vector.
pub const N_FEATURES: usize = 6;

/// Number of trees in an ensemble.
pub const N_TREES: usize = 80;

/// Positive votes needed for a positive decision (70% of [`N_TREES`]).
pub const VOTE_REQUIRED: usize = 56;

/// Maximum number of comparisons on any root-to-leaf path.
pub const MAX_DEPTH: usize = 6;

const _: () = {
    assert!(VOTE_REQUIRED > 0 && VOTE_REQUIRED <= N_TREES);
    assert!(N_TREES <= u8::MAX as usize);
    assert!(N_FEATURES <= u8::MAX as usize);
};

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Representation
pub use repr::{Ensemble, EnsembleError, Label, Q16, Tree, TreeBuilder, TreeValidationError};

// Inference
pub use inference::{
    predict, FeatureError, FeatureVector, Predictor, StandardTraversal, TreeTraversal,
    UnrolledTraversal, VoteCount,
};

// High-level classifier
pub use model::{ClassifierConfig, ConfigError, EnsembleMeta, ForestClassifier, TraversalKind};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
