//! Test and benchmark helpers.
//!
//! Small, hand-checkable fixtures live here; random generators live in
//! [`data`]. Helpers panic on misuse, they are not meant for production paths.

pub mod data;

use crate::repr::{Ensemble, Label, Q16, Tree, TreeBuilder};
use crate::N_TREES;

/// One split on `feature` at `threshold`, with the given leaf votes.
pub fn stump(feature: u32, threshold: Q16, left: Label, right: Label) -> Tree {
    let mut builder = TreeBuilder::with_capacity(3);
    builder.add_split(feature, threshold, 1, 2);
    builder.add_leaf(left);
    builder.add_leaf(right);
    builder.build().expect("stump feature must be < N_FEATURES")
}

/// Ensemble of constant trees where exactly `k` vote positive.
pub fn ensemble_with_positive_votes(k: usize) -> Ensemble {
    assert!(k <= N_TREES, "at most {N_TREES} positive votes, got {k}");
    let trees = (0..N_TREES)
        .map(|i| Tree::leaf(Label::from(i < k)))
        .collect();
    Ensemble::new(trees).expect("N_TREES trees")
}

/// Ensemble of stumps; tree `i` votes positive iff
/// `features[feature(i)] > threshold(i)`.
pub fn stump_ensemble(
    feature: impl Fn(usize) -> u32,
    threshold: impl Fn(usize) -> i16,
) -> Ensemble {
    let trees = (0..N_TREES)
        .map(|i| stump(feature(i), Q16::from_raw(threshold(i)), Label::Negative, Label::Positive))
        .collect();
    Ensemble::new(trees).expect("N_TREES trees")
}
