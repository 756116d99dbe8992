//! Seeded random inputs and models.

use ndarray::Array2;
use rand::prelude::*;

use crate::inference::FeatureVector;
use crate::repr::{Ensemble, Label, NodeId, Q16, Tree, TreeBuilder};
use crate::{MAX_DEPTH, N_FEATURES, N_TREES};

/// Uniform random feature vector over the full 16-bit range.
pub fn random_feature_vector<R: Rng>(rng: &mut R) -> FeatureVector {
    std::array::from_fn(|_| Q16::from_raw(rng.gen()))
}

/// Random `[rows, N_FEATURES]` matrix, values uniform in `[min, max]`.
pub fn random_rows(rows: usize, seed: u64, min: i16, max: i16) -> Array2<i16> {
    assert!(max >= min);
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, N_FEATURES), |_| rng.gen_range(min..=max))
}

/// Random well-formed tree with depth at most `max_depth` (capped at `MAX_DEPTH`).
///
/// Each node below the depth cap becomes a leaf with probability `leaf_prob`.
pub fn random_tree<R: Rng>(rng: &mut R, max_depth: usize, leaf_prob: f64) -> Tree {
    fn grow<R: Rng>(
        builder: &mut TreeBuilder,
        rng: &mut R,
        level: usize,
        max_depth: usize,
        leaf_prob: f64,
    ) -> NodeId {
        if level == max_depth || rng.gen_bool(leaf_prob) {
            return builder.add_leaf(Label::from(rng.gen_bool(0.5)));
        }
        let feature = rng.gen_range(0..N_FEATURES as u32);
        let threshold = Q16::from_raw(rng.gen());
        let id = builder.add_split(feature, threshold, 0, 0);
        let left = grow(builder, rng, level + 1, max_depth, leaf_prob);
        let right = grow(builder, rng, level + 1, max_depth, leaf_prob);
        builder.set_children(id, left, right);
        id
    }

    let mut builder = TreeBuilder::new();
    grow(&mut builder, rng, 0, max_depth.min(MAX_DEPTH), leaf_prob.clamp(0.0, 1.0));
    builder.build().expect("generated trees are well-formed")
}

/// Random ensemble of `N_TREES` trees up to `MAX_DEPTH`.
pub fn random_ensemble(seed: u64) -> Ensemble {
    let mut rng = StdRng::seed_from_u64(seed);
    let trees = (0..N_TREES)
        .map(|_| random_tree(&mut rng, MAX_DEPTH, 0.2))
        .collect();
    Ensemble::new(trees).expect("N_TREES trees")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_trees_respect_depth() {
        let mut rng = StdRng::seed_from_u64(7);
        for max_depth in 0..=MAX_DEPTH + 2 {
            let tree = random_tree(&mut rng, max_depth, 0.1);
            assert!(tree.depth() <= max_depth.min(MAX_DEPTH));
        }
    }

    #[test]
    fn random_ensemble_is_reproducible() {
        assert_eq!(random_ensemble(3), random_ensemble(3));
        assert_eq!(random_rows(10, 1, -5, 5), random_rows(10, 1, -5, 5));
    }

    #[test]
    fn random_rows_within_bounds() {
        let rows = random_rows(100, 9, -3, 4);
        assert_eq!(rows.ncols(), N_FEATURES);
        assert!(rows.iter().all(|&v| (-3..=4).contains(&v)));
    }
}
