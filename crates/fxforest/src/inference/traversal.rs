//! Tree traversal strategies for prediction.
//!
//! This module provides the [`TreeTraversal`] trait and implementations that
//! abstract how a tree is walked to its leaf vote.
//!
//! # Available Strategies
//!
//! - [`StandardTraversal`]: Direct node-by-node walk of the arena
//! - [`UnrolledTraversal`]: Uses [`UnrolledTreeLayout`] for fixed-step, branch-free traversal
//!
//! Both strategies return the same [`Label`] for every tree and every input.
//!
//! # Split rule
//!
//! A split sends a row left iff `features[feature] <= threshold`, a signed
//! 16-bit comparison. Equality goes left.

use crate::repr::{Label, NodeId, Tree};

use super::features::FeatureVector;
use super::unrolled::UnrolledTreeLayout;

// =============================================================================
// TreeTraversal Trait
// =============================================================================

/// Strategy for traversing a tree during prediction.
///
/// Implementations may precompute per-tree state once (when a predictor is
/// built) and then reuse it for every row.
pub trait TreeTraversal: Clone {
    /// State held per-tree for this traversal strategy.
    ///
    /// For standard traversal, this is `()`. For unrolled traversal, this is
    /// [`UnrolledTreeLayout`].
    type TreeState: Clone + Send + Sync;

    /// Build traversal state for a tree.
    fn build_tree_state(tree: &Tree) -> Self::TreeState;

    /// Traverse a tree with the given features, returning its vote.
    fn traverse_tree(tree: &Tree, state: &Self::TreeState, features: &FeatureVector) -> Label;

    /// Traverse a tree for a block of rows.
    ///
    /// Default implementation calls `traverse_tree` per row. Specialized
    /// implementations process all rows level by level instead.
    #[inline]
    fn traverse_block(
        tree: &Tree,
        state: &Self::TreeState,
        rows: &[FeatureVector],
        output: &mut [Label],
    ) {
        debug_assert_eq!(rows.len(), output.len());
        for (row, out) in rows.iter().zip(output.iter_mut()) {
            *out = Self::traverse_tree(tree, state, row);
        }
    }
}

// =============================================================================
// Shared Traversal Helpers
// =============================================================================

/// Which child a split sends `features` to.
#[inline(always)]
fn next_node(tree: &Tree, node: NodeId, features: &FeatureVector) -> NodeId {
    let value = features[tree.split_feature(node) as usize];
    if value <= tree.split_threshold(node) {
        tree.left_child(node)
    } else {
        tree.right_child(node)
    }
}

/// Continue traversal from a given node to a leaf.
///
/// Returns the leaf node id reached.
#[inline]
pub fn traverse_from_node(tree: &Tree, start_node: NodeId, features: &FeatureVector) -> NodeId {
    let mut idx = start_node;
    while !tree.is_leaf(idx) {
        idx = next_node(tree, idx, features);
    }
    idx
}

/// Evaluate one tree: walk from the root to a leaf and return its vote.
///
/// Total for every validated tree and every feature vector; performs at most
/// `tree.depth()` comparisons and does not allocate.
#[inline]
pub fn evaluate(tree: &Tree, features: &FeatureVector) -> Label {
    tree.leaf_label(traverse_from_node(tree, 0, features))
}

/// Like [`evaluate`], also returning the number of comparisons performed.
pub fn evaluate_counted(tree: &Tree, features: &FeatureVector) -> (Label, usize) {
    let mut idx = 0;
    let mut steps = 0;
    while !tree.is_leaf(idx) {
        idx = next_node(tree, idx, features);
        steps += 1;
    }
    (tree.leaf_label(idx), steps)
}

// =============================================================================
// StandardTraversal
// =============================================================================

/// Standard node-by-node tree traversal.
///
/// Needs no precomputation; the loop length depends on the path taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTraversal;

impl TreeTraversal for StandardTraversal {
    type TreeState = ();

    #[inline]
    fn build_tree_state(_tree: &Tree) -> Self::TreeState {}

    #[inline]
    fn traverse_tree(tree: &Tree, _state: &Self::TreeState, features: &FeatureVector) -> Label {
        evaluate(tree, features)
    }
}

// =============================================================================
// UnrolledTraversal
// =============================================================================

/// Traversal over a padded perfect-tree layout.
///
/// Every row takes exactly [`MAX_DEPTH`](crate::MAX_DEPTH) steps with simple
/// index arithmetic; see [`UnrolledTreeLayout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnrolledTraversal;

impl TreeTraversal for UnrolledTraversal {
    type TreeState = UnrolledTreeLayout;

    #[inline]
    fn build_tree_state(tree: &Tree) -> Self::TreeState {
        UnrolledTreeLayout::from_tree(tree)
    }

    #[inline]
    fn traverse_tree(_tree: &Tree, state: &Self::TreeState, features: &FeatureVector) -> Label {
        state.exit_label(state.traverse_to_exit(features))
    }

    /// Level-by-level block traversal: all rows visit the same level together.
    #[inline]
    fn traverse_block(
        _tree: &Tree,
        state: &Self::TreeState,
        rows: &[FeatureVector],
        output: &mut [Label],
    ) {
        let block_size = output.len();

        // Use stack for small blocks, heap for large
        if block_size <= 256 {
            let mut exits = [0usize; 256];
            let exits = &mut exits[..block_size];
            state.process_block(rows, exits);
            state.labels_for_exits(exits, output);
        } else {
            let mut exits = vec![0usize; block_size];
            state.process_block(rows, &mut exits);
            state.labels_for_exits(&exits, output);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::let_unit_value)]

    use super::*;
    use crate::inference::features::from_raw;
    use crate::repr::{Node, Q16};
    use crate::testing::stump;
    use rstest::rstest;

    /// ```text
    ///        [0] f0 <= 10
    ///        /          \
    ///    [1] f1 <= -5   [2] leaf=1
    ///     /       \
    /// [3] leaf=0  [4] leaf=1
    /// ```
    fn build_deeper_tree() -> Tree {
        Tree::from_nodes([
            Node::split(0, 10i16, 1, 2),
            Node::split(1, -5i16, 3, 4),
            Node::leaf(Label::Positive),
            Node::leaf(Label::Negative),
            Node::leaf(Label::Positive),
        ])
        .unwrap()
    }

    #[rstest]
    #[case::below(-1, Label::Negative)]
    #[case::equal(0, Label::Negative)]
    #[case::above(1, Label::Positive)]
    #[case::min(i16::MIN, Label::Negative)]
    #[case::max(i16::MAX, Label::Positive)]
    fn threshold_equality_goes_left(#[case] x: i16, #[case] expected: Label) {
        let tree = stump(0, Q16::ZERO, Label::Negative, Label::Positive);
        let fv = from_raw([x, 0, 0, 0, 0, 0]);
        assert_eq!(evaluate(&tree, &fv), expected);

        let state = StandardTraversal::build_tree_state(&tree);
        assert_eq!(StandardTraversal::traverse_tree(&tree, &state, &fv), expected);
    }

    #[rstest]
    #[case::left_left([10, -5, 0, 0, 0, 0], Label::Negative, 2)]
    #[case::left_right([10, -4, 0, 0, 0, 0], Label::Positive, 2)]
    #[case::right([11, -100, 0, 0, 0, 0], Label::Positive, 1)]
    fn counted_traversal(#[case] raw: [i16; 6], #[case] label: Label, #[case] steps: usize) {
        let tree = build_deeper_tree();
        let fv = from_raw(raw);
        assert_eq!(evaluate_counted(&tree, &fv), (label, steps));
        assert!(steps <= tree.depth());
    }

    #[test]
    fn leaf_root_takes_no_steps() {
        let tree = Tree::leaf(Label::Positive);
        let fv = from_raw([i16::MIN; 6]);
        assert_eq!(evaluate_counted(&tree, &fv), (Label::Positive, 0));
    }

    #[test]
    fn traverse_from_inner_node() {
        let tree = build_deeper_tree();
        let fv = from_raw([i16::MAX, -5, 0, 0, 0, 0]);
        // From the root the row goes right; from node 1 it resolves on feature 1.
        assert_eq!(traverse_from_node(&tree, 0, &fv), 2);
        assert_eq!(traverse_from_node(&tree, 1, &fv), 3);
    }

    #[test]
    fn unrolled_traversal_matches_standard() {
        let tree = build_deeper_tree();
        let std_state = StandardTraversal::build_tree_state(&tree);
        let unrolled_state = UnrolledTraversal::build_tree_state(&tree);

        for f0 in [i16::MIN, -1, 10, 11, i16::MAX] {
            for f1 in [i16::MIN, -6, -5, -4, i16::MAX] {
                let fv = from_raw([f0, f1, 0, 0, 0, 0]);
                assert_eq!(
                    StandardTraversal::traverse_tree(&tree, &std_state, &fv),
                    UnrolledTraversal::traverse_tree(&tree, &unrolled_state, &fv),
                    "mismatch for f0={f0} f1={f1}"
                );
            }
        }
    }

    #[test]
    fn block_traversal_matches_row_traversal() {
        let tree = build_deeper_tree();
        let rows: Vec<FeatureVector> = (-20i16..20)
            .map(|i| from_raw([i, i / 2 - 5, 0, 0, 0, 0]))
            .collect();

        let expected: Vec<Label> = rows.iter().map(|fv| evaluate(&tree, fv)).collect();

        let mut std_out = vec![Label::Negative; rows.len()];
        StandardTraversal::traverse_block(&tree, &(), &rows, &mut std_out);
        assert_eq!(std_out, expected);

        let state = UnrolledTraversal::build_tree_state(&tree);
        let mut unrolled_out = vec![Label::Negative; rows.len()];
        UnrolledTraversal::traverse_block(&tree, &state, &rows, &mut unrolled_out);
        assert_eq!(unrolled_out, expected);
    }
}
