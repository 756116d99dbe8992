//! Unrolled tree layout for fixed-step, branch-free traversal.
//!
//! Every validated tree has depth `<= MAX_DEPTH`, so it can be re-laid as a
//! perfect binary tree of exactly `MAX_DEPTH` levels stored in a flat array:
//!
//! ```text
//! Level 0:           [0]              <- root (array idx 0)
//! Level 1:        [1]   [2]           <- array idx 1, 2
//! Level 2:      [3][4] [5][6]         <- array idx 3, 4, 5, 6
//! ...
//! ```
//!
//! `left = 2*i + 1`, `right = 2*i + 2`. After `MAX_DEPTH` steps a row lands on
//! one of `2^MAX_DEPTH` exits, each holding a leaf vote.
//!
//! A leaf reached before the last level is padded: its slot compares against
//! `Q16::MAX`, which every value satisfies, so rows keep going left until they
//! reach the exit that carries the leaf's vote.

use tracing::trace;

use crate::repr::{Label, NodeId, Q16, Tree};
use crate::MAX_DEPTH;

use super::features::FeatureVector;

/// Number of comparison slots in the perfect layout.
pub const UNROLLED_SLOTS: usize = (1 << MAX_DEPTH) - 1;

/// Number of exits (leaf votes) at the bottom of the layout.
pub const UNROLLED_EXITS: usize = 1 << MAX_DEPTH;

/// First array index at a given level.
#[inline]
const fn level_start(level: usize) -> usize {
    (1 << level) - 1
}

/// Perfect-tree layout of one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrolledTreeLayout {
    /// Split feature index per slot.
    split_features: [u8; UNROLLED_SLOTS],

    /// Split threshold per slot (`Q16::MAX` for padding).
    split_thresholds: [Q16; UNROLLED_SLOTS],

    /// Vote per exit.
    exit_labels: [Label; UNROLLED_EXITS],
}

impl UnrolledTreeLayout {
    /// Lay out a validated tree.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut layout = Self {
            split_features: [0; UNROLLED_SLOTS],
            split_thresholds: [Q16::MAX; UNROLLED_SLOTS],
            exit_labels: [Label::Negative; UNROLLED_EXITS],
        };
        layout.populate(tree, 0, 0, 0);
        trace!(
            tree_depth = tree.depth(),
            n_nodes = tree.n_nodes(),
            "built unrolled layout"
        );
        layout
    }

    /// Fill the subtree rooted at array slot `slot` from tree node `node`.
    fn populate(&mut self, tree: &Tree, node: NodeId, slot: usize, level: usize) {
        if level == MAX_DEPTH {
            // Validation bounds the depth, so only leaves reach the last level.
            debug_assert!(tree.is_leaf(node));
            self.exit_labels[slot - UNROLLED_SLOTS] = tree.leaf_label(node);
            return;
        }

        let (left, right) = if tree.is_leaf(node) {
            self.split_features[slot] = 0;
            self.split_thresholds[slot] = Q16::MAX;
            (node, node)
        } else {
            // Features are `< N_FEATURES`, which fits in a byte.
            self.split_features[slot] = tree.split_feature(node) as u8;
            self.split_thresholds[slot] = tree.split_threshold(node);
            (tree.left_child(node), tree.right_child(node))
        };

        self.populate(tree, left, 2 * slot + 1, level + 1);
        self.populate(tree, right, 2 * slot + 2, level + 1);
    }

    /// Split feature index for a slot.
    #[inline]
    pub fn split_feature(&self, slot: usize) -> u8 {
        self.split_features[slot]
    }

    /// Split threshold for a slot.
    #[inline]
    pub fn split_threshold(&self, slot: usize) -> Q16 {
        self.split_thresholds[slot]
    }

    /// Vote at an exit.
    #[inline]
    pub fn exit_label(&self, exit_idx: usize) -> Label {
        self.exit_labels[exit_idx]
    }

    /// Traverse the layout for a single row, returning the exit index.
    #[inline]
    pub fn traverse_to_exit(&self, features: &FeatureVector) -> usize {
        let mut idx = 0usize;
        for _ in 0..MAX_DEPTH {
            let value = features[self.split_features[idx] as usize];
            let go_right = value > self.split_thresholds[idx];
            idx = 2 * idx + 1 + go_right as usize;
        }
        idx - UNROLLED_SLOTS
    }

    /// Process a block of rows through the layout, level by level.
    ///
    /// `exits` receives the exit index for each row (length = `rows.len()`).
    pub fn process_block(&self, rows: &[FeatureVector], exits: &mut [usize]) {
        debug_assert_eq!(rows.len(), exits.len());
        exits.fill(0);

        // `pos` is the position within the current level.
        for level in 0..MAX_DEPTH {
            let start = level_start(level);
            for (row, pos) in rows.iter().zip(exits.iter_mut()) {
                let slot = start + *pos;
                let value = row[self.split_features[slot] as usize];
                let go_right = value > self.split_thresholds[slot];
                *pos = 2 * *pos + go_right as usize;
            }
        }
    }

    /// Map exit indices to votes.
    #[inline]
    pub fn labels_for_exits(&self, exits: &[usize], output: &mut [Label]) {
        for (out, &exit) in output.iter_mut().zip(exits) {
            *out = self.exit_labels[exit];
        }
    }
}
