//! Canonical tree representation (flat arena) and its construction paths.
//!
//! This module provides:
//! - [`Tree`]: immutable, validated node arena used by inference
//! - [`TreeBuilder`]: incremental construction from split/leaf nodes
//! - [`FlatTreeArrays`]: the flat parallel-array layout emitted by training exporters
//! - [`TreeValidationError`]: structural problems detected at construction
//!
//! A `Tree` can only be obtained through a validating path, so inference code
//! never re-checks indices, depth, or shape.

use crate::{MAX_DEPTH, N_FEATURES};

use super::fixed::Q16;
use super::node::{Label, Node, NodeId};

/// Child marker used by flat exporters for "no child" (leaf nodes).
pub const FLAT_NO_CHILD: i32 = -1;

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    #[error("tree has no nodes")]
    EmptyTree,

    /// Flat arrays disagree on the number of nodes.
    #[error("array `{array}` has {len} entries, expected {n_nodes}")]
    LengthMismatch {
        array: &'static str,
        len: usize,
        n_nodes: usize,
    },

    /// A node has exactly one child.
    #[error("node {node} has one child missing")]
    InconsistentShape { node: NodeId },

    /// A leaf holds a vote other than 0 or 1.
    #[error("leaf {node} has vote {vote}, expected 0 or 1")]
    InvalidVote { node: NodeId, vote: u8 },

    /// A split tests a feature outside `0..n_features`.
    #[error("node {node} splits on feature {feature}, expected < {n_features}")]
    FeatureOutOfRange {
        node: NodeId,
        feature: i64,
        n_features: usize,
    },

    /// A child pointer references an out-of-bounds node.
    #[error("node {node} has {side} child {child} outside 0..{n_nodes}")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: i64,
        n_nodes: usize,
    },

    /// A node references itself as a child.
    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },

    /// A cycle was detected during traversal.
    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    /// A node was reached by more than one path.
    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },

    /// A node exists in storage but is unreachable from the root.
    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },

    /// Some root-to-leaf path needs more comparisons than allowed.
    #[error("tree depth {depth} exceeds the maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },
}

// ============================================================================
// Tree
// ============================================================================

/// Flat arena tree storage.
///
/// Nodes live in parallel arrays indexed by [`NodeId`]; the root is node 0.
/// For leaf slots, the split arrays hold placeholders and are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    split_features: Box<[u32]>,
    split_thresholds: Box<[Q16]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    leaf_labels: Box<[Label]>,
    /// Maximum number of comparisons on any root-to-leaf path.
    depth: usize,
    n_leaves: usize,
}

impl Tree {
    /// A depth-0 tree: the root is a leaf.
    pub fn leaf(label: Label) -> Self {
        Self {
            split_features: Box::new([0]),
            split_thresholds: Box::new([Q16::ZERO]),
            left_children: Box::new([0]),
            right_children: Box::new([0]),
            is_leaf: Box::new([true]),
            leaf_labels: Box::new([label]),
            depth: 0,
            n_leaves: 1,
        }
    }

    /// Build a tree from nodes listed by id (`nodes[i]` is node `i`).
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, TreeValidationError> {
        let mut builder = TreeBuilder::new();
        for node in nodes {
            builder.push(node);
        }
        builder.build()
    }

    /// Import a tree from the flat parallel-array export layout.
    ///
    /// Leaves are nodes whose two children are both [`FLAT_NO_CHILD`]; their
    /// vote is read from `leaf_vote`. For split nodes, `leaf_vote` is ignored.
    pub fn from_flat_arrays(arrays: FlatTreeArrays<'_>) -> Result<Self, TreeValidationError> {
        let n_nodes = arrays.children_left.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        for (array, len) in [
            ("children_right", arrays.children_right.len()),
            ("feature", arrays.feature.len()),
            ("threshold", arrays.threshold.len()),
            ("leaf_vote", arrays.leaf_vote.len()),
        ] {
            if len != n_nodes {
                return Err(TreeValidationError::LengthMismatch { array, len, n_nodes });
            }
        }

        let mut builder = TreeBuilder::with_capacity(n_nodes);
        for i in 0..n_nodes {
            let node = i as NodeId;
            let left = arrays.children_left[i];
            let right = arrays.children_right[i];

            match (left == FLAT_NO_CHILD, right == FLAT_NO_CHILD) {
                (true, true) => {
                    let vote = arrays.leaf_vote[i];
                    let label = Label::try_from(vote)
                        .map_err(|vote| TreeValidationError::InvalidVote { node, vote })?;
                    builder.add_leaf(label);
                }
                (false, false) => {
                    let left = flat_child(node, "left", left, n_nodes)?;
                    let right = flat_child(node, "right", right, n_nodes)?;
                    let feature = arrays.feature[i];
                    let feature = u32::try_from(feature).map_err(|_| {
                        TreeValidationError::FeatureOutOfRange {
                            node,
                            feature: feature as i64,
                            n_features: N_FEATURES,
                        }
                    })?;
                    builder.add_split(feature, arrays.threshold[i], left, right);
                }
                _ => return Err(TreeValidationError::InconsistentShape { node }),
            }
        }

        builder.build()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of nodes (splits and leaves).
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaf nodes.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Maximum number of comparisons any input can take through this tree.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    /// Feature index tested at a split node.
    #[inline]
    pub fn split_feature(&self, node: NodeId) -> u32 {
        self.split_features[node as usize]
    }

    /// Threshold at a split node.
    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> Q16 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    /// Vote stored at a leaf node.
    #[inline]
    pub fn leaf_label(&self, node: NodeId) -> Label {
        self.leaf_labels[node as usize]
    }

    /// The node at `id` as a [`Node`] value.
    pub fn node(&self, id: NodeId) -> Node {
        if self.is_leaf(id) {
            Node::Leaf(self.leaf_label(id))
        } else {
            Node::Split {
                feature: self.split_feature(id),
                threshold: self.split_threshold(id),
                left: self.left_child(id),
                right: self.right_child(id),
            }
        }
    }

    /// Iterate over all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.n_nodes() as NodeId).map(|id| self.node(id))
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check per-node invariants and the shape reachable from the root.
    ///
    /// Returns the tree depth on success.
    fn validate(&self) -> Result<usize, TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        for id in 0..n_nodes as NodeId {
            if self.is_leaf(id) {
                continue;
            }
            let feature = self.split_feature(id);
            if feature as usize >= N_FEATURES {
                return Err(TreeValidationError::FeatureOutOfRange {
                    node: id,
                    feature: feature as i64,
                    n_features: N_FEATURES,
                });
            }
            for (side, child) in [("left", self.left_child(id)), ("right", self.right_child(id))] {
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node: id,
                        side,
                        child: child as i64,
                        n_nodes,
                    });
                }
                if child == id {
                    return Err(TreeValidationError::SelfLoop { node: id });
                }
            }
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8, usize)> = vec![(0, 0, 0)];
        let mut depth = 0usize;

        while let Some((node, phase, level)) = stack.pop() {
            let idx = node as usize;
            match phase {
                0 => {
                    match color[idx] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        _ => return Err(TreeValidationError::DuplicateVisit { node }),
                    }
                    color[idx] = 1;
                    stack.push((node, 1, level));

                    if self.is_leaf(node) {
                        depth = depth.max(level);
                    } else {
                        if level + 1 > MAX_DEPTH {
                            return Err(TreeValidationError::DepthExceeded {
                                depth: level + 1,
                                max_depth: MAX_DEPTH,
                            });
                        }
                        stack.push((self.right_child(node), 0, level + 1));
                        stack.push((self.left_child(node), 0, level + 1));
                    }
                }
                _ => color[idx] = 2,
            }
        }

        if let Some(node) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode { node: node as NodeId });
        }

        Ok(depth)
    }
}

fn flat_child(
    node: NodeId,
    side: &'static str,
    child: i32,
    n_nodes: usize,
) -> Result<NodeId, TreeValidationError> {
    match usize::try_from(child) {
        Ok(c) if c < n_nodes => Ok(c as NodeId),
        _ => Err(TreeValidationError::ChildOutOfBounds {
            node,
            side,
            child: child as i64,
            n_nodes,
        }),
    }
}

// ============================================================================
// FlatTreeArrays
// ============================================================================

/// Borrowed flat parallel arrays describing one exported tree.
///
/// All arrays are indexed by node id. A node is a leaf when both children are
/// [`FLAT_NO_CHILD`].
#[derive(Debug, Clone, Copy)]
pub struct FlatTreeArrays<'a> {
    pub children_left: &'a [i32],
    pub children_right: &'a [i32],
    pub feature: &'a [i32],
    pub threshold: &'a [Q16],
    pub leaf_vote: &'a [u8],
}

// ============================================================================
// TreeBuilder
// ============================================================================

/// Builder for constructing a [`Tree`] from individual nodes.
///
/// Node ids are assigned in insertion order, so children may be referenced
/// before they are added. Nothing is checked until [`TreeBuilder::build`].
#[derive(Debug, Default, Clone)]
pub struct TreeBuilder {
    split_features: Vec<u32>,
    split_thresholds: Vec<Q16>,
    left_children: Vec<NodeId>,
    right_children: Vec<NodeId>,
    is_leaf: Vec<bool>,
    leaf_labels: Vec<Label>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n_nodes: usize) -> Self {
        Self {
            split_features: Vec::with_capacity(n_nodes),
            split_thresholds: Vec::with_capacity(n_nodes),
            left_children: Vec::with_capacity(n_nodes),
            right_children: Vec::with_capacity(n_nodes),
            is_leaf: Vec::with_capacity(n_nodes),
            leaf_labels: Vec::with_capacity(n_nodes),
        }
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_leaf.is_empty()
    }

    /// Add a split node. Returns the node id.
    pub fn add_split(
        &mut self,
        feature: u32,
        threshold: impl Into<Q16>,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        let id = self.len() as NodeId;
        self.split_features.push(feature);
        self.split_thresholds.push(threshold.into());
        self.left_children.push(left);
        self.right_children.push(right);
        self.is_leaf.push(false);
        self.leaf_labels.push(Label::default());
        id
    }

    /// Add a leaf node. Returns the node id.
    pub fn add_leaf(&mut self, label: Label) -> NodeId {
        let id = self.len() as NodeId;
        self.split_features.push(0);
        self.split_thresholds.push(Q16::ZERO);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(true);
        self.leaf_labels.push(label);
        id
    }

    /// Re-point the children of an already added split.
    ///
    /// Lets callers reserve a parent id before its subtrees exist, so the
    /// root can stay at id 0 under pre-order construction.
    pub fn set_children(&mut self, node: NodeId, left: NodeId, right: NodeId) {
        let idx = node as usize;
        debug_assert!(!self.is_leaf[idx], "set_children on a leaf");
        self.left_children[idx] = left;
        self.right_children[idx] = right;
    }

    /// Add a node of either shape. Returns the node id.
    pub fn push(&mut self, node: Node) -> NodeId {
        match node {
            Node::Split { feature, threshold, left, right } => {
                self.add_split(feature, threshold, left, right)
            }
            Node::Leaf(label) => self.add_leaf(label),
        }
    }

    /// Freeze and validate.
    pub fn build(self) -> Result<Tree, TreeValidationError> {
        let n_leaves = self.is_leaf.iter().filter(|&&leaf| leaf).count();
        let mut tree = Tree {
            split_features: self.split_features.into_boxed_slice(),
            split_thresholds: self.split_thresholds.into_boxed_slice(),
            left_children: self.left_children.into_boxed_slice(),
            right_children: self.right_children.into_boxed_slice(),
            is_leaf: self.is_leaf.into_boxed_slice(),
            leaf_labels: self.leaf_labels.into_boxed_slice(),
            depth: 0,
            n_leaves,
        };
        tree.depth = tree.validate()?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    ///        [0] f0 <= 0
    ///        /          \
    ///    [1] leaf=0   [2] f1 <= 5
    ///                  /        \
    ///             [3] leaf=1  [4] leaf=0
    /// ```
    fn build_test_tree() -> Tree {
        let mut builder = TreeBuilder::new();
        builder.add_split(0, 0i16, 1, 2);
        builder.add_leaf(Label::Negative);
        builder.add_split(1, 5i16, 3, 4);
        builder.add_leaf(Label::Positive);
        builder.add_leaf(Label::Negative);
        builder.build().unwrap()
    }

    #[test]
    fn tree_structure() {
        let tree = build_test_tree();

        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);

        assert!(!tree.is_leaf(0));
        assert_eq!(tree.split_feature(0), 0);
        assert_eq!(tree.split_threshold(0), Q16::ZERO);
        assert_eq!(tree.left_child(0), 1);
        assert_eq!(tree.right_child(0), 2);

        assert!(tree.is_leaf(3));
        assert_eq!(tree.leaf_label(3), Label::Positive);
        assert_eq!(tree.node(2), Node::split(1, 5i16, 3, 4));
    }

    #[test]
    fn from_nodes_matches_builder() {
        let tree = build_test_tree();
        let rebuilt = Tree::from_nodes(tree.nodes()).unwrap();
        assert_eq!(tree, rebuilt);
    }

    #[test]
    fn leaf_tree_has_depth_zero() {
        let tree = Tree::leaf(Label::Positive);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(Tree::from_nodes([Node::leaf(Label::Positive)]).unwrap(), tree);
    }

    #[test]
    fn rejects_empty_tree() {
        assert_eq!(TreeBuilder::new().build(), Err(TreeValidationError::EmptyTree));
    }

    #[test]
    fn rejects_feature_out_of_range() {
        let err = Tree::from_nodes([
            Node::split(N_FEATURES as u32, 0i16, 1, 2),
            Node::leaf(Label::Negative),
            Node::leaf(Label::Positive),
        ])
        .unwrap_err();
        assert!(matches!(err, TreeValidationError::FeatureOutOfRange { node: 0, .. }));
    }

    #[test]
    fn rejects_child_out_of_bounds() {
        let err = Tree::from_nodes([
            Node::split(0, 0i16, 1, 9),
            Node::leaf(Label::Negative),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TreeValidationError::ChildOutOfBounds { node: 0, side: "right", child: 9, n_nodes: 2 }
        );
    }

    #[test]
    fn rejects_self_loop() {
        let err = Tree::from_nodes([
            Node::split(0, 0i16, 0, 1),
            Node::leaf(Label::Negative),
        ])
        .unwrap_err();
        assert_eq!(err, TreeValidationError::SelfLoop { node: 0 });
    }

    #[test]
    fn rejects_cycle() {
        let err = Tree::from_nodes([
            Node::split(0, 0i16, 1, 2),
            Node::split(0, 0i16, 0, 2),
            Node::leaf(Label::Negative),
        ])
        .unwrap_err();
        assert_eq!(err, TreeValidationError::CycleDetected { node: 0 });
    }

    #[test]
    fn rejects_shared_child() {
        let err = Tree::from_nodes([
            Node::split(0, 0i16, 1, 1),
            Node::leaf(Label::Negative),
        ])
        .unwrap_err();
        assert_eq!(err, TreeValidationError::DuplicateVisit { node: 1 });
    }

    #[test]
    fn rejects_unreachable_node() {
        let err = Tree::from_nodes([
            Node::split(0, 0i16, 1, 2),
            Node::leaf(Label::Negative),
            Node::leaf(Label::Positive),
            Node::leaf(Label::Positive),
        ])
        .unwrap_err();
        assert_eq!(err, TreeValidationError::UnreachableNode { node: 3 });
    }

    #[test]
    fn depth_limit_is_inclusive() {
        // Split k at id 2k, its right leaf at 2k + 1, its left child the next split.
        let mut builder = TreeBuilder::new();
        for level in 0..MAX_DEPTH as NodeId {
            builder.add_split(0, level as i16, 2 * level + 2, 2 * level + 1);
            builder.add_leaf(Label::Positive);
        }
        builder.add_leaf(Label::Negative);
        let tree = builder.build().unwrap();
        assert_eq!(tree.depth(), MAX_DEPTH);

        let mut builder = TreeBuilder::new();
        for level in 0..=MAX_DEPTH as NodeId {
            builder.add_split(0, level as i16, 2 * level + 2, 2 * level + 1);
            builder.add_leaf(Label::Positive);
        }
        builder.add_leaf(Label::Negative);
        assert_eq!(
            builder.build(),
            Err(TreeValidationError::DepthExceeded { depth: MAX_DEPTH + 1, max_depth: MAX_DEPTH })
        );
    }

    // =========================================================================
    // Flat array import
    // =========================================================================

    fn q(values: &[i16]) -> Vec<Q16> {
        values.iter().copied().map(Q16::from_raw).collect()
    }

    #[test]
    fn flat_arrays_round_trip() {
        let threshold = q(&[0, 0, 5, 0, 0]);
        let tree = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, 3, -1, -1],
            children_right: &[2, -1, 4, -1, -1],
            feature: &[0, -2, 1, -2, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 0, 1, 0],
        })
        .unwrap();

        assert_eq!(tree, build_test_tree());
    }

    #[test]
    fn flat_arrays_reject_length_mismatch() {
        let threshold = q(&[0, 0, 0]);
        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, -1],
            children_right: &[2, -1, -1],
            feature: &[0, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 1],
        })
        .unwrap_err();
        assert_eq!(
            err,
            TreeValidationError::LengthMismatch { array: "feature", len: 2, n_nodes: 3 }
        );
    }

    #[test]
    fn flat_arrays_reject_inconsistent_shape() {
        let threshold = q(&[0, 0, 0]);
        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, -1],
            children_right: &[-1, -1, -1],
            feature: &[0, -2, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 1],
        })
        .unwrap_err();
        assert_eq!(err, TreeValidationError::InconsistentShape { node: 0 });
    }

    #[test]
    fn flat_arrays_reject_invalid_vote() {
        let threshold = q(&[0, 0, 0]);
        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, -1],
            children_right: &[2, -1, -1],
            feature: &[0, -2, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 7],
        })
        .unwrap_err();
        assert_eq!(err, TreeValidationError::InvalidVote { node: 2, vote: 7 });
    }

    #[test]
    fn flat_arrays_reject_negative_feature_and_child() {
        let threshold = q(&[0, 0, 0]);
        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, -1],
            children_right: &[2, -1, -1],
            feature: &[-2, -2, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 1],
        })
        .unwrap_err();
        assert!(matches!(err, TreeValidationError::FeatureOutOfRange { feature: -2, .. }));

        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[1, -1, -1],
            children_right: &[-7, -1, -1],
            feature: &[0, -2, -2],
            threshold: &threshold,
            leaf_vote: &[0, 0, 1],
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TreeValidationError::ChildOutOfBounds { side: "right", child: -7, .. }
        ));
    }

    #[test]
    fn flat_arrays_reject_empty() {
        let err = Tree::from_flat_arrays(FlatTreeArrays {
            children_left: &[],
            children_right: &[],
            feature: &[],
            threshold: &[],
            leaf_vote: &[],
        })
        .unwrap_err();
        assert_eq!(err, TreeValidationError::EmptyTree);
    }
}
