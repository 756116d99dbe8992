//! Tree node types.

use serde::{Deserialize, Serialize};

use super::fixed::Q16;

/// Index of a node within its tree. The root is always node 0.
pub type NodeId = u32;

/// Binary class label, used both for leaf votes and for the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    /// Class 0.
    #[default]
    Negative = 0,
    /// Class 1.
    Positive = 1,
}

impl Label {
    /// The label as the integer class value (0 or 1).
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Label::Positive)
    }
}

impl TryFrom<u8> for Label {
    type Error = u8;

    /// Only 0 and 1 are labels; anything else is returned as the error.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(other),
        }
    }
}

impl From<bool> for Label {
    #[inline]
    fn from(positive: bool) -> Self {
        if positive {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

impl From<Label> for u8 {
    #[inline]
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

/// A node in a decision tree.
///
/// Split nodes send a sample left when `features[feature] <= threshold`,
/// right otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Internal split node.
    Split {
        feature: u32,
        threshold: Q16,
        left: NodeId,
        right: NodeId,
    },
    /// Leaf node holding a vote.
    Leaf(Label),
}

impl Node {
    /// Create a split node.
    pub fn split(feature: u32, threshold: impl Into<Q16>, left: NodeId, right: NodeId) -> Self {
        Self::Split {
            feature,
            threshold: threshold.into(),
            left,
            right,
        }
    }

    /// Create a leaf node.
    pub fn leaf(label: Label) -> Self {
        Self::Leaf(label)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The leaf vote, if this is a leaf.
    #[inline]
    pub fn label(&self) -> Option<Label> {
        match self {
            Self::Leaf(label) => Some(*label),
            Self::Split { .. } => None,
        }
    }
}
