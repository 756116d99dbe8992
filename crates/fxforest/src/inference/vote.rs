//! Vote aggregation and the decision rule.

use std::fmt;

use crate::repr::Label;
use crate::{N_TREES, VOTE_REQUIRED};

/// Number of positive tree votes for one feature vector, in `0..=N_TREES`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoteCount(u8);

impl VoteCount {
    pub const ZERO: Self = Self(0);

    /// Every tree voted positive.
    pub const ALL: Self = Self(N_TREES as u8);

    /// Wrap a raw count. Returns `None` above `N_TREES`.
    #[inline]
    pub const fn new(count: u8) -> Option<Self> {
        if count as usize <= N_TREES {
            Some(Self(count))
        } else {
            None
        }
    }

    /// Wrap a sum of per-tree votes over one ensemble.
    #[inline]
    pub(crate) fn from_sum(sum: usize) -> Self {
        debug_assert!(sum <= N_TREES, "vote sum {sum} exceeds tree count");
        Self(sum as u8)
    }

    /// Count the positive votes in a sequence of tree outputs.
    pub fn from_labels(labels: impl IntoIterator<Item = Label>) -> Option<Self> {
        let sum: usize = labels.into_iter().map(|l| l.as_u8() as usize).sum();
        u8::try_from(sum).ok().and_then(Self::new)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The class this vote count decides.
    #[inline]
    pub fn decision(self) -> Label {
        decide(self)
    }
}

impl From<VoteCount> for u8 {
    fn from(votes: VoteCount) -> Self {
        votes.0
    }
}

impl fmt::Display for VoteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, N_TREES)
    }
}

/// Super-majority rule: positive iff `votes >= VOTE_REQUIRED`.
///
/// A count exactly at the threshold is positive.
#[inline]
pub fn decide(votes: VoteCount) -> Label {
    Label::from(votes.0 as usize >= VOTE_REQUIRED)
}
