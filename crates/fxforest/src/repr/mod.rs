//! Canonical model representations.
//!
//! Everything in this module is validated at construction and immutable
//! afterwards; inference reads it without further checks.

pub mod ensemble;
pub mod fixed;
pub mod node;
pub mod tree;

pub use ensemble::{Ensemble, EnsembleError};
pub use fixed::{QuantizeError, Q16};
pub use node::{Label, Node, NodeId};
pub use tree::{FlatTreeArrays, Tree, TreeBuilder, TreeValidationError, FLAT_NO_CHILD};
