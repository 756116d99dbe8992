//! High-level classifier wrapper.
//!
//! # Overview
//!
//! - [`ForestClassifier`]: Ensemble plus metadata plus runtime configuration
//! - [`ClassifierConfig`]: Traversal strategy, threading and batch block size
//! - [`EnsembleMeta`]: Feature names and ensemble summary
//!
//! # Example
//!
//! ```
//! use fxforest::model::{ClassifierConfig, ForestClassifier};
//! use fxforest::repr::{Ensemble, Label, Tree};
//! use fxforest::inference::features;
//!
//! let ensemble = Ensemble::new(vec![Tree::leaf(Label::Negative); fxforest::N_TREES]).unwrap();
//! let clf = ForestClassifier::from_ensemble(ensemble)
//!     .with_config(ClassifierConfig::builder().n_threads(2).build().unwrap());
//!
//! assert_eq!(clf.predict(&features::from_raw([0; 6])), Label::Negative);
//! assert_eq!(clf.predict_raw(&[1, 2, 3, 4, 5, 6]).unwrap(), Label::Negative);
//! ```

mod classifier;
mod config;
mod meta;

pub use classifier::ForestClassifier;
pub use config::{ClassifierConfig, ConfigError, TraversalKind};
pub use meta::{EnsembleMeta, DEFAULT_FEATURE_NAMES};
