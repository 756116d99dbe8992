//! Classifier metadata.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::repr::Ensemble;
use crate::{MAX_DEPTH, N_FEATURES, N_TREES, VOTE_REQUIRED};

/// Names of the selected telemetry features, in feature-vector order.
pub const DEFAULT_FEATURE_NAMES: [&str; N_FEATURES] = [
    "kde_low_prob_ratio",
    "kde_prob_min",
    "dist_to_centroid_mean",
    "turning_angle_max",
    "mean_speed",
    "turning_entropy",
];

/// Introspection data about a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleMeta {
    /// Feature names, indexed like the feature vector.
    pub feature_names: Vec<String>,
    pub n_features: usize,
    pub n_trees: usize,
    /// Positive votes required for a positive decision.
    pub vote_required: usize,
    /// Depth of the deepest tree.
    pub max_depth: usize,
}

impl Default for EnsembleMeta {
    fn default() -> Self {
        Self {
            feature_names: DEFAULT_FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            n_features: N_FEATURES,
            n_trees: N_TREES,
            vote_required: VOTE_REQUIRED,
            max_depth: MAX_DEPTH,
        }
    }
}

impl EnsembleMeta {
    /// Metadata describing a concrete ensemble, with default feature names.
    pub fn for_ensemble(ensemble: &Ensemble) -> Self {
        Self {
            n_features: ensemble.n_features(),
            n_trees: ensemble.n_trees(),
            vote_required: ensemble.vote_required(),
            max_depth: ensemble.max_depth(),
            ..Default::default()
        }
    }

    /// Set feature names.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FeatureNameCount`] unless there is exactly one name per
    /// feature.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        if names.len() != self.n_features {
            return Err(ConfigError::FeatureNameCount {
                expected: self.n_features,
                actual: names.len(),
            });
        }
        self.feature_names = names;
        Ok(self)
    }

    /// Name of feature `idx`, if known.
    pub fn feature_name(&self, idx: usize) -> Option<&str> {
        self.feature_names.get(idx).map(String::as_str)
    }
}
