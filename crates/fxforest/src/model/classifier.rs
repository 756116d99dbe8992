//! Forest classifier.
//!
//! High-level wrapper around [`Ensemble`] with boundary-checked prediction.
//! Access components via [`ensemble()`](ForestClassifier::ensemble),
//! [`meta()`](ForestClassifier::meta), and [`config()`](ForestClassifier::config).

use ndarray::ArrayView2;
use tracing::debug;

use crate::inference::{
    self, features, FeatureError, FeatureVector, Predictor, StandardTraversal, TreeTraversal,
    UnrolledTraversal, VoteCount,
};
use crate::model::meta::EnsembleMeta;
use crate::repr::{Ensemble, Label};
use crate::utils::{run_with_threads, Parallelism};

use super::config::{ClassifierConfig, ConfigError, TraversalKind};

/// Binary super-majority classifier over a fixed tree ensemble.
///
/// Single-row calls evaluate the trees sequentially on the caller's thread.
/// Batch calls honour the configured traversal, thread count and block size.
#[derive(Clone)]
pub struct ForestClassifier {
    ensemble: Ensemble,
    meta: EnsembleMeta,
    config: ClassifierConfig,
}

impl ForestClassifier {
    /// Create a classifier with metadata derived from the ensemble and the
    /// default configuration.
    pub fn from_ensemble(ensemble: Ensemble) -> Self {
        let meta = EnsembleMeta::for_ensemble(&ensemble);
        Self::from_parts(ensemble, meta, ClassifierConfig::default())
    }

    /// Create a classifier from all its parts.
    pub fn from_parts(ensemble: Ensemble, meta: EnsembleMeta, config: ClassifierConfig) -> Self {
        debug!(
            n_trees = ensemble.n_trees(),
            max_depth = ensemble.max_depth(),
            traversal = ?config.traversal,
            n_threads = config.n_threads,
            "created forest classifier"
        );
        Self { ensemble, meta, config }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn meta(&self) -> &EnsembleMeta {
        &self.meta
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Set feature names, one per feature.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FeatureNameCount`] if the count differs from `N_FEATURES`.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        self.meta = self.meta.with_feature_names(names)?;
        Ok(self)
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Classify one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Label {
        inference::predict(&self.ensemble, features)
    }

    /// Number of trees voting positive for `features`.
    pub fn vote_count(&self, features: &FeatureVector) -> VoteCount {
        VoteCount::from_sum(
            self.ensemble
                .trees()
                .iter()
                .map(|tree| inference::evaluate(tree, features).as_u8() as usize)
                .sum(),
        )
    }

    /// Classify a row of untrusted 32-bit values.
    ///
    /// # Errors
    ///
    /// [`FeatureError`] if the row does not have exactly `N_FEATURES` values
    /// or any value is outside the 16-bit signed range.
    pub fn predict_raw(&self, values: &[i32]) -> Result<Label, FeatureError> {
        let fv = features::try_from_slice(values)?;
        Ok(self.predict(&fv))
    }

    /// Classify every row of a `[n_rows, N_FEATURES]` matrix.
    pub fn predict_batch(&self, rows: ArrayView2<'_, i16>) -> Result<Vec<Label>, FeatureError> {
        match self.config.traversal {
            TraversalKind::Standard => {
                self.run_batch::<StandardTraversal, _, _>(|p, par| p.predict_batch(rows, par))
            }
            TraversalKind::Unrolled => {
                self.run_batch::<UnrolledTraversal, _, _>(|p, par| p.predict_batch(rows, par))
            }
        }
    }

    /// Vote counts for every row of a `[n_rows, N_FEATURES]` matrix.
    pub fn vote_count_batch(
        &self,
        rows: ArrayView2<'_, i16>,
    ) -> Result<Vec<VoteCount>, FeatureError> {
        match self.config.traversal {
            TraversalKind::Standard => {
                self.run_batch::<StandardTraversal, _, _>(|p, par| p.vote_count_batch(rows, par))
            }
            TraversalKind::Unrolled => {
                self.run_batch::<UnrolledTraversal, _, _>(|p, par| p.vote_count_batch(rows, par))
            }
        }
    }

    /// Build a predictor inside the configured thread pool and hand it to `f`.
    fn run_batch<T, R, F>(&self, f: F) -> R
    where
        T: TreeTraversal,
        R: Send,
        F: FnOnce(&Predictor<'_, T>, Parallelism) -> R + Send,
    {
        run_with_threads(self.config.n_threads, |parallelism| {
            let predictor =
                Predictor::<T>::new(&self.ensemble).with_block_size(self.config.block_size);
            f(&predictor, parallelism)
        })
    }
}

impl std::fmt::Debug for ForestClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForestClassifier")
            .field("n_trees", &self.ensemble.n_trees())
            .field("n_features", &self.meta.n_features)
            .field("max_depth", &self.ensemble.max_depth())
            .field("traversal", &self.config.traversal)
            .finish()
    }
}
