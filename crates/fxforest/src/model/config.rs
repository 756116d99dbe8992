//! Classifier configuration with builder pattern.
//!
//! [`ClassifierConfig`] uses the `bon` crate for builder generation and
//! validates in a custom `build()`.
//!
//! # Example
//!
//! ```
//! use fxforest::model::{ClassifierConfig, TraversalKind};
//!
//! // All defaults
//! let config = ClassifierConfig::builder().build().unwrap();
//! assert_eq!(config.traversal, TraversalKind::Unrolled);
//!
//! let config = ClassifierConfig::builder()
//!     .traversal(TraversalKind::Standard)
//!     .n_threads(4)
//!     .block_size(128)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::inference::DEFAULT_BLOCK_SIZE;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Block size must be at least 1.
    #[error("block_size must be at least 1, got {0}")]
    InvalidBlockSize(usize),

    /// One name per feature is required.
    #[error("expected {expected} feature names, got {actual}")]
    FeatureNameCount { expected: usize, actual: usize },
}

// =============================================================================
// TraversalKind
// =============================================================================

/// Which traversal strategy a classifier uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalKind {
    /// Node-by-node walk.
    Standard,
    /// Padded perfect-tree layout, fixed step count.
    #[default]
    Unrolled,
}

// =============================================================================
// ClassifierConfig
// =============================================================================

/// Runtime configuration for [`ForestClassifier`](super::ForestClassifier).
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ClassifierConfig {
    /// Traversal strategy. Default: `Unrolled`.
    #[builder(default)]
    pub traversal: TraversalKind,

    /// Number of threads: 0 = auto, 1 = sequential, >1 = exact count. Default: 1.
    #[builder(default = 1)]
    pub n_threads: usize,

    /// Rows per block in batch prediction. Default: 64.
    #[builder(default = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,
}

/// Custom finishing function that validates the config.
impl<S: classifier_config_builder::IsComplete> ClassifierConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] if `block_size == 0`.
    pub fn build(self) -> Result<ClassifierConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        // Builder defaults always validate.
        Self::builder().__build_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClassifierConfig::builder().build().unwrap();
        assert_eq!(config.traversal, TraversalKind::Unrolled);
        assert_eq!(config.n_threads, 1);
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_invalid_block_size_zero() {
        let result = ClassifierConfig::builder().block_size(0).build();
        assert_eq!(result, Err(ConfigError::InvalidBlockSize(0)));
    }

    #[test]
    fn test_custom_values() {
        let config = ClassifierConfig::builder()
            .traversal(TraversalKind::Standard)
            .n_threads(0)
            .block_size(1)
            .build()
            .unwrap();
        assert_eq!(config.traversal, TraversalKind::Standard);
        assert_eq!(config.n_threads, 0);
        assert_eq!(config.block_size, 1);
    }
}
