//! Feature vector boundary.
//!
//! Inference consumes [`FeatureVector`], which is always well-formed. Anything
//! coming from outside (wider integers, slices of unknown length, batch
//! matrices) is checked here, once.

use ndarray::ArrayView2;

use crate::repr::Q16;
use crate::N_FEATURES;

/// One quantized feature vector.
pub type FeatureVector = [Q16; N_FEATURES];

/// Errors raised when converting external input into [`FeatureVector`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("expected {expected} features, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("feature {index} has value {value}, outside the 16-bit signed range")]
    OutOfRange { index: usize, value: i64 },
}

/// Wrap raw fixed-point values.
#[inline]
pub fn from_raw(raw: [i16; N_FEATURES]) -> FeatureVector {
    raw.map(Q16::from_raw)
}

/// Convert a slice of 32-bit values, rejecting wrong lengths and overflow.
pub fn try_from_slice(values: &[i32]) -> Result<FeatureVector, FeatureError> {
    collect(values.iter().map(|&v| i64::from(v)), values.len())
}

/// Convert a slice of 64-bit values, rejecting wrong lengths and overflow.
pub fn try_from_i64_slice(values: &[i64]) -> Result<FeatureVector, FeatureError> {
    collect(values.iter().copied(), values.len())
}

fn collect(values: impl Iterator<Item = i64>, len: usize) -> Result<FeatureVector, FeatureError> {
    check_len(len)?;
    let mut out = [Q16::ZERO; N_FEATURES];
    for (index, (slot, value)) in out.iter_mut().zip(values).enumerate() {
        *slot = Q16::try_from(value).map_err(|_| FeatureError::OutOfRange { index, value })?;
    }
    Ok(out)
}

#[inline]
fn check_len(actual: usize) -> Result<(), FeatureError> {
    if actual != N_FEATURES {
        return Err(FeatureError::WrongLength { expected: N_FEATURES, actual });
    }
    Ok(())
}

/// Check the column count of a batch `[n_rows, n_features]`.
pub fn check_batch(rows: &ArrayView2<'_, i16>) -> Result<(), FeatureError> {
    check_len(rows.ncols())
}

/// Read one row of a checked batch.
///
/// Works for any memory layout; the batch must already have passed
/// [`check_batch`].
#[inline]
pub(crate) fn row_at(rows: &ArrayView2<'_, i16>, row: usize) -> FeatureVector {
    std::array::from_fn(|col| Q16::from_raw(rows[[row, col]]))
}
