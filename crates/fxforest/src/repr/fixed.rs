//! Fixed-width signed quantized values.
//!
//! [`Q16`] is the only numeric type that crosses the inference boundary. Feature
//! values and split thresholds are both `Q16`, so every split decision is a
//! signed 16-bit integer comparison regardless of the host's native word size.

use serde::{Deserialize, Serialize};

/// Errors converting a wider value into [`Q16`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum QuantizeError {
    /// Value does not fit in the signed 16-bit range.
    #[error("value {0} is outside the signed 16-bit range [-32768, 32767]")]
    OutOfRange(i64),

    /// Threshold is NaN.
    #[error("threshold is not a number")]
    NotANumber,
}

/// Signed 16-bit quantized value.
///
/// Ordering is the signed integer ordering of the raw value. Conversions from
/// wider integers are either strict ([`TryFrom`]) or saturating
/// ([`Q16::saturating_from_i32`]); there is no wrapping conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Q16(i16);

impl Q16 {
    pub const MIN: Q16 = Q16(i16::MIN);
    pub const MAX: Q16 = Q16(i16::MAX);
    pub const ZERO: Q16 = Q16(0);

    /// Wrap a raw quantized value.
    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    /// The raw quantized value.
    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Clamp an `i32` into range.
    #[inline]
    pub const fn saturating_from_i32(value: i32) -> Self {
        if value > i16::MAX as i32 {
            Self::MAX
        } else if value < i16::MIN as i32 {
            Self::MIN
        } else {
            Self(value as i16)
        }
    }

    /// Clamp an `i64` into range.
    #[inline]
    pub const fn saturating_from_i64(value: i64) -> Self {
        if value > i16::MAX as i64 {
            Self::MAX
        } else if value < i16::MIN as i64 {
            Self::MIN
        } else {
            Self(value as i16)
        }
    }

    /// Convert a real-valued split threshold into the integer domain.
    ///
    /// Exporters that train on integer-valued features still emit float
    /// thresholds (typically midpoints such as `10.5`). For any integer `x`,
    /// `x <= t` holds exactly when `x <= floor(t)`, so the threshold is floored.
    /// Above the range it saturates to [`Q16::MAX`] (including `+inf`), which
    /// still sends every value left.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::NotANumber`] for NaN, and [`QuantizeError::OutOfRange`]
    /// when `floor(t) < i16::MIN` (including `-inf`): no `Q16` threshold sends
    /// every value right.
    pub fn from_threshold_f64(threshold: f64) -> Result<Self, QuantizeError> {
        if threshold.is_nan() {
            return Err(QuantizeError::NotANumber);
        }
        let floored = threshold.floor();
        if floored >= i16::MAX as f64 {
            Ok(Self::MAX)
        } else if floored < i16::MIN as f64 {
            // `as` saturates, so -inf reports i64::MIN.
            Err(QuantizeError::OutOfRange(floored as i64))
        } else {
            Ok(Self(floored as i16))
        }
    }
}

impl From<i16> for Q16 {
    #[inline]
    fn from(value: i16) -> Self {
        Self(value)
    }
}

impl From<Q16> for i16 {
    #[inline]
    fn from(value: Q16) -> Self {
        value.0
    }
}

impl From<Q16> for i32 {
    #[inline]
    fn from(value: Q16) -> Self {
        value.0 as i32
    }
}

impl TryFrom<i32> for Q16 {
    type Error = QuantizeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        i16::try_from(value)
            .map(Self)
            .map_err(|_| QuantizeError::OutOfRange(value as i64))
    }
}

impl TryFrom<i64> for Q16 {
    type Error = QuantizeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i16::try_from(value)
            .map(Self)
            .map_err(|_| QuantizeError::OutOfRange(value))
    }
}

impl std::fmt::Display for Q16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn ordering_is_signed() {
        assert!(Q16::from_raw(-1) < Q16::ZERO);
        assert!(Q16::MIN < Q16::from_raw(-32767));
        assert!(Q16::from_raw(32766) < Q16::MAX);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(40_000, i16::MAX)]
    #[case(-40_000, i16::MIN)]
    #[case(32_767, 32_767)]
    #[case(-32_768, -32_768)]
    fn saturating_conversion(#[case] input: i32, #[case] expected: i16) {
        assert_eq!(Q16::saturating_from_i32(input).raw(), expected);
        assert_eq!(Q16::saturating_from_i64(input as i64).raw(), expected);
    }

    #[test]
    fn strict_conversion_rejects_out_of_range() {
        assert_eq!(Q16::try_from(32_768i32), Err(QuantizeError::OutOfRange(32_768)));
        assert_eq!(Q16::try_from(-32_769i64), Err(QuantizeError::OutOfRange(-32_769)));
        assert_eq!(Q16::try_from(-5i32), Ok(Q16::from_raw(-5)));
    }

    #[rstest]
    #[case(10.5, 10)]
    #[case(10.0, 10)]
    #[case(-0.5, -1)]
    #[case(1e9, i16::MAX)]
    #[case(-32_768.0, i16::MIN)]
    #[case(-32_767.5, i16::MIN)]
    #[case(f64::INFINITY, i16::MAX)]
    fn threshold_is_floored(#[case] threshold: f64, #[case] expected: i16) {
        assert_eq!(Q16::from_threshold_f64(threshold).unwrap().raw(), expected);
    }

    #[test]
    fn threshold_floor_preserves_integer_comparison() {
        for t in [-3.5f64, -3.0, -0.25, 0.0, 0.75, 7.5, 8.0] {
            let q = Q16::from_threshold_f64(t).unwrap();
            for x in -10i16..=10 {
                assert_eq!((x as f64) <= t, Q16::from_raw(x) <= q, "x={x}, t={t}");
            }
        }
    }

    #[test]
    fn threshold_nan_rejected() {
        assert_eq!(Q16::from_threshold_f64(f64::NAN), Err(QuantizeError::NotANumber));
    }

    #[rstest]
    #[case(-32_768.5, -32_769)]
    #[case(-1e9, -1_000_000_000)]
    #[case(f64::NEG_INFINITY, i64::MIN)]
    fn threshold_below_range_rejected(#[case] threshold: f64, #[case] floored: i64) {
        assert_eq!(
            Q16::from_threshold_f64(threshold),
            Err(QuantizeError::OutOfRange(floored))
        );
    }
}
