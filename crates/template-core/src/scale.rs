//! Scale-to-area primitives
//!
//! Two normalizations live here on purpose. [`scale`] divides by the sum of
//! absolute values and so keeps every bin's sign and relative weight.
//! [`rescale_to_sum`] divides by the plain signed sum; negative bins pull the
//! reference sum down, so the result only matches [`scale`] for non-negative
//! input.

use crate::{Error, Result};
use num_traits::Float;

/// Sum of absolute bin values
pub fn abs_sum<T: Float>(counts: &[T]) -> T {
    counts.iter().fold(T::zero(), |acc, &c| acc + c.abs())
}

/// Plain signed sum of bin values
pub fn signed_sum<T: Float>(counts: &[T]) -> T {
    counts.iter().fold(T::zero(), |acc, &c| acc + c)
}

/// Whether any bin holds nonzero content
pub fn any_nonzero<T: Float>(counts: &[T]) -> bool {
    counts.iter().any(|c| !c.is_zero())
}

/// Scale counts so their absolute area equals `target_area`, preserving signs
///
/// `out[i] = sign(counts[i]) * |counts[i]| * target_area / sum(|counts|)`.
/// Zero bins stay zero. Fails with [`Error::DivisionByZero`] when every bin is
/// zero, and with [`Error::NonFinite`] for NaN or infinite input.
pub fn scale<T: Float>(counts: &[T], target_area: T) -> Result<Vec<T>> {
    if counts.iter().any(|c| !c.is_finite()) || !target_area.is_finite() {
        return Err(Error::non_finite("histogram counts"));
    }

    let total = abs_sum(counts);
    if total.is_zero() {
        return Err(Error::empty_histogram("histogram"));
    }

    Ok(counts
        .iter()
        .map(|&c| {
            let sign = if c.is_zero() { T::zero() } else { c.signum() };
            sign * c.abs() * target_area / total
        })
        .collect())
}

/// Scale counts so their plain signed sum equals `target_area`
///
/// `out[i] = counts[i] * (target_area / sum(counts))`. Fails with
/// [`Error::DivisionByZero`] when the signed sum is zero, which includes
/// histograms whose positive and negative content cancel.
pub fn rescale_to_sum<T: Float>(counts: &[T], target_area: T) -> Result<Vec<T>> {
    if counts.iter().any(|c| !c.is_finite()) || !target_area.is_finite() {
        return Err(Error::non_finite("histogram counts"));
    }

    let total = signed_sum(counts);
    if total.is_zero() {
        return Err(Error::DivisionByZero(
            "histogram counts sum to zero".to_string(),
        ));
    }

    let factor = target_area / total;
    Ok(counts.iter().map(|&c| c * factor).collect())
}
