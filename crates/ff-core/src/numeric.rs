use crate::FfError;

/// Floating point type used throughout the crates.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FfError::NonFinite { what, value: v })
    }
}

/// Ensure every entry of a slice is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), FfError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

/// Largest absolute element-wise difference of two equal-length slices.
pub fn max_abs_diff(a: &[Real], b: &[Real]) -> Real {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Real::max)
}

/// Linear interpolation between `a` and `b` at fraction `s`.
#[inline]
pub fn lerp(a: Real, b: Real, s: Real) -> Real {
    a + s * (b - a)
}
