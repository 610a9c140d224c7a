//! Shared helpers for coefficient calculations.

use crate::error::{TransportError, TransportResult};
use ff_core::numeric::ensure_finite;

/// Gas fractions closer than this to 0 or 1 are treated as one-phase flow.
pub const EPSILON_PHASE_FRACTION: f64 = 1e-6;

/// Ensure a value is finite, returning TransportError if not.
pub fn check_finite(value: f64, what: &'static str) -> TransportResult<()> {
    ensure_finite(value, what).map_err(|_| TransportError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> TransportResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(TransportError::NonPhysical { what });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_positive() {
        assert!(check_positive(1e-9, "test").is_ok());
        assert!(check_positive(0.0, "test").is_err());
        assert!(check_positive(-2.0, "test").is_err());
    }
}
