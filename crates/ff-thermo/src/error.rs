//! Thermodynamic collaborator errors.

use ff_core::FfError;
use thiserror::Error;

/// Result type for thermodynamic operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors raised by thermodynamic systems and kinetics providers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative temperature, fractions, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument (length mismatch, bad index).
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An embedded iteration (flash, K-value solve) did not converge.
    #[error("Convergence failed for {what} after {iterations} iterations")]
    ConvergenceFailed {
        what: &'static str,
        iterations: usize,
    },
}

impl From<ThermoError> for FfError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::NonPhysical { what } => FfError::Invariant { what },
            ThermoError::InvalidArg { what } => FfError::InvalidArg { what },
            ThermoError::ConvergenceFailed { what, .. } => FfError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::ConvergenceFailed {
            what: "flash",
            iterations: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("flash"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn error_to_ff_error() {
        let err: FfError = ThermoError::InvalidArg { what: "x" }.into();
        assert!(matches!(err, FfError::InvalidArg { what: "x" }));
    }
}
