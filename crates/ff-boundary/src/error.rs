//! Error types for boundary solves.

use ff_core::error::{FfError, LinalgError};
use ff_thermo::ThermoError;
use thiserror::Error;

/// Errors raised while building or solving an interface boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// A tridiagonal pivot underflowed.
    #[error("Singular boundary-layer system: pivot {pivot:e} at row {row}")]
    Singular { row: usize, pivot: f64 },

    /// An iteration (boundary solver or embedded flash) ran out of budget.
    #[error("Convergence failed: {what} after {iterations} iterations")]
    Convergence { what: String, iterations: usize },

    /// Malformed discretization or inconsistent vector lengths.
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("Boundary has not been solved")]
    Unsolved,

    #[error("Thermodynamic error: {0}")]
    Thermo(ThermoError),
}

pub type BoundaryResult<T> = Result<T, BoundaryError>;

impl From<LinalgError> for BoundaryError {
    fn from(e: LinalgError) -> Self {
        match e {
            LinalgError::Singular { row, pivot } => BoundaryError::Singular { row, pivot },
            LinalgError::LengthMismatch { .. } | LinalgError::Empty => {
                BoundaryError::InvalidConfiguration {
                    what: "linear system dimensions",
                }
            }
        }
    }
}

impl From<ThermoError> for BoundaryError {
    fn from(e: ThermoError) -> Self {
        match e {
            ThermoError::ConvergenceFailed { what, iterations } => BoundaryError::Convergence {
                what: format!("equilibrium calculation ({what})"),
                iterations,
            },
            other => BoundaryError::Thermo(other),
        }
    }
}

impl From<BoundaryError> for FfError {
    fn from(e: BoundaryError) -> Self {
        match e {
            BoundaryError::Singular { .. } => FfError::Invariant {
                what: "singular boundary-layer system",
            },
            BoundaryError::Convergence { .. } => FfError::Invariant {
                what: "boundary convergence",
            },
            BoundaryError::InvalidConfiguration { what } => FfError::InvalidArg { what },
            BoundaryError::Unsolved => FfError::Invariant {
                what: "boundary not solved",
            },
            BoundaryError::Thermo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_failure_becomes_convergence_error() {
        let err: BoundaryError = ThermoError::ConvergenceFailed {
            what: "flash",
            iterations: 7,
        }
        .into();
        assert!(matches!(err, BoundaryError::Convergence { iterations: 7, .. }));
    }

    #[test]
    fn singular_pivot_is_preserved() {
        let err: BoundaryError = LinalgError::Singular { row: 2, pivot: 0.0 }.into();
        assert_eq!(err, BoundaryError::Singular { row: 2, pivot: 0.0 });
    }

    #[test]
    fn other_thermo_errors_wrap() {
        let err: BoundaryError = ThermoError::InvalidArg { what: "x" }.into();
        assert!(matches!(err, BoundaryError::Thermo(_)));
        let ff: FfError = err.into();
        assert!(matches!(ff, FfError::InvalidArg { what: "x" }));
    }
}
