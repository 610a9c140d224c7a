//! Error types for flow nodes and legs.

use ff_boundary::BoundaryError;
use ff_core::error::FfError;
use ff_thermo::ThermoError;
use ff_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),

    #[error("Thermodynamic error: {0}")]
    Thermo(#[from] ThermoError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl From<NetworkError> for FfError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::InvalidConfiguration { what } => FfError::InvalidArg { what },
            NetworkError::Boundary(e) => e.into(),
            NetworkError::Thermo(e) => e.into(),
            NetworkError::Transport(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_errors_pass_through() {
        let err: NetworkError = BoundaryError::Unsolved.into();
        assert!(err.to_string().contains("not been solved"));
        let ff: FfError = err.into();
        assert!(matches!(ff, FfError::Invariant { .. }));
    }
}
