//! Error types for geometry and coefficient calculations.

use ff_core::error::FfError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type TransportResult<T> = Result<T, TransportError>;

impl From<TransportError> for FfError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NonPhysical { what } => FfError::Invariant { what },
            TransportError::InvalidArg { what } => FfError::InvalidArg { what },
        }
    }
}
