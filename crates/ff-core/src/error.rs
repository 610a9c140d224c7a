use thiserror::Error;

pub type FfResult<T> = Result<T, FfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

pub type LinalgResult<T> = Result<T, LinalgError>;

/// Failures of the linear kernels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// A pivot fell below the configured epsilon during forward elimination.
    #[error("Singular tridiagonal system: pivot {pivot:e} at row {row}")]
    Singular { row: usize, pivot: f64 },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Empty linear system")]
    Empty,
}

impl From<LinalgError> for FfError {
    fn from(e: LinalgError) -> Self {
        match e {
            LinalgError::Singular { .. } => FfError::Invariant {
                what: "singular linear system",
            },
            LinalgError::LengthMismatch { what, .. } => FfError::InvalidArg { what },
            LinalgError::Empty => FfError::InvalidArg {
                what: "empty linear system",
            },
        }
    }
}
