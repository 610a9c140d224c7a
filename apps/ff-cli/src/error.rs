//! CLI error type.

use ff_network::NetworkError;
use ff_thermo::ThermoError;
use ff_transport::TransportError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid case file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid case: {what}")]
    InvalidCase { what: String },

    #[error(transparent)]
    Thermo(#[from] ThermoError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("{failed} of {total} nodes failed, first: {first}")]
    NodesFailed {
        failed: usize,
        total: usize,
        first: NetworkError,
    },
}

pub type CliResult<T> = Result<T, CliError>;
