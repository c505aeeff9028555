//! Synthesis error types

use thiserror::Error;

/// Template synthesis errors
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("No VPC configuration found for environment '{0}'")]
    MissingNetworkConfig(String),

    #[error("Invalid CIDR block: {0}")]
    InvalidCidr(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SynthError>;
