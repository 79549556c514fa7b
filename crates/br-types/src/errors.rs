//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RailError {
    #[error("Provisioning error: {0}")]
    Provision(String),

    #[error("Listing error: {0}")]
    Listing(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RailResult<T> = Result<T, RailError>;

impl From<RailError> for String {
    fn from(err: RailError) -> String {
        err.to_string()
    }
}
