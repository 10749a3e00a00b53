use std::result;

use thiserror::Error;

/// A type alias for handling errors related to batwatch.
pub type Result<T> = result::Result<T, BatwatchError>;

/// An error that can occur while batwatch runs.
#[derive(Debug, Error)]
pub enum BatwatchError {
    /// An error when there is an IO exception.
    #[error("IO exception, {0}")]
    InvalidIo(String),
    /// An error when the config is invalid.
    #[error("Invalid config, {0}")]
    Config(String),
    /// An error while encoding or decoding stored records.
    #[error("Invalid record, {0}")]
    Record(String),
    /// An error to represent generic errors.
    #[error("Error, {0}")]
    Generic(String),
}

impl From<std::io::Error> for BatwatchError {
    fn from(err: std::io::Error) -> Self {
        BatwatchError::InvalidIo(err.to_string())
    }
}

impl From<toml_edit::de::Error> for BatwatchError {
    fn from(err: toml_edit::de::Error) -> Self {
        BatwatchError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BatwatchError {
    fn from(err: serde_json::Error) -> Self {
        BatwatchError::Record(err.to_string())
    }
}
