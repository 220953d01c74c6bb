//! Error types for asset generation

use thiserror::Error;

/// Everything that can go wrong between pressing Generate and holding a PNG.
///
/// The UI shows each variant as a single line of text; none of them are fatal.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("an API key is required before generating")]
    CredentialMissing,

    #[error("network error: {0}")]
    NetworkFailure(String),

    #[error("could not decode image: {0}")]
    DecodeFailure(String),

    #[error("unknown asset category: {0}")]
    UnknownCategory(String),

    #[error("could not encode PNG: {0}")]
    EncodeFailure(String),
}

impl From<reqwest::Error> for AssetError {
    fn from(err: reqwest::Error) -> Self {
        AssetError::NetworkFailure(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
