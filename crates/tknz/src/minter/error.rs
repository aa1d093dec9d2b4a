//! Minter errors

use thiserror::Error;

/// Minter Error
#[derive(Debug, Error)]
pub enum Error {
    /// The single-attempt guard rejected a concurrent call
    #[error("A mint attempt is already in progress")]
    AttemptInProgress,
    /// Builder was not given a chain client
    #[error("A chain client is required")]
    MissingChainClient,
    /// Builder was not given a wallet connector
    #[error("A wallet connector is required")]
    MissingWalletConnector,
    /// Builder was not given a metadata connector or a backend URL
    #[error("A metadata connector or a backend URL is required")]
    MissingMetadataConnector,
    /// TKNZ Error
    #[error(transparent)]
    Common(#[from] tknz_common::Error),
    /// HTTP transport error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// Url Error
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
