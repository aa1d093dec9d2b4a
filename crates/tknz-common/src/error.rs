//! Errors

use thiserror::Error;

use crate::types::Pubkey;

/// TKNZ Error
#[derive(Debug, Error)]
pub enum Error {
    /// Not a valid base58 public key
    #[error("Invalid public key: `{0}`")]
    InvalidPubkey(String),
    /// Text empty after trimming
    #[error("Text is empty")]
    EmptyText,
    /// Wallet is not connected
    #[error("Wallet is not connected")]
    WalletNotConnected,
    /// Wallet does not pass the capability gate
    #[error("A Phantom compatible wallet is required")]
    WalletIncompatible,
    /// User declined the signature prompt
    #[error("Wallet rejected the request: `{0}`")]
    WalletRejected(String),
    /// Metadata backend returned a body missing the uri or the name
    #[error("Invalid metadata response")]
    InvalidMetadataResponse,
    /// Metadata backend returned a non-success response
    #[error("Metadata API failed ({status}): `{detail}`")]
    MetadataApi {
        /// HTTP status code
        status: u16,
        /// Response body, surfaced as diagnostic text
        detail: String,
    },
    /// Metadata backend did not respond within the bounded wait
    #[error("Metadata backend timed out")]
    BackendTimeout,
    /// Transaction submitted without a fee payer or a recent blockhash
    #[error("Transaction is missing a fee payer or a recent blockhash")]
    IncompleteTransaction,
    /// No token account at the given address
    #[error("Token not found: `{0}`")]
    TokenNotFound(Pubkey),
    /// Opaque failure reported by the chain or its SDK
    #[error("Chain error: `{0}`")]
    Chain(String),
    /// Transport failure
    #[error("HTTP error: `{0}`")]
    Http(String),
    /// Serde Error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Custom Error
    #[error("`{0}`")]
    Custom(String),
}
