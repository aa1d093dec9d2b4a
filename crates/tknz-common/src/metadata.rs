//! Wire types and connector trait for the metadata-preparation backend.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{MintRequest, PreparedMetadata, Pubkey};

/// Body of `POST /prepare-metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareMetadataRequest {
    /// Connected wallet address
    pub wallet_address: Pubkey,
    /// Trimmed text to tokenize
    pub text_content: String,
}

impl From<&MintRequest> for PrepareMetadataRequest {
    fn from(request: &MintRequest) -> Self {
        Self {
            wallet_address: request.wallet_address.clone(),
            text_content: request.text_content.clone(),
        }
    }
}

/// Raw response of `POST /prepare-metadata`.
///
/// Both fields are optional on the wire; completeness is checked by the
/// conversion into [`PreparedMetadata`], not by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareMetadataResponse {
    /// Content URI for the token metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
    /// Display name derived from the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trimmed_name: Option<String>,
}

impl TryFrom<PrepareMetadataResponse> for PreparedMetadata {
    type Error = Error;

    fn try_from(response: PrepareMetadataResponse) -> Result<Self, Self::Error> {
        match (response.metadata_uri, response.trimmed_name) {
            (Some(metadata_uri), Some(display_name))
                if !metadata_uri.is_empty() && !display_name.is_empty() =>
            {
                Ok(Self {
                    metadata_uri,
                    display_name,
                })
            }
            _ => Err(Error::InvalidMetadataResponse),
        }
    }
}

/// Interface to the metadata-preparation backend.
#[async_trait]
pub trait MetadataConnector: Debug + Send + Sync {
    /// Prepare metadata for a piece of text. A non-success response or a
    /// bounded-wait overrun is a hard failure for the attempt.
    async fn prepare(
        &self,
        request: PrepareMetadataRequest,
    ) -> Result<PrepareMetadataResponse, Error>;

    /// Best-effort wake ping, mitigating backend cold starts. Must never
    /// block or fail the caller; the outcome is ignored entirely.
    fn wake(&self) {}
}
