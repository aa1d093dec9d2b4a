//! Read-only token detail view.
//!
//! Not part of the mint workflow: reads an already minted token by address,
//! resolves its metadata URI to JSON, and assembles the display fields.

use serde::Deserialize;
use tracing::instrument;

use tknz_common::types::{Pubkey, TokenDetails};
use tknz_common::Error as CommonError;

use super::{Error, Minter};

const DEFAULT_TOKENIZED_VIA: &str = "TKNZFUN";
const TOKENIZED_VIA_TRAIT: &str = "Tokenized via";

#[derive(Debug, Default, Deserialize)]
struct TokenMetadataJson {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    attributes: Vec<TokenAttribute>,
}

#[derive(Debug, Deserialize)]
struct TokenAttribute {
    trait_type: String,
    value: String,
}

impl Minter {
    /// Assemble the detail view for a minted token.
    ///
    /// The on-chain read is authoritative; the metadata JSON and the
    /// creation-time lookup are enrichment and degrade to defaults when
    /// they fail.
    #[instrument(skip(self))]
    pub async fn token_details(&self, mint: &Pubkey) -> Result<TokenDetails, Error> {
        let token = self.chain.find_token(mint).await?;

        let metadata = match self.fetch_token_metadata(&token.uri).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!("token metadata fetch failed: {}", err);
                TokenMetadataJson::default()
            }
        };

        let created_at = match self.chain.signatures_for_address(mint, 1).await {
            Ok(records) => records.first().and_then(|record| record.block_time),
            Err(err) => {
                tracing::warn!("signature lookup failed: {}", err);
                None
            }
        };

        let tokenized_via = metadata
            .attributes
            .iter()
            .find(|attribute| attribute.trait_type == TOKENIZED_VIA_TRAIT)
            .map(|attribute| attribute.value.clone())
            .unwrap_or_else(|| DEFAULT_TOKENIZED_VIA.to_string());

        Ok(TokenDetails {
            explorer_url: self.address_url(mint),
            mint: token.mint,
            name: token.name,
            description: metadata.description,
            image: metadata.image,
            owner: token.update_authority,
            creators: token.creators,
            tokenized_via,
            created_at,
            mutable: token.mutable,
        })
    }

    async fn fetch_token_metadata(&self, uri: &str) -> Result<TokenMetadataJson, Error> {
        let response = self.http.get(uri).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CommonError::Http(format!(
                "metadata fetch returned {}",
                status.as_u16()
            ))
            .into());
        }
        Ok(response.json().await?)
    }
}
