use anyhow::Result;
use clap::Args;
use tknz::minter::HttpMetadataClient;
use tknz_common::metadata::{MetadataConnector, PrepareMetadataRequest};
use tknz_common::types::{PreparedMetadata, Pubkey};
use url::Url;

#[derive(Args)]
pub struct PrepareSubCommand {
    /// Wallet address to prepare for
    #[arg(short, long)]
    wallet: Pubkey,
    /// Text to tokenize
    text: String,
}

pub async fn prepare(backend: &Url, sub_command_args: &PrepareSubCommand) -> Result<()> {
    let client = HttpMetadataClient::new(backend.clone())?;

    let response = client
        .prepare(PrepareMetadataRequest {
            wallet_address: sub_command_args.wallet.clone(),
            text_content: sub_command_args.text.trim().to_string(),
        })
        .await?;

    let metadata = PreparedMetadata::try_from(response)?;

    println!("Name: {}", metadata.display_name);
    println!("Metadata URI: {}", metadata.metadata_uri);

    Ok(())
}
