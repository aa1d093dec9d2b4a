use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tknz::minter::{AttemptOutcome, FeeConfig, MintEvent, Minter, MinterConfig};
use tknz_common::types::{Pubkey, LAMPORTS_PER_SOL};
use tknz_fake_chain::{FakeChain, FakeChainConfig, FakeMetadata, FakeWallet};
use url::Url;

#[derive(Args)]
pub struct TokenizeSubCommand {
    /// Text to tokenize
    text: String,
    /// Use a scripted metadata backend instead of the live one
    #[arg(long)]
    offline: bool,
    /// Collect a platform fee into this address before minting
    #[arg(long)]
    fee_collector: Option<Pubkey>,
    /// Fee amount in SOL
    #[arg(long, default_value = "0.01", value_parser = parse_fee_sol)]
    fee_sol: f64,
    /// Report `finalized` after this many status queries
    #[arg(long, default_value = "1")]
    finalize_after: u32,
    /// Never report `finalized`; exercises the soft-success path
    #[arg(long)]
    never_finalize: bool,
}

fn parse_fee_sol(value: &str) -> Result<f64, String> {
    let fee: f64 = value.parse().map_err(|_| "not a number".to_string())?;
    if !fee.is_finite() || fee <= 0.0 {
        return Err("fee must be a positive amount of SOL".to_string());
    }
    Ok(fee)
}

/// Drive a full mint attempt against a scripted chain and wallet, printing
/// every workflow event as it happens. Only the metadata backend is real.
pub async fn tokenize(backend: &Url, sub_command_args: &TokenizeSubCommand) -> Result<()> {
    let chain = FakeChain::new(FakeChainConfig {
        finalize_after: if sub_command_args.never_finalize {
            None
        } else {
            Some(sub_command_args.finalize_after)
        },
        ..Default::default()
    });
    let wallet = FakeWallet::connected();

    let config = MinterConfig {
        fee: sub_command_args.fee_collector.clone().map(|collector| FeeConfig {
            collector,
            lamports: (sub_command_args.fee_sol * LAMPORTS_PER_SOL as f64) as u64,
        }),
        ..Default::default()
    };

    let mut builder = Minter::builder()
        .chain(Arc::new(chain))
        .wallet(Arc::new(wallet))
        .config(config);
    builder = if sub_command_args.offline {
        builder.metadata(Arc::new(FakeMetadata::returning(
            "ipfs://offline",
            sub_command_args.text.trim(),
        )))
    } else {
        builder.backend_url(backend.clone())
    };
    let minter = builder.build()?;

    let mut events = minter.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                MintEvent::Status(status) => println!("[status] {}", status),
                MintEvent::Notice(notice) => println!("[notice] {}", notice.message),
                MintEvent::NoticeCleared(_) => println!("[notice] cleared"),
            }
        }
    });

    let result = minter.tokenize(&sub_command_args.text).await;
    printer.abort();

    match result {
        Ok(AttemptOutcome::Minted(outcome)) => {
            println!("Signature: {}", outcome.signature);
            println!("Explorer: {}", outcome.explorer_url);
            if let Some(mint) = &outcome.mint_address {
                println!("Token: {}", minter.address_url(mint));
            }
            if !outcome.finalized {
                println!("Not yet finalized; check the explorer link");
            }
        }
        Ok(AttemptOutcome::AlreadyProcessed) => {
            println!("Already processed; check your wallet");
        }
        Err(failure) => {
            println!("Failed: {}", failure);
        }
    }

    Ok(())
}
