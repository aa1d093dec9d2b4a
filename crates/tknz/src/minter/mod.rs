//! TKNZ Minter
//!
//! The [`Minter`] is the high level entry point of this crate: it holds the
//! chain, wallet and metadata collaborators plus one configuration object,
//! and drives a mint attempt end to end with [`Minter::tokenize`]. Status
//! transitions and notices are published on a broadcast event stream that a
//! presentation layer subscribes to via [`Minter::subscribe`].

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use tknz_common::chain::{ChainClient, WalletConnector};
use tknz_common::metadata::MetadataConnector;
use tknz_common::types::{Pubkey, Signature, LAMPORTS_PER_SOL};

mod builder;
pub mod classify;
mod error;
pub mod events;
mod finalize;
mod metadata;
mod mint;
mod token;

pub use builder::MinterBuilder;
pub use classify::{classify, Classification, FailureKind};
pub use error::Error;
pub use events::{MintEvent, Notice, NoticeKind};
pub use finalize::{wait_for_finalization, FinalizePolicy};
pub use metadata::HttpMetadataClient;
pub use mint::{AttemptOutcome, MintFailure};

use events::EventSink;

/// Default platform fee when fee collection is enabled: 0.01 SOL.
pub const DEFAULT_FEE_LAMPORTS: u64 = LAMPORTS_PER_SOL / 100;

/// Minimum balance quoted to the user when a mint fails for lack of funds:
/// 0.02 SOL.
pub const DEFAULT_MIN_BALANCE_LAMPORTS: u64 = LAMPORTS_PER_SOL / 50;

/// Optional platform fee collected before minting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    /// Fee-collecting wallet address
    pub collector: Pubkey,
    /// Fee amount in lamports
    pub lamports: u64,
}

/// Minter configuration.
///
/// Constructed once at application start and passed in by reference,
/// never ambient global state.
#[derive(Debug, Clone)]
pub struct MinterConfig {
    /// Block-explorer host for user-facing links
    pub explorer_host: String,
    /// Cluster query parameter on explorer links
    pub cluster: String,
    /// Platform fee transfer, prepended to the mint when configured
    pub fee: Option<FeeConfig>,
    /// Finalization polling budget
    pub finalize: FinalizePolicy,
    /// Minimum balance quoted in the insufficient-balance notice
    pub min_balance_lamports: u64,
    /// Auto-dismiss interval for the insufficient-balance notice
    pub notice_dismiss: Duration,
    /// Send the best-effort backend wake ping on construction
    pub wake_on_start: bool,
}

impl Default for MinterConfig {
    fn default() -> Self {
        Self {
            explorer_host: "explorer.solana.com".to_string(),
            cluster: "mainnet".to_string(),
            fee: None,
            finalize: FinalizePolicy::default(),
            min_balance_lamports: DEFAULT_MIN_BALANCE_LAMPORTS,
            notice_dismiss: Duration::from_secs(5),
            wake_on_start: true,
        }
    }
}

/// TKNZ Minter
///
/// Drives one mint attempt at a time against the configured collaborators.
/// Cheap to clone; clones share the event stream and the single-attempt
/// guard.
#[derive(Debug, Clone)]
pub struct Minter {
    config: Arc<MinterConfig>,
    chain: Arc<dyn ChainClient>,
    wallet: Arc<dyn WalletConnector>,
    metadata: Arc<dyn MetadataConnector>,
    http: reqwest::Client,
    events: EventSink,
    in_flight: Arc<AtomicBool>,
}

impl Minter {
    /// Start building a [`Minter`].
    pub fn builder() -> MinterBuilder {
        MinterBuilder::new()
    }

    /// Subscribe to the workflow event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
        self.events.subscribe()
    }

    /// The configuration this minter was built with.
    pub fn config(&self) -> &MinterConfig {
        &self.config
    }

    /// Explorer link for a transaction signature.
    pub fn tx_url(&self, signature: &Signature) -> String {
        format!(
            "https://{}/tx/{}?cluster={}",
            self.config.explorer_host, signature, self.config.cluster
        )
    }

    /// Explorer link for an account address.
    pub fn address_url(&self, address: &Pubkey) -> String {
        format!(
            "https://{}/address/{}?cluster={}",
            self.config.explorer_host, address, self.config.cluster
        )
    }
}
