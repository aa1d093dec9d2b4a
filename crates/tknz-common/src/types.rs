//! Workflow entities and chain primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Render a lamport amount as a SOL amount for user-facing text.
pub fn format_sol(lamports: u64) -> String {
    let sol = lamports as f64 / LAMPORTS_PER_SOL as f64;
    format!("{}", sol)
}

/// A base58-encoded account address.
///
/// Validated on parse; the key material itself is owned by the wallet and
/// chain collaborators, this is only the encoding they hand back.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pubkey(String);

impl Pubkey {
    /// The base58 string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 32 byte keys encode to 32..=44 base58 characters
        if !(32..=44).contains(&s.len()) || s.chars().any(|c| !BASE58_ALPHABET.contains(c)) {
            return Err(Error::InvalidPubkey(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of a submitted chain transaction.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap a signature string reported by the chain SDK.
    pub fn new<S: Into<String>>(signature: S) -> Self {
        Self(signature.into())
    }

    /// The base58 string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recent chain checkpoint attached to transactions before submission.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blockhash(String);

impl Blockhash {
    /// Wrap a blockhash string reported by the chain SDK.
    pub fn new<S: Into<String>>(blockhash: S) -> Self {
        Self(blockhash.into())
    }
}

impl fmt::Display for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confirmation level of a submitted transaction, weakest to strongest.
///
/// Only [`ConfirmationLevel::Finalized`] satisfies the finalization poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationLevel {
    /// Seen by the node that accepted it
    Processed,
    /// Voted on by a supermajority
    Confirmed,
    /// Extremely unlikely to be reverted
    Finalized,
}

/// One user-submitted mint request. Transient; lives for a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// The connected wallet's public key, used as fee payer
    pub wallet_address: Pubkey,
    /// Trimmed, non-empty text to tokenize
    pub text_content: String,
}

impl MintRequest {
    /// Build a request from raw form input. Trims the text and rejects
    /// empty or whitespace-only submissions.
    pub fn new(wallet_address: Pubkey, text: &str) -> Result<Self, Error> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyText);
        }
        Ok(Self {
            wallet_address,
            text_content: trimmed.to_string(),
        })
    }
}

/// Metadata produced by the preparation backend, validated complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMetadata {
    /// Content URI to embed in the token
    pub metadata_uri: String,
    /// Display name for the token
    pub display_name: String,
}

/// Result of a submitted mint attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintOutcome {
    /// Signature of the mint transaction
    pub signature: Signature,
    /// Block-explorer link for the transaction
    pub explorer_url: String,
    /// Address of the created token, when the SDK reported one
    pub mint_address: Option<Pubkey>,
    /// Whether the finalization poller observed the terminal status
    pub finalized: bool,
}

/// Progress label for one mint attempt, driving the persistent status line.
///
/// Mutated only by the orchestrator, monotonically through the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// No attempt running
    Idle,
    /// Checking wallet connection and input text
    ValidatingInput,
    /// Waiting on the metadata-preparation backend
    PreparingMetadata,
    /// Transaction built, wallet approval requested
    AwaitingApproval,
    /// Signatures collected, minting
    Minting,
    /// Sending the signed transaction(s) to the network
    Submitting,
    /// Polling for the terminal confirmation level
    AwaitingFinalization,
    /// Finalized on chain
    Finalized,
    /// Submitted but not yet visibly confirmed; a soft success
    SubmittedUnconfirmed,
    /// The attempt failed
    Failed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::ValidatingInput => "Validating input...",
            Self::PreparingMetadata => "Preparing blocks for the chain...",
            Self::AwaitingApproval => "Metadata ready, awaiting wallet approval...",
            Self::Minting => "Minting NFT, please confirm in your wallet...",
            Self::Submitting => "Submitting transaction...",
            Self::AwaitingFinalization => "Waiting for finalization...",
            Self::Finalized => "Finalized! Check your wallet.",
            Self::SubmittedUnconfirmed => "Submitted! If not visible yet, check again soon.",
            Self::Failed => "Minting failed.",
        };
        write!(f, "{}", label)
    }
}

/// Read-only view of an already minted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDetails {
    /// Token mint address
    pub mint: Pubkey,
    /// On-chain name
    pub name: String,
    /// Description from the metadata JSON
    pub description: Option<String>,
    /// Image URI from the metadata JSON
    pub image: Option<String>,
    /// Update authority, displayed as the owner
    pub owner: Option<Pubkey>,
    /// Creator addresses
    pub creators: Vec<Pubkey>,
    /// "Tokenized via" attribute, when present
    pub tokenized_via: String,
    /// Block time of the most recent signature for the mint address
    pub created_at: Option<u64>,
    /// Whether the token metadata can still be changed
    pub mutable: bool,
    /// Block-explorer link for the mint address
    pub explorer_url: String,
}
