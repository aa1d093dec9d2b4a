//! Collaborator traits for the chain and the wallet.
//!
//! The chain SDK and the wallet extension are opaque collaborators: the
//! workflow only drives them. These traits are the seams an implementation
//! plugs into; tests and dry runs use the scripted fakes.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Error;
use crate::transaction::{SignedTransaction, UnsignedTransaction};
use crate::types::{Blockhash, ConfirmationLevel, Pubkey, Signature};

/// Parameters for building a create-token transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTokenParams {
    /// Metadata content URI
    pub uri: String,
    /// Token display name
    pub name: String,
    /// Royalty in basis points
    pub royalty_bps: u16,
    /// Whether the metadata stays editable
    pub mutable: bool,
    /// Account debited for network costs
    pub fee_payer: Pubkey,
    /// Recent chain checkpoint
    pub recent_blockhash: Blockhash,
}

/// Parameters for building a native transfer transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    /// Receiving address
    pub to: Pubkey,
    /// Amount in lamports
    pub lamports: u64,
    /// Account debited for network costs
    pub fee_payer: Pubkey,
    /// Recent chain checkpoint
    pub recent_blockhash: Blockhash,
}

/// On-chain token account, as the chain SDK reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnChainToken {
    /// Mint address
    pub mint: Pubkey,
    /// On-chain name
    pub name: String,
    /// Metadata content URI
    pub uri: String,
    /// Update authority
    pub update_authority: Option<Pubkey>,
    /// Creator addresses
    pub creators: Vec<Pubkey>,
    /// Whether the metadata can still be changed
    pub mutable: bool,
}

/// A historical transaction touching an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Transaction signature
    pub signature: Signature,
    /// Unix block time, when known
    pub block_time: Option<u64>,
}

/// Interface to the chain and its SDK.
#[async_trait]
pub trait ChainClient: Debug + Send + Sync {
    /// Latest chain checkpoint to attach to transactions.
    async fn latest_blockhash(&self) -> Result<Blockhash, Error>;

    /// Build an unsigned create-token transaction. The returned transaction
    /// carries the freshly generated mint address of the token it creates.
    async fn build_create_token(
        &self,
        params: CreateTokenParams,
    ) -> Result<UnsignedTransaction, Error>;

    /// Build an unsigned native transfer transaction.
    async fn build_transfer(&self, params: TransferParams) -> Result<UnsignedTransaction, Error>;

    /// Submit a signed transaction. One-shot and non-idempotent from the
    /// caller's perspective; the chain may still treat duplicates as such.
    async fn send_transaction(&self, transaction: SignedTransaction) -> Result<Signature, Error>;

    /// Confirmation level of a submitted transaction, if the chain has
    /// observed it at all.
    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<ConfirmationLevel>, Error>;

    /// Read a token account by mint address.
    async fn find_token(&self, mint: &Pubkey) -> Result<OnChainToken, Error>;

    /// Most recent transactions touching an address, newest first.
    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, Error>;
}

/// Interface to the connected browser wallet.
#[async_trait]
pub trait WalletConnector: Debug + Send + Sync {
    /// Capability gate: only Phantom-compatible wallets are accepted.
    fn is_phantom_compatible(&self) -> bool;

    /// Public key of the connected wallet, `None` while disconnected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Whether the wallet can approve several transactions in one prompt.
    fn supports_batch_signing(&self) -> bool;

    /// Request approval of a single transaction.
    async fn sign_transaction(
        &self,
        transaction: UnsignedTransaction,
    ) -> Result<SignedTransaction, Error>;

    /// Request approval of several transactions in one prompt, preserving
    /// order. Callers must check [`Self::supports_batch_signing`] first.
    async fn sign_all_transactions(
        &self,
        transactions: Vec<UnsignedTransaction>,
    ) -> Result<Vec<SignedTransaction>, Error>;
}
