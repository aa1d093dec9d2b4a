//! Scripted chain, wallet and metadata fakes.
//!
//! Used for testing the mint workflow and for CLI dry runs, where statuses
//! progress on a script instead of a network. Behavior is configured up
//! front; everything the workflow does against the fakes is recorded and
//! can be asserted on afterwards.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

use tknz_common::chain::{
    ChainClient, CreateTokenParams, OnChainToken, TransactionRecord, TransferParams,
    WalletConnector,
};
use tknz_common::metadata::{MetadataConnector, PrepareMetadataRequest, PrepareMetadataResponse};
use tknz_common::transaction::{Instruction, SignedTransaction, UnsignedTransaction};
use tknz_common::types::{Blockhash, ConfirmationLevel, Pubkey, Signature};
use tknz_common::Error;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Random base58 string of the given length.
pub fn random_base58(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE58_ALPHABET[rng.random_range(0..BASE58_ALPHABET.len())] as char)
        .collect()
}

/// Random well-formed account address.
pub fn random_pubkey() -> Pubkey {
    random_base58(44).parse().expect("generated key is valid base58")
}

fn random_signature() -> Signature {
    Signature::new(random_base58(88))
}

/// What kind of transaction a [`ChainEvent::Submitted`] entry was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Carried a create-token instruction
    CreateToken,
    /// Carried only a native transfer
    Transfer,
}

/// One recorded interaction with the fake chain, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    /// A transaction was submitted
    Submitted(TxKind),
    /// A signature status was queried
    StatusQuery,
}

/// Scripted behavior for [`FakeChain`].
#[derive(Debug, Clone)]
pub struct FakeChainConfig {
    /// Report `finalized` once a signature has been queried this many
    /// times; `None` never finalizes (lesser statuses are still reported)
    pub finalize_after: Option<u32>,
    /// Error out the first N status queries per signature
    pub status_failures: u32,
    /// Fail submission of create-token transactions with this message
    pub create_failure: Option<String>,
    /// Fail submission of transfer transactions with this message
    pub transfer_failure: Option<String>,
    /// Pin the signature returned for create-token submissions
    pub signature: Option<Signature>,
}

impl Default for FakeChainConfig {
    fn default() -> Self {
        Self {
            finalize_after: Some(1),
            status_failures: 0,
            create_failure: None,
            transfer_failure: None,
            signature: None,
        }
    }
}

#[derive(Debug, Default)]
struct FakeChainState {
    submitted: Vec<SignedTransaction>,
    queries: HashMap<Signature, u32>,
    checks: Vec<Instant>,
    events: Vec<ChainEvent>,
    tokens: HashMap<Pubkey, OnChainToken>,
    records: HashMap<Pubkey, Vec<TransactionRecord>>,
}

/// Scripted [`ChainClient`].
#[derive(Debug, Clone)]
pub struct FakeChain {
    config: FakeChainConfig,
    state: Arc<Mutex<FakeChainState>>,
}

impl FakeChain {
    /// New fake chain with the given script.
    pub fn new(config: FakeChainConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(FakeChainState::default())),
        }
    }

    /// Finalizes every signature on its first status query.
    pub fn finalizing() -> Self {
        Self::new(FakeChainConfig::default())
    }

    /// Never reports `finalized`; statuses stay at `confirmed`.
    pub fn never_finalizing() -> Self {
        Self::new(FakeChainConfig {
            finalize_after: None,
            ..Default::default()
        })
    }

    /// Transactions submitted so far, in submission order.
    pub async fn submitted(&self) -> Vec<SignedTransaction> {
        self.state.lock().await.submitted.clone()
    }

    /// How many times this signature's status was queried.
    pub async fn status_query_count(&self, signature: &Signature) -> u32 {
        self.state
            .lock()
            .await
            .queries
            .get(signature)
            .copied()
            .unwrap_or(0)
    }

    /// Instants of every status query, in call order.
    pub async fn status_check_times(&self) -> Vec<Instant> {
        self.state.lock().await.checks.clone()
    }

    /// Every interaction so far, in call order.
    pub async fn events(&self) -> Vec<ChainEvent> {
        self.state.lock().await.events.clone()
    }

    /// Script a token account for [`ChainClient::find_token`].
    pub async fn insert_token(&self, token: OnChainToken) {
        let mut state = self.state.lock().await;
        state.tokens.insert(token.mint.clone(), token);
    }

    /// Script a transaction record for an address.
    pub async fn insert_record(&self, address: Pubkey, record: TransactionRecord) {
        let mut state = self.state.lock().await;
        state.records.entry(address).or_default().push(record);
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn latest_blockhash(&self) -> Result<Blockhash, Error> {
        Ok(Blockhash::new(random_base58(44)))
    }

    async fn build_create_token(
        &self,
        params: CreateTokenParams,
    ) -> Result<UnsignedTransaction, Error> {
        Ok(UnsignedTransaction::new(vec![Instruction::CreateToken {
            uri: params.uri,
            name: params.name,
            royalty_bps: params.royalty_bps,
            mutable: params.mutable,
            mint: random_pubkey(),
        }])
        .with_fee_payer(params.fee_payer)
        .with_recent_blockhash(params.recent_blockhash))
    }

    async fn build_transfer(&self, params: TransferParams) -> Result<UnsignedTransaction, Error> {
        Ok(UnsignedTransaction::new(vec![Instruction::Transfer {
            to: params.to,
            lamports: params.lamports,
        }])
        .with_fee_payer(params.fee_payer)
        .with_recent_blockhash(params.recent_blockhash))
    }

    async fn send_transaction(&self, transaction: SignedTransaction) -> Result<Signature, Error> {
        transaction.transaction.ensure_ready()?;

        let kind = if transaction.transaction.creates_token() {
            if let Some(message) = &self.config.create_failure {
                return Err(Error::Chain(message.clone()));
            }
            TxKind::CreateToken
        } else {
            if let Some(message) = &self.config.transfer_failure {
                return Err(Error::Chain(message.clone()));
            }
            TxKind::Transfer
        };

        let signature = match (&self.config.signature, kind) {
            (Some(signature), TxKind::CreateToken) => signature.clone(),
            _ => random_signature(),
        };

        let mut state = self.state.lock().await;
        state.submitted.push(transaction);
        state.events.push(ChainEvent::Submitted(kind));
        tracing::debug!(%signature, ?kind, "fake chain accepted transaction");
        Ok(signature)
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<ConfirmationLevel>, Error> {
        let mut state = self.state.lock().await;
        state.checks.push(Instant::now());
        state.events.push(ChainEvent::StatusQuery);
        let count = state.queries.entry(signature.clone()).or_insert(0);
        *count += 1;

        if *count <= self.config.status_failures {
            return Err(Error::Chain("transient rpc error".to_string()));
        }

        match self.config.finalize_after {
            Some(threshold) if *count >= threshold => Ok(Some(ConfirmationLevel::Finalized)),
            _ => Ok(Some(ConfirmationLevel::Confirmed)),
        }
    }

    async fn find_token(&self, mint: &Pubkey) -> Result<OnChainToken, Error> {
        self.state
            .lock()
            .await
            .tokens
            .get(mint)
            .cloned()
            .ok_or_else(|| Error::TokenNotFound(mint.clone()))
    }

    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let state = self.state.lock().await;
        let mut records = state.records.get(address).cloned().unwrap_or_default();
        records.truncate(limit);
        Ok(records)
    }
}

/// Scripted [`WalletConnector`].
#[derive(Debug, Clone)]
pub struct FakeWallet {
    pubkey: Option<Pubkey>,
    phantom: bool,
    batch: bool,
    rejection: Option<String>,
    prompts: Arc<AtomicU32>,
}

impl FakeWallet {
    /// Connected, Phantom-compatible, batch-capable wallet.
    pub fn connected() -> Self {
        Self {
            pubkey: Some(random_pubkey()),
            phantom: true,
            batch: true,
            rejection: None,
            prompts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Wallet with no connected account.
    pub fn disconnected() -> Self {
        Self {
            pubkey: None,
            ..Self::connected()
        }
    }

    /// Wallet that fails the Phantom capability gate.
    pub fn incompatible() -> Self {
        Self {
            phantom: false,
            ..Self::connected()
        }
    }

    /// Disable batch signing; each transaction needs its own prompt.
    pub fn without_batch_signing(mut self) -> Self {
        self.batch = false;
        self
    }

    /// Decline every signature prompt with this message.
    pub fn rejecting(mut self, message: &str) -> Self {
        self.rejection = Some(message.to_string());
        self
    }

    /// Number of signature prompts shown so far. A batch counts as one.
    pub fn signing_prompts(&self) -> u32 {
        self.prompts.load(Ordering::SeqCst)
    }

    fn approve(&self, transaction: UnsignedTransaction) -> Result<SignedTransaction, Error> {
        if let Some(message) = &self.rejection {
            return Err(Error::WalletRejected(message.clone()));
        }
        let signer = self.pubkey.clone().ok_or(Error::WalletNotConnected)?;
        transaction.ensure_ready()?;
        Ok(SignedTransaction {
            signer,
            transaction,
        })
    }
}

#[async_trait]
impl WalletConnector for FakeWallet {
    fn is_phantom_compatible(&self) -> bool {
        self.phantom
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.pubkey.clone()
    }

    fn supports_batch_signing(&self) -> bool {
        self.batch
    }

    async fn sign_transaction(
        &self,
        transaction: UnsignedTransaction,
    ) -> Result<SignedTransaction, Error> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.approve(transaction)
    }

    async fn sign_all_transactions(
        &self,
        transactions: Vec<UnsignedTransaction>,
    ) -> Result<Vec<SignedTransaction>, Error> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        transactions
            .into_iter()
            .map(|transaction| self.approve(transaction))
            .collect()
    }
}

/// Scripted [`MetadataConnector`].
#[derive(Debug, Clone)]
pub struct FakeMetadata {
    metadata_uri: Option<String>,
    trimmed_name: Option<String>,
    failure: Option<(u16, String)>,
    timeout: bool,
    calls: Arc<AtomicU32>,
}

impl FakeMetadata {
    /// Respond with a complete metadata body.
    pub fn returning(uri: &str, name: &str) -> Self {
        Self::with_response(Some(uri), Some(name))
    }

    /// Respond with an arbitrary, possibly incomplete body.
    pub fn with_response(uri: Option<&str>, name: Option<&str>) -> Self {
        Self {
            metadata_uri: uri.map(str::to_string),
            trimmed_name: name.map(str::to_string),
            failure: None,
            timeout: false,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Fail with a non-success response.
    pub fn failing(status: u16, detail: &str) -> Self {
        Self {
            failure: Some((status, detail.to_string())),
            ..Self::with_response(None, None)
        }
    }

    /// Exceed the bounded wait.
    pub fn timing_out() -> Self {
        Self {
            timeout: true,
            ..Self::with_response(None, None)
        }
    }

    /// Number of prepare calls received.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataConnector for FakeMetadata {
    async fn prepare(
        &self,
        _request: PrepareMetadataRequest,
    ) -> Result<PrepareMetadataResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.timeout {
            return Err(Error::BackendTimeout);
        }
        if let Some((status, detail)) = &self.failure {
            return Err(Error::MetadataApi {
                status: *status,
                detail: detail.clone(),
            });
        }
        Ok(PrepareMetadataResponse {
            metadata_uri: self.metadata_uri.clone(),
            trimmed_name: self.trimmed_name.clone(),
        })
    }
}
