//! The mint orchestration workflow.

use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::instrument;

use tknz_common::chain::{CreateTokenParams, TransferParams};
use tknz_common::metadata::PrepareMetadataRequest;
use tknz_common::transaction::SignedTransaction;
use tknz_common::types::{
    ConfirmationLevel, MintOutcome, MintRequest, PreparedMetadata, Signature, WorkflowStatus,
};
use tknz_common::Error as CommonError;

use super::classify::{classify, Classification, FailureKind};
use super::events::{Notice, NoticeKind};
use super::finalize::wait_for_finalization;
use super::{Error, Minter};

/// Retry budget for confirming the fee transfer before the mint goes out.
const FEE_CONFIRM_TRIES: u32 = 10;
const FEE_CONFIRM_DELAY: Duration = Duration::from_millis(1000);

/// Successful result of one mint attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The mint transaction went out; `finalized` tells whether the poller
    /// observed the terminal status within its budget.
    Minted(MintOutcome),
    /// The network reported the transaction as already processed. Raised
    /// through the failure path but reclassified as success; the user
    /// should check their wallet or the explorer.
    AlreadyProcessed,
}

/// A classified failure of one mint attempt.
#[derive(Debug, thiserror::Error)]
#[error("{}", .classification.user_message)]
pub struct MintFailure {
    /// The user-facing outcome
    pub classification: Classification,
    /// Underlying error, kept for diagnostics only
    #[source]
    pub source: Error,
}

impl Minter {
    /// Drive one mint attempt end to end: validate input, prepare metadata,
    /// build and sign the transaction(s), submit, and poll for finalization.
    ///
    /// Re-running after a failure starts a fresh attempt; a call while
    /// another attempt is in flight fails fast without touching the wallet.
    #[instrument(skip(self, text))]
    pub async fn tokenize(&self, text: &str) -> Result<AttemptOutcome, MintFailure> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(self.report_failure(Error::AttemptInProgress));
        }

        let result = self.run_attempt(text).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let classification = classify(&err, &self.config);
                if classification.kind == FailureKind::DuplicateIgnored {
                    tracing::info!("duplicate submission treated as success: {}", err);
                    self.events.notice(Notice {
                        kind: NoticeKind::AlreadyProcessed,
                        message: classification.user_message,
                        dismiss_after: classification.dismiss_after,
                    });
                    return Ok(AttemptOutcome::AlreadyProcessed);
                }
                Err(self.report_classified(classification, err))
            }
        }
    }

    /// The happy-path state machine. Every step strictly awaits the prior
    /// one; there is no parallelism within an attempt.
    async fn run_attempt(&self, text: &str) -> Result<AttemptOutcome, Error> {
        // No status is emitted until validation passes: an attempt that is
        // rejected for bad input leaves the persistent status line alone
        // and surfaces only as a transient notice.
        if !self.wallet.is_phantom_compatible() {
            return Err(CommonError::WalletIncompatible.into());
        }
        let payer = self
            .wallet
            .public_key()
            .ok_or(CommonError::WalletNotConnected)?;
        let request = MintRequest::new(payer.clone(), text).map_err(Error::from)?;
        self.events.status(WorkflowStatus::ValidatingInput);

        self.events.status(WorkflowStatus::PreparingMetadata);
        let response = self
            .metadata
            .prepare(PrepareMetadataRequest::from(&request))
            .await?;
        let metadata = PreparedMetadata::try_from(response)?;
        tracing::debug!(uri = %metadata.metadata_uri, name = %metadata.display_name, "metadata prepared");

        self.events.status(WorkflowStatus::AwaitingApproval);
        let blockhash = self.chain.latest_blockhash().await?;
        let create = self
            .chain
            .build_create_token(CreateTokenParams {
                uri: metadata.metadata_uri,
                name: metadata.display_name,
                royalty_bps: 0,
                mutable: false,
                fee_payer: payer.clone(),
                recent_blockhash: blockhash.clone(),
            })
            .await?;
        let mint_address = create.mint_address().cloned();

        self.events.status(WorkflowStatus::Minting);
        let signature = match self.config.fee.clone() {
            Some(fee) => {
                let transfer = self
                    .chain
                    .build_transfer(TransferParams {
                        to: fee.collector,
                        lamports: fee.lamports,
                        fee_payer: payer,
                        recent_blockhash: blockhash,
                    })
                    .await?;

                if self.wallet.supports_batch_signing() {
                    // One prompt for both transactions.
                    let mut signed = self
                        .wallet
                        .sign_all_transactions(vec![transfer, create])
                        .await?;
                    if signed.len() != 2 {
                        return Err(CommonError::Custom(
                            "wallet returned the wrong number of signed transactions".to_string(),
                        )
                        .into());
                    }
                    let create_tx = signed.remove(1);
                    let fee_tx = signed.remove(0);

                    self.events.status(WorkflowStatus::Submitting);
                    self.pay_fee(fee_tx).await?;
                    self.chain.send_transaction(create_tx).await?
                } else {
                    // Sequential prompts: the fee transfer is approved,
                    // submitted and confirmed before the mint is even signed.
                    let fee_tx = self.wallet.sign_transaction(transfer).await?;
                    self.events.status(WorkflowStatus::Submitting);
                    self.pay_fee(fee_tx).await?;

                    let create_tx = self.wallet.sign_transaction(create).await?;
                    self.chain.send_transaction(create_tx).await?
                }
            }
            None => {
                let create_tx = self.wallet.sign_transaction(create).await?;
                self.events.status(WorkflowStatus::Submitting);
                self.chain.send_transaction(create_tx).await?
            }
        };
        tracing::info!(%signature, "mint transaction submitted");

        self.events.status(WorkflowStatus::AwaitingFinalization);
        let finalized =
            wait_for_finalization(self.chain.as_ref(), &signature, &self.config.finalize).await;

        self.events.status(if finalized {
            WorkflowStatus::Finalized
        } else {
            WorkflowStatus::SubmittedUnconfirmed
        });

        Ok(AttemptOutcome::Minted(MintOutcome {
            explorer_url: self.tx_url(&signature),
            signature,
            mint_address,
            finalized,
        }))
    }

    /// Submit the fee transfer and wait until the chain accepts it. The
    /// mint transaction must never go out before the fee is at least
    /// confirmed.
    async fn pay_fee(&self, fee_tx: SignedTransaction) -> Result<Signature, Error> {
        let signature = self.chain.send_transaction(fee_tx).await?;
        tracing::debug!(%signature, "fee transfer submitted");

        for _ in 0..FEE_CONFIRM_TRIES {
            match self.chain.signature_status(&signature).await {
                Ok(Some(level)) if level >= ConfirmationLevel::Confirmed => {
                    return Ok(signature);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!("error checking fee transfer status: {}", err);
                }
            }
            tokio::time::sleep(FEE_CONFIRM_DELAY).await;
        }

        Err(CommonError::Chain(format!("fee transfer {} was not accepted", signature)).into())
    }

    fn report_failure(&self, err: Error) -> MintFailure {
        let classification = classify(&err, &self.config);
        self.report_classified(classification, err)
    }

    /// Route a classified failure to the event stream. Input errors surface
    /// as a transient notice only; everything else also moves the persistent
    /// status line to `Failed`.
    fn report_classified(&self, classification: Classification, err: Error) -> MintFailure {
        tracing::error!("mint attempt failed: {}", err);

        let kind = match classification.kind {
            FailureKind::InputInvalid => NoticeKind::InputInvalid,
            FailureKind::InsufficientBalance => NoticeKind::InsufficientBalance,
            FailureKind::BackendTimeout => NoticeKind::BackendTimeout,
            FailureKind::DuplicateIgnored => NoticeKind::AlreadyProcessed,
            FailureKind::GenericFailure => NoticeKind::Failure,
        };
        if classification.kind != FailureKind::InputInvalid {
            self.events.status(WorkflowStatus::Failed);
        }
        self.events.notice(Notice {
            kind,
            message: classification.user_message.clone(),
            dismiss_after: classification.dismiss_after,
        });

        MintFailure {
            classification,
            source: err,
        }
    }
}
