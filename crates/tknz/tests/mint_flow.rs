//! End to end mint workflow tests against the scripted fakes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use tknz::minter::{
    AttemptOutcome, FailureKind, FeeConfig, MintEvent, Minter, MinterConfig, NoticeKind,
};
use tknz::types::{Signature, WorkflowStatus};
use tknz::Error as CommonError;
use tknz_fake_chain::{ChainEvent, FakeChain, FakeChainConfig, FakeMetadata, FakeWallet, TxKind};

fn minter_with(
    chain: &FakeChain,
    wallet: &FakeWallet,
    metadata: &FakeMetadata,
    config: MinterConfig,
) -> Minter {
    Minter::builder()
        .chain(Arc::new(chain.clone()))
        .wallet(Arc::new(wallet.clone()))
        .metadata(Arc::new(metadata.clone()))
        .config(config)
        .build()
        .expect("minter builds")
}

/// Drain every event already in the channel.
fn drain(receiver: &mut broadcast::Receiver<MintEvent>) -> Vec<MintEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

fn statuses(events: &[MintEvent]) -> Vec<WorkflowStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            MintEvent::Status(status) => Some(*status),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn empty_text_never_reaches_the_backend() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());
    let mut events = minter.subscribe();

    for text in ["", "   ", " \n\t "] {
        let failure = minter.tokenize(text).await.expect_err("must fail");
        assert_eq!(failure.classification.kind, FailureKind::InputInvalid);
    }

    assert_eq!(metadata.call_count(), 0);
    assert!(chain.submitted().await.is_empty());

    // input errors surface as a transient notice only; the persistent
    // status line is never touched
    let events = drain(&mut events);
    assert!(statuses(&events).is_empty());
    assert!(events.iter().any(|event| matches!(
        event,
        MintEvent::Notice(notice) if notice.kind == NoticeKind::InputInvalid
    )));
}

#[tokio::test(start_paused = true)]
async fn disconnected_wallet_never_reaches_the_backend() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::disconnected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(failure.classification.kind, FailureKind::InputInvalid);
    assert_eq!(metadata.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn incompatible_wallet_is_gated() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::incompatible();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(failure.classification.kind, FailureKind::InputInvalid);
    assert_eq!(metadata.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn incomplete_metadata_stops_before_any_transaction() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected();
    // trimmed_name missing
    let metadata = FakeMetadata::with_response(Some("ipfs://x"), None);
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert!(matches!(
        failure.source,
        tknz::minter::Error::Common(CommonError::InvalidMetadataResponse)
    ));
    assert!(chain.submitted().await.is_empty());
    assert_eq!(wallet.signing_prompts(), 0);
}

#[tokio::test(start_paused = true)]
async fn backend_failure_carries_the_status_and_body() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::failing(500, "metadata build exploded");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(failure.classification.kind, FailureKind::GenericFailure);
    assert!(matches!(
        failure.source,
        tknz::minter::Error::Common(CommonError::MetadataApi { status: 500, ref detail })
            if detail == "metadata build exploded"
    ));

    assert!(chain.submitted().await.is_empty());
    assert_eq!(wallet.signing_prompts(), 0);
}

#[tokio::test(start_paused = true)]
async fn happy_path_finalizes_with_an_explorer_link() {
    let chain = FakeChain::new(FakeChainConfig {
        signature: Some(Signature::new("sig123")),
        ..Default::default()
    });
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());
    let mut events = minter.subscribe();

    let outcome = match minter.tokenize("hello world").await.expect("must mint") {
        AttemptOutcome::Minted(outcome) => outcome,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(outcome.finalized);
    assert_eq!(outcome.signature, Signature::new("sig123"));
    assert_eq!(
        outcome.explorer_url,
        "https://explorer.solana.com/tx/sig123?cluster=mainnet"
    );
    assert!(outcome.mint_address.is_some());

    assert_eq!(
        statuses(&drain(&mut events)),
        vec![
            WorkflowStatus::ValidatingInput,
            WorkflowStatus::PreparingMetadata,
            WorkflowStatus::AwaitingApproval,
            WorkflowStatus::Minting,
            WorkflowStatus::Submitting,
            WorkflowStatus::AwaitingFinalization,
            WorkflowStatus::Finalized,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn poller_exhaustion_is_a_soft_success() {
    let chain = FakeChain::never_finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());
    let mut events = minter.subscribe();

    let outcome = match minter.tokenize("hello world").await.expect("soft success") {
        AttemptOutcome::Minted(outcome) => outcome,
        other => panic!("unexpected outcome: {:?}", other),
    };

    assert!(!outcome.finalized);
    assert!(outcome.explorer_url.contains("/tx/"));
    assert_eq!(chain.status_query_count(&outcome.signature).await, 15);

    let statuses = statuses(&drain(&mut events));
    assert_eq!(statuses.last(), Some(&WorkflowStatus::SubmittedUnconfirmed));
    assert!(!statuses.contains(&WorkflowStatus::Failed));
}

#[tokio::test(start_paused = true)]
async fn insufficient_balance_raises_an_auto_dismissing_notice() {
    let chain = FakeChain::new(FakeChainConfig {
        create_failure: Some(
            "Transaction results in an attempt to debit an account but found \
             no record of a prior credit."
                .to_string(),
        ),
        ..Default::default()
    });
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());
    let mut events = minter.subscribe();

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(
        failure.classification.kind,
        FailureKind::InsufficientBalance
    );
    assert_eq!(
        failure.classification.dismiss_after,
        Some(Duration::from_secs(5))
    );

    let emitted = drain(&mut events);
    assert!(statuses(&emitted).contains(&WorkflowStatus::Failed));
    let notice = emitted
        .iter()
        .find_map(|event| match event {
            MintEvent::Notice(notice) if notice.kind == NoticeKind::InsufficientBalance => {
                Some(notice.clone())
            }
            _ => None,
        })
        .expect("insufficient balance notice");
    assert!(notice.message.contains("0.02 SOL"));

    // the notice clears itself after the configured interval
    loop {
        match events.recv().await.expect("cleared event") {
            MintEvent::NoticeCleared(NoticeKind::InsufficientBalance) => break,
            _ => continue,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn duplicate_submission_is_reclassified_as_success() {
    let chain = FakeChain::new(FakeChainConfig {
        create_failure: Some("This transaction has already been processed".to_string()),
        ..Default::default()
    });
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());
    let mut events = minter.subscribe();

    let outcome = minter.tokenize("hello world").await.expect("success");
    assert_eq!(outcome, AttemptOutcome::AlreadyProcessed);

    let emitted = drain(&mut events);
    assert!(!statuses(&emitted).contains(&WorkflowStatus::Failed));
    assert!(emitted.iter().any(|event| matches!(
        event,
        MintEvent::Notice(notice) if notice.kind == NoticeKind::AlreadyProcessed
    )));
}

#[tokio::test(start_paused = true)]
async fn backend_timeout_is_distinguished() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::timing_out();
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(failure.classification.kind, FailureKind::BackendTimeout);
    assert!(chain.submitted().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn wallet_rejection_is_a_generic_failure() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected().rejecting("User rejected the request");
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let failure = minter.tokenize("hello world").await.expect_err("must fail");
    assert_eq!(failure.classification.kind, FailureKind::GenericFailure);
    assert!(chain.submitted().await.is_empty());
}

fn fee_config() -> MinterConfig {
    MinterConfig {
        fee: Some(FeeConfig {
            collector: tknz_fake_chain::random_pubkey(),
            lamports: tknz::minter::DEFAULT_FEE_LAMPORTS,
        }),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn fee_is_confirmed_before_the_mint_is_submitted() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, fee_config());

    minter.tokenize("hello world").await.expect("must mint");

    // one batch prompt covered both transactions
    assert_eq!(wallet.signing_prompts(), 1);

    let submitted = chain.submitted().await;
    assert_eq!(submitted.len(), 2);
    assert!(submitted[0].transaction.transfers());
    assert!(submitted[1].transaction.creates_token());

    // a status query on the fee transfer happened between the submissions
    let events = chain.events().await;
    let fee_submit = events
        .iter()
        .position(|event| *event == ChainEvent::Submitted(TxKind::Transfer))
        .expect("fee submitted");
    let mint_submit = events
        .iter()
        .position(|event| *event == ChainEvent::Submitted(TxKind::CreateToken))
        .expect("mint submitted");
    assert!(fee_submit < mint_submit);
    assert!(events[fee_submit..mint_submit].contains(&ChainEvent::StatusQuery));
}

#[tokio::test(start_paused = true)]
async fn sequential_signing_still_pays_the_fee_first() {
    let chain = FakeChain::finalizing();
    let wallet = FakeWallet::connected().without_batch_signing();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, fee_config());

    minter.tokenize("hello world").await.expect("must mint");

    assert_eq!(wallet.signing_prompts(), 2);
    let submitted = chain.submitted().await;
    assert_eq!(submitted.len(), 2);
    assert!(submitted[0].transaction.transfers());
    assert!(submitted[1].transaction.creates_token());
}

#[tokio::test(start_paused = true)]
async fn concurrent_attempts_are_guarded() {
    let chain = FakeChain::never_finalizing();
    let wallet = FakeWallet::connected();
    let metadata = FakeMetadata::returning("ipfs://x", "hello");
    let minter = minter_with(&chain, &wallet, &metadata, MinterConfig::default());

    let first = {
        let minter = minter.clone();
        tokio::spawn(async move { minter.tokenize("hello world").await })
    };
    // let the first attempt reach its first suspension point
    tokio::task::yield_now().await;

    let failure = minter.tokenize("again").await.expect_err("guarded");
    assert!(matches!(
        failure.source,
        tknz::minter::Error::AttemptInProgress
    ));

    // the first attempt still completes as a soft success
    let outcome = first.await.expect("join").expect("soft success");
    assert!(matches!(outcome, AttemptOutcome::Minted(_)));
}
