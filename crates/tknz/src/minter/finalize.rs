//! Finalization polling.

use std::time::Duration;

use tracing::instrument;

use tknz_common::chain::ChainClient;
use tknz_common::types::{ConfirmationLevel, Signature};

/// Retry budget for the finalization poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizePolicy {
    /// Maximum number of status queries
    pub tries: u32,
    /// Delay between queries
    pub delay: Duration,
    /// Fixed delay before the first query, reducing spurious duplicate
    /// races against the wallet and RPC layer
    pub grace: Duration,
}

impl Default for FinalizePolicy {
    fn default() -> Self {
        Self {
            tries: 15,
            delay: Duration::from_millis(2000),
            grace: Duration::from_millis(1800),
        }
    }
}

/// Poll a signature until it reaches the terminal `finalized` status or the
/// retry budget is exhausted.
///
/// Lesser confirmation levels do not satisfy the poll and transient query
/// errors are swallowed, each consuming one attempt. Exhaustion returns
/// `false`, which is not a failure of the mint itself, only "not yet
/// confirmed visibly".
#[instrument(skip(chain), fields(%signature))]
pub async fn wait_for_finalization(
    chain: &dyn ChainClient,
    signature: &Signature,
    policy: &FinalizePolicy,
) -> bool {
    if !policy.grace.is_zero() {
        tokio::time::sleep(policy.grace).await;
    }

    for attempt in 0..policy.tries {
        if attempt > 0 {
            tokio::time::sleep(policy.delay).await;
        }
        match chain.signature_status(signature).await {
            Ok(Some(ConfirmationLevel::Finalized)) => {
                tracing::debug!(attempt, "transaction finalized");
                return true;
            }
            Ok(status) => {
                tracing::trace!(attempt, ?status, "not finalized yet");
            }
            Err(err) => {
                tracing::warn!(attempt, "error checking signature status: {}", err);
            }
        }
    }

    false
}
