//! Failure classification.
//!
//! Structured error variants are matched first; the substring table is the
//! fallback for opaque message text raised by the chain and wallet SDKs,
//! which expose human-readable strings rather than stable codes.

use std::time::Duration;

use tknz_common::types::format_sol;
use tknz_common::Error as CommonError;

use super::{Error, MinterConfig};

/// Phrases the chain SDK uses when the fee payer cannot cover the mint.
const INSUFFICIENT_BALANCE_PHRASES: &[&str] = &[
    "insufficient",
    "not enough",
    "attempt to debit",
    "no record of a prior credit",
    "simulation failed",
];

/// Recognized failure buckets, each with a distinct user-facing outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unconnected wallet or empty text; transient notice, user-correctable
    InputInvalid,
    /// Fee payer balance too low; blocking modal with remediation
    InsufficientBalance,
    /// The network already accepted the transaction; treated as success
    DuplicateIgnored,
    /// The metadata backend exceeded the bounded wait; retry shortly
    BackendTimeout,
    /// Catch-all terminal failure for this attempt
    GenericFailure,
}

/// Outcome of classifying one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Failure bucket
    pub kind: FailureKind,
    /// Short user-facing message; never the raw error text
    pub user_message: String,
    /// Auto-dismiss interval for the resulting notice, when applicable
    pub dismiss_after: Option<Duration>,
}

/// Bucket a failure into a recognized category.
///
/// Total and deterministic: every error classifies to exactly one
/// [`FailureKind`].
pub fn classify(error: &Error, config: &MinterConfig) -> Classification {
    // Structured variants first; string sniffing only for opaque text.
    match error {
        Error::AttemptInProgress
        | Error::Common(CommonError::EmptyText)
        | Error::Common(CommonError::WalletNotConnected)
        | Error::Common(CommonError::WalletIncompatible) => {
            return Classification {
                kind: FailureKind::InputInvalid,
                user_message: error.to_string(),
                dismiss_after: None,
            }
        }
        Error::Common(CommonError::BackendTimeout) => return backend_timeout(),
        _ => {}
    }

    let text = error.to_string().to_lowercase();

    // Checked before the insufficient-funds phrases: real duplicate errors
    // also contain "simulation failed".
    if text.contains("already been processed") {
        return Classification {
            kind: FailureKind::DuplicateIgnored,
            user_message:
                "This transaction was already processed and the mint likely succeeded. \
                 Check your wallet or the explorer."
                    .to_string(),
            dismiss_after: None,
        };
    }

    if text.contains("aborterror") {
        return backend_timeout();
    }

    if INSUFFICIENT_BALANCE_PHRASES
        .iter()
        .any(|phrase| text.contains(phrase))
    {
        return Classification {
            kind: FailureKind::InsufficientBalance,
            user_message: format!(
                "Not enough SOL to mint. Top up at least {} SOL and try again.",
                format_sol(config.min_balance_lamports)
            ),
            dismiss_after: Some(config.notice_dismiss),
        };
    }

    Classification {
        kind: FailureKind::GenericFailure,
        user_message: "Minting failed. Please try again.".to_string(),
        dismiss_after: None,
    }
}

fn backend_timeout() -> Classification {
    Classification {
        kind: FailureKind::BackendTimeout,
        user_message: "The backend may be cold-starting. Please retry in a moment.".to_string(),
        dismiss_after: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_error(message: &str) -> Error {
        Error::Common(CommonError::Chain(message.to_string()))
    }

    fn kind_of(message: &str) -> FailureKind {
        classify(&chain_error(message), &MinterConfig::default()).kind
    }

    #[test]
    fn sample_messages_classify_as_specified() {
        assert_eq!(
            kind_of("insufficient lamports for rent"),
            FailureKind::InsufficientBalance
        );
        assert_eq!(
            kind_of("Transaction simulation failed"),
            FailureKind::InsufficientBalance
        );
        assert_eq!(
            kind_of("This transaction has already been processed"),
            FailureKind::DuplicateIgnored
        );
        assert_eq!(
            kind_of("AbortError: The user aborted a request"),
            FailureKind::BackendTimeout
        );
        assert_eq!(kind_of("unexpected RPC error"), FailureKind::GenericFailure);
    }

    #[test]
    fn duplicate_wins_over_simulation_failed() {
        // The chain reports duplicates through a simulation failure message.
        assert_eq!(
            kind_of("Transaction simulation failed: This transaction has already been processed"),
            FailureKind::DuplicateIgnored
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            kind_of("ATTEMPT TO DEBIT an account"),
            FailureKind::InsufficientBalance
        );
    }

    #[test]
    fn structured_variants_win_over_sniffing() {
        let classification = classify(
            &Error::Common(CommonError::BackendTimeout),
            &MinterConfig::default(),
        );
        assert_eq!(classification.kind, FailureKind::BackendTimeout);

        let classification = classify(
            &Error::Common(CommonError::WalletNotConnected),
            &MinterConfig::default(),
        );
        assert_eq!(classification.kind, FailureKind::InputInvalid);

        let classification = classify(&Error::AttemptInProgress, &MinterConfig::default());
        assert_eq!(classification.kind, FailureKind::InputInvalid);
    }

    #[test]
    fn insufficient_balance_quotes_the_minimum_topup() {
        let config = MinterConfig::default();
        let classification = classify(&chain_error("attempt to debit"), &config);
        assert!(classification.user_message.contains("0.02 SOL"));
        assert_eq!(classification.dismiss_after, Some(config.notice_dismiss));
    }

    #[test]
    fn wallet_rejection_is_generic() {
        let error = Error::Common(CommonError::WalletRejected("User rejected the request".into()));
        assert_eq!(
            classify(&error, &MinterConfig::default()).kind,
            FailureKind::GenericFailure
        );
    }
}
