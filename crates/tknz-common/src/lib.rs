//! Shared types for the TKNZ mint workflow.
//!
//! This crate holds the protocol-level pieces that both the core `tknz`
//! library and the scripted test backends need: the workflow entities,
//! the transaction model that the chain SDK is driven with, the wire types
//! of the metadata-preparation backend, the collaborator traits, and the
//! shared error type. It deliberately has no HTTP or runtime dependency.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod chain;
pub mod error;
pub mod metadata;
pub mod transaction;
pub mod types;

pub use error::Error;
pub use types::{
    Blockhash, ConfirmationLevel, MintOutcome, MintRequest, PreparedMetadata, Pubkey, Signature,
    TokenDetails, WorkflowStatus, LAMPORTS_PER_SOL,
};
