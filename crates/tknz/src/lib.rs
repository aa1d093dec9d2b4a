//! TKNZ: tokenize text as immutable NFTs on Solana.
//!
//! The heart of this crate is the [`minter::Minter`]: it drives one mint
//! attempt end to end (metadata preparation, transaction construction,
//! wallet approval, submission, finalization polling), emitting a typed
//! event for every status transition, and classifying every failure into a
//! user-facing outcome.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod minter;

#[doc(hidden)]
pub use tknz_common::{chain, error, metadata, transaction, types, Error};

#[doc(hidden)]
pub use minter::{Minter, MinterBuilder, MinterConfig};
