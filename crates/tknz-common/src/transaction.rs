//! Driven-transaction model.
//!
//! Transaction building, signing and wire encoding belong to the chain SDK
//! and are not reimplemented here. This module carries just enough structure
//! to sequence the workflow: which instructions a transaction holds, and the
//! fee-payer/blockhash invariant that must hold before submission.

use serde::Serialize;

use crate::error::Error;
use crate::types::{Blockhash, Pubkey};

/// A single instruction inside a mint-workflow transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Instruction {
    /// Create an immutable token from prepared metadata.
    CreateToken {
        /// Metadata content URI
        uri: String,
        /// Token display name
        name: String,
        /// Royalty in basis points; always zero in this workflow
        royalty_bps: u16,
        /// Whether the metadata stays editable; always false here
        mutable: bool,
        /// Address of the token to be created, generated at build time
        mint: Pubkey,
    },
    /// Native transfer, used for the optional platform fee.
    Transfer {
        /// Receiving address
        to: Pubkey,
        /// Amount in lamports
        lamports: u64,
    },
}

/// An unsigned transaction handed to the wallet for approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsignedTransaction {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
    /// Account debited for network costs
    pub fee_payer: Option<Pubkey>,
    /// Recent chain checkpoint
    pub recent_blockhash: Option<Blockhash>,
}

impl UnsignedTransaction {
    /// New transaction without fee payer or blockhash attached yet.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            fee_payer: None,
            recent_blockhash: None,
        }
    }

    /// Attach the fee payer.
    pub fn with_fee_payer(mut self, fee_payer: Pubkey) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }

    /// Attach a recent blockhash.
    pub fn with_recent_blockhash(mut self, blockhash: Blockhash) -> Self {
        self.recent_blockhash = Some(blockhash);
        self
    }

    /// Check the submission invariant: fee payer and blockhash must be set.
    pub fn ensure_ready(&self) -> Result<(), Error> {
        if self.fee_payer.is_none() || self.recent_blockhash.is_none() {
            return Err(Error::IncompleteTransaction);
        }
        Ok(())
    }

    /// Address of the token this transaction creates, if any.
    pub fn mint_address(&self) -> Option<&Pubkey> {
        self.instructions.iter().find_map(|instruction| match instruction {
            Instruction::CreateToken { mint, .. } => Some(mint),
            _ => None,
        })
    }

    /// Whether this transaction carries a create-token instruction.
    pub fn creates_token(&self) -> bool {
        self.mint_address().is_some()
    }

    /// Whether this transaction carries a native transfer.
    pub fn transfers(&self) -> bool {
        self.instructions
            .iter()
            .any(|instruction| matches!(instruction, Instruction::Transfer { .. }))
    }
}

/// A wallet-approved transaction, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    /// The signer's public key
    pub signer: Pubkey,
    /// The approved transaction
    pub transaction: UnsignedTransaction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pubkey() -> Pubkey {
        "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T".parse().unwrap()
    }

    #[test]
    fn incomplete_transaction_is_not_ready() {
        let tx = UnsignedTransaction::new(vec![Instruction::Transfer {
            to: pubkey(),
            lamports: 1,
        }]);
        assert!(matches!(tx.ensure_ready(), Err(Error::IncompleteTransaction)));

        let tx = tx.with_fee_payer(pubkey());
        assert!(matches!(tx.ensure_ready(), Err(Error::IncompleteTransaction)));

        let tx = tx.with_recent_blockhash(Blockhash::new("hash"));
        assert!(tx.ensure_ready().is_ok());
    }

    #[test]
    fn mint_address_comes_from_create_instruction() {
        let mint = pubkey();
        let tx = UnsignedTransaction::new(vec![Instruction::CreateToken {
            uri: "ipfs://x".into(),
            name: "hello".into(),
            royalty_bps: 0,
            mutable: false,
            mint: mint.clone(),
        }]);
        assert_eq!(tx.mint_address(), Some(&mint));
        assert!(tx.creates_token());
        assert!(!tx.transfers());
    }
}
