//! The ledger collaborator contract.
//!
//! The pool engine decides *how much* moves between which accounts; a
//! [`Ledger`] implementation actually moves it. Implementations are supplied
//! by the embedder (a blockchain client, a bank core, ...). The crate ships
//! [`InMemoryLedger`](crate::ledger::InMemoryLedger) for tests and
//! simulations.
//!
//! # Ordering
//!
//! Callers update pool state strictly **after** a transfer (or transfer
//! group) confirms. A failed transfer must leave every balance untouched.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Amount, Asset, ProviderId};

/// Identity of a ledger account.
///
/// Liquidity providers, traders, stokvel members and the pool's own custody
/// account all share one address space.
pub type AccountId = ProviderId;

/// One leg of value movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Debited account.
    pub from: AccountId,
    /// Credited account.
    pub to: AccountId,
    /// Asset moved.
    pub asset: Asset,
    /// Quantity moved, in the asset's smallest unit.
    pub amount: Amount,
    /// Free-form note attached to the transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Transfer {
    /// Creates a transfer without a memo.
    pub fn new(from: AccountId, to: AccountId, asset: Asset, amount: Amount) -> Self {
        Self {
            from,
            to,
            asset,
            amount,
            memo: None,
        }
    }

    /// Attaches a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from {} to {}",
            self.amount, self.asset, self.from, self.to
        )
    }
}

/// Proof that a transfer or transfer group was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Confirmation {
    /// Ledger-assigned sequence number.
    pub sequence: u64,
    /// Number of legs applied atomically.
    pub legs: usize,
}

/// Failure reported by a [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The debited account does not hold enough of the asset.
    #[error("insufficient funds: {account} holds {available} {asset}, needs {required}")]
    InsufficientFunds {
        /// Debited account.
        account: AccountId,
        /// Asset involved.
        asset: Asset,
        /// Amount the transfer needed.
        required: Amount,
        /// Amount the account holds.
        available: Amount,
    },

    /// The ledger could not be reached.
    #[error("ledger unreachable: {0}")]
    Network(String),

    /// The ledger refused the transfer.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Executes value movements on behalf of the pool engine.
///
/// Methods take `&self`; implementations synchronize internally.
pub trait Ledger {
    /// Executes one transfer.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] and applies nothing if the transfer
    /// cannot be executed.
    fn transfer(&self, transfer: &Transfer) -> Result<Confirmation, TransferError>;

    /// Executes `legs` atomically: either every leg applies or none does.
    ///
    /// # Errors
    ///
    /// Returns the first failing leg's [`TransferError`]; no leg is applied.
    fn transfer_group(&self, legs: &[Transfer]) -> Result<Confirmation, TransferError>;

    /// Executes a transfer out of a jointly controlled account once at least
    /// `threshold` distinct `approvers` have signed off.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Rejected`] if fewer than `threshold`
    /// approvals are available, or any error [`Ledger::transfer`] returns.
    fn transfer_with_approvals(
        &self,
        transfer: &Transfer,
        approvers: &[AccountId],
        threshold: usize,
    ) -> Result<Confirmation, TransferError>;
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn transfer(&self, transfer: &Transfer) -> Result<Confirmation, TransferError> {
        (**self).transfer(transfer)
    }

    fn transfer_group(&self, legs: &[Transfer]) -> Result<Confirmation, TransferError> {
        (**self).transfer_group(legs)
    }

    fn transfer_with_approvals(
        &self,
        transfer: &Transfer,
        approvers: &[AccountId],
        threshold: usize,
    ) -> Result<Confirmation, TransferError> {
        (**self).transfer_with_approvals(transfer, approvers, threshold)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn transfer_display() {
        let t = Transfer::new("ALICE".into(), "POOL".into(), Asset::A, Amount::new(5));
        assert_eq!(t.to_string(), "5 A from ALICE to POOL");
    }

    #[test]
    fn memo_is_optional_in_json() {
        let t = Transfer::new("ALICE".into(), "POOL".into(), Asset::B, Amount::new(1));
        let Ok(json) = serde_json::to_string(&t) else {
            panic!("expected serialization");
        };
        assert!(!json.contains("memo"));
        let with = t.with_memo("Stokvel Contribution");
        assert_eq!(with.memo.as_deref(), Some("Stokvel Contribution"));
    }

    #[test]
    fn insufficient_funds_display() {
        let err = TransferError::InsufficientFunds {
            account: "BOB".into(),
            asset: Asset::B,
            required: Amount::new(10),
            available: Amount::new(3),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: BOB holds 3 B, needs 10"
        );
    }
}
