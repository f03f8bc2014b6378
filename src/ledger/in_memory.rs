//! In-process ledger backed by a balance map.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Amount, Asset};
use crate::traits::{AccountId, Confirmation, Ledger, Transfer, TransferError};

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(AccountId, Asset), Amount>,
    history: Vec<Transfer>,
    sequence: u64,
    fail_next: Option<TransferError>,
}

impl LedgerState {
    fn balance(&self, account: &AccountId, asset: Asset) -> Amount {
        self.balances
            .get(&(account.clone(), asset))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Applies `legs` to a scratch copy of the balances and swaps it in only
    /// if every leg succeeds.
    fn apply(&mut self, legs: &[Transfer]) -> Result<Confirmation, TransferError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        let mut scratch = self.balances.clone();
        for leg in legs {
            let from_key = (leg.from.clone(), leg.asset);
            let available = scratch.get(&from_key).copied().unwrap_or(Amount::ZERO);
            let remaining =
                available
                    .checked_sub(&leg.amount)
                    .ok_or_else(|| TransferError::InsufficientFunds {
                        account: leg.from.clone(),
                        asset: leg.asset,
                        required: leg.amount,
                        available,
                    })?;
            scratch.insert(from_key, remaining);

            let to_key = (leg.to.clone(), leg.asset);
            let credited = scratch
                .get(&to_key)
                .copied()
                .unwrap_or(Amount::ZERO)
                .checked_add(&leg.amount)
                .ok_or_else(|| TransferError::Rejected("balance overflow".to_owned()))?;
            scratch.insert(to_key, credited);
        }
        self.balances = scratch;
        self.history.extend_from_slice(legs);
        self.sequence += 1;
        Ok(Confirmation {
            sequence: self.sequence,
            legs: legs.len(),
        })
    }
}

/// A [`Ledger`] that keeps balances in memory.
///
/// Transfer groups are atomic. Approval-gated transfers require `threshold`
/// distinct approvers. A one-shot failure can be injected with
/// [`InMemoryLedger::fail_next`] to exercise error paths.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, Asset};
/// use stokvel_amm::ledger::InMemoryLedger;
/// use stokvel_amm::traits::{Ledger, Transfer};
///
/// let ledger = InMemoryLedger::new().with_balance("ALICE", Asset::A, Amount::new(100));
/// let t = Transfer::new("ALICE".into(), "BOB".into(), Asset::A, Amount::new(40));
/// assert!(ledger.transfer(&t).is_ok());
/// assert_eq!(ledger.balance(&"BOB".into(), Asset::A), Amount::new(40));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ledger with `account` funded with `amount` of `asset`.
    #[must_use]
    pub fn with_balance(self, account: impl Into<AccountId>, asset: Asset, amount: Amount) -> Self {
        self.set_balance(account.into(), asset, amount);
        self
    }

    /// Overwrites an account balance.
    pub fn set_balance(&self, account: AccountId, asset: Asset, amount: Amount) {
        self.lock().balances.insert((account, asset), amount);
    }

    /// Current balance of `account` in `asset` (zero if never funded).
    #[must_use]
    pub fn balance(&self, account: &AccountId, asset: Asset) -> Amount {
        self.lock().balance(account, asset)
    }

    /// Makes the next ledger call fail with `error` without applying
    /// anything.
    pub fn fail_next(&self, error: TransferError) {
        self.lock().fail_next = Some(error);
    }

    /// Every leg applied so far, in order.
    #[must_use]
    pub fn history(&self) -> Vec<Transfer> {
        self.lock().history.clone()
    }

    // Every mutation is staged before being applied, so a poisoned guard
    // still protects a consistent state.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Ledger for InMemoryLedger {
    fn transfer(&self, transfer: &Transfer) -> Result<Confirmation, TransferError> {
        self.lock().apply(core::slice::from_ref(transfer))
    }

    fn transfer_group(&self, legs: &[Transfer]) -> Result<Confirmation, TransferError> {
        self.lock().apply(legs)
    }

    fn transfer_with_approvals(
        &self,
        transfer: &Transfer,
        approvers: &[AccountId],
        threshold: usize,
    ) -> Result<Confirmation, TransferError> {
        if threshold == 0 {
            return Err(TransferError::Rejected(
                "approval threshold must be positive".to_owned(),
            ));
        }
        let distinct: BTreeSet<&AccountId> = approvers.iter().collect();
        if distinct.len() < threshold {
            return Err(TransferError::Rejected(format!(
                "{} of {threshold} required approvals",
                distinct.len()
            )));
        }
        self.transfer(transfer)
    }
}
