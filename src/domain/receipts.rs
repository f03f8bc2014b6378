//! Results of liquidity deposits and withdrawals.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Shares};

/// What a deposit put into the pool and what it minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Shares credited to the provider.
    pub shares_minted: Shares,
    /// Asset A moved into the pool.
    pub amount_a: Amount,
    /// Asset B moved into the pool.
    pub amount_b: Amount,
}

/// What a withdrawal takes out of the pool.
///
/// `amount_a`/`amount_b` come from the reserves; `fees_a`/`fees_b` are
/// credited fees paid out of the fee vault (always zero under reserve
/// accrual, where fees are already part of the reserves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Shares redeemed and burned.
    pub shares_burned: Shares,
    /// Asset A paid from the reserve.
    pub amount_a: Amount,
    /// Asset B paid from the reserve.
    pub amount_b: Amount,
    /// Credited asset-A fees paid from the fee vault.
    pub fees_a: Amount,
    /// Credited asset-B fees paid from the fee vault.
    pub fees_b: Amount,
}

impl WithdrawReceipt {
    /// Total asset A leaving the pool account.
    ///
    /// Cannot overflow: both parts are bounded by balances the pool holds.
    pub const fn total_a(&self) -> Amount {
        Amount::new(self.amount_a.get().saturating_add(self.fees_a.get()))
    }

    /// Total asset B leaving the pool account.
    pub const fn total_b(&self) -> Amount {
        Amount::new(self.amount_b.get().saturating_add(self.fees_b.get()))
    }
}

impl fmt::Display for DepositReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deposit a={} b={} minted={}",
            self.amount_a, self.amount_b, self.shares_minted
        )
    }
}

impl fmt::Display for WithdrawReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "withdraw burned={} a={} b={} fees_a={} fees_b={}",
            self.shares_burned, self.amount_a, self.amount_b, self.fees_a, self.fees_b
        )
    }
}
