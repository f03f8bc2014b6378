//! Outcome of a swap.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Asset};
use crate::error::AmmError;

/// Amounts exchanged by one swap.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - `fee < amount_in`.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, Asset, SwapOutcome};
///
/// let outcome = SwapOutcome::new(Asset::A, Amount::new(1_000), Amount::new(3), Amount::new(1_990));
/// assert!(outcome.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapOutcome {
    asset_in: Asset,
    amount_in: Amount,
    fee: Amount,
    amount_out: Amount,
}

impl SwapOutcome {
    /// Creates a validated outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroAmount`] if either side is zero, or
    /// [`AmmError::ArithmeticOverflow`] if the fee is not smaller than the
    /// input.
    pub const fn new(
        asset_in: Asset,
        amount_in: Amount,
        fee: Amount,
        amount_out: Amount,
    ) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::ZeroAmount("swap input must be positive"));
        }
        if amount_out.is_zero() {
            return Err(AmmError::ZeroAmount("swap output rounds to zero"));
        }
        if fee.get() >= amount_in.get() {
            return Err(AmmError::ArithmeticOverflow("fee must be less than input"));
        }
        Ok(Self {
            asset_in,
            amount_in,
            fee,
            amount_out,
        })
    }

    /// The asset the trader paid in.
    #[must_use]
    pub const fn asset_in(&self) -> Asset {
        self.asset_in
    }

    /// The asset the trader received.
    #[must_use]
    pub const fn asset_out(&self) -> Asset {
        self.asset_in.other()
    }

    /// Gross input, fee included.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Fee retained by the pool, denominated in the input asset.
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// Input that entered the pricing curve.
    pub const fn net_in(&self) -> Amount {
        Amount::new(self.amount_in.get() - self.fee.get())
    }

    /// Output paid to the trader.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {} (fee {})",
            self.amount_in,
            self.asset_in,
            self.amount_out,
            self.asset_out(),
            self.fee
        )
    }
}
