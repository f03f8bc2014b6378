//! Swap fee tiers built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, BasisPoints, Rounding};
use crate::error::AmmError;

/// The fraction of every swap input retained as a fee.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, FeeTier};
///
/// let (net, fee) = FeeTier::TIER_0_30_PERCENT
///     .split(Amount::new(100_000_000))
///     .expect("no overflow");
/// assert_eq!(fee, Amount::new(300_000));
/// assert_eq!(net, Amount::new(99_700_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// No fee.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.05% fee (5 bp).
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30% fee (30 bp), the pool default.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee (100 bp).
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a fee tier from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Returns `true` if the tier charges nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.get() == 0
    }

    /// Splits a swap input into `(net_input, fee)`.
    ///
    /// The fee is rounded up so the pool never under-charges.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the fee computation
    /// overflows.
    pub fn split(&self, amount_in: Amount) -> crate::error::Result<(Amount, Amount)> {
        let fee = self.0.apply(amount_in, Rounding::Up)?;
        let net = amount_in
            .checked_sub(&fee)
            .ok_or(AmmError::ArithmeticOverflow("fee exceeds input"))?;
        Ok((net, fee))
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
