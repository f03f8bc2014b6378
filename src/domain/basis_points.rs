//! Basis-point representation for fees, tolerances, and pool shares.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;
use crate::math::mul_div;

/// Number of basis points in 100%.
pub(crate) const BPS_DENOMINATOR: u128 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, BasisPoints, Rounding};
///
/// let bp = BasisPoints::new(30);
/// let fee = bp.apply(Amount::new(1_000_000), Rounding::Up);
/// assert_eq!(fee, Ok(Amount::new(3_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(10_000);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value lies in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= Self::MAX_PERCENT.0
    }

    /// Computes `amount × self / 10 000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the intermediate product
    /// overflows.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        mul_div(
            amount.get(),
            u128::from(self.0),
            BPS_DENOMINATOR,
            rounding,
        )
        .map(Amount::new)
    }

    /// Expresses `part / whole` in basis points, rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `whole` is zero.
    /// - [`AmmError::ArithmeticOverflow`] if the ratio does not fit in `u32`.
    pub fn from_ratio(part: u128, whole: u128) -> crate::error::Result<Self> {
        let bps = mul_div(part, BPS_DENOMINATOR, whole, Rounding::Down)?;
        u32::try_from(bps)
            .map(Self)
            .map_err(|_| AmmError::ArithmeticOverflow("basis points out of range"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
