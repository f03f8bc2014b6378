//! Fixed-point exchange rate between the two reserves.

use core::fmt;

use fixed::types::I80F48;

use super::Amount;
use crate::error::AmmError;

/// Exchange rate as a dimensionless ratio (`quote_reserve / base_reserve`).
///
/// Backed by [`I80F48`] so that quotes are deterministic and never drift
/// the way `f64` ratios do.  A `Price` is only ever produced for display
/// and quoting; swap amounts are always computed with integer math.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, Price};
///
/// let price = Price::from_amounts(Amount::new(3_000), Amount::new(1_500)).expect("non-zero");
/// assert_eq!(price, Price::from_int(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(I80F48);

impl Price {
    /// Price ratio of 1:1.
    pub const ONE: Self = Self(I80F48::ONE);

    /// Creates a price from an integer ratio.
    #[must_use]
    pub fn from_int(value: i64) -> Self {
        Self(I80F48::from_num(value))
    }

    /// Computes `quote / base`, truncated to 48 fractional bits.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `base` is zero.
    /// - [`AmmError::ArithmeticOverflow`] if either amount or the ratio
    ///   exceeds the `I80F48` range.
    pub fn from_amounts(quote: Amount, base: Amount) -> crate::error::Result<Self> {
        if base.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        let q = I80F48::checked_from_num(quote.get())
            .ok_or(AmmError::ArithmeticOverflow("quote amount exceeds price range"))?;
        let b = I80F48::checked_from_num(base.get())
            .ok_or(AmmError::ArithmeticOverflow("base amount exceeds price range"))?;
        q.checked_div(b)
            .map(Self)
            .ok_or(AmmError::ArithmeticOverflow("price ratio overflow"))
    }

    /// Returns the underlying fixed-point value.
    #[must_use]
    pub const fn get(&self) -> I80F48 {
        self.0
    }

    /// Lossy conversion for display and logging.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_num::<f64>()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
