//! Integer division helpers with explicit rounding.
//!
//! **Always round against the counter-party** (pool-favorable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap fee | [`Rounding::Up`] |
//! | Swap output | [`Rounding::Down`] |
//! | Minted shares | [`Rounding::Down`] |
//! | Withdrawal amounts | [`Rounding::Down`] |
//! | Pro-rata fee credits | [`Rounding::Down`] |
//!
//! # Examples
//!
//! ```
//! use stokvel_amm::domain::Rounding;
//! use stokvel_amm::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(1_500, 3_000, 3_000, Rounding::Down), Ok(1_500));
//! ```

use crate::domain::Rounding;
use crate::error::AmmError;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        Rounding::Up => {
            // q + 1 cannot overflow: a non-zero remainder means q < u128::MAX.
            if numerator % denominator != 0 {
                Some(q + 1)
            } else {
                Some(q)
            }
        }
    }
}

/// Computes `a × b / d` with explicit rounding.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `d` is zero.
/// - [`AmmError::ArithmeticOverflow`] if `a × b` exceeds `u128`.
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::ArithmeticOverflow("mul_div product overflow"))?;
    div_round(product, d, rounding).ok_or(AmmError::DivisionByZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_by_zero_returns_none() {
        assert_eq!(div_round(100, 0, Rounding::Down), None);
        assert_eq!(div_round(0, 0, Rounding::Up), None);
    }

    #[test]
    fn exact_division_agrees() {
        assert_eq!(div_round(10, 5, Rounding::Down), Some(2));
        assert_eq!(div_round(10, 5, Rounding::Up), Some(2));
    }

    #[test]
    fn ceiling_at_max() {
        // (MAX + d - 1) would overflow; the remainder path must not.
        assert_eq!(
            div_round(u128::MAX, 2, Rounding::Up),
            Some(u128::MAX / 2 + 1)
        );
        assert_eq!(div_round(u128::MAX, 1, Rounding::Up), Some(u128::MAX));
    }

    #[test]
    fn mul_div_rounds() {
        assert_eq!(mul_div(7, 3, 2, Rounding::Down), Ok(10));
        assert_eq!(mul_div(7, 3, 2, Rounding::Up), Ok(11));
    }

    #[test]
    fn mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0, Rounding::Down), Err(AmmError::DivisionByZero));
        assert!(matches!(
            mul_div(u128::MAX, 2, 3, Rounding::Down),
            Err(AmmError::ArithmeticOverflow(_))
        ));
    }
}
