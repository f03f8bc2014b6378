//! Integer arithmetic utilities for pool accounting.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe operations
//! on domain newtypes, and [`div_round`] / [`mul_div`] for division with an
//! explicit [`Rounding`](crate::domain::Rounding) direction.

mod checked;
mod rounding;

pub use checked::CheckedArithmetic;
pub use rounding::{div_round, mul_div};
