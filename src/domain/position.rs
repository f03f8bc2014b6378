//! A provider's stake in a pool.

use serde::{Deserialize, Serialize};

use super::{Amount, Asset, Shares};

/// Shares held by one provider plus any fees credited to them.
///
/// The fee fields only move under pro-rata fee crediting; under reserve
/// accrual fee income is already reflected in what each share redeems for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProviderPosition {
    /// Outstanding shares.
    pub shares: Shares,
    /// Credited, unclaimed asset-A fees.
    pub fees_a: Amount,
    /// Credited, unclaimed asset-B fees.
    pub fees_b: Amount,
}

impl ProviderPosition {
    /// Credited fees in the given asset.
    pub const fn fees(&self, asset: Asset) -> Amount {
        match asset {
            Asset::A => self.fees_a,
            Asset::B => self.fees_b,
        }
    }

    /// Returns `true` when the position holds neither shares nor fees and
    /// can be dropped from the pool.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shares.is_zero() && self.fees_a.is_zero() && self.fees_b.is_zero()
    }
}
