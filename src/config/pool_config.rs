//! Configuration for a two-asset constant-product pool.

use serde::{Deserialize, Serialize};

use crate::domain::{BasisPoints, FeeTier};
use crate::error::AmmError;

/// How swap fees (and externally supplied fee income) reach providers.
///
/// A pool applies exactly one policy for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeePolicy {
    /// Fees stay in the reserves, growing `k` and the value of every share.
    #[default]
    ReserveAccrual,
    /// Fees are held outside the reserves and credited to providers pro rata
    /// by shares; providers collect them with `claim_fees` or on withdrawal.
    ProRataCredit,
}

/// Which deposits are accepted once the pool holds liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepositPolicy {
    /// The deposit must match the current reserve ratio within `tolerance`.
    ///
    /// Minted shares are capped so that no existing provider's per-share
    /// claim on either reserve decreases.
    MatchReserveRatio {
        /// Allowed relative deviation from the reserve ratio.
        tolerance: BasisPoints,
    },
    /// Any ratio is accepted; shares follow the combined-value formula.
    ///
    /// Asymmetric deposits can dilute existing providers.
    AcceptAnyRatio,
}

impl DepositPolicy {
    /// Default tolerance for [`DepositPolicy::MatchReserveRatio`]: 0.50%.
    pub const DEFAULT_TOLERANCE: BasisPoints = BasisPoints::new(50);
}

impl Default for DepositPolicy {
    fn default() -> Self {
        Self::MatchReserveRatio {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

/// Immutable parameters of a [`LiquidityPool`](crate::pool::LiquidityPool).
///
/// # Validation
///
/// - The fee tier must be strictly below 100%.
/// - A ratio tolerance may not exceed 100%.
///
/// # Examples
///
/// ```
/// use stokvel_amm::config::{FeePolicy, PoolConfig};
/// use stokvel_amm::domain::FeeTier;
///
/// let cfg = PoolConfig::default();
/// assert_eq!(cfg.fee_tier(), FeeTier::TIER_0_30_PERCENT);
/// assert_eq!(cfg.fee_policy(), FeePolicy::ReserveAccrual);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PoolConfig {
    fee_tier: FeeTier,
    #[serde(default)]
    fee_policy: FeePolicy,
    #[serde(default)]
    deposit_policy: DepositPolicy,
}

impl PoolConfig {
    /// Creates a new `PoolConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if any parameter is out of
    /// range.
    pub fn new(
        fee_tier: FeeTier,
        fee_policy: FeePolicy,
        deposit_policy: DepositPolicy,
    ) -> Result<Self, AmmError> {
        let config = Self {
            fee_tier,
            fee_policy,
            deposit_policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// Deserialized configs bypass [`PoolConfig::new`], so pools call this
    /// again on construction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is 100% or more,
    /// or if a ratio tolerance exceeds 100%.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.fee_tier.basis_points() >= BasisPoints::MAX_PERCENT {
            return Err(AmmError::InvalidConfiguration(
                "fee tier must be below 100%",
            ));
        }
        if let DepositPolicy::MatchReserveRatio { tolerance } = self.deposit_policy {
            if !tolerance.is_valid_percent() {
                return Err(AmmError::InvalidConfiguration(
                    "ratio tolerance must not exceed 100%",
                ));
            }
        }
        Ok(())
    }

    /// Returns a copy with a different fee tier.
    ///
    /// # Errors
    ///
    /// Same as [`PoolConfig::validate`].
    pub fn with_fee_tier(mut self, fee_tier: FeeTier) -> Result<Self, AmmError> {
        self.fee_tier = fee_tier;
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy with a different fee policy.
    #[must_use]
    pub const fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }

    /// Returns a copy with a different deposit policy.
    ///
    /// # Errors
    ///
    /// Same as [`PoolConfig::validate`].
    pub fn with_deposit_policy(mut self, deposit_policy: DepositPolicy) -> Result<Self, AmmError> {
        self.deposit_policy = deposit_policy;
        self.validate()?;
        Ok(self)
    }

    /// Returns the fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the fee policy.
    #[must_use]
    pub const fn fee_policy(&self) -> FeePolicy {
        self.fee_policy
    }

    /// Returns the deposit policy.
    #[must_use]
    pub const fn deposit_policy(&self) -> DepositPolicy {
        self.deposit_policy
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = PoolConfig::default();
        assert_eq!(cfg.fee_tier().basis_points(), BasisPoints::new(30));
        assert_eq!(cfg.fee_policy(), FeePolicy::ReserveAccrual);
        assert_eq!(
            cfg.deposit_policy(),
            DepositPolicy::MatchReserveRatio {
                tolerance: BasisPoints::new(50)
            }
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn full_fee_rejected() {
        let result = PoolConfig::new(
            FeeTier::new(BasisPoints::MAX_PERCENT),
            FeePolicy::ReserveAccrual,
            DepositPolicy::AcceptAnyRatio,
        );
        let Err(AmmError::InvalidConfiguration(_)) = result else {
            panic!("expected InvalidConfiguration");
        };
    }

    #[test]
    fn oversized_tolerance_rejected() {
        let result = PoolConfig::default().with_deposit_policy(DepositPolicy::MatchReserveRatio {
            tolerance: BasisPoints::new(10_001),
        });
        assert!(result.is_err());
    }

    #[test]
    fn builders_keep_other_fields() {
        let Ok(cfg) = PoolConfig::default()
            .with_fee_policy(FeePolicy::ProRataCredit)
            .with_fee_tier(FeeTier::TIER_1_00_PERCENT)
        else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.fee_policy(), FeePolicy::ProRataCredit);
        assert_eq!(cfg.fee_tier(), FeeTier::TIER_1_00_PERCENT);
        assert_eq!(cfg.deposit_policy(), DepositPolicy::default());
    }

    #[test]
    fn serde_json_shape() {
        let Ok(json) = serde_json::to_string(&PoolConfig::default()) else {
            panic!("expected serialization");
        };
        assert_eq!(
            json,
            r#"{"fee_tier":30,"fee_policy":{"kind":"reserve_accrual"},"deposit_policy":{"kind":"match_reserve_ratio","tolerance":50}}"#
        );
        let Ok(back) = serde_json::from_str::<PoolConfig>(&json) else {
            panic!("expected deserialization");
        };
        assert_eq!(back, PoolConfig::default());
    }

    #[test]
    fn missing_policies_use_defaults() {
        let Ok(cfg) = serde_json::from_str::<PoolConfig>(r#"{"fee_tier":5}"#) else {
            panic!("expected deserialization");
        };
        assert_eq!(cfg.fee_tier(), FeeTier::TIER_0_05_PERCENT);
        assert_eq!(cfg.fee_policy(), FeePolicy::ReserveAccrual);
    }
}
