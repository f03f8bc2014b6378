//! Stokvel group parameters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ParticipantId;
use crate::domain::{Amount, Asset};
use crate::error::AmmError;
use crate::traits::AccountId;

/// Parameters of a rotating-savings group.
///
/// # Validation
///
/// - At least one participant, with no duplicates.
/// - Contribution and payout are non-zero.
/// - One cycle of contributions covers the payout.
/// - The approval threshold lies in `1..=participants.len()`.
///
/// # Examples
///
/// ```
/// use stokvel_amm::stokvel::{ParticipantId, StokvelConfig};
///
/// let members: Vec<ParticipantId> = ["A", "B", "C", "D", "E"].map(ParticipantId::from).to_vec();
/// let cfg = StokvelConfig::new("GROUP".into(), members).expect("valid group");
/// assert_eq!(cfg.threshold(), 4);
/// assert_eq!(cfg.contribution().get(), 500_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StokvelConfig {
    group_account: AccountId,
    participants: Vec<ParticipantId>,
    #[serde(default = "default_asset")]
    asset: Asset,
    contribution: Amount,
    payout: Amount,
    threshold: usize,
}

const fn default_asset() -> Asset {
    Asset::A
}

impl StokvelConfig {
    /// Per-member contribution: 0.5 units at six decimals.
    pub const DEFAULT_CONTRIBUTION: Amount = Amount::new(500_000);

    /// Per-cycle payout: 2 units at six decimals.
    pub const DEFAULT_PAYOUT: Amount = Amount::new(2_000_000);

    /// Creates a group with the default amounts, paid in [`Asset::A`], and
    /// an approval threshold of all members but one.
    ///
    /// Groups of fewer than four members cannot fund the default payout, so
    /// their payout is capped at one cycle of contributions.
    ///
    /// # Errors
    ///
    /// Same as [`StokvelConfig::validate`].
    pub fn new(group_account: AccountId, participants: Vec<ParticipantId>) -> Result<Self, AmmError> {
        let threshold = participants.len().saturating_sub(1).max(1);
        let payout = u128::try_from(participants.len())
            .ok()
            .and_then(|n| Self::DEFAULT_CONTRIBUTION.checked_mul(&Amount::new(n)))
            .map_or(Self::DEFAULT_PAYOUT, |pot| pot.min(Self::DEFAULT_PAYOUT));
        let config = Self {
            group_account,
            participants,
            asset: default_asset(),
            contribution: Self::DEFAULT_CONTRIBUTION,
            payout,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoParticipants`] if the member list is empty.
    /// - [`AmmError::InvalidConfiguration`] for duplicates, zero amounts, a
    ///   payout larger than one cycle of contributions, or an out-of-range
    ///   threshold.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.participants.is_empty() {
            return Err(AmmError::NoParticipants);
        }
        let distinct: BTreeSet<&ParticipantId> = self.participants.iter().collect();
        if distinct.len() != self.participants.len() {
            return Err(AmmError::InvalidConfiguration("duplicate stokvel participant"));
        }
        if self.contribution.is_zero() {
            return Err(AmmError::InvalidConfiguration("contribution must be positive"));
        }
        if self.payout.is_zero() {
            return Err(AmmError::InvalidConfiguration("payout must be positive"));
        }
        let members = u128::try_from(self.participants.len())
            .map_err(|_| AmmError::ArithmeticOverflow("member count exceeds u128"))?;
        let pot = self
            .contribution
            .checked_mul(&Amount::new(members))
            .ok_or(AmmError::ArithmeticOverflow("stokvel pot overflow"))?;
        if self.payout > pot {
            return Err(AmmError::InvalidConfiguration(
                "payout exceeds one cycle of contributions",
            ));
        }
        if self.threshold == 0 || self.threshold > self.participants.len() {
            return Err(AmmError::InvalidConfiguration(
                "approval threshold must be between 1 and the member count",
            ));
        }
        Ok(())
    }

    /// Returns a copy with different contribution and payout amounts.
    ///
    /// # Errors
    ///
    /// Same as [`StokvelConfig::validate`].
    pub fn with_amounts(mut self, contribution: Amount, payout: Amount) -> Result<Self, AmmError> {
        self.contribution = contribution;
        self.payout = payout;
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy with a different approval threshold.
    ///
    /// # Errors
    ///
    /// Same as [`StokvelConfig::validate`].
    pub fn with_threshold(mut self, threshold: usize) -> Result<Self, AmmError> {
        self.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    /// Returns a copy paying in a different asset.
    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = asset;
        self
    }

    /// The jointly controlled account holding contributions.
    #[must_use]
    pub const fn group_account(&self) -> &AccountId {
        &self.group_account
    }

    /// Members in rotation order.
    #[must_use]
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Asset contributed and paid out.
    #[must_use]
    pub const fn asset(&self) -> Asset {
        self.asset
    }

    /// Amount each member contributes per cycle.
    pub const fn contribution(&self) -> Amount {
        self.contribution
    }

    /// Amount paid to the selected recipient per cycle.
    pub const fn payout(&self) -> Amount {
        self.payout
    }

    /// Approvals required to release the payout.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }
}
