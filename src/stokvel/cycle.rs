//! Running stokvel cycles against a ledger.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use super::{select_next_recipient, ParticipantId, StokvelConfig};
use crate::domain::Amount;
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{Confirmation, FromConfig, Ledger, Transfer};

const CONTRIBUTION_MEMO: &str = "Stokvel Contribution";
const PAYOUT_MEMO: &str = "Stokvel Payout";

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Member who received the payout.
    pub recipient: ParticipantId,
    /// Total contributed into the group account this cycle.
    pub contributed: Amount,
    /// Amount paid to the recipient.
    pub paid_out: Amount,
    /// Ledger confirmation of the payout.
    pub payout: Confirmation,
    /// `true` if this cycle started a new round.
    pub round_restarted: bool,
}

/// A rotating-savings group and its payout history for the current round.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::{Amount, Asset};
/// use stokvel_amm::ledger::InMemoryLedger;
/// use stokvel_amm::stokvel::{ParticipantId, Stokvel, StokvelConfig};
/// use stokvel_amm::traits::FromConfig;
///
/// let members: Vec<ParticipantId> = ["A", "B"].map(ParticipantId::from).to_vec();
/// let cfg = StokvelConfig::new("GROUP".into(), members)
///     .and_then(|c| c.with_amounts(Amount::new(10), Amount::new(20)))
///     .expect("valid group");
/// let ledger = InMemoryLedger::new()
///     .with_balance("A", Asset::A, Amount::new(10))
///     .with_balance("B", Asset::A, Amount::new(10));
///
/// let mut stokvel = Stokvel::from_config(&cfg).expect("valid group");
/// let report = stokvel.run_cycle(&ledger, 1).expect("cycle settles");
/// assert_eq!(report.recipient, ParticipantId::from("B"));
/// assert_eq!(ledger.balance(&"B".into(), Asset::A), Amount::new(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stokvel {
    config: StokvelConfig,
    paid: BTreeSet<ParticipantId>,
    rounds_completed: u64,
}

impl Stokvel {
    /// Resumes a group part-way through a round.
    ///
    /// # Errors
    ///
    /// - Anything [`StokvelConfig::validate`] returns.
    /// - [`AmmError::InvalidConfiguration`] if `paid` names a non-member.
    pub fn resume(config: StokvelConfig, paid: BTreeSet<ParticipantId>) -> Result<Self> {
        config.validate()?;
        if paid.iter().any(|p| !config.participants().contains(p)) {
            return Err(AmmError::InvalidConfiguration(
                "paid set names a non-member",
            ));
        }
        Ok(Self {
            config,
            paid,
            rounds_completed: 0,
        })
    }

    /// The group parameters.
    #[must_use]
    pub const fn config(&self) -> &StokvelConfig {
        &self.config
    }

    /// Members already paid in the current round.
    #[must_use]
    pub const fn paid(&self) -> &BTreeSet<ParticipantId> {
        &self.paid
    }

    /// Members still waiting for a payout in the current round.
    pub fn unpaid(&self) -> impl Iterator<Item = &ParticipantId> {
        self.config
            .participants()
            .iter()
            .filter(|p| !self.paid.contains(*p))
    }

    /// Rounds finished since this value was created.
    #[must_use]
    pub const fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    /// Runs one cycle: collect every contribution, choose a recipient with
    /// `seed`, and release the payout once the approval threshold is met.
    ///
    /// The recipient is recorded as paid only after the payout confirms.
    /// Contributions are individual transfers; if one fails, those already
    /// confirmed stay in the group account and count toward later payouts.
    ///
    /// # Errors
    ///
    /// - [`AmmError::TransferFailed`] if a contribution or the payout is
    ///   refused.
    /// - [`AmmError::ArithmeticOverflow`] if the contribution total
    ///   overflows.
    pub fn run_cycle<L: Ledger>(&mut self, ledger: &L, seed: u64) -> Result<CycleReport> {
        let group = self.config.group_account();
        let asset = self.config.asset();

        let mut contributed = Amount::ZERO;
        for member in self.config.participants() {
            let transfer = Transfer::new(
                member.clone(),
                group.clone(),
                asset,
                self.config.contribution(),
            )
            .with_memo(CONTRIBUTION_MEMO);
            ledger.transfer(&transfer).map_err(|err| {
                warn!("contribution from {member} failed: {err}");
                AmmError::from(err)
            })?;
            contributed = contributed.safe_add(&self.config.contribution())?;
            debug!("{member} contributed {} {asset}", self.config.contribution());
        }

        let round_restarted = self.unpaid().next().is_none();
        let recipient = select_next_recipient(self.config.participants(), &self.paid, seed)?;

        let payout = Transfer::new(group.clone(), recipient.clone(), asset, self.config.payout())
            .with_memo(PAYOUT_MEMO);
        let confirmation = ledger
            .transfer_with_approvals(&payout, self.config.participants(), self.config.threshold())
            .map_err(|err| {
                warn!("payout to {recipient} failed: {err}");
                AmmError::from(err)
            })?;

        if round_restarted {
            self.paid.clear();
            self.rounds_completed += 1;
            info!("stokvel round {} complete; starting a new round", self.rounds_completed);
        }
        self.paid.insert(recipient.clone());
        info!(
            "stokvel paid {} {asset} to {recipient} ({} of {} this round)",
            self.config.payout(),
            self.paid.len(),
            self.config.participants().len()
        );

        Ok(CycleReport {
            recipient,
            contributed,
            paid_out: self.config.payout(),
            payout: confirmation,
            round_restarted,
        })
    }
}

impl FromConfig<StokvelConfig> for Stokvel {
    /// Starts a fresh round for the configured group.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`StokvelConfig::validate`].
    fn from_config(config: &StokvelConfig) -> Result<Self> {
        Self::resume(config.clone(), BTreeSet::new())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Asset;
    use crate::ledger::InMemoryLedger;
    use crate::traits::TransferError;

    fn members(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|i| ParticipantId::new(format!("M{i}"))).collect()
    }

    fn group(n: usize) -> (Stokvel, InMemoryLedger) {
        let Ok(cfg) = StokvelConfig::new("GROUP".into(), members(n)) else {
            panic!("expected Ok");
        };
        let ledger = InMemoryLedger::new();
        for m in members(n) {
            ledger.set_balance(m, Asset::A, Amount::new(10_000_000));
        }
        let Ok(stokvel) = Stokvel::from_config(&cfg) else {
            panic!("expected Ok");
        };
        (stokvel, ledger)
    }

    #[test]
    fn cycle_collects_and_pays() {
        let (mut stokvel, ledger) = group(5);
        let Ok(report) = stokvel.run_cycle(&ledger, 2) else {
            panic!("expected Ok");
        };
        assert_eq!(report.recipient, ParticipantId::from("M2"));
        assert_eq!(report.contributed, Amount::new(2_500_000));
        assert!(!report.round_restarted);
        // 0.5 contributed, 2.0 received
        assert_eq!(ledger.balance(&"M2".into(), Asset::A), Amount::new(11_500_000));
        assert_eq!(ledger.balance(&"GROUP".into(), Asset::A), Amount::new(500_000));
        assert!(stokvel.paid().contains(&ParticipantId::from("M2")));

        let history = ledger.history();
        assert_eq!(history.len(), 6);
        assert_eq!(history[0].memo.as_deref(), Some("Stokvel Contribution"));
        assert_eq!(history[5].memo.as_deref(), Some("Stokvel Payout"));
    }

    #[test]
    fn full_round_pays_everyone_once_then_restarts() {
        let (mut stokvel, ledger) = group(5);
        let mut seen = BTreeSet::new();
        for seed in 0..5 {
            let Ok(report) = stokvel.run_cycle(&ledger, seed * 7) else {
                panic!("expected Ok");
            };
            assert!(seen.insert(report.recipient));
        }
        assert_eq!(stokvel.unpaid().count(), 0);

        let Ok(report) = stokvel.run_cycle(&ledger, 0) else {
            panic!("expected Ok");
        };
        assert!(report.round_restarted);
        assert_eq!(stokvel.rounds_completed(), 1);
        assert_eq!(stokvel.paid().len(), 1);
    }

    /// Settles plain transfers but refuses every approval-gated one.
    struct NoSignatures<'a>(&'a InMemoryLedger);

    impl Ledger for NoSignatures<'_> {
        fn transfer(&self, transfer: &Transfer) -> core::result::Result<Confirmation, TransferError> {
            self.0.transfer(transfer)
        }

        fn transfer_group(
            &self,
            legs: &[Transfer],
        ) -> core::result::Result<Confirmation, TransferError> {
            self.0.transfer_group(legs)
        }

        fn transfer_with_approvals(
            &self,
            _transfer: &Transfer,
            _approvers: &[ParticipantId],
            _threshold: usize,
        ) -> core::result::Result<Confirmation, TransferError> {
            Err(TransferError::Rejected("signatures withheld".to_owned()))
        }
    }

    #[test]
    fn failed_payout_does_not_mark_paid() {
        let (mut stokvel, ledger) = group(3);
        let Err(AmmError::TransferFailed(TransferError::Rejected(_))) =
            stokvel.run_cycle(&NoSignatures(&ledger), 0)
        else {
            panic!("expected Rejected");
        };
        assert!(stokvel.paid().is_empty());
        // contributions stayed in the group account
        assert_eq!(ledger.balance(&"GROUP".into(), Asset::A), Amount::new(1_500_000));

        let Ok(report) = stokvel.run_cycle(&ledger, 0) else {
            panic!("expected Ok");
        };
        assert_eq!(report.paid_out, Amount::new(1_500_000));
        assert_eq!(stokvel.paid().len(), 1);
        assert_eq!(ledger.balance(&"GROUP".into(), Asset::A), Amount::new(1_500_000));
    }

    #[test]
    fn pays_in_configured_asset() {
        let Ok(cfg) = StokvelConfig::new("GROUP".into(), members(4)) else {
            panic!("expected Ok");
        };
        let ledger = InMemoryLedger::new();
        for m in members(4) {
            ledger.set_balance(m, Asset::B, Amount::new(500_000));
        }
        let Ok(mut stokvel) = Stokvel::from_config(&cfg.with_asset(Asset::B)) else {
            panic!("expected Ok");
        };
        let Ok(report) = stokvel.run_cycle(&ledger, 3) else {
            panic!("expected Ok");
        };
        assert_eq!(report.recipient, ParticipantId::from("M3"));
        assert_eq!(ledger.balance(&"M3".into(), Asset::B), Amount::new(2_000_000));
        assert_eq!(ledger.balance(&"M3".into(), Asset::A), Amount::ZERO);
    }

    #[test]
    fn unanimous_threshold_met_by_all_members() {
        let (stokvel, ledger) = group(3);
        let Ok(cfg) = stokvel.config().clone().with_threshold(3) else {
            panic!("expected Ok");
        };
        let Ok(mut strict) = Stokvel::from_config(&cfg) else {
            panic!("expected Ok");
        };
        // three distinct approvers satisfy a 3-of-3 threshold
        assert!(strict.run_cycle(&ledger, 1).is_ok());
    }

    #[test]
    fn resume_rejects_strangers() {
        let Ok(cfg) = StokvelConfig::new("GROUP".into(), members(2)) else {
            panic!("expected Ok");
        };
        let paid = BTreeSet::from([ParticipantId::from("OUTSIDER")]);
        assert!(Stokvel::resume(cfg, paid).is_err());
    }

    #[test]
    fn contribution_failure_propagates() {
        let (mut stokvel, ledger) = group(2);
        ledger.fail_next(TransferError::Rejected("frozen".to_owned()));
        assert_eq!(
            stokvel.run_cycle(&ledger, 0),
            Err(AmmError::TransferFailed(TransferError::Rejected(
                "frozen".to_owned()
            )))
        );
        assert!(stokvel.paid().is_empty());
    }
}
