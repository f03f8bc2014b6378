//! Recipient selection.

use std::collections::BTreeSet;

use super::ParticipantId;
use crate::error::{AmmError, Result};

/// Picks the next payout recipient.
///
/// Chooses `unpaid[seed % unpaid.len()]`, where `unpaid` keeps the order of
/// `participants`. When every participant is in `already_paid` the round
/// restarts and the choice is made over the full list. Callers supply the
/// seed from whatever randomness source they trust.
///
/// # Errors
///
/// Returns [`AmmError::NoParticipants`] if `participants` is empty.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use stokvel_amm::stokvel::{select_next_recipient, ParticipantId};
///
/// let members: Vec<ParticipantId> = ["A", "B", "C"].map(ParticipantId::from).to_vec();
/// let paid = BTreeSet::from([ParticipantId::from("A")]);
/// // unpaid = [B, C]; seed 3 picks index 1
/// assert_eq!(select_next_recipient(&members, &paid, 3), Ok(ParticipantId::from("C")));
/// ```
pub fn select_next_recipient(
    participants: &[ParticipantId],
    already_paid: &BTreeSet<ParticipantId>,
    seed: u64,
) -> Result<ParticipantId> {
    let unpaid: Vec<&ParticipantId> = participants
        .iter()
        .filter(|p| !already_paid.contains(*p))
        .collect();
    let pool: Vec<&ParticipantId> = if unpaid.is_empty() {
        participants.iter().collect()
    } else {
        unpaid
    };

    let len = u64::try_from(pool.len()).map_err(|_| AmmError::NoParticipants)?;
    if len == 0 {
        return Err(AmmError::NoParticipants);
    }
    let index = usize::try_from(seed % len).map_err(|_| AmmError::NoParticipants)?;
    pool.get(index)
        .map(|p| (*p).clone())
        .ok_or(AmmError::NoParticipants)
}
