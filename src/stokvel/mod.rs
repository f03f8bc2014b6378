//! Rotating-savings ("stokvel") payout scheduling.
//!
//! Every cycle each member contributes a fixed amount to a jointly
//! controlled group account and one member who has not yet been paid in the
//! current round receives the payout. Once everyone has been paid the round
//! restarts.
//!
//! This module is independent of the pool: it only shares the
//! [`Ledger`](crate::traits::Ledger) collaborator.
//!
//! | Item | Role |
//! |------|------|
//! | [`select_next_recipient`] | Pure, seed-driven recipient choice |
//! | [`StokvelConfig`] | Members, amounts and approval threshold |
//! | [`Stokvel`] | Cycle runner tracking who has been paid |

mod config;
mod cycle;
mod schedule;

pub use config::StokvelConfig;
pub use cycle::{CycleReport, Stokvel};
pub use schedule::select_next_recipient;

/// Identity of a stokvel member on the ledger.
pub type ParticipantId = crate::traits::AccountId;
