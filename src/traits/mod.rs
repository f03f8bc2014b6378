//! Trait seams of the engine.
//!
//! [`Ledger`] is the collaborator that executes value movements;
//! [`FromConfig`] is the uniform validated constructor used by pools and the
//! stokvel scheduler.

mod from_config;
mod ledger;

pub use from_config::FromConfig;
pub use ledger::{AccountId, Confirmation, Ledger, Transfer, TransferError};
