//! Ledger implementations shipped with the crate.
//!
//! Production embedders implement [`Ledger`](crate::traits::Ledger) against
//! their own settlement system; [`InMemoryLedger`] is a complete in-process
//! implementation for tests, simulations and examples.

mod in_memory;

pub use in_memory::InMemoryLedger;
