//! Settlement of pool operations against a [`Ledger`](crate::traits::Ledger).

mod pool_service;

pub use pool_service::PoolService;
