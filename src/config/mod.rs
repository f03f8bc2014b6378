//! Pool configuration.
//!
//! [`PoolConfig`] fixes a pool's fee tier, its [`FeePolicy`] and its
//! [`DepositPolicy`] at construction time. All types derive serde so an
//! embedder can load them from whatever format it already uses.

mod pool_config;

pub use pool_config::{DepositPolicy, FeePolicy, PoolConfig};
