//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use stokvel_amm::prelude::*;
//!
//! let pool = LiquidityPool::from_config(&PoolConfig::default());
//! assert!(pool.is_ok());
//! ```

pub use crate::config::{DepositPolicy, FeePolicy, PoolConfig};
pub use crate::domain::{
    Amount, Asset, BasisPoints, DepositReceipt, FeeTier, Price, ProviderId, ProviderPosition,
    Rounding, Shares, SwapOutcome, WithdrawReceipt,
};
pub use crate::error::{AmmError, Result};
pub use crate::ledger::InMemoryLedger;
pub use crate::math::CheckedArithmetic;
pub use crate::pool::{LiquidityPool, PoolSnapshot, SharedPool};
pub use crate::service::PoolService;
#[cfg(feature = "stokvel")]
pub use crate::stokvel::{
    select_next_recipient, CycleReport, ParticipantId, Stokvel, StokvelConfig,
};
pub use crate::traits::{AccountId, Confirmation, FromConfig, Ledger, Transfer, TransferError};
