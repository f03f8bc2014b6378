//! Serializable image of a pool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PoolConfig;
use crate::domain::{Amount, ProviderId, ProviderPosition, Shares};

/// Complete state of a [`LiquidityPool`](super::LiquidityPool).
///
/// A plain record with no behaviour of its own: take one with
/// [`LiquidityPool::snapshot`](super::LiquidityPool::snapshot), persist it
/// with any serde format, and rebuild the pool with
/// [`LiquidityPool::restore`](super::LiquidityPool::restore), which checks
/// the pool invariants before accepting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Pool parameters.
    pub config: PoolConfig,
    /// Asset A reserve.
    pub reserve_a: Amount,
    /// Asset B reserve.
    pub reserve_b: Amount,
    /// Outstanding shares.
    pub total_shares: Shares,
    /// Provider positions keyed by id.
    pub providers: BTreeMap<ProviderId, ProviderPosition>,
    /// Credited plus undistributed asset-A fees.
    #[serde(default)]
    pub fee_vault_a: Amount,
    /// Credited plus undistributed asset-B fees.
    #[serde(default)]
    pub fee_vault_b: Amount,
    /// Asset-A rounding remainder awaiting distribution.
    #[serde(default)]
    pub undistributed_a: Amount,
    /// Asset-B rounding remainder awaiting distribution.
    #[serde(default)]
    pub undistributed_b: Amount,
    /// Lifetime asset-A fees.
    #[serde(default)]
    pub lifetime_fees_a: Amount,
    /// Lifetime asset-B fees.
    #[serde(default)]
    pub lifetime_fees_b: Amount,
}
