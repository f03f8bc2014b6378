//! The liquidity pool state machine and its thread-safe handle.
//!
//! | Type | Role |
//! |------|------|
//! | [`LiquidityPool`] | Pure two-asset constant-product accounting, no I/O |
//! | [`SharedPool`] | `Arc<RwLock<_>>` handle serializing mutations |
//! | [`PoolSnapshot`] | Serializable image used by `snapshot`/`restore` |

mod liquidity_pool;
mod shared;
mod snapshot;

#[cfg(test)]
mod proptest_properties;

pub use liquidity_pool::LiquidityPool;
pub use shared::SharedPool;
pub use snapshot::PoolSnapshot;
