//! Thread-safe handle to a pool.

use std::sync::{Arc, PoisonError, RwLock};

use super::{LiquidityPool, PoolSnapshot};

/// A cloneable, thread-safe handle to one [`LiquidityPool`].
///
/// Mutations are serialized through a write lock; readers see a consistent
/// state and never observe a half-applied operation. Clones share the same
/// pool.
///
/// # Examples
///
/// ```
/// use stokvel_amm::config::PoolConfig;
/// use stokvel_amm::domain::Amount;
/// use stokvel_amm::pool::{LiquidityPool, SharedPool};
///
/// let pool = LiquidityPool::new(PoolConfig::default()).expect("valid config");
/// let shared = SharedPool::new(pool);
///
/// let minted = shared.write(|pool| pool.add_liquidity(&"ALICE".into(), Amount::new(5), Amount::new(5)));
/// assert!(minted.is_ok());
/// assert_eq!(shared.read(|pool| pool.provider_count()), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SharedPool {
    inner: Arc<RwLock<LiquidityPool>>,
}

impl SharedPool {
    /// Wraps `pool` for shared use.
    #[must_use]
    pub fn new(pool: LiquidityPool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    /// Runs `f` with shared read access.
    pub fn read<R>(&self, f: impl FnOnce(&LiquidityPool) -> R) -> R {
        // Pool mutations never leave partial state, so a poisoned lock still
        // guards a valid pool.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` with exclusive write access.
    ///
    /// No other reader or writer runs until `f` returns.
    pub fn write<R>(&self, f: impl FnOnce(&mut LiquidityPool) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Captures a consistent snapshot of the pool.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        self.read(LiquidityPool::snapshot)
    }
}

impl From<LiquidityPool> for SharedPool {
    fn from(pool: LiquidityPool) -> Self {
        Self::new(pool)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::thread;

    use super::*;
    use crate::config::PoolConfig;
    use crate::domain::{Amount, Asset, ProviderId};

    fn seeded() -> SharedPool {
        let Ok(mut pool) = LiquidityPool::new(PoolConfig::default()) else {
            panic!("expected Ok");
        };
        let Ok(_) = pool.add_liquidity(
            &ProviderId::from("ALICE"),
            Amount::new(1_000_000),
            Amount::new(1_000_000),
        ) else {
            panic!("expected Ok");
        };
        SharedPool::new(pool)
    }

    #[test]
    fn clones_share_state() {
        let shared = seeded();
        let other = shared.clone();
        let Ok(_) = other.write(|pool| pool.swap_a_for_b(Amount::new(1_000))) else {
            panic!("expected Ok");
        };
        assert_eq!(shared.snapshot(), other.snapshot());
        assert_eq!(shared.read(|pool| pool.reserve(Asset::A)), Amount::new(1_001_000));
    }

    #[test]
    fn concurrent_swaps_serialize() {
        let shared = seeded();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = shared.clone();
                let asset = if i % 2 == 0 { Asset::A } else { Asset::B };
                thread::spawn(move || {
                    for _ in 0..25 {
                        let Ok(_) = pool.write(|p| p.swap(asset, Amount::new(500))) else {
                            panic!("expected swap");
                        };
                    }
                })
            })
            .collect();
        for handle in handles {
            let Ok(()) = handle.join() else {
                panic!("swap thread panicked");
            };
        }
        // 200 swaps, 2 units of fee each
        assert_eq!(
            shared.read(|p| p.lifetime_fees(Asset::A).get() + p.lifetime_fees(Asset::B).get()),
            400
        );
        assert!(shared.read(|p| p.validate().is_ok()));
    }

    #[test]
    fn poisoned_lock_recovers() {
        let shared = seeded();
        let clone = shared.clone();
        let _ = thread::spawn(move || {
            clone.write(|_| panic!("writer dies holding the lock"));
        })
        .join();
        assert_eq!(shared.read(|p| p.provider_count()), 1);
    }
}
