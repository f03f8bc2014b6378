//! Couples a [`SharedPool`] with a [`Ledger`].
//!
//! Every fund-moving operation follows the same sequence while holding the
//! pool's write lock:
//!
//! 1. quote the operation against the current pool state,
//! 2. submit the resulting legs to the ledger as one atomic group,
//! 3. commit the quoted mutation only after the group confirms.
//!
//! A ledger failure therefore leaves the pool exactly as it was.

use log::{error, warn};

use crate::domain::{Amount, Asset, DepositReceipt, ProviderId, Shares, SwapOutcome, WithdrawReceipt};
use crate::error::{AmmError, Result};
use crate::pool::{LiquidityPool, SharedPool};
use crate::traits::{AccountId, Ledger, Transfer};

/// Executes pool operations with real value movement.
///
/// `pool_account` is the ledger account that custodies the reserves and
/// the fee vault.
///
/// # Examples
///
/// ```
/// use stokvel_amm::config::PoolConfig;
/// use stokvel_amm::domain::{Amount, Asset};
/// use stokvel_amm::ledger::InMemoryLedger;
/// use stokvel_amm::pool::{LiquidityPool, SharedPool};
/// use stokvel_amm::service::PoolService;
///
/// let ledger = InMemoryLedger::new()
///     .with_balance("ALICE", Asset::A, Amount::new(1_000))
///     .with_balance("ALICE", Asset::B, Amount::new(2_000));
/// let pool = SharedPool::new(LiquidityPool::new(PoolConfig::default()).expect("valid config"));
/// let service = PoolService::new(pool, ledger, "POOL".into());
///
/// let receipt = service
///     .deposit(&"ALICE".into(), Amount::new(1_000), Amount::new(2_000))
///     .expect("deposit settles");
/// assert_eq!(receipt.shares_minted.get(), 3_000);
/// assert_eq!(service.ledger().balance(&"POOL".into(), Asset::B), Amount::new(2_000));
/// ```
#[derive(Debug)]
pub struct PoolService<L> {
    pool: SharedPool,
    ledger: L,
    pool_account: AccountId,
}

impl<L: Ledger> PoolService<L> {
    /// Creates a service settling `pool` through `ledger`.
    pub fn new(pool: SharedPool, ledger: L, pool_account: AccountId) -> Self {
        Self {
            pool,
            ledger,
            pool_account,
        }
    }

    /// The shared pool handle.
    #[must_use]
    pub const fn pool(&self) -> &SharedPool {
        &self.pool
    }

    /// The ledger used for settlement.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The account custodying the pool's assets.
    #[must_use]
    pub const fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    /// Moves both assets from `provider` into the pool and mints shares.
    ///
    /// Only the receipt amounts are debited, which may be less than offered
    /// when the deposit is trimmed to the reserve ratio.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyProviderId`] if `provider` is empty.
    /// - Anything [`LiquidityPool::quote_add_liquidity`] returns.
    /// - [`AmmError::TransferFailed`] if the ledger refuses the deposit.
    pub fn deposit(
        &self,
        provider: &ProviderId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<DepositReceipt> {
        provider.validate()?;
        self.pool.write(|pool| {
            let receipt = pool.quote_add_liquidity(amount_a, amount_b)?;
            self.settle(&[
                self.inbound(provider, Asset::A, receipt.amount_a),
                self.inbound(provider, Asset::B, receipt.amount_b),
            ])?;
            Self::committed(pool.add_liquidity(provider, amount_a, amount_b))
        })
    }

    /// Swaps `amount_in` of `asset_in` paid by `trader`.
    ///
    /// # Errors
    ///
    /// - Anything [`LiquidityPool::quote_swap`] returns.
    /// - [`AmmError::TransferFailed`] if the ledger refuses either leg.
    pub fn swap(&self, trader: &AccountId, asset_in: Asset, amount_in: Amount) -> Result<SwapOutcome> {
        self.swap_with_limit(trader, asset_in, amount_in, Amount::ZERO)
    }

    /// Swaps like [`PoolService::swap`] but refuses to settle if the output
    /// falls below `min_amount_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::SlippageExceeded`] if the quoted output is too small.
    /// - Anything [`PoolService::swap`] returns.
    pub fn swap_with_limit(
        &self,
        trader: &AccountId,
        asset_in: Asset,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<SwapOutcome> {
        self.pool.write(|pool| {
            let outcome = pool.quote_swap(asset_in, amount_in)?;
            if outcome.amount_out() < min_amount_out {
                return Err(AmmError::SlippageExceeded {
                    quoted: outcome.amount_out().get(),
                    minimum: min_amount_out.get(),
                });
            }
            self.settle(&[
                self.inbound(trader, asset_in, outcome.amount_in()),
                self.outbound(trader, outcome.asset_out(), outcome.amount_out()),
            ])?;
            Self::committed(pool.swap(asset_in, amount_in))
        })
    }

    /// Redeems every share of `provider` and pays out any credited fees.
    ///
    /// # Errors
    ///
    /// - Anything [`LiquidityPool::quote_withdraw`] returns.
    /// - [`AmmError::TransferFailed`] if the ledger refuses the payout.
    pub fn withdraw(&self, provider: &ProviderId) -> Result<WithdrawReceipt> {
        self.pool.write(|pool| {
            let receipt = pool.quote_withdraw(provider)?;
            self.pay_out(provider, receipt.total_a(), receipt.total_b())?;
            Self::committed(pool.withdraw_liquidity(provider))
        })
    }

    /// Redeems `shares` of `provider`.
    ///
    /// # Errors
    ///
    /// - Anything [`LiquidityPool::quote_remove_liquidity`] returns.
    /// - [`AmmError::TransferFailed`] if the ledger refuses the payout.
    pub fn remove(&self, provider: &ProviderId, shares: Shares) -> Result<WithdrawReceipt> {
        self.pool.write(|pool| {
            let receipt = pool.quote_remove_liquidity(provider, shares)?;
            self.pay_out(provider, receipt.amount_a, receipt.amount_b)?;
            Self::committed(pool.remove_liquidity(provider, shares))
        })
    }

    /// Moves external fee income from `payer` into the pool account and
    /// distributes it with the pool's fee policy.
    ///
    /// # Errors
    ///
    /// - Anything [`LiquidityPool::check_fee_distribution`] returns.
    /// - [`AmmError::TransferFailed`] if the ledger refuses the transfer.
    pub fn distribute_fees(&self, payer: &AccountId, asset: Asset, amount: Amount) -> Result<()> {
        self.pool.write(|pool| {
            pool.check_fee_distribution(amount, asset)?;
            self.settle(&[self.inbound(payer, asset, amount)])?;
            Self::committed(pool.distribute_fees(amount, asset))
        })
    }

    /// Pays `provider` the fees credited to them.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAProvider`] if `provider` has no position.
    /// - [`AmmError::TransferFailed`] if the ledger refuses the payout.
    pub fn claim_fees(&self, provider: &ProviderId) -> Result<(Amount, Amount)> {
        self.pool.write(|pool| {
            let position = pool
                .position(provider)
                .copied()
                .ok_or_else(|| AmmError::NotAProvider(provider.clone()))?;
            self.pay_out(provider, position.fees_a, position.fees_b)?;
            Self::committed(pool.claim_fees(provider))
        })
    }

    // -- internals ----------------------------------------------------------

    fn inbound(&self, from: &AccountId, asset: Asset, amount: Amount) -> Transfer {
        Transfer::new(from.clone(), self.pool_account.clone(), asset, amount)
    }

    fn outbound(&self, to: &AccountId, asset: Asset, amount: Amount) -> Transfer {
        Transfer::new(self.pool_account.clone(), to.clone(), asset, amount)
    }

    fn pay_out(&self, to: &AccountId, amount_a: Amount, amount_b: Amount) -> Result<()> {
        self.settle(&[
            self.outbound(to, Asset::A, amount_a),
            self.outbound(to, Asset::B, amount_b),
        ])
    }

    /// Submits the non-zero legs as one atomic group.
    fn settle(&self, legs: &[Transfer]) -> Result<()> {
        let legs: Vec<Transfer> = legs
            .iter()
            .filter(|leg| !leg.amount.is_zero())
            .cloned()
            .collect();
        if legs.is_empty() {
            return Ok(());
        }
        self.ledger.transfer_group(&legs).map_err(|err| {
            warn!("ledger refused {} leg(s) for {}: {err}", legs.len(), self.pool_account);
            AmmError::from(err)
        })?;
        Ok(())
    }

    /// Passes through a commit that follows a confirmed settlement.
    ///
    /// The commit replays the quote under the same write lock, so it only
    /// fails if the pool and ledger have diverged.
    fn committed<T>(result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            error!("ledger settled but pool commit failed: {err}");
        }
        result
    }
}
