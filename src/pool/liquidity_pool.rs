//! Two-asset constant-product liquidity pool.
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the two
//! reserves. Fees are deducted from the input amount **before** the pricing
//! formula is applied.
//!
//! # Swap Algorithm (A → B)
//!
//! 1. `fee = ceil(amount_in × fee_bps / 10 000)`
//! 2. `net_in = amount_in − fee`
//! 3. `amount_out = floor(reserve_b × net_in / (reserve_a + net_in))`
//! 4. `reserve_a += amount_in` under [`FeePolicy::ReserveAccrual`], or
//!    `reserve_a += net_in` and the fee is credited to providers under
//!    [`FeePolicy::ProRataCredit`]
//! 5. `reserve_b −= amount_out`
//!
//! # Shares
//!
//! The first deposit mints `amount_a + amount_b` shares. Later deposits
//! mint `floor((a + b) × total_shares / (reserve_a + reserve_b))`, capped by
//! the configured [`DepositPolicy`].
//!
//! # Atomicity
//!
//! Every mutating method computes its full effect with checked arithmetic
//! before touching any field, so an `Err` always leaves the pool unchanged.

use std::collections::BTreeMap;

use log::{debug, info};

use super::PoolSnapshot;
use crate::config::{DepositPolicy, FeePolicy, PoolConfig};
use crate::domain::{
    Amount, Asset, BasisPoints, DepositReceipt, Price, ProviderId, ProviderPosition, Rounding,
    Shares, SwapOutcome, WithdrawReceipt,
};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::FromConfig;

/// Fee accounting for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FeeBook {
    /// Credited-but-unclaimed fees plus undistributed dust.
    vault: Amount,
    /// Rounding remainder carried into the next distribution.
    undistributed: Amount,
    /// Every fee ever charged or distributed, claimed or not.
    lifetime: Amount,
}

/// A pro-rata credit computed against the current state, applied later.
struct StagedCredit {
    asset: Asset,
    balances: Vec<(ProviderId, Amount)>,
    book: FeeBook,
}

/// A two-asset constant-product pool with share accounting.
///
/// Created empty from a [`PoolConfig`]; the first deposit fixes the
/// initial price. All methods are pure state transitions: moving funds is
/// the caller's job (see [`PoolService`](crate::service::PoolService)).
///
/// # State
///
/// - `reserve_a` / `reserve_b`: pooled assets (fees included under reserve
///   accrual).
/// - `total_shares`: outstanding shares, always equal to the sum of the
///   provider positions.
/// - per-asset fee books: vault, undistributed dust and lifetime counters.
///
/// # Example
///
/// ```rust
/// use stokvel_amm::config::PoolConfig;
/// use stokvel_amm::domain::{Amount, ProviderId, Shares};
/// use stokvel_amm::pool::LiquidityPool;
///
/// let mut pool = LiquidityPool::new(PoolConfig::default()).expect("valid config");
/// let alice = ProviderId::from("ALICE");
///
/// let receipt = pool
///     .add_liquidity(&alice, Amount::new(1_000), Amount::new(2_000))
///     .expect("deposit ok");
/// assert_eq!(receipt.shares_minted, Shares::new(3_000));
///
/// let outcome = pool.swap_b_for_a(Amount::new(10)).expect("swap ok");
/// assert_eq!(outcome.amount_out(), Amount::new(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityPool {
    config: PoolConfig,
    reserve_a: Amount,
    reserve_b: Amount,
    total_shares: Shares,
    providers: BTreeMap<ProviderId, ProviderPosition>,
    fees_a: FeeBook,
    fees_b: FeeBook,
}

impl LiquidityPool {
    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`PoolConfig::validate`].
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            total_shares: Shares::ZERO,
            providers: BTreeMap::new(),
            fees_a: FeeBook::default(),
            fees_b: FeeBook::default(),
        })
    }

    // -- queries ------------------------------------------------------------

    /// Returns the pool configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns `(reserve_a, reserve_b)`.
    pub const fn reserves(&self) -> (Amount, Amount) {
        (self.reserve_a, self.reserve_b)
    }

    /// Returns the reserve of one asset.
    pub const fn reserve(&self, asset: Asset) -> Amount {
        match asset {
            Asset::A => self.reserve_a,
            Asset::B => self.reserve_b,
        }
    }

    /// Returns the outstanding share supply.
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Number of providers holding shares or credited fees.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` while the pool holds no liquidity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_shares.is_zero()
    }

    /// Shares held by `provider`; zero for unknown providers.
    pub fn balance_of(&self, provider: &ProviderId) -> Shares {
        self.providers
            .get(provider)
            .map_or(Shares::ZERO, |position| position.shares)
    }

    /// The full position of `provider`, if any.
    #[must_use]
    pub fn position(&self, provider: &ProviderId) -> Option<&ProviderPosition> {
        self.providers.get(provider)
    }

    /// Iterates positions in [`ProviderId`] order.
    pub fn positions(&self) -> impl Iterator<Item = (&ProviderId, &ProviderPosition)> {
        self.providers.iter()
    }

    /// Fraction of the share supply held by `provider`, rounded down.
    ///
    /// Zero for unknown providers and for an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the share balance is too
    /// large to scale.
    pub fn share_of_pool(&self, provider: &ProviderId) -> Result<BasisPoints> {
        if self.is_empty() {
            return Ok(BasisPoints::ZERO);
        }
        BasisPoints::from_ratio(self.balance_of(provider).get(), self.total_shares.get())
    }

    /// Current value of `k = reserve_a × reserve_b`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the product exceeds `u128`.
    pub fn invariant_k(&self) -> Result<u128> {
        self.reserve_a
            .get()
            .checked_mul(self.reserve_b.get())
            .ok_or(AmmError::ArithmeticOverflow("invariant k overflow"))
    }

    /// Spot price of `base` in units of the other asset
    /// (`reserve_quote / reserve_base`).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - [`AmmError::ArithmeticOverflow`] if a reserve exceeds the price
    ///   range.
    pub fn spot_price(&self, base: Asset) -> Result<Price> {
        if self.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        Price::from_amounts(self.reserve(base.other()), self.reserve(base))
    }

    /// Fees held for providers in `asset` (credited plus undistributed).
    pub const fn fee_vault(&self, asset: Asset) -> Amount {
        self.fee_book(asset).vault
    }

    /// Rounding remainder waiting for the next distribution in `asset`.
    pub const fn undistributed_fees(&self, asset: Asset) -> Amount {
        self.fee_book(asset).undistributed
    }

    /// Every fee ever charged or distributed in `asset`.
    pub const fn lifetime_fees(&self, asset: Asset) -> Amount {
        self.fee_book(asset).lifetime
    }

    // -- quotes -------------------------------------------------------------

    /// Computes what [`LiquidityPool::add_liquidity`] would mint and take.
    ///
    /// Under [`DepositPolicy::MatchReserveRatio`] the shares come from the
    /// scarcer side and the receipt asks for `ceil(shares × reserve /
    /// total_shares)` of each asset, so an off-ratio deposit within
    /// tolerance is trimmed rather than gifted to existing providers.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if either amount is zero.
    /// - [`AmmError::DepositRatioMismatch`] if the deposit strays from the
    ///   reserve ratio by more than the configured tolerance.
    /// - [`AmmError::DepositTooSmall`] if the deposit mints no shares.
    /// - [`AmmError::ArithmeticOverflow`] if arithmetic overflows.
    pub fn quote_add_liquidity(&self, amount_a: Amount, amount_b: Amount) -> Result<DepositReceipt> {
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::ZeroAmount("deposit requires both assets"));
        }

        if self.is_empty() {
            return Ok(DepositReceipt {
                shares_minted: Shares::new(amount_a.safe_add(&amount_b)?.get()),
                amount_a,
                amount_b,
            });
        }

        let total = self.total_shares.get();
        let pool_value = self.reserve_a.safe_add(&self.reserve_b)?;
        let by_value = amount_a
            .safe_add(&amount_b)?
            .scale(total, pool_value.get(), Rounding::Down)?
            .get();

        let receipt = match self.config.deposit_policy() {
            DepositPolicy::AcceptAnyRatio => DepositReceipt {
                shares_minted: Shares::new(by_value),
                amount_a,
                amount_b,
            },
            DepositPolicy::MatchReserveRatio { tolerance } => {
                self.check_ratio(amount_a, amount_b, tolerance)?;
                let by_a = amount_a
                    .scale(total, self.reserve_a.get(), Rounding::Down)?
                    .get();
                let by_b = amount_b
                    .scale(total, self.reserve_b.get(), Rounding::Down)?
                    .get();
                let minted = by_value.min(by_a).min(by_b);
                // minted ≤ amount × T / R on each side, so the ceiling never
                // exceeds what was offered
                DepositReceipt {
                    shares_minted: Shares::new(minted),
                    amount_a: self.reserve_a.scale(minted, total, Rounding::Up)?,
                    amount_b: self.reserve_b.scale(minted, total, Rounding::Up)?,
                }
            }
        };

        if receipt.shares_minted.is_zero() {
            return Err(AmmError::DepositTooSmall);
        }
        Ok(receipt)
    }

    /// Computes the outcome of swapping `amount_in` of `asset_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if the input, the input net of fees, or
    ///   the output is zero.
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty or the
    ///   output would drain the opposite reserve.
    /// - [`AmmError::ArithmeticOverflow`] if arithmetic overflows.
    pub fn quote_swap(&self, asset_in: Asset, amount_in: Amount) -> Result<SwapOutcome> {
        if amount_in.is_zero() {
            return Err(AmmError::ZeroAmount("swap input must be positive"));
        }
        if self.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }

        let (net_in, fee) = self.config.fee_tier().split(amount_in)?;
        if net_in.is_zero() {
            return Err(AmmError::ZeroAmount("swap input is consumed by the fee"));
        }

        let reserve_in = self.reserve(asset_in);
        let reserve_out = self.reserve(asset_in.other());
        let denominator = reserve_in.safe_add(&net_in)?;
        let amount_out = reserve_out.scale(net_in.get(), denominator.get(), Rounding::Down)?;

        if amount_out.is_zero() {
            return Err(AmmError::ZeroAmount("swap output rounds to zero"));
        }
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        SwapOutcome::new(asset_in, amount_in, fee, amount_out)
    }

    /// Computes what redeeming `shares` of `provider` would pay out.
    ///
    /// Credited fees are not included; see [`LiquidityPool::quote_withdraw`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if `shares` is zero.
    /// - [`AmmError::NotAProvider`] if `provider` holds no shares.
    /// - [`AmmError::InsufficientShares`] if `shares` exceeds the holding.
    pub fn quote_remove_liquidity(
        &self,
        provider: &ProviderId,
        shares: Shares,
    ) -> Result<WithdrawReceipt> {
        if shares.is_zero() {
            return Err(AmmError::ZeroAmount("cannot redeem zero shares"));
        }
        let position = self.shareholder(provider)?;
        if shares > position.shares {
            return Err(AmmError::InsufficientShares {
                requested: shares,
                available: position.shares,
            });
        }
        let (amount_a, amount_b) = self.redeem(shares)?;
        Ok(WithdrawReceipt {
            shares_burned: shares,
            amount_a,
            amount_b,
            ..WithdrawReceipt::default()
        })
    }

    /// Computes what [`LiquidityPool::withdraw_liquidity`] would pay out:
    /// every share of `provider` plus any credited fees.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAProvider`] if `provider` holds no shares.
    pub fn quote_withdraw(&self, provider: &ProviderId) -> Result<WithdrawReceipt> {
        let position = self.shareholder(provider)?;
        let (amount_a, amount_b) = self.redeem(position.shares)?;
        Ok(WithdrawReceipt {
            shares_burned: position.shares,
            amount_a,
            amount_b,
            fees_a: position.fees_a,
            fees_b: position.fees_b,
        })
    }

    /// Checks that [`LiquidityPool::distribute_fees`] would succeed
    /// without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::distribute_fees`].
    pub fn check_fee_distribution(&self, amount: Amount, asset: Asset) -> Result<()> {
        self.ensure_distributable(amount)?;
        match self.config.fee_policy() {
            FeePolicy::ReserveAccrual => {
                let _reserve = self.reserve(asset).safe_add(&amount)?;
                let _lifetime = self.fee_book(asset).lifetime.safe_add(&amount)?;
            }
            FeePolicy::ProRataCredit => {
                let _staged = self.stage_credit(asset, amount)?;
            }
        }
        Ok(())
    }

    // -- mutations ----------------------------------------------------------

    /// Deposits both assets and mints shares to `provider`.
    ///
    /// Only the amounts on the returned receipt join the reserves; under
    /// [`DepositPolicy::MatchReserveRatio`] any excess beyond the reserve
    /// ratio stays with the caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyProviderId`] if `provider` is empty.
    /// - Anything [`LiquidityPool::quote_add_liquidity`] returns.
    pub fn add_liquidity(
        &mut self,
        provider: &ProviderId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<DepositReceipt> {
        provider.validate()?;
        let receipt = self.quote_add_liquidity(amount_a, amount_b)?;

        let reserve_a = self.reserve_a.safe_add(&receipt.amount_a)?;
        let reserve_b = self.reserve_b.safe_add(&receipt.amount_b)?;
        let total_shares = self.total_shares.safe_add(&receipt.shares_minted)?;
        let holding = self.balance_of(provider).safe_add(&receipt.shares_minted)?;

        let was_empty = self.is_empty();
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_shares = total_shares;
        self.providers.entry(provider.clone()).or_default().shares = holding;

        debug!("{provider}: {receipt}");
        if was_empty {
            info!(
                "pool activated by {provider}: reserves {}/{}, {} shares",
                self.reserve_a, self.reserve_b, self.total_shares
            );
        }
        Ok(receipt)
    }

    /// Swaps `amount_in` of `asset_in` for the other asset.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::quote_swap`].
    pub fn swap(&mut self, asset_in: Asset, amount_in: Amount) -> Result<SwapOutcome> {
        let outcome = self.quote_swap(asset_in, amount_in)?;
        let asset_out = outcome.asset_out();

        let (added, credit) = match self.config.fee_policy() {
            FeePolicy::ReserveAccrual => (outcome.amount_in(), None),
            FeePolicy::ProRataCredit if outcome.fee().is_zero() => (outcome.net_in(), None),
            FeePolicy::ProRataCredit => (
                outcome.net_in(),
                Some(self.stage_credit(asset_in, outcome.fee())?),
            ),
        };
        let reserve_in = self.reserve(asset_in).safe_add(&added)?;
        let reserve_out = self.reserve(asset_out).safe_sub(&outcome.amount_out())?;
        let lifetime = self.fee_book(asset_in).lifetime.safe_add(&outcome.fee())?;

        *self.reserve_mut(asset_in) = reserve_in;
        *self.reserve_mut(asset_out) = reserve_out;
        match credit {
            Some(staged) => self.apply_credit(staged),
            None => self.fee_book_mut(asset_in).lifetime = lifetime,
        }

        debug!(
            "swap {outcome}; reserves now {}/{}",
            self.reserve_a, self.reserve_b
        );
        Ok(outcome)
    }

    /// Swaps asset A for asset B.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::quote_swap`].
    pub fn swap_a_for_b(&mut self, amount_in: Amount) -> Result<SwapOutcome> {
        self.swap(Asset::A, amount_in)
    }

    /// Swaps asset B for asset A.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::quote_swap`].
    pub fn swap_b_for_a(&mut self, amount_in: Amount) -> Result<SwapOutcome> {
        self.swap(Asset::B, amount_in)
    }

    /// Swaps like [`LiquidityPool::swap`] but refuses to execute if the
    /// output would fall below `min_amount_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::SlippageExceeded`] if the quoted output is too small.
    /// - Anything [`LiquidityPool::quote_swap`] returns.
    pub fn swap_with_limit(
        &mut self,
        asset_in: Asset,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<SwapOutcome> {
        let outcome = self.quote_swap(asset_in, amount_in)?;
        if outcome.amount_out() < min_amount_out {
            return Err(AmmError::SlippageExceeded {
                quoted: outcome.amount_out().get(),
                minimum: min_amount_out.get(),
            });
        }
        self.swap(asset_in, amount_in)
    }

    /// Hands external fee income to providers using the pool's
    /// [`FeePolicy`].
    ///
    /// Under reserve accrual the amount joins the asset's reserve. Under
    /// pro-rata credit, `amount` plus any undistributed remainder is split
    /// `floor(x × shares / total_shares)` per provider in [`ProviderId`]
    /// order and the new remainder is carried forward.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAmount`] if `amount` is zero.
    /// - [`AmmError::InsufficientLiquidity`] if the pool has no providers.
    /// - [`AmmError::ArithmeticOverflow`] if arithmetic overflows.
    pub fn distribute_fees(&mut self, amount: Amount, asset: Asset) -> Result<()> {
        self.ensure_distributable(amount)?;

        match self.config.fee_policy() {
            FeePolicy::ReserveAccrual => {
                let reserve = self.reserve(asset).safe_add(&amount)?;
                let lifetime = self.fee_book(asset).lifetime.safe_add(&amount)?;
                *self.reserve_mut(asset) = reserve;
                self.fee_book_mut(asset).lifetime = lifetime;
            }
            FeePolicy::ProRataCredit => {
                let staged = self.stage_credit(asset, amount)?;
                self.apply_credit(staged);
            }
        }

        debug!("distributed {amount} {asset} in fees");
        Ok(())
    }

    /// Pays out and zeroes the fees credited to `provider`.
    ///
    /// Returns `(fees_a, fees_b)`; always `(0, 0)` under reserve accrual.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAProvider`] if `provider` has no position.
    pub fn claim_fees(&mut self, provider: &ProviderId) -> Result<(Amount, Amount)> {
        let position = self
            .providers
            .get(provider)
            .copied()
            .ok_or_else(|| AmmError::NotAProvider(provider.clone()))?;

        let vault_a = self.fees_a.vault.safe_sub(&position.fees_a)?;
        let vault_b = self.fees_b.vault.safe_sub(&position.fees_b)?;

        self.fees_a.vault = vault_a;
        self.fees_b.vault = vault_b;
        self.update_position(
            provider,
            ProviderPosition {
                fees_a: Amount::ZERO,
                fees_b: Amount::ZERO,
                ..position
            },
        );

        if !position.fees_a.is_zero() || !position.fees_b.is_zero() {
            debug!(
                "{provider} claimed fees a={} b={}",
                position.fees_a, position.fees_b
            );
        }
        Ok((position.fees_a, position.fees_b))
    }

    /// Redeems `shares` of `provider` for a proportional cut of both
    /// reserves. Credited fees stay in place.
    ///
    /// Redeeming the entire share supply returns the reserves exactly.
    ///
    /// # Errors
    ///
    /// Same as [`LiquidityPool::quote_remove_liquidity`].
    pub fn remove_liquidity(
        &mut self,
        provider: &ProviderId,
        shares: Shares,
    ) -> Result<WithdrawReceipt> {
        let receipt = self.quote_remove_liquidity(provider, shares)?;
        self.commit_withdraw(provider, &receipt)?;
        Ok(receipt)
    }

    /// Redeems every share of `provider` and pays out their credited fees.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAProvider`] if `provider` holds no shares.
    pub fn withdraw_liquidity(&mut self, provider: &ProviderId) -> Result<WithdrawReceipt> {
        let receipt = self.quote_withdraw(provider)?;
        self.commit_withdraw(provider, &receipt)?;
        Ok(receipt)
    }

    // -- snapshots ----------------------------------------------------------

    /// Captures the full pool state.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            config: self.config,
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            total_shares: self.total_shares,
            providers: self.providers.clone(),
            fee_vault_a: self.fees_a.vault,
            fee_vault_b: self.fees_b.vault,
            undistributed_a: self.fees_a.undistributed,
            undistributed_b: self.fees_b.undistributed,
            lifetime_fees_a: self.fees_a.lifetime,
            lifetime_fees_b: self.fees_b.lifetime,
        }
    }

    /// Rebuilds a pool from a snapshot after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidSnapshot`] if the snapshot is internally
    /// inconsistent or carries an invalid configuration.
    pub fn restore(snapshot: PoolSnapshot) -> Result<Self> {
        if snapshot.config.validate().is_err() {
            return Err(AmmError::InvalidSnapshot("invalid pool configuration"));
        }
        let pool = Self {
            config: snapshot.config,
            reserve_a: snapshot.reserve_a,
            reserve_b: snapshot.reserve_b,
            total_shares: snapshot.total_shares,
            providers: snapshot.providers,
            fees_a: FeeBook {
                vault: snapshot.fee_vault_a,
                undistributed: snapshot.undistributed_a,
                lifetime: snapshot.lifetime_fees_a,
            },
            fees_b: FeeBook {
                vault: snapshot.fee_vault_b,
                undistributed: snapshot.undistributed_b,
                lifetime: snapshot.lifetime_fees_b,
            },
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Checks the structural invariants of the pool.
    ///
    /// - Both reserves and the share supply are zero together.
    /// - Provider shares sum to the share supply; no position or provider
    ///   id is empty.
    /// - Each fee vault equals credited fees plus undistributed dust, and
    ///   stays at zero under reserve accrual.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidSnapshot`] naming the first violation.
    pub fn validate(&self) -> Result<()> {
        let empty = [
            self.reserve_a.is_zero(),
            self.reserve_b.is_zero(),
            self.total_shares.is_zero(),
        ];
        if empty.iter().any(|e| *e) && !empty.iter().all(|e| *e) {
            return Err(AmmError::InvalidSnapshot(
                "reserves and share supply must be zero together",
            ));
        }

        let mut shares = Shares::ZERO;
        let mut credited_a = Amount::ZERO;
        let mut credited_b = Amount::ZERO;
        for (provider, position) in &self.providers {
            if provider.is_empty() {
                return Err(AmmError::InvalidSnapshot("empty provider id"));
            }
            if position.is_empty() {
                return Err(AmmError::InvalidSnapshot("empty provider position"));
            }
            shares = shares
                .checked_add(&position.shares)
                .ok_or(AmmError::InvalidSnapshot("provider shares overflow"))?;
            credited_a = credited_a
                .checked_add(&position.fees_a)
                .ok_or(AmmError::InvalidSnapshot("credited fees overflow"))?;
            credited_b = credited_b
                .checked_add(&position.fees_b)
                .ok_or(AmmError::InvalidSnapshot("credited fees overflow"))?;
        }
        if shares != self.total_shares {
            return Err(AmmError::InvalidSnapshot(
                "provider shares do not sum to total shares",
            ));
        }

        for (book, credited) in [(self.fees_a, credited_a), (self.fees_b, credited_b)] {
            if credited.checked_add(&book.undistributed) != Some(book.vault) {
                return Err(AmmError::InvalidSnapshot(
                    "fee vault does not match credited fees",
                ));
            }
            if self.config.fee_policy() == FeePolicy::ReserveAccrual && !book.vault.is_zero() {
                return Err(AmmError::InvalidSnapshot(
                    "reserve-accrual pool holds credited fees",
                ));
            }
        }
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    const fn fee_book(&self, asset: Asset) -> &FeeBook {
        match asset {
            Asset::A => &self.fees_a,
            Asset::B => &self.fees_b,
        }
    }

    fn fee_book_mut(&mut self, asset: Asset) -> &mut FeeBook {
        match asset {
            Asset::A => &mut self.fees_a,
            Asset::B => &mut self.fees_b,
        }
    }

    fn reserve_mut(&mut self, asset: Asset) -> &mut Amount {
        match asset {
            Asset::A => &mut self.reserve_a,
            Asset::B => &mut self.reserve_b,
        }
    }

    fn shareholder(&self, provider: &ProviderId) -> Result<&ProviderPosition> {
        self.providers
            .get(provider)
            .filter(|position| !position.shares.is_zero())
            .ok_or_else(|| AmmError::NotAProvider(provider.clone()))
    }

    /// Proportional cut of both reserves for `shares`, rounded down.
    fn redeem(&self, shares: Shares) -> Result<(Amount, Amount)> {
        if shares == self.total_shares {
            return Ok((self.reserve_a, self.reserve_b));
        }
        let total = self.total_shares.get();
        Ok((
            self.reserve_a.scale(shares.get(), total, Rounding::Down)?,
            self.reserve_b.scale(shares.get(), total, Rounding::Down)?,
        ))
    }

    fn ensure_distributable(&self, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Err(AmmError::ZeroAmount("fee distribution must be positive"));
        }
        if self.is_empty() {
            return Err(AmmError::InsufficientLiquidity);
        }
        Ok(())
    }

    /// Rejects deposits whose `a : b` ratio deviates from
    /// `reserve_a : reserve_b` by more than `tolerance`.
    fn check_ratio(&self, amount_a: Amount, amount_b: Amount, tolerance: BasisPoints) -> Result<()> {
        // a / b == Ra / Rb  <=>  a × Rb == b × Ra
        let lhs = amount_a
            .checked_mul(&self.reserve_b)
            .ok_or(AmmError::ArithmeticOverflow("deposit ratio overflow"))?;
        let rhs = amount_b
            .checked_mul(&self.reserve_a)
            .ok_or(AmmError::ArithmeticOverflow("deposit ratio overflow"))?;
        let (hi, lo) = if lhs >= rhs { (lhs, rhs) } else { (rhs, lhs) };
        let deviation = hi.safe_sub(&lo)?;
        let allowed = tolerance.apply(hi, Rounding::Down)?;
        if deviation > allowed {
            return Err(AmmError::DepositRatioMismatch);
        }
        Ok(())
    }

    fn stage_credit(&self, asset: Asset, amount: Amount) -> Result<StagedCredit> {
        let book = *self.fee_book(asset);
        let pot = book.undistributed.safe_add(&amount)?;
        let total = self.total_shares.get();

        let mut balances = Vec::with_capacity(self.providers.len());
        let mut credited = Amount::ZERO;
        for (provider, position) in &self.providers {
            let credit = pot.scale(position.shares.get(), total, Rounding::Down)?;
            if credit.is_zero() {
                continue;
            }
            credited = credited.safe_add(&credit)?;
            balances.push((provider.clone(), position.fees(asset).safe_add(&credit)?));
        }

        Ok(StagedCredit {
            asset,
            balances,
            book: FeeBook {
                vault: book.vault.safe_add(&amount)?,
                undistributed: pot.safe_sub(&credited)?,
                lifetime: book.lifetime.safe_add(&amount)?,
            },
        })
    }

    fn apply_credit(&mut self, staged: StagedCredit) {
        let asset = staged.asset;
        for (provider, balance) in staged.balances {
            if let Some(position) = self.providers.get_mut(&provider) {
                match asset {
                    Asset::A => position.fees_a = balance,
                    Asset::B => position.fees_b = balance,
                }
            }
        }
        *self.fee_book_mut(asset) = staged.book;
    }

    fn commit_withdraw(&mut self, provider: &ProviderId, receipt: &WithdrawReceipt) -> Result<()> {
        let position = *self.shareholder(provider)?;

        let reserve_a = self.reserve_a.safe_sub(&receipt.amount_a)?;
        let reserve_b = self.reserve_b.safe_sub(&receipt.amount_b)?;
        let total_shares = self.total_shares.safe_sub(&receipt.shares_burned)?;
        let vault_a = self.fees_a.vault.safe_sub(&receipt.fees_a)?;
        let vault_b = self.fees_b.vault.safe_sub(&receipt.fees_b)?;
        let remaining = ProviderPosition {
            shares: position.shares.safe_sub(&receipt.shares_burned)?,
            fees_a: position.fees_a.safe_sub(&receipt.fees_a)?,
            fees_b: position.fees_b.safe_sub(&receipt.fees_b)?,
        };

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_shares = total_shares;
        self.fees_a.vault = vault_a;
        self.fees_b.vault = vault_b;
        self.update_position(provider, remaining);

        debug!("{provider}: {receipt}");
        if self.is_empty() {
            info!("pool drained by {provider}; now empty");
        }
        Ok(())
    }

    fn update_position(&mut self, provider: &ProviderId, position: ProviderPosition) {
        if position.is_empty() {
            self.providers.remove(provider);
        } else {
            self.providers.insert(provider.clone(), position);
        }
    }
}

impl FromConfig<PoolConfig> for LiquidityPool {
    /// Creates an empty pool from the given configuration.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`PoolConfig::validate`].
    fn from_config(config: &PoolConfig) -> Result<Self> {
        Self::new(*config)
    }
}
