//! Property-based tests using `proptest` for pool invariant validation.
//!
//! 1. **Structural invariants**: any sequence of operations leaves
//!    [`LiquidityPool::validate`] passing, and a failed operation changes
//!    nothing.
//! 2. **k monotonicity**: `reserve_a × reserve_b` never decreases on a swap.
//! 3. **No drain**: a swap never empties the output reserve.
//! 4. **Swap reversibility**: a round trip A→B→A returns at most the input.
//! 5. **Fee monotonicity**: a larger input never pays a smaller fee.
//! 6. **No dilution**: a ratio-matched deposit never lowers the per-share
//!    claim of existing providers.
//! 7. **Fee conservation**: under pro-rata credit the vault equals lifetime
//!    fees minus claimed fees.
//! 8. **Liquidity conservation**: deposit then withdraw returns what was
//!    taken, less at most one unit of rounding dust per asset, even for an
//!    off-ratio deposit inside the tolerance.

#![allow(clippy::panic)]

use proptest::prelude::*;

use super::LiquidityPool;
use crate::config::{FeePolicy, PoolConfig};
use crate::domain::{Amount, Asset, ProviderId, Shares};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const PROVIDERS: [&str; 3] = ["ALICE", "BOB", "CAROL"];

fn provider(index: usize) -> ProviderId {
    ProviderId::from(PROVIDERS[index % PROVIDERS.len()])
}

fn config(policy: FeePolicy) -> PoolConfig {
    PoolConfig::default().with_fee_policy(policy)
}

fn seeded(policy: FeePolicy, ra: u128, rb: u128) -> LiquidityPool {
    let Ok(mut pool) = LiquidityPool::new(config(policy)) else {
        panic!("valid pool");
    };
    let Ok(_) = pool.add_liquidity(&provider(0), Amount::new(ra), Amount::new(rb)) else {
        panic!("valid seed deposit");
    };
    pool
}

fn k(pool: &LiquidityPool) -> u128 {
    let Ok(k) = pool.invariant_k() else {
        panic!("k fits in u128 for test reserves");
    };
    k
}

#[derive(Debug, Clone)]
enum Op {
    Deposit { who: usize, amount_a: u128 },
    Swap { asset: Asset, amount: u128 },
    Distribute { asset: Asset, amount: u128 },
    Remove { who: usize, percent: u128 },
    Withdraw { who: usize },
    Claim { who: usize },
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000] to avoid extremes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

fn policy_strategy() -> impl Strategy<Value = FeePolicy> {
    prop_oneof![Just(FeePolicy::ReserveAccrual), Just(FeePolicy::ProRataCredit)]
}

fn asset_strategy() -> impl Strategy<Value = Asset> {
    prop_oneof![Just(Asset::A), Just(Asset::B)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u128..1_000_000).prop_map(|(who, amount_a)| Op::Deposit { who, amount_a }),
        (asset_strategy(), 1u128..1_000_000).prop_map(|(asset, amount)| Op::Swap { asset, amount }),
        (asset_strategy(), 1u128..10_000)
            .prop_map(|(asset, amount)| Op::Distribute { asset, amount }),
        (0usize..3, 1u128..=100).prop_map(|(who, percent)| Op::Remove { who, percent }),
        (0usize..3).prop_map(|who| Op::Withdraw { who }),
        (0usize..3).prop_map(|who| Op::Claim { who }),
    ]
}

/// Applies `op`, returning whether it succeeded.
fn apply(pool: &mut LiquidityPool, op: &Op) -> bool {
    match *op {
        Op::Deposit { who, amount_a } => {
            let (ra, rb) = pool.reserves();
            // match the current ratio when the pool is active
            let amount_b = if ra.is_zero() {
                amount_a
            } else {
                amount_a * rb.get() / ra.get()
            };
            pool.add_liquidity(&provider(who), Amount::new(amount_a), Amount::new(amount_b))
                .is_ok()
        }
        Op::Swap { asset, amount } => pool.swap(asset, Amount::new(amount)).is_ok(),
        Op::Distribute { asset, amount } => {
            pool.distribute_fees(Amount::new(amount), asset).is_ok()
        }
        Op::Remove { who, percent } => {
            let held = pool.balance_of(&provider(who)).get();
            let shares = Shares::new(held * percent / 100);
            pool.remove_liquidity(&provider(who), shares).is_ok()
        }
        Op::Withdraw { who } => pool.withdraw_liquidity(&provider(who)).is_ok(),
        Op::Claim { who } => pool.claim_fees(&provider(who)).is_ok(),
    }
}

// ---------------------------------------------------------------------------
// Property 1: Structural invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_invariants_hold_across_operations(
        policy in policy_strategy(),
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut pool = seeded(policy, ra, rb);
        for op in &ops {
            let before = pool.snapshot();
            if !apply(&mut pool, op) {
                prop_assert_eq!(&pool.snapshot(), &before, "failed {:?} mutated the pool", op);
            }
            prop_assert!(pool.validate().is_ok(), "invariants broken after {:?}", op);
        }
    }
}

// ---------------------------------------------------------------------------
// Properties 2 & 3: k monotonicity and no drain
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swaps_never_shrink_k_or_drain(
        policy in policy_strategy(),
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        swaps in prop::collection::vec((asset_strategy(), 1u128..100_000_000), 1..20),
    ) {
        let mut pool = seeded(policy, ra, rb);
        for (asset, amount) in swaps {
            let k_before = k(&pool);
            let Ok(outcome) = pool.swap(asset, Amount::new(amount)) else {
                continue;
            };
            let k_after = k(&pool);
            prop_assert!(k_after >= k_before, "k shrank: {} < {}", k_after, k_before);
            if policy == FeePolicy::ReserveAccrual && !outcome.fee().is_zero() {
                prop_assert!(k_after > k_before, "fee did not grow k");
            }
            prop_assert!(!pool.reserve(outcome.asset_out()).is_zero());
        }
    }
}

// ---------------------------------------------------------------------------
// Properties 4 & 5: reversibility and fee monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        divisor in 10u128..1_000,
    ) {
        let swap_in = (ra / divisor).max(1);
        let mut pool = seeded(FeePolicy::ReserveAccrual, ra, rb);

        let Ok(there) = pool.swap_a_for_b(Amount::new(swap_in)) else {
            return Ok(());
        };
        let Ok(back) = pool.swap_b_for_a(there.amount_out()) else {
            return Ok(());
        };
        prop_assert!(
            back.amount_out().get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            back.amount_out().get(), swap_in
        );
    }

    #[test]
    fn prop_fee_monotonic(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        small in 400u128..100_000,
        extra in 0u128..100_000,
    ) {
        let pool = seeded(FeePolicy::ReserveAccrual, ra, rb);
        let (Ok(lo), Ok(hi)) = (
            pool.quote_swap(Asset::A, Amount::new(small)),
            pool.quote_swap(Asset::A, Amount::new(small + extra)),
        ) else {
            return Ok(());
        };
        prop_assert!(hi.fee() >= lo.fee());
        prop_assert!(hi.amount_out() >= lo.amount_out());
    }
}

// ---------------------------------------------------------------------------
// Property 6: No dilution
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_matched_deposit_never_dilutes(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        swap_in in 1_000u128..1_000_000,
        amount_a in 1_000u128..10_000_000,
    ) {
        let mut pool = seeded(FeePolicy::ReserveAccrual, ra, rb);
        let _ = pool.swap_a_for_b(Amount::new(swap_in));

        let (ra0, rb0) = pool.reserves();
        let t0 = pool.total_shares().get();
        let amount_b = amount_a * rb0.get() / ra0.get();
        let Ok(_) = pool.add_liquidity(&provider(1), Amount::new(amount_a), Amount::new(amount_b))
        else {
            return Ok(());
        };
        let (ra1, rb1) = pool.reserves();
        let t1 = pool.total_shares().get();

        // ra1 / t1 >= ra0 / t0, cross-multiplied
        prop_assert!(ra1.get() * t0 >= ra0.get() * t1);
        prop_assert!(rb1.get() * t0 >= rb0.get() * t1);
    }
}

// ---------------------------------------------------------------------------
// Properties 7 & 8: fee and liquidity conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pro_rata_fees_conserved(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fees in prop::collection::vec((asset_strategy(), 1u128..100_000), 1..20),
        claim_every in 1usize..5,
    ) {
        let mut pool = seeded(FeePolicy::ProRataCredit, ra, rb);
        let (ra0, rb0) = pool.reserves();
        let Ok(_) = pool.add_liquidity(&provider(1), ra0, rb0) else {
            return Ok(());
        };

        let mut claimed_a = 0u128;
        let mut claimed_b = 0u128;
        for (i, (asset, amount)) in fees.into_iter().enumerate() {
            let _ = pool.swap(asset, Amount::new(amount));
            if i % claim_every == 0 {
                let Ok((a, b)) = pool.claim_fees(&provider(i)) else {
                    continue;
                };
                claimed_a += a.get();
                claimed_b += b.get();
            }
        }

        prop_assert_eq!(
            pool.fee_vault(Asset::A).get(),
            pool.lifetime_fees(Asset::A).get() - claimed_a
        );
        prop_assert_eq!(
            pool.fee_vault(Asset::B).get(),
            pool.lifetime_fees(Asset::B).get() - claimed_b
        );
        prop_assert!(pool.validate().is_ok());
    }

    #[test]
    fn prop_deposit_withdraw_returns_input_less_dust(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        swap_in in 0u128..1_000_000,
        amount_a in 1_000u128..10_000_000,
        skew_bp in 0u128..=50,
    ) {
        let mut pool = seeded(FeePolicy::ReserveAccrual, ra, rb);
        if swap_in > 0 {
            let _ = pool.swap_a_for_b(Amount::new(swap_in));
        }
        let (ra0, rb0) = pool.reserves();
        // up to 0.5% more B than the reserve ratio asks for
        let amount_b = amount_a * rb0.get() / ra0.get() * (10_000 + skew_bp) / 10_000;
        let Ok(deposit) =
            pool.add_liquidity(&provider(1), Amount::new(amount_a), Amount::new(amount_b))
        else {
            return Ok(());
        };
        prop_assert!(deposit.amount_a.get() <= amount_a);
        prop_assert!(deposit.amount_b.get() <= amount_b);

        let Ok(receipt) = pool.withdraw_liquidity(&provider(1)) else {
            panic!("a provider that just deposited can withdraw");
        };
        prop_assert!(receipt.amount_a <= deposit.amount_a);
        prop_assert!(receipt.amount_b <= deposit.amount_b);
        prop_assert!(
            receipt.amount_a.get() + 1 >= deposit.amount_a.get(),
            "lost A beyond dust: put {} took {}", deposit.amount_a, receipt.amount_a
        );
        prop_assert!(
            receipt.amount_b.get() + 1 >= deposit.amount_b.get(),
            "lost B beyond dust: put {} took {}", deposit.amount_b, receipt.amount_b
        );

        // the last provider out takes the reserves exactly
        let (ra_left, rb_left) = pool.reserves();
        let Ok(last) = pool.withdraw_liquidity(&provider(0)) else {
            panic!("seed provider can withdraw");
        };
        prop_assert_eq!(last.amount_a, ra_left);
        prop_assert_eq!(last.amount_b, rb_left);
        prop_assert!(pool.is_empty());
    }
}
