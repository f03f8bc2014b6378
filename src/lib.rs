//! # Stokvel AMM
//!
//! Liquidity-pool accounting engine for a two-asset constant-product market
//! maker, with settlement delegated to a pluggable ledger and a small
//! rotating-savings ("stokvel") payout scheduler on the side.
//!
//! The engine decides *how much* moves between which parties and how pool
//! ownership is accounted. A [`Ledger`](traits::Ledger) implementation
//! supplied by the embedder actually moves the funds.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `stokvel` | yes | Rotating-savings payout scheduler |
//!
//! # Quick Start
//!
//! ```rust
//! use stokvel_amm::config::PoolConfig;
//! use stokvel_amm::domain::{Amount, Asset, ProviderId, Shares};
//! use stokvel_amm::pool::LiquidityPool;
//!
//! // 1. Create an empty pool: 0.30% fee, fees accrue to reserves
//! let mut pool = LiquidityPool::new(PoolConfig::default()).expect("valid config");
//!
//! // 2. The first deposit sets the price and mints a + b shares
//! let alice = ProviderId::from("ALICE");
//! let receipt = pool
//!     .add_liquidity(&alice, Amount::new(1_000), Amount::new(2_000))
//!     .expect("deposit ok");
//! assert_eq!(receipt.shares_minted, Shares::new(3_000));
//!
//! // 3. Swap 10 B for A
//! let outcome = pool.swap_b_for_a(Amount::new(10)).expect("swap ok");
//! assert_eq!(outcome.fee(), Amount::new(1));
//! assert_eq!(outcome.amount_out(), Amount::new(4));
//!
//! // 4. Withdraw everything
//! let out = pool.withdraw_liquidity(&alice).expect("withdraw ok");
//! assert_eq!((out.amount_a, out.amount_b), (Amount::new(996), Amount::new(2_010)));
//! assert!(pool.is_empty());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  PoolService<L>   │  quote → ledger transfer group → commit
//! └────────┬─────────┘
//!          │ SharedPool (RwLock, one writer at a time)
//!          ▼
//! ┌──────────────────┐
//! │  LiquidityPool    │  pure state machine, no I/O
//! └────────┬─────────┘
//!          │ checked math, explicit rounding
//!          ▼
//! ┌──────────────────┐
//! │  Domain           │  Amount, Shares, FeeTier, ProviderId, …
//! └──────────────────┘
//!
//!  Ledger trait ◄── InMemoryLedger, or the embedder's settlement client
//!  Stokvel      ◄── independent scheduler over the same Ledger trait
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`Price`](domain::Price), etc. |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) with fee and deposit policies |
//! | [`pool`] | [`LiquidityPool`](pool::LiquidityPool), [`SharedPool`](pool::SharedPool), [`PoolSnapshot`](pool::PoolSnapshot) |
//! | [`service`] | [`PoolService`](service::PoolService): ledger-settled pool operations |
//! | [`traits`] | [`Ledger`](traits::Ledger) collaborator and [`FromConfig`](traits::FromConfig) |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) |
//! | [`math`] | Checked arithmetic and rounding helpers |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | `stokvel` | Rotating-savings payout scheduler (feature `stokvel`) |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade: `debug` for quotes and
//! commits, `info` for pool activation, draining and stokvel payouts, and
//! `warn` when the ledger refuses a transfer. No logger is installed.

pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod service;
#[cfg(feature = "stokvel")]
pub mod stokvel;
pub mod traits;
