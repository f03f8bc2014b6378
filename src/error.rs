//! Unified error types for the pool engine.
//!
//! Every fallible operation in the crate returns [`AmmError`].  All variants
//! are local, recoverable conditions: a failed operation leaves the pool
//! exactly as it was before the call.

use thiserror::Error;

use crate::domain::{ProviderId, Shares};
use crate::traits::TransferError;

/// Errors produced by pool accounting, settlement, and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// An operation was invoked with a zero (non-positive) quantity, or a
    /// quantity that rounds to zero after fees.
    #[error("zero amount: {0}")]
    ZeroAmount(&'static str),

    /// The pool cannot satisfy the request from its current reserves.
    #[error("insufficient liquidity in pool")]
    InsufficientLiquidity,

    /// The identity holds no shares in the pool.
    #[error("not a liquidity provider: {0}")]
    NotAProvider(ProviderId),

    /// A provider identity was empty.
    #[error("provider id must not be empty")]
    EmptyProviderId,

    /// A partial removal asked for more shares than the provider holds.
    #[error("insufficient shares: requested {requested}, available {available}")]
    InsufficientShares {
        /// Shares the caller asked to redeem.
        requested: Shares,
        /// Shares the provider actually holds.
        available: Shares,
    },

    /// The deposit ratio deviates from the reserve ratio by more than the
    /// configured tolerance.
    #[error("deposit ratio does not match reserve ratio")]
    DepositRatioMismatch,

    /// The deposit is too small to mint a single share.
    #[error("deposit too small to mint shares")]
    DepositTooSmall,

    /// The swap output fell below the caller's minimum.
    #[error("slippage exceeded: quoted {quoted}, minimum {minimum}")]
    SlippageExceeded {
        /// Output the pool would pay.
        quoted: u128,
        /// Output the caller required.
        minimum: u128,
    },

    /// A fixed-point intermediate exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// Division by a zero quantity.
    #[error("division by zero")]
    DivisionByZero,

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A snapshot violates a pool invariant and cannot be restored.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(&'static str),

    /// The ledger collaborator rejected or failed a transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    /// A stokvel has no participants to pay.
    #[error("no participants")]
    NoParticipants,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;
