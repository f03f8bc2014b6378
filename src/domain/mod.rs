//! Value types used throughout the pool engine.
//!
//! Quantities are integer newtypes ([`Amount`], [`Shares`], [`BasisPoints`])
//! so that asset units, ownership units, and percentages cannot be mixed.
//! Floating point never appears in accounting; [`Price`] is fixed-point and
//! only used for quotes.

mod amount;
mod asset;
mod basis_points;
mod fee_tier;
mod position;
mod price;
mod provider_id;
mod receipts;
mod rounding;
mod shares;
mod swap_outcome;

pub use amount::Amount;
pub use asset::Asset;
pub use basis_points::BasisPoints;
pub(crate) use basis_points::BPS_DENOMINATOR;
pub use fee_tier::FeeTier;
pub use position::ProviderPosition;
pub use price::Price;
pub use provider_id::ProviderId;
pub use receipts::{DepositReceipt, WithdrawReceipt};
pub use rounding::Rounding;
pub use shares::Shares;
pub use swap_outcome::SwapOutcome;
