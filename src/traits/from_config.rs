//! Construction of engine components from their configuration.
//!
//! [`FromConfig`] gives every configurable component a uniform
//! constructor. Implementations **must** validate the configuration: a
//! successfully constructed value is always in a valid initial state.
//!
//! # Implementors
//!
//! - `impl FromConfig<PoolConfig> for LiquidityPool`
//! - `impl FromConfig<StokvelConfig> for Stokvel` (with the `stokvel`
//!   feature)

use crate::error::AmmError;

/// Builds `Self` from a configuration value of type `C`.
pub trait FromConfig<C> {
    /// Creates a new instance from the given configuration.
    ///
    /// The configuration is taken by reference because callers commonly
    /// keep it around (e.g. to build several pools with one fee schedule).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if any parameter is out of
    ///   range or inconsistent.
    /// - [`AmmError::NoParticipants`] for a stokvel with no members.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
