//! Opaque ledger identity.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// An opaque identity from the ledger's address space.
///
/// The engine never inspects the contents beyond rejecting the empty
/// string: any string the ledger uses to name an account (an address, a
/// public key in some encoding, a test label) is accepted as-is.
/// Identities compare byte-wise, which gives the pool a deterministic
/// iteration order over its providers.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::ProviderId;
///
/// let id = ProviderId::from("6FPLDHZUILZXBUGQY6E7");
/// assert_eq!(id.as_str(), "6FPLDHZUILZXBUGQY6E7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Wraps an identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that the identity can own a pool position.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::EmptyProviderId`] for the empty string.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.is_empty() {
            return Err(AmmError::EmptyProviderId);
        }
        Ok(())
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProviderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
