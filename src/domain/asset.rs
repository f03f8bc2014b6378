//! The two reserve assets of a pool.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one side of the pool.
///
/// # Examples
///
/// ```
/// use stokvel_amm::domain::Asset;
///
/// assert_eq!(Asset::A.other(), Asset::B);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// Reserve asset A.
    A,
    /// Reserve asset B.
    B,
}

impl Asset {
    /// Returns the opposite side of the pool.
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_is_involution() {
        assert_eq!(Asset::A.other().other(), Asset::A);
        assert_eq!(Asset::B.other(), Asset::A);
    }

    #[test]
    fn display() {
        assert_eq!(Asset::A.to_string(), "A");
        assert_eq!(Asset::B.to_string(), "B");
    }
}
