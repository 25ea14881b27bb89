//! Strong type definitions for ranks and values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The scalar each process owns for the duration of a run.
pub type Value = i64;

/// A process's fixed identifier in `[0, N)`.
///
/// The rank is also the process's position in the sorted output. It never
/// changes during a run; only values move between ranks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rank(pub usize);

impl Rank {
    /// The conventional observer rank.
    pub const ZERO: Self = Self(0);

    /// Create a rank from its index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    pub const fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    /// The rank immediately to the left, if any.
    pub const fn prev(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(i) => Some(Self(i)),
            None => None,
        }
    }

    /// The rank immediately to the right (not bounds-checked against a size).
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank({})", self.0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_parity() {
        assert!(Rank(0).is_even());
        assert!(Rank(3).is_odd());
        assert!(!Rank(4).is_odd());
    }

    #[test]
    fn test_rank_neighbors() {
        assert_eq!(Rank(0).prev(), None);
        assert_eq!(Rank(5).prev(), Some(Rank(4)));
        assert_eq!(Rank(5).next(), Rank(6));
    }

    #[test]
    fn test_rank_display_and_debug() {
        assert_eq!(format!("{}", Rank(7)), "7");
        assert_eq!(format!("{:?}", Rank(7)), "Rank(7)");
    }

    #[test]
    fn test_rank_ordering() {
        assert!(Rank(1) < Rank(2));
        assert_eq!(Rank::from(3), Rank::new(3));
    }
}
