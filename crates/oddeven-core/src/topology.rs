//! Linear-chain topology and per-pass role assignment.
//!
//! Every process derives its role from `(rank, size, pass)` alone, so all
//! processes agree on the pairing without exchanging anything.
//!
//! ## Deadlock freedom
//!
//! Two facts make the protocol deadlock-free under blocking send/receive
//! without any barrier:
//!
//! 1. Active pairs within a pass are disjoint: each rank is in at most one pair.
//! 2. Roles are asymmetric: the lower rank (`Initiator`) always sends first and
//!    the higher rank (`Resolver`) always receives first.
//!
//! A rank that finishes its odd pass early may start its even pass; the first
//! thing it does there is block on a partner that has not yet reached the same
//! pass, which is exactly the ordering the protocol needs.
//!
//! ```text
//! N = 5     rank:  0   1   2   3   4
//! OddPass          .   I---R   I---R
//! EvenPass         I---R   I---R   .
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::types::Rank;

/// The two pairing patterns of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pass {
    /// Pairs `(1,2), (3,4), ...`
    Odd,
    /// Pairs `(0,1), (2,3), ...`
    Even,
}

impl Pass {
    /// Order of passes within one phase.
    pub const SEQUENCE: [Pass; 2] = [Pass::Odd, Pass::Even];

    pub fn name(self) -> &'static str {
        match self {
            Pass::Odd => "odd",
            Pass::Even => "even",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rank's obligation in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Lower rank of an active pair: sends first, then waits for the reply.
    Initiator { partner: Rank },
    /// Higher rank of an active pair: receives first, compares, replies.
    Resolver { partner: Rank },
    /// No active pair this pass; no communication.
    Idle,
}

impl Role {
    pub fn partner(&self) -> Option<Rank> {
        match self {
            Role::Initiator { partner } | Role::Resolver { partner } => Some(*partner),
            Role::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Role::Idle)
    }
}

/// Immutable topology of a run, derived solely from the process count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    size: usize,
}

impl Topology {
    /// Create the topology for `size` processes.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CoreError::EmptyTopology);
        }
        Ok(Self { size })
    }

    /// Total number of processes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All ranks in ascending order.
    pub fn ranks(&self) -> impl Iterator<Item = Rank> {
        (0..self.size).map(Rank)
    }

    pub fn contains(&self, rank: Rank) -> bool {
        rank.index() < self.size
    }

    /// The left neighbor `rank - 1`, if it exists.
    pub fn left(&self, rank: Rank) -> Option<Rank> {
        rank.prev().filter(|r| self.contains(*r))
    }

    /// The right neighbor `rank + 1`, if it exists.
    pub fn right(&self, rank: Rank) -> Option<Rank> {
        Some(rank.next()).filter(|r| self.contains(*r))
    }

    /// Highest rank that takes part in an odd pass: `2 * floor((N - 1) / 2)`.
    pub fn odd_limit_max(&self) -> usize {
        2 * ((self.size - 1) / 2)
    }

    /// Highest rank that takes part in an even pass: `2 * floor(N / 2) - 1`.
    ///
    /// `None` for a single process, where the formula would go negative.
    pub fn even_limit_max(&self) -> Option<usize> {
        (2 * (self.size / 2)).checked_sub(1)
    }

    /// The role of `rank` in `pass`.
    pub fn role(&self, rank: Rank, pass: Pass) -> Result<Role> {
        self.check(rank)?;

        let r = rank.index();
        let role = match pass {
            Pass::Odd => {
                let limit = self.odd_limit_max();
                if rank.is_odd() && r < limit {
                    Role::Initiator { partner: rank.next() }
                } else if rank.is_even() && r != 0 && r <= limit {
                    Role::Resolver { partner: Rank(r - 1) }
                } else {
                    Role::Idle
                }
            }
            Pass::Even => match self.even_limit_max() {
                Some(limit) if rank.is_even() && r < limit => {
                    Role::Initiator { partner: rank.next() }
                }
                Some(limit) if rank.is_odd() && r <= limit => {
                    Role::Resolver { partner: Rank(r - 1) }
                }
                _ => Role::Idle,
            },
        };
        Ok(role)
    }

    /// The partner of `rank` in `pass`, or `None` if it is idle.
    pub fn partner(&self, rank: Rank, pass: Pass) -> Result<Option<Rank>> {
        Ok(self.role(rank, pass)?.partner())
    }

    /// The disjoint `(lo, hi)` pairs active in `pass`, ascending.
    pub fn active_pairs(&self, pass: Pass) -> Vec<(Rank, Rank)> {
        self.ranks()
            .filter_map(|rank| match self.role(rank, pass) {
                Ok(Role::Initiator { partner }) => Some((rank, partner)),
                _ => None,
            })
            .collect()
    }

    fn check(&self, rank: Rank) -> Result<()> {
        if self.contains(rank) {
            Ok(())
        } else {
            Err(CoreError::RankOutOfRange {
                rank: rank.index(),
                size: self.size,
            })
        }
    }
}
