//! The compare step of compare-exchange.
//!
//! Only the resolver compares. It receives the initiator's value, decides, and
//! replies with the value the initiator must hold next.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Outcome of resolving one active pair at the higher rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Value sent back to the lower rank: `min(incoming, own)`.
    pub reply: Value,
    /// Value the higher rank keeps: `max(incoming, own)`.
    pub keep: Value,
    /// Whether the two values changed ranks.
    pub swapped: bool,
}

/// Resolve a pair given the lower rank's value and the higher rank's own value.
///
/// Equal values are never swapped.
pub fn resolve(incoming: Value, own: Value) -> Resolution {
    if incoming > own {
        Resolution {
            reply: own,
            keep: incoming,
            swapped: true,
        }
    } else {
        Resolution {
            reply: incoming,
            keep: own,
            swapped: false,
        }
    }
}
