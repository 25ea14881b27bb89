//! Regression traces for the sorting network.
//!
//! Each vector pins the chain state at the end of every phase, so a change
//! to pairing, pass order, or the resolution rule shows up as a mismatch
//! here before it shows up as an unsorted result.

use serde::{Deserialize, Serialize};

use oddeven_core::network::sort;
use oddeven_core::{PhaseCount, Value};

/// A regression trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceVector {
    /// Human-readable name for the vector.
    pub name: String,
    /// Values in rank order before the first phase.
    pub input: Vec<Value>,
    pub phase_count: PhaseCount,
    /// Chain state after each phase's even pass.
    pub phase_states: Vec<Vec<Value>>,
    /// Total number of swapped pairs.
    pub swaps: usize,
}

impl TraceVector {
    fn new(
        name: &str,
        input: &[Value],
        phase_count: PhaseCount,
        phase_states: &[&[Value]],
        swaps: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_vec(),
            phase_count,
            phase_states: phase_states.iter().map(|s| s.to_vec()).collect(),
            swaps,
        }
    }

    /// Final state, or the input when no phase runs.
    pub fn expected_final(&self) -> &[Value] {
        self.phase_states.last().map(Vec::as_slice).unwrap_or(&self.input)
    }
}

/// Get all regression traces.
pub fn all_vectors() -> Vec<TraceVector> {
    vec![
        TraceVector::new(
            "reverse four",
            &[4, 3, 2, 1],
            PhaseCount::Ceil,
            &[&[2, 4, 1, 3], &[1, 2, 3, 4]],
            6,
        ),
        TraceVector::new(
            "reverse three, floor phases",
            &[3, 2, 1],
            PhaseCount::Floor,
            &[&[1, 3, 2]],
            2,
        ),
        TraceVector::new(
            "reverse three, ceil phases",
            &[3, 2, 1],
            PhaseCount::Ceil,
            &[&[1, 3, 2], &[1, 2, 3]],
            3,
        ),
        TraceVector::new(
            "five mixed",
            &[5, 1, 4, 2, 3],
            PhaseCount::Ceil,
            &[&[1, 5, 2, 4, 3], &[1, 2, 3, 5, 4], &[1, 2, 3, 4, 5]],
            6,
        ),
        TraceVector::new("single", &[7], PhaseCount::Ceil, &[&[7]], 0),
        TraceVector::new("single, floor phases", &[7], PhaseCount::Floor, &[], 0),
        TraceVector::new(
            "ties stay put",
            &[2, 2, 1, 1],
            PhaseCount::Ceil,
            &[&[1, 2, 1, 2], &[1, 1, 2, 2]],
            4,
        ),
    ]
}

/// Check every vector against the reference network.
///
/// Returns `(name, matches)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .into_iter()
        .map(|v| {
            let matches = match sort(&v.input, v.phase_count) {
                Ok(trace) => {
                    let states: Vec<Vec<Value>> =
                        trace.phase_states().iter().map(|s| s.to_vec()).collect();
                    states == v.phase_states && trace.swap_count() == v.swaps
                }
                Err(_) => false,
            };
            (v.name, matches)
        })
        .collect()
}
