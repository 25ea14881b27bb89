//! Sequential reference network.
//!
//! Applies the same schedule and the same resolution rule the distributed
//! protocol uses, but over a slice in one thread. Each pass is recorded so a
//! distributed run can be compared against it pass by pass.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::exchange::resolve;
use crate::schedule::{steps, PhaseCount};
use crate::topology::{Pass, Topology};
use crate::types::{Rank, Value};

/// State of the whole chain after one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassTrace {
    pub phase: usize,
    pub pass: Pass,
    /// Pairs `(lo, hi)` whose values were exchanged in this pass.
    pub swapped: Vec<(Rank, Rank)>,
    /// Values in rank order after the pass.
    pub state: Vec<Value>,
}

/// Full record of a reference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub initial: Vec<Value>,
    pub phase_count: PhaseCount,
    pub passes: Vec<PassTrace>,
}

impl Trace {
    /// Values in rank order at the end of the run.
    pub fn final_state(&self) -> &[Value] {
        self.passes
            .last()
            .map(|p| p.state.as_slice())
            .unwrap_or(&self.initial)
    }

    /// Total number of swaps across all passes.
    pub fn swap_count(&self) -> usize {
        self.passes.iter().map(|p| p.swapped.len()).sum()
    }

    /// States at the end of each phase (after its even pass).
    pub fn phase_states(&self) -> Vec<&[Value]> {
        self.passes
            .iter()
            .filter(|p| p.pass == Pass::Even)
            .map(|p| p.state.as_slice())
            .collect()
    }
}

/// Run the network over `values`, one value per rank.
pub fn sort(values: &[Value], phase_count: PhaseCount) -> Result<Trace> {
    let topology = Topology::new(values.len())?;
    let mut state = values.to_vec();
    let mut passes = Vec::new();

    for step in steps(phase_count, topology.size()) {
        let mut swapped = Vec::new();
        for (lo, hi) in topology.active_pairs(step.pass) {
            let r = resolve(state[lo.index()], state[hi.index()]);
            state[lo.index()] = r.reply;
            state[hi.index()] = r.keep;
            if r.swapped {
                swapped.push((lo, hi));
            }
        }
        passes.push(PassTrace {
            phase: step.phase,
            pass: step.pass,
            swapped,
            state: state.clone(),
        });
    }

    Ok(Trace {
        initial: values.to_vec(),
        phase_count,
        passes,
    })
}

/// Whether `values` is non-decreasing.
pub fn is_sorted(values: &[Value]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use proptest::prelude::*;

    /// Heap's algorithm, iterative.
    fn permutations(n: usize) -> Vec<Vec<Value>> {
        let mut items: Vec<Value> = (0..n as Value).collect();
        let mut out = vec![items.clone()];
        let mut c = vec![0usize; n];
        let mut i = 0;
        while i < n {
            if c[i] < i {
                if i % 2 == 0 {
                    items.swap(0, i);
                } else {
                    items.swap(c[i], i);
                }
                out.push(items.clone());
                c[i] += 1;
                i = 0;
            } else {
                c[i] = 0;
                i += 1;
            }
        }
        out
    }

    fn unsorted_count(n: usize, pc: PhaseCount) -> usize {
        permutations(n)
            .iter()
            .filter(|p| !is_sorted(sort(p, pc).unwrap().final_state()))
            .count()
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(sort(&[], PhaseCount::Ceil), Err(CoreError::EmptyTopology));
    }

    #[test]
    fn test_single_value() {
        let trace = sort(&[42], PhaseCount::Floor).unwrap();
        assert!(trace.passes.is_empty());
        assert_eq!(trace.final_state(), &[42]);
    }

    #[test]
    fn test_reverse_four() {
        let trace = sort(&[4, 3, 2, 1], PhaseCount::Floor).unwrap();
        assert_eq!(
            trace.phase_states(),
            vec![&[2, 4, 1, 3][..], &[1, 2, 3, 4][..]]
        );
        assert_eq!(trace.swap_count(), 6);
    }

    #[test]
    fn test_floor_misses_odd_reverse() {
        let trace = sort(&[3, 2, 1], PhaseCount::Floor).unwrap();
        assert_eq!(trace.final_state(), &[1, 3, 2]);

        let trace = sort(&[3, 2, 1], PhaseCount::Ceil).unwrap();
        assert_eq!(trace.final_state(), &[1, 2, 3]);
    }

    #[test]
    fn test_permutation_helper() {
        assert_eq!(permutations(4).len(), 24);
        let mut all = permutations(3);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_ceil_sorts_every_permutation() {
        for n in 1..=8 {
            assert_eq!(unsorted_count(n, PhaseCount::Ceil), 0, "n = {}", n);
        }
    }

    #[test]
    fn test_floor_sorts_every_permutation_of_even_size() {
        for n in [2, 4, 6, 8] {
            assert_eq!(unsorted_count(n, PhaseCount::Floor), 0, "n = {}", n);
        }
    }

    #[test]
    fn test_floor_fails_for_odd_size() {
        assert_eq!(unsorted_count(1, PhaseCount::Floor), 0);
        assert_eq!(unsorted_count(3, PhaseCount::Floor), 2);
        assert_eq!(unsorted_count(5, PhaseCount::Floor), 32);
        assert_eq!(unsorted_count(7, PhaseCount::Floor), 992);
    }

    proptest! {
        #[test]
        fn test_conserves_multiset(values in prop::collection::vec(any::<i64>(), 1..40)) {
            let trace = sort(&values, PhaseCount::Floor).unwrap();
            let mut expected = values.clone();
            expected.sort();
            let mut got = trace.final_state().to_vec();
            got.sort();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn test_ceil_sorts(values in prop::collection::vec(any::<i64>(), 1..40)) {
            let trace = sort(&values, PhaseCount::Ceil).unwrap();
            let mut expected = values.clone();
            expected.sort();
            prop_assert_eq!(trace.final_state(), &expected[..]);
        }

        #[test]
        fn test_swapped_pairs_end_ordered(values in prop::collection::vec(-50i64..50, 1..20)) {
            let trace = sort(&values, PhaseCount::Ceil).unwrap();
            let topology = Topology::new(values.len()).unwrap();
            for pass in &trace.passes {
                for (lo, hi) in topology.active_pairs(pass.pass) {
                    prop_assert!(pass.state[lo.index()] <= pass.state[hi.index()]);
                }
            }
        }
    }
}
