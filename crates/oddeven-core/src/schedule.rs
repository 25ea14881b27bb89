//! Phase schedule: how many phases run and in what order the passes come.
//!
//! A phase is one odd pass followed by one even pass. The schedule is fixed
//! before the run starts and is identical on every process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::topology::Pass;

/// Policy for the number of phases, `half_steps_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseCount {
    /// `floor(N / 2)`. One pass short of `N` for odd `N`.
    Floor,
    /// `ceil(N / 2)`. At least `N` passes for every `N`.
    Ceil,
    /// A fixed number of phases regardless of `N`.
    Exact(usize),
}

impl PhaseCount {
    /// Number of phases for `size` processes.
    pub fn phases(self, size: usize) -> usize {
        match self {
            PhaseCount::Floor => size / 2,
            PhaseCount::Ceil => size.div_ceil(2),
            PhaseCount::Exact(k) => k,
        }
    }
}

impl Default for PhaseCount {
    fn default() -> Self {
        PhaseCount::Ceil
    }
}

impl fmt::Display for PhaseCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseCount::Floor => f.write_str("floor"),
            PhaseCount::Ceil => f.write_str("ceil"),
            PhaseCount::Exact(k) => write!(f, "{}", k),
        }
    }
}

impl FromStr for PhaseCount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(PhaseCount::Floor),
            "ceil" => Ok(PhaseCount::Ceil),
            other => other
                .parse::<usize>()
                .map(PhaseCount::Exact)
                .map_err(|_| CoreError::InvalidPhaseCount(s.to_string())),
        }
    }
}

/// One pass of the schedule. Phases are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub phase: usize,
    pub pass: Pass,
}

/// The full pass sequence for `size` processes under `phase_count`.
pub fn steps(phase_count: PhaseCount, size: usize) -> impl Iterator<Item = Step> {
    (1..=phase_count.phases(size))
        .flat_map(|phase| Pass::SEQUENCE.into_iter().map(move |pass| Step { phase, pass }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_counts() {
        assert_eq!(PhaseCount::Floor.phases(1), 0);
        assert_eq!(PhaseCount::Ceil.phases(1), 1);
        assert_eq!(PhaseCount::Floor.phases(4), 2);
        assert_eq!(PhaseCount::Ceil.phases(4), 2);
        assert_eq!(PhaseCount::Floor.phases(5), 2);
        assert_eq!(PhaseCount::Ceil.phases(5), 3);
        assert_eq!(PhaseCount::Exact(7).phases(2), 7);
    }

    #[test]
    fn test_parse() {
        assert_eq!("floor".parse::<PhaseCount>().unwrap(), PhaseCount::Floor);
        assert_eq!("CEIL".parse::<PhaseCount>().unwrap(), PhaseCount::Ceil);
        assert_eq!("3".parse::<PhaseCount>().unwrap(), PhaseCount::Exact(3));
        assert!("round".parse::<PhaseCount>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for pc in [PhaseCount::Floor, PhaseCount::Ceil, PhaseCount::Exact(12)] {
            assert_eq!(pc.to_string().parse::<PhaseCount>().unwrap(), pc);
        }
    }

    #[test]
    fn test_steps_alternate_odd_then_even() {
        let all: Vec<Step> = steps(PhaseCount::Ceil, 3).collect();
        assert_eq!(
            all,
            vec![
                Step { phase: 1, pass: Pass::Odd },
                Step { phase: 1, pass: Pass::Even },
                Step { phase: 2, pass: Pass::Odd },
                Step { phase: 2, pass: Pass::Even },
            ]
        );
    }

    #[test]
    fn test_no_steps_for_zero_phases() {
        assert_eq!(steps(PhaseCount::Floor, 1).count(), 0);
    }
}
