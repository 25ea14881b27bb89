//! Proptest generators and seeded random inputs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use oddeven_core::{PhaseCount, Value};

/// Values small enough that duplicates are common.
pub fn narrow_value() -> impl Strategy<Value = Value> {
    -8 as Value..=8
}

/// Any value, including the extremes.
pub fn wide_value() -> impl Strategy<Value = Value> {
    any::<Value>()
}

/// A non-empty input of up to `max_len` values.
pub fn values(max_len: usize) -> impl Strategy<Value = Vec<Value>> {
    let len = 1..=max_len.max(1);
    prop_oneof![
        prop::collection::vec(narrow_value(), len.clone()),
        prop::collection::vec(wide_value(), len),
    ]
}

/// A phase count policy. `Exact` stays small so runs stay fast.
pub fn phase_count() -> impl Strategy<Value = PhaseCount> {
    prop_oneof![
        Just(PhaseCount::Ceil),
        Just(PhaseCount::Floor),
        (0usize..=6).prop_map(PhaseCount::Exact),
    ]
}

/// Parameters for one sort run.
#[derive(Debug, Clone)]
pub struct SortParams {
    pub values: Vec<Value>,
    pub phase_count: PhaseCount,
}

impl Arbitrary for SortParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (values(12), phase_count())
            .prop_map(|(values, phase_count)| SortParams {
                values,
                phase_count,
            })
            .boxed()
    }
}

/// `count` values in `0..=max` from a fixed seed.
pub fn seeded_values(seed: u64, count: usize, max: Value) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..=max)).collect()
}
