//! # Oddeven Testkit
//!
//! Testing utilities for the odd-even sort.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Regression traces**: Known inputs with the expected state after every phase
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helpers for running clusters and bare process sets
//!
//! ## Regression Traces
//!
//! ```rust
//! use oddeven_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches) in verify_all_vectors() {
//!     assert!(matches, "{}", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use oddeven_testkit::generators::SortParams;
//!
//! proptest! {
//!     #[test]
//!     fn network_is_deterministic(params: SortParams) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{permutations, reversed, run_processes, ClusterFixture};
pub use generators::{seeded_values, SortParams};
pub use vectors::{all_vectors, verify_all_vectors, TraceVector};
