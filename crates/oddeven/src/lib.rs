//! # Oddeven
//!
//! Distributed odd-even transposition sort. N processes, each holding one
//! integer, sit in a linear chain and sort the sequence by exchanging values
//! with their immediate neighbors only.
//!
//! ## Overview
//!
//! A run goes through four stages:
//!
//! - **Scatter**: the observer hands one input value to each rank
//! - **Sort**: every rank runs the same odd/even pass sequence
//! - **Reduce**: the observer learns the slowest rank's sorting time
//! - **Gather**: the observer collects the final values in rank order
//!
//! After the sort, rank i holds the i-th smallest input value.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use oddeven::{Cluster, SortConfig};
//!
//! async fn example() {
//!     let cluster = Cluster::new(SortConfig::default());
//!     let outcome = cluster.run(&[4, 3, 2, 1]).await.unwrap();
//!     assert_eq!(outcome.sorted, vec![1, 2, 3, 4]);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `oddeven::core` - Topology, schedule and the reference network
//! - `oddeven::source` - Loading initial values
//! - `oddeven::net` - Transports, the per-process protocol and collectives

pub mod cluster;
pub mod error;
pub mod output;

pub use oddeven_core as core;
pub use oddeven_net as net;
pub use oddeven_source as source;

pub use cluster::{Cluster, SortConfig, SortOutcome, TransportKind};
pub use error::{ConfigError, OddEvenError, Result};

pub use oddeven_core::{PhaseCount, Rank, Value};
pub use oddeven_source::{FileSource, InputFormat, MemorySource, ValueSource};
