//! # Oddeven Core
//!
//! Pure primitives for the odd-even transposition sort network.
//!
//! This crate contains no I/O, no storage, no networking. It answers the
//! questions every process asks locally: who am I paired with in this pass,
//! do I send first or receive first, and how many phases do we run.
//!
//! ## Key Types
//!
//! - [`Rank`] - A process's fixed position in the linear chain
//! - [`Topology`] - Role and partner assignment derived solely from the process count
//! - [`Pass`] / [`Role`] - Pairing pattern and a rank's obligation within it
//! - [`PhaseCount`] - How many odd+even phases the scheduler runs
//!
//! ## Reference Network
//!
//! [`network::sort`] applies the exact same schedule sequentially to a slice and
//! records a per-pass [`Trace`]. Distributed runs are checked against it.

pub mod error;
pub mod exchange;
pub mod network;
pub mod schedule;
pub mod topology;
pub mod types;

pub use error::{CoreError, Result};
pub use exchange::{resolve, Resolution};
pub use network::{is_sorted, PassTrace, Trace};
pub use schedule::{steps, PhaseCount, Step};
pub use topology::{Pass, Role, Topology};
pub use types::{Rank, Value};
