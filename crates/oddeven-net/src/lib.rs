//! # Oddeven Net
//!
//! Message passing for the odd-even transposition sort.
//!
//! ## Overview
//!
//! Each process owns one value and a [`Transport`] linking it to its chain
//! neighbors and to the observer. The [`Process`] context runs the phase
//! scheduler; the [`collective`] functions move values in and out of the
//! chain before and after the sort.
//!
//! ## Key Properties
//!
//! - **No shared memory**: values move only inside messages
//! - **Barrier-free**: program order plus blocking receive is the only sync
//! - **Deadlock-free**: disjoint pairs, lower rank always sends first
//! - **Two messages per active pair per pass**: one each direction
//!
//! ## Message Flow
//!
//! ```text
//! Initiator (lo)                       Resolver (hi)
//!   |-------- Exchange(v_lo) --------->|  compare v_lo with v_hi
//!   |<------- Exchange(min) -----------|  keep max
//! ```
//!
//! Around the sort, at the observer:
//!
//! ```text
//! Observer                              Rank r
//!   |-------- Scatter(v_r) ----------->|
//!   |            ... phases ...         |
//!   |<------- Elapsed(secs) -----------|
//!   |<------- Gather(v_r) -------------|
//! ```

pub mod collective;
pub mod error;
pub mod messages;
pub mod protocol;
pub mod tcp;
pub mod transport;

pub use collective::{gather, reduce_max, scatter};
pub use error::{NetError, Result};
pub use messages::{limits, Message, MessageKind};
pub use protocol::{ExchangeRecord, Process, ProcessReport};
pub use tcp::{TcpConfig, TcpTransport};
pub use transport::{linked_ranks, memory::MemoryNetwork, memory::MemoryTransport, Transport};
