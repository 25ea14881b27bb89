//! Transport abstraction for the sort protocol.
//!
//! A transport connects one process to the ranks it needs to talk to: its
//! chain neighbors for compare-exchange, and the observer for the
//! collectives. Both operations block the calling process until they
//! complete; there is no timeout.

use async_trait::async_trait;

use oddeven_core::Rank;

use crate::error::Result;
use crate::messages::Message;

/// Point-to-point, per-peer FIFO message passing.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// This process's rank.
    fn rank(&self) -> Rank;

    /// Total number of processes.
    fn size(&self) -> usize;

    /// Send a message to `peer`.
    ///
    /// Returns once the message is handed to the transport; it may be buffered.
    async fn send(&self, peer: Rank, message: Message) -> Result<()>;

    /// Receive the next message from `peer`.
    ///
    /// Blocks until a message from that specific peer is available.
    async fn recv(&self, peer: Rank) -> Result<Message>;
}

/// Ranks that `rank` holds a link to: chain neighbors plus the observer star.
///
/// The observer links to every other rank. Returned ascending, without `rank`.
pub fn linked_ranks(rank: Rank, size: usize, observer: Rank) -> Vec<Rank> {
    let mut links: Vec<Rank> = if rank == observer {
        (0..size).map(Rank).collect()
    } else {
        let mut l = vec![observer];
        l.extend(rank.prev());
        l.push(rank.next());
        l
    };
    links.retain(|r| *r != rank && r.index() < size);
    links.sort();
    links.dedup();
    links
}

/// An in-memory transport for tests and single-host runs.
///
/// Uses one bounded channel per ordered pair of linked ranks.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::{mpsc, Mutex};

    use oddeven_core::Topology;

    use crate::error::NetError;

    /// Builder for a fully wired set of in-memory transports.
    #[derive(Debug, Clone)]
    pub struct MemoryNetwork {
        topology: Topology,
        observer: Rank,
        capacity: usize,
    }

    impl MemoryNetwork {
        /// Channel capacity used by [`MemoryNetwork::new`].
        pub const DEFAULT_CAPACITY: usize = 16;

        /// Create a network for `size` processes with the observer at `observer`.
        pub fn new(size: usize, observer: Rank) -> Result<Self> {
            let topology = Topology::new(size)?;
            if !topology.contains(observer) {
                return Err(oddeven_core::CoreError::RankOutOfRange {
                    rank: observer.index(),
                    size,
                }
                .into());
            }
            Ok(Self {
                topology,
                observer,
                capacity: Self::DEFAULT_CAPACITY,
            })
        }

        /// Set the per-link channel capacity (minimum 1).
        pub fn with_capacity(mut self, capacity: usize) -> Self {
            self.capacity = capacity.max(1);
            self
        }

        /// Wire up every link and return one transport per rank, in rank order.
        pub fn connect(&self) -> Vec<MemoryTransport> {
            let size = self.topology.size();
            let mut outbound: Vec<HashMap<Rank, mpsc::Sender<Message>>> =
                (0..size).map(|_| HashMap::new()).collect();
            let mut inbound: Vec<HashMap<Rank, Mutex<mpsc::Receiver<Message>>>> =
                (0..size).map(|_| HashMap::new()).collect();

            for from in self.topology.ranks() {
                for to in linked_ranks(from, size, self.observer) {
                    let (tx, rx) = mpsc::channel(self.capacity);
                    outbound[from.index()].insert(to, tx);
                    inbound[to.index()].insert(from, Mutex::new(rx));
                }
            }

            outbound
                .into_iter()
                .zip(inbound)
                .enumerate()
                .map(|(i, (outbound, inbound))| MemoryTransport {
                    rank: Rank(i),
                    size,
                    outbound,
                    inbound,
                })
                .collect()
        }
    }

    /// In-memory transport implementation.
    pub struct MemoryTransport {
        rank: Rank,
        size: usize,
        outbound: HashMap<Rank, mpsc::Sender<Message>>,
        inbound: HashMap<Rank, Mutex<mpsc::Receiver<Message>>>,
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        fn rank(&self) -> Rank {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        async fn send(&self, peer: Rank, message: Message) -> Result<()> {
            let sender = self.outbound.get(&peer).ok_or(NetError::NotLinked {
                from: self.rank,
                peer,
            })?;
            sender
                .send(message)
                .await
                .map_err(|_| NetError::Disconnected { peer })
        }

        async fn recv(&self, peer: Rank) -> Result<Message> {
            let receiver = self.inbound.get(&peer).ok_or(NetError::NotLinked {
                from: self.rank,
                peer,
            })?;
            let mut rx = receiver.lock().await;
            rx.recv().await.ok_or(NetError::Disconnected { peer })
        }
    }
}
