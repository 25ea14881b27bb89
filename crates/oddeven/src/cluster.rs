//! The Cluster: launches N logical processes and runs one sort.
//!
//! Each process runs as its own tokio task with its own transport and its
//! own value. Tasks share nothing; the only interaction is through the
//! transport. The observer loads nothing itself: it receives the full input
//! from the caller, scatters it, and gathers the result.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use oddeven_core::{PhaseCount, Rank, Topology, Value};
use oddeven_net::{
    gather, reduce_max, scatter, MemoryNetwork, NetError, Process, ProcessReport, TcpConfig,
    TcpTransport, Transport,
};
use oddeven_source::{SourceExt, ValueSource};

use crate::error::{ConfigError, OddEvenError, Result};

/// Which transport backs the processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Bounded in-memory channels.
    Memory,
    /// Loopback TCP sockets. Rank `r` listens on `base_port + r`, or on an
    /// OS-assigned port when `base_port` is 0.
    Tcp { base_port: u16 },
}

/// Configuration for a sort run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Number of phases to run.
    pub phase_count: PhaseCount,
    /// Rank that scatters input and gathers output.
    pub observer: Rank,
    /// Per-link buffer for the memory transport.
    pub channel_capacity: usize,
    /// Transport backing the processes.
    pub transport: TransportKind,
    /// Connection setup for the TCP transport.
    pub tcp: TcpConfig,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            phase_count: PhaseCount::default(),
            observer: Rank::ZERO,
            channel_capacity: MemoryNetwork::DEFAULT_CAPACITY,
            transport: TransportKind::Memory,
            tcp: TcpConfig::default(),
        }
    }
}

/// What the observer reports after a run.
#[derive(Debug, Clone, Serialize)]
pub struct SortOutcome {
    /// Final values in rank order.
    pub sorted: Vec<Value>,
    /// Maximum sorting time across all processes, in seconds.
    pub max_elapsed: f64,
    /// Per-process reports, in rank order.
    pub reports: Vec<ProcessReport>,
}

impl SortOutcome {
    /// Total number of swapped pairs.
    pub fn swap_count(&self) -> usize {
        // Both members record a swap; count it once at the initiator.
        self.reports
            .iter()
            .flat_map(|r| &r.exchanges)
            .filter(|e| e.swapped && matches!(e.role, oddeven_core::Role::Initiator { .. }))
            .count()
    }
}

/// Per-task result.
struct RankOutcome {
    report: ProcessReport,
    max_elapsed: Option<f64>,
    sorted: Option<Vec<Value>>,
}

/// Runs sorts over a set of cooperating processes.
pub struct Cluster {
    config: SortConfig,
}

impl Cluster {
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Sort `values` with one process per value.
    pub async fn run(&self, values: &[Value]) -> Result<SortOutcome> {
        self.run_with_size(values.len(), values).await
    }

    /// Sort `values` with exactly `size` processes, as given by the launcher.
    ///
    /// Fails before any process starts if the counts disagree.
    pub async fn run_with_size(&self, size: usize, values: &[Value]) -> Result<SortOutcome> {
        self.validate(size, values)?;

        tracing::info!(
            size,
            phases = self.config.phase_count.phases(size),
            phase_count = %self.config.phase_count,
            transport = ?self.config.transport,
            "starting sort"
        );

        let values: Arc<[Value]> = Arc::from(values);
        let handles = match self.config.transport {
            TransportKind::Memory => self.spawn_memory(size, &values)?,
            TransportKind::Tcp { base_port } => self.spawn_tcp(size, base_port, &values).await?,
        };

        let outcome = self.collect(handles).await?;
        tracing::info!(
            size,
            max_elapsed = outcome.max_elapsed,
            swaps = outcome.swap_count(),
            "sort finished"
        );
        Ok(outcome)
    }

    /// Load values from `source` and sort them.
    ///
    /// `size` is the launcher's process count; `None` means one process per
    /// loaded value.
    pub async fn run_source<S: ValueSource + ?Sized>(
        &self,
        source: &S,
        size: Option<usize>,
    ) -> Result<SortOutcome> {
        let values = match size {
            Some(size) => source.load_exact(size).await?,
            None => source.load_nonempty().await?,
        };
        self.run_with_size(values.len(), &values).await
    }

    fn validate(&self, size: usize, values: &[Value]) -> Result<()> {
        if values.is_empty() {
            return Err(ConfigError::EmptyInput.into());
        }
        if values.len() != size {
            return Err(ConfigError::CountMismatch {
                expected: size,
                got: values.len(),
            }
            .into());
        }
        let topology = Topology::new(size)?;
        if !topology.contains(self.config.observer) {
            return Err(ConfigError::ObserverOutOfRange {
                observer: self.config.observer,
                size,
            }
            .into());
        }
        Ok(())
    }

    fn spawn_memory(
        &self,
        size: usize,
        values: &Arc<[Value]>,
    ) -> Result<Vec<JoinHandle<Result<RankOutcome>>>> {
        let transports = MemoryNetwork::new(size, self.config.observer)?
            .with_capacity(self.config.channel_capacity)
            .connect();

        Ok(transports
            .into_iter()
            .map(|transport| {
                let observer = self.config.observer;
                let phase_count = self.config.phase_count;
                let input = (transport.rank() == observer).then(|| Arc::clone(values));
                tokio::spawn(run_rank(transport, observer, phase_count, input))
            })
            .collect())
    }

    async fn spawn_tcp(
        &self,
        size: usize,
        base_port: u16,
        values: &Arc<[Value]>,
    ) -> Result<Vec<JoinHandle<Result<RankOutcome>>>> {
        let ports = (0..size)
            .map(|i| {
                if base_port == 0 {
                    return Some(0);
                }
                u16::try_from(i).ok().and_then(|i| base_port.checked_add(i))
            })
            .collect::<Option<Vec<u16>>>()
            .ok_or(ConfigError::PortRange { base_port, size })?;

        let mut listeners = Vec::with_capacity(size);
        let mut addrs = Vec::with_capacity(size);
        for port in ports {
            let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
                .await
                .map_err(NetError::from)?;
            addrs.push(listener.local_addr().map_err(NetError::from)?);
            listeners.push(listener);
        }

        let addrs: Arc<[SocketAddr]> = Arc::from(addrs);
        Ok(listeners
            .into_iter()
            .enumerate()
            .map(|(i, listener)| {
                let rank = Rank(i);
                let observer = self.config.observer;
                let phase_count = self.config.phase_count;
                let tcp = self.config.tcp.clone();
                let addrs = Arc::clone(&addrs);
                let input = (rank == observer).then(|| Arc::clone(values));
                tokio::spawn(async move {
                    let transport =
                        TcpTransport::establish_with_listener(rank, listener, &addrs, observer, &tcp)
                            .await?;
                    run_rank(transport, observer, phase_count, input).await
                })
            })
            .collect())
    }

    async fn collect(&self, handles: Vec<JoinHandle<Result<RankOutcome>>>) -> Result<SortOutcome> {
        let mut reports = Vec::with_capacity(handles.len());
        let mut sorted = None;
        let mut max_elapsed = None;
        let mut errors = Vec::new();

        for handle in handles {
            match handle.await {
                Ok(Ok(outcome)) => {
                    if outcome.sorted.is_some() {
                        sorted = outcome.sorted;
                        max_elapsed = outcome.max_elapsed;
                    }
                    reports.push(outcome.report);
                }
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(OddEvenError::TaskFailed(e.to_string())),
            }
        }

        if !errors.is_empty() {
            for e in &errors {
                tracing::debug!(error = %e, "process failed");
            }
            // Report the root cause, not the disconnects it caused downstream.
            let pos = errors.iter().position(|e| !e.is_peer_disconnect()).unwrap_or(0);
            return Err(errors.swap_remove(pos));
        }

        match (sorted, max_elapsed) {
            (Some(sorted), Some(max_elapsed)) => Ok(SortOutcome {
                sorted,
                max_elapsed,
                reports,
            }),
            _ => Err(OddEvenError::TaskFailed(
                "observer produced no result".into(),
            )),
        }
    }
}

/// Everything one process does: receive its value, sort, report.
async fn run_rank<T: Transport>(
    transport: T,
    observer: Rank,
    phase_count: PhaseCount,
    input: Option<Arc<[Value]>>,
) -> Result<RankOutcome> {
    let initial = scatter(&transport, observer, input.as_deref()).await?;

    let started = Instant::now();
    let mut process = Process::new(transport, initial)?;
    let report = process.run(phase_count).await?;
    let elapsed = started.elapsed().as_secs_f64();

    let transport = process.into_transport();
    let max_elapsed = reduce_max(&transport, observer, elapsed).await?;
    let sorted = gather(&transport, observer, report.value).await?;

    Ok(RankOutcome {
        report,
        max_elapsed,
        sorted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use oddeven_net::{Message, MessageKind, MemoryTransport};
    use oddeven_source::MemorySource;

    /// Memory transport that turns its first exchange into a gather.
    struct MisroutingTransport {
        inner: MemoryTransport,
        armed: AtomicBool,
    }

    #[async_trait]
    impl Transport for MisroutingTransport {
        fn rank(&self) -> Rank {
            self.inner.rank()
        }

        fn size(&self) -> usize {
            self.inner.size()
        }

        async fn send(&self, peer: Rank, message: Message) -> oddeven_net::Result<()> {
            let message = match message {
                Message::Exchange(v) if self.armed.swap(false, Ordering::SeqCst) => {
                    Message::Gather(v)
                }
                other => other,
            };
            self.inner.send(peer, message).await
        }

        async fn recv(&self, peer: Rank) -> oddeven_net::Result<Message> {
            self.inner.recv(peer).await
        }
    }

    #[tokio::test]
    async fn test_default_config() {
        let config = SortConfig::default();
        assert_eq!(config.phase_count, PhaseCount::Ceil);
        assert_eq!(config.observer, Rank(0));
        assert_eq!(config.transport, TransportKind::Memory);
    }

    #[tokio::test]
    async fn test_sorts_reverse_input() {
        let cluster = Cluster::new(SortConfig::default());
        let outcome = cluster.run(&[5, 4, 3, 2, 1]).await.unwrap();
        assert_eq!(outcome.sorted, vec![1, 2, 3, 4, 5]);
        assert_eq!(outcome.reports.len(), 5);
        assert!(outcome.max_elapsed >= 0.0);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_configuration_error() {
        let cluster = Cluster::new(SortConfig::default());
        let err = cluster.run_with_size(4, &[1, 2, 3]).await.unwrap_err();
        assert!(matches!(
            err,
            OddEvenError::Configuration(ConfigError::CountMismatch { expected: 4, got: 3 })
        ));
    }

    #[tokio::test]
    async fn test_empty_input_is_configuration_error() {
        let cluster = Cluster::new(SortConfig::default());
        let err = cluster.run(&[]).await.unwrap_err();
        assert!(matches!(err, OddEvenError::Configuration(ConfigError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_observer_out_of_range() {
        let cluster = Cluster::new(SortConfig {
            observer: Rank(3),
            ..SortConfig::default()
        });
        let err = cluster.run(&[3, 2, 1]).await.unwrap_err();
        assert!(matches!(
            err,
            OddEvenError::Configuration(ConfigError::ObserverOutOfRange { size: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_observer_not_at_rank_zero() {
        let cluster = Cluster::new(SortConfig {
            observer: Rank(2),
            ..SortConfig::default()
        });
        let outcome = cluster.run(&[6, 1, 5, 2, 4, 3]).await.unwrap();
        assert_eq!(outcome.sorted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_rendezvous_capacity() {
        let cluster = Cluster::new(SortConfig {
            channel_capacity: 1,
            ..SortConfig::default()
        });
        let outcome = cluster.run(&[9, 8, 7, 6, 5, 4, 3, 2, 1]).await.unwrap();
        assert_eq!(outcome.sorted, (1..=9).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_run_source() {
        let cluster = Cluster::new(SortConfig::default());
        let source = MemorySource::new(vec![2, 1]);
        let outcome = cluster.run_source(&source, None).await.unwrap();
        assert_eq!(outcome.sorted, vec![1, 2]);

        let err = cluster.run_source(&source, Some(3)).await.unwrap_err();
        assert!(matches!(
            err,
            OddEvenError::Configuration(ConfigError::CountMismatch { expected: 3, got: 2 })
        ));

        let err = cluster
            .run_source(&MemorySource::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OddEvenError::Configuration(ConfigError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_swap_count_matches_reference() {
        let cluster = Cluster::new(SortConfig::default());
        let outcome = cluster.run(&[4, 3, 2, 1]).await.unwrap();
        assert_eq!(outcome.swap_count(), 6);
    }

    #[tokio::test]
    async fn test_tcp_transport() {
        let cluster = Cluster::new(SortConfig {
            transport: TransportKind::Tcp { base_port: 0 },
            ..SortConfig::default()
        });
        let outcome = cluster.run(&[3, 1, 4, 1, 5, 9, 2]).await.unwrap();
        assert_eq!(outcome.sorted, vec![1, 1, 2, 3, 4, 5, 9]);
    }

    #[tokio::test]
    async fn test_port_range_overflow() {
        let cluster = Cluster::new(SortConfig {
            transport: TransportKind::Tcp { base_port: u16::MAX },
            ..SortConfig::default()
        });
        let err = cluster.run(&[2, 1]).await.unwrap_err();
        assert!(matches!(
            err,
            OddEvenError::Configuration(ConfigError::PortRange { size: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_root_cause_wins_over_disconnects() {
        let cluster = Cluster::new(SortConfig::default());
        let values: Arc<[Value]> = Arc::from(vec![4, 3, 2, 1]);
        let observer = Rank::ZERO;

        let handles = MemoryNetwork::new(4, observer)
            .unwrap()
            .connect()
            .into_iter()
            .map(|inner| {
                // Rank 2 answers rank 1's first exchange with the wrong kind.
                let armed = AtomicBool::new(inner.rank() == Rank(2));
                let input = (inner.rank() == observer).then(|| Arc::clone(&values));
                let transport = MisroutingTransport { inner, armed };
                tokio::spawn(run_rank(transport, observer, PhaseCount::Ceil, input))
            })
            .collect();

        let err = tokio::time::timeout(Duration::from_secs(10), cluster.collect(handles))
            .await
            .expect("failed run must not hang")
            .unwrap_err();
        assert!(!err.is_peer_disconnect());
        assert!(matches!(
            err,
            OddEvenError::Communication(NetError::UnexpectedMessage {
                peer: Rank(2),
                expected: MessageKind::Exchange,
                got: MessageKind::Gather,
            })
        ));
    }
}
