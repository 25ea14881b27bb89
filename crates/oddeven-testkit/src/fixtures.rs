//! Test fixtures and helpers.
//!
//! Common setup code for integration tests and benchmarks.

use oddeven::{Cluster, PhaseCount, SortConfig, SortOutcome, TransportKind};
use oddeven_core::{Rank, Value};
use oddeven_net::{MemoryNetwork, Process, ProcessReport};
use oddeven_source::MemorySource;

/// A cluster configuration under test.
pub struct ClusterFixture {
    pub config: SortConfig,
}

impl ClusterFixture {
    /// Memory transport, ceil phases, observer at rank 0.
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    pub fn with_phase_count(mut self, phase_count: PhaseCount) -> Self {
        self.config.phase_count = phase_count;
        self
    }

    pub fn with_observer(mut self, observer: Rank) -> Self {
        self.config.observer = observer;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Loopback TCP on OS-assigned ports.
    pub fn over_tcp(mut self) -> Self {
        self.config.transport = TransportKind::Tcp { base_port: 0 };
        self
    }

    /// Run the full scatter/sort/gather pipeline.
    pub async fn run(&self, values: &[Value]) -> oddeven::Result<SortOutcome> {
        let source = MemorySource::new(values.to_vec());
        Cluster::new(self.config.clone())
            .run_source(&source, None)
            .await
    }
}

impl Default for ClusterFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run only the phase scheduler, one task per value, with no collectives.
///
/// Panics if any process fails.
pub async fn run_processes(values: &[Value], phase_count: PhaseCount) -> Vec<ProcessReport> {
    let transports = MemoryNetwork::new(values.len(), Rank::ZERO)
        .expect("non-empty network")
        .connect();
    let handles: Vec<_> = transports
        .into_iter()
        .zip(values.iter().copied())
        .map(|(transport, value)| {
            tokio::spawn(async move {
                let mut process = Process::new(transport, value)?;
                process.run(phase_count).await
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.expect("task").expect("process"));
    }
    reports
}

/// All permutations of `1..=n`, by Heap's algorithm.
pub fn permutations(n: usize) -> Vec<Vec<Value>> {
    fn heap(k: usize, items: &mut Vec<Value>, out: &mut Vec<Vec<Value>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        for i in 0..k {
            heap(k - 1, items, out);
            if k % 2 == 0 {
                items.swap(i, k - 1);
            } else {
                items.swap(0, k - 1);
            }
        }
    }
    let mut items: Vec<Value> = (1..=n as Value).collect();
    let mut out = Vec::new();
    heap(n, &mut items, &mut out);
    out
}

/// `n, n-1, ..., 1`: the input needing the most swaps.
pub fn reversed(n: usize) -> Vec<Value> {
    (1..=n as Value).rev().collect()
}
