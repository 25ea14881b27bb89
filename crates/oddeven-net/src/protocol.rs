//! Per-process protocol: compare-exchange and the phase scheduler.
//!
//! Each process runs the same pass sequence in program order and touches only
//! its own value. There is no barrier between passes or phases. A process
//! that races ahead into the next pass blocks on its first send/receive there
//! until its partner catches up, and active pairs within a pass are disjoint,
//! so no process can be waited on by two partners at once.

use serde::{Deserialize, Serialize};

use oddeven_core::{resolve, steps, PhaseCount, Rank, Role, Step, Topology, Value};

use crate::error::{NetError, Result};
use crate::messages::{Message, MessageKind};
use crate::transport::Transport;

/// What one process observed during one compare-exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// Phase and pass this exchange belongs to.
    pub step: Step,
    /// This process's role, including its partner.
    pub role: Role,
    /// Value this process sent to its partner.
    pub sent: Value,
    /// Value this process received from its partner.
    pub received: Value,
    /// Whether the pair's values changed ranks.
    pub swapped: bool,
}

/// Result of running the scheduler on one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub rank: Rank,
    pub value: Value,
    pub exchanges: Vec<ExchangeRecord>,
}

/// Per-process context: `{rank, size, value, transport}`.
pub struct Process<T: Transport> {
    rank: Rank,
    topology: Topology,
    value: Value,
    transport: T,
}

impl<T: Transport> Process<T> {
    /// Create the context for the rank `transport` belongs to.
    pub fn new(transport: T, value: Value) -> Result<Self> {
        let topology = Topology::new(transport.size())?;
        Ok(Self {
            rank: transport.rank(),
            topology,
            value,
            transport,
        })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run every phase of the schedule.
    pub async fn run(&mut self, phase_count: PhaseCount) -> Result<ProcessReport> {
        let mut exchanges = Vec::new();
        for step in steps(phase_count, self.topology.size()) {
            if let Some(record) = self.compare_exchange(step).await? {
                exchanges.push(record);
            }
        }
        tracing::debug!(
            rank = %self.rank,
            value = self.value,
            exchanges = exchanges.len(),
            "process finished all phases"
        );
        Ok(ProcessReport {
            rank: self.rank,
            value: self.value,
            exchanges,
        })
    }

    /// Take part in one pass. Returns `None` when this rank is idle.
    pub async fn compare_exchange(&mut self, step: Step) -> Result<Option<ExchangeRecord>> {
        let role = self.topology.role(self.rank, step.pass)?;
        let (sent, received, swapped) = match role {
            Role::Idle => return Ok(None),
            Role::Initiator { partner } => {
                let sent = self.value;
                self.transport.send(partner, Message::Exchange(sent)).await?;
                let received = self.recv_exchange(partner).await?;
                self.value = received;
                (sent, received, received != sent)
            }
            Role::Resolver { partner } => {
                let received = self.recv_exchange(partner).await?;
                let resolution = resolve(received, self.value);
                self.transport
                    .send(partner, Message::Exchange(resolution.reply))
                    .await?;
                self.value = resolution.keep;
                (resolution.reply, received, resolution.swapped)
            }
        };

        tracing::debug!(
            rank = %self.rank,
            phase = step.phase,
            pass = %step.pass,
            ?role,
            swapped,
            "compare-exchange"
        );

        Ok(Some(ExchangeRecord {
            step,
            role,
            sent,
            received,
            swapped,
        }))
    }

    async fn recv_exchange(&self, partner: Rank) -> Result<Value> {
        match self.transport.recv(partner).await? {
            Message::Exchange(value) => Ok(value),
            other => Err(NetError::UnexpectedMessage {
                peer: partner,
                expected: MessageKind::Exchange,
                got: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{MemoryNetwork, MemoryTransport};
    use oddeven_core::Pass;

    async fn run_all(values: Vec<Value>, phase_count: PhaseCount) -> Vec<ProcessReport> {
        let transports = MemoryNetwork::new(values.len(), Rank(0))
            .unwrap()
            .with_capacity(1)
            .connect();
        let handles: Vec<_> = transports
            .into_iter()
            .zip(values)
            .map(|(t, v)| {
                tokio::spawn(async move {
                    let mut process = Process::new(t, v).unwrap();
                    process.run(phase_count).await
                })
            })
            .collect();
        let mut reports = Vec::new();
        for h in handles {
            reports.push(h.await.unwrap().unwrap());
        }
        reports
    }

    fn finals(reports: &[ProcessReport]) -> Vec<Value> {
        reports.iter().map(|r| r.value).collect()
    }

    #[tokio::test]
    async fn test_pair_swaps_out_of_order() {
        let reports = run_all(vec![9, 2], PhaseCount::Ceil).await;
        assert_eq!(finals(&reports), vec![2, 9]);

        let lo = &reports[0].exchanges[0];
        assert_eq!(lo.role, Role::Initiator { partner: Rank(1) });
        assert_eq!((lo.sent, lo.received, lo.swapped), (9, 2, true));

        let hi = &reports[1].exchanges[0];
        assert_eq!(hi.role, Role::Resolver { partner: Rank(0) });
        assert_eq!((hi.sent, hi.received, hi.swapped), (2, 9, true));
    }

    #[tokio::test]
    async fn test_pair_in_order_unchanged() {
        let reports = run_all(vec![2, 9], PhaseCount::Ceil).await;
        assert_eq!(finals(&reports), vec![2, 9]);
        assert!(reports.iter().all(|r| r.exchanges.iter().all(|e| !e.swapped)));
    }

    #[tokio::test]
    async fn test_single_process_never_communicates() {
        let reports = run_all(vec![5], PhaseCount::Ceil).await;
        assert_eq!(finals(&reports), vec![5]);
        assert!(reports[0].exchanges.is_empty());
    }

    #[tokio::test]
    async fn test_reverse_four() {
        let reports = run_all(vec![4, 3, 2, 1], PhaseCount::Floor).await;
        assert_eq!(finals(&reports), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_five_process_boundary_ranks() {
        let reports = run_all(vec![5, 4, 3, 2, 1], PhaseCount::Ceil).await;
        assert_eq!(finals(&reports), vec![1, 2, 3, 4, 5]);

        // Three phases; rank 0 only ever works in even passes, rank 4 only in odd ones.
        assert_eq!(reports[0].exchanges.len(), 3);
        assert!(reports[0].exchanges.iter().all(|e| e.step.pass == Pass::Even));
        assert_eq!(reports[4].exchanges.len(), 3);
        assert!(reports[4].exchanges.iter().all(|e| e.step.pass == Pass::Odd));
    }

    #[tokio::test]
    async fn test_records_agree_across_pair() {
        let reports = run_all(vec![7, 1, 8, 2, 9, 3], PhaseCount::Ceil).await;
        for report in &reports {
            for record in &report.exchanges {
                let Role::Initiator { partner } = record.role else {
                    continue;
                };
                let other = reports[partner.index()]
                    .exchanges
                    .iter()
                    .find(|e| e.step == record.step)
                    .unwrap();
                assert_eq!(other.received, record.sent);
                assert_eq!(other.sent, record.received);
                assert_eq!(other.swapped, record.swapped);
            }
        }
    }

    #[tokio::test]
    async fn test_unexpected_message_is_error() {
        let mut transports = MemoryNetwork::new(2, Rank(0)).unwrap().connect();
        let t1: MemoryTransport = transports.pop().unwrap();
        let t0 = transports.pop().unwrap();

        t0.send(Rank(1), Message::Gather(3)).await.unwrap();
        let mut process = Process::new(t1, 1).unwrap();
        let step = Step { phase: 1, pass: Pass::Even };
        let err = process.compare_exchange(step).await.unwrap_err();
        assert!(matches!(
            err,
            NetError::UnexpectedMessage {
                expected: MessageKind::Exchange,
                got: MessageKind::Gather,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_partner_failure_is_fatal() {
        let mut transports = MemoryNetwork::new(2, Rank(0)).unwrap().connect();
        let t1 = transports.pop().unwrap();
        let t0 = transports.pop().unwrap();
        drop(t0);

        let mut process = Process::new(t1, 1).unwrap();
        let err = process.run(PhaseCount::Ceil).await.unwrap_err();
        assert!(matches!(err, NetError::Disconnected { peer: Rank(0) }));
    }
}
