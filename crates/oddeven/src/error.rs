//! Error types for a sort run.

use oddeven_core::{CoreError, Rank};
use oddeven_net::NetError;
use oddeven_source::SourceError;
use thiserror::Error;

/// Errors that can occur while setting up or running a sort.
///
/// A run either completes every phase on every process or fails as a whole;
/// there is no partial result.
#[derive(Debug, Error)]
pub enum OddEvenError {
    /// The run was set up inconsistently. Raised before any process starts.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The initial values could not be read or parsed.
    #[error("input error: {0}")]
    Source(SourceError),

    /// A send or receive did not complete.
    #[error("communication failure: {0}")]
    Communication(#[from] NetError),

    /// Topology or schedule error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A process task panicked or was cancelled.
    #[error("process task failed: {0}")]
    TaskFailed(String),
}

/// Inconsistent run setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no input values")]
    EmptyInput,

    #[error("{got} input values for {expected} processes")]
    CountMismatch { expected: usize, got: usize },

    #[error("observer rank {observer} is outside {size} processes")]
    ObserverOutOfRange { observer: Rank, size: usize },

    #[error("{size} processes do not fit above base port {base_port}")]
    PortRange { base_port: u16, size: usize },
}

impl From<SourceError> for OddEvenError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Empty => ConfigError::EmptyInput.into(),
            SourceError::CountMismatch { expected, got } => {
                ConfigError::CountMismatch { expected, got }.into()
            }
            other => OddEvenError::Source(other),
        }
    }
}

impl OddEvenError {
    /// Whether this error is only a consequence of another process failing.
    pub fn is_peer_disconnect(&self) -> bool {
        matches!(
            self,
            OddEvenError::Communication(NetError::Disconnected { .. })
        )
    }
}

/// Result type for sort runs.
pub type Result<T> = std::result::Result<T, OddEvenError>;
