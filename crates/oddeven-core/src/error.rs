//! Error types for the Oddeven Core.

use thiserror::Error;

/// Errors raised while deriving topology or schedule parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("topology must contain at least one process")]
    EmptyTopology,

    #[error("rank {rank} is out of range for {size} processes")]
    RankOutOfRange { rank: usize, size: usize },

    #[error("invalid phase count: {0}")]
    InvalidPhaseCount(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
