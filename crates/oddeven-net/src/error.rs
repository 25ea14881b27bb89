//! Error types for the net module.

use thiserror::Error;

use oddeven_core::{CoreError, Rank};

use crate::messages::MessageKind;

/// Errors that can occur while communicating.
///
/// Every variant is fatal to the run: the protocol has no way to reconstruct
/// a value that failed to arrive.
#[derive(Debug, Error)]
pub enum NetError {
    /// The peer went away (task ended, socket closed).
    #[error("peer {peer} disconnected")]
    Disconnected { peer: Rank },

    /// No link exists between the two ranks.
    #[error("rank {from} has no link to rank {peer}")]
    NotLinked { from: Rank, peer: Rank },

    /// A message arrived that the protocol did not expect at this point.
    #[error("unexpected message from {peer}: expected {expected}, got {got}")]
    UnexpectedMessage {
        peer: Rank,
        expected: MessageKind,
        got: MessageKind,
    },

    /// Frame encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Frame exceeds the size limit.
    #[error("frame of {len} bytes exceeds limit of {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// Connection setup failed.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// Collective operation misused.
    #[error("collective error: {0}")]
    Collective(String),

    /// Socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Topology or schedule error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for net operations.
pub type Result<T> = std::result::Result<T, NetError>;
