//! Wire messages and frame codec.
//!
//! Every message travels between exactly two linked ranks. Ordering between
//! two ranks is FIFO in each direction, which is all the protocol relies on;
//! no message carries a sequence number or tag.
//!
//! Frame layout: `u32` big-endian body length, then the CBOR-encoded body.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

use oddeven_core::{Rank, Value};

use crate::error::{NetError, Result};

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Message size limits.
pub mod limits {
    /// Max encoded body size. Every message carries one scalar.
    pub const MAX_FRAME_LEN: usize = 256;
}

/// Messages exchanged between processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// TCP handshake: the dialing rank introduces itself.
    Hello { rank: Rank },
    /// Observer hands a process its initial value.
    Scatter(Value),
    /// One leg of a compare-exchange.
    Exchange(Value),
    /// A process reports its elapsed sorting time in seconds.
    Elapsed(f64),
    /// A process reports its final value.
    Gather(Value),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Hello { .. } => MessageKind::Hello,
            Message::Scatter(_) => MessageKind::Scatter,
            Message::Exchange(_) => MessageKind::Exchange,
            Message::Elapsed(_) => MessageKind::Elapsed,
            Message::Gather(_) => MessageKind::Gather,
        }
    }
}

/// Discriminant of [`Message`], for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Scatter,
    Exchange,
    Elapsed,
    Gather,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Hello => "Hello",
            MessageKind::Scatter => "Scatter",
            MessageKind::Exchange => "Exchange",
            MessageKind::Elapsed => "Elapsed",
            MessageKind::Gather => "Gather",
        };
        f.write_str(name)
    }
}

/// Encode a message body (no length prefix).
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    ciborium::into_writer(message, &mut body).map_err(|e| NetError::Codec(e.to_string()))?;
    if body.len() > limits::MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge {
            len: body.len(),
            max: limits::MAX_FRAME_LEN,
        });
    }
    Ok(body)
}

/// Decode a message body.
pub fn decode(body: &[u8]) -> Result<Message> {
    if body.len() > limits::MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge {
            len: body.len(),
            max: limits::MAX_FRAME_LEN,
        });
    }
    ciborium::from_reader(body).map_err(|e| NetError::Codec(e.to_string()))
}

/// Encode a message into a complete length-prefixed frame.
pub fn encode_frame(message: &Message) -> Result<Bytes> {
    let body = encode(message)?;
    let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.put_u32(body.len() as u32);
    frame.put_slice(&body);
    Ok(frame.freeze())
}
