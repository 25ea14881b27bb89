//! Collective operations around the sort: scatter, gather, reduce-max.
//!
//! All three go through the observer's star links. Every process calls each
//! collective exactly once; only the observer supplies or receives the
//! full sequence.

use oddeven_core::{Rank, Value};

use crate::error::{NetError, Result};
use crate::messages::{Message, MessageKind};
use crate::transport::Transport;

/// Distribute one value to every rank, in rank order of `values`.
///
/// The observer passes `Some(values)` with exactly `size` entries; everyone
/// else passes `None`. Returns this rank's value.
pub async fn scatter<T: Transport + ?Sized>(
    transport: &T,
    observer: Rank,
    values: Option<&[Value]>,
) -> Result<Value> {
    let rank = transport.rank();
    if rank != observer {
        return match transport.recv(observer).await? {
            Message::Scatter(value) => Ok(value),
            other => Err(unexpected(observer, MessageKind::Scatter, &other)),
        };
    }

    let values = values.ok_or_else(|| {
        NetError::Collective("observer must supply values to scatter".into())
    })?;
    if values.len() != transport.size() {
        return Err(NetError::Collective(format!(
            "scatter of {} values to {} processes",
            values.len(),
            transport.size()
        )));
    }
    for (i, value) in values.iter().enumerate() {
        let peer = Rank(i);
        if peer != observer {
            transport.send(peer, Message::Scatter(*value)).await?;
        }
    }
    Ok(values[observer.index()])
}

/// Collect every rank's value at the observer, in rank order.
///
/// Returns `Some` at the observer and `None` everywhere else.
pub async fn gather<T: Transport + ?Sized>(
    transport: &T,
    observer: Rank,
    value: Value,
) -> Result<Option<Vec<Value>>> {
    let rank = transport.rank();
    if rank != observer {
        transport.send(observer, Message::Gather(value)).await?;
        return Ok(None);
    }

    let mut values = Vec::with_capacity(transport.size());
    for i in 0..transport.size() {
        let peer = Rank(i);
        if peer == observer {
            values.push(value);
            continue;
        }
        match transport.recv(peer).await? {
            Message::Gather(v) => values.push(v),
            other => return Err(unexpected(peer, MessageKind::Gather, &other)),
        }
    }
    Ok(Some(values))
}

/// Maximum elapsed time across all ranks, at the observer.
pub async fn reduce_max<T: Transport + ?Sized>(
    transport: &T,
    observer: Rank,
    elapsed: f64,
) -> Result<Option<f64>> {
    let rank = transport.rank();
    if rank != observer {
        transport.send(observer, Message::Elapsed(elapsed)).await?;
        return Ok(None);
    }

    let mut max = elapsed;
    for i in 0..transport.size() {
        let peer = Rank(i);
        if peer == observer {
            continue;
        }
        match transport.recv(peer).await? {
            Message::Elapsed(secs) => max = max.max(secs),
            other => return Err(unexpected(peer, MessageKind::Elapsed, &other)),
        }
    }
    Ok(Some(max))
}

fn unexpected(peer: Rank, expected: MessageKind, got: &Message) -> NetError {
    NetError::UnexpectedMessage {
        peer,
        expected,
        got: got.kind(),
    }
}
