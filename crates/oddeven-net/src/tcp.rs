//! TCP transport.
//!
//! One socket per linked pair of ranks. The higher rank of each link dials
//! and introduces itself with `Hello`; the lower rank accepts. Every rank binds
//! its listener before dialing anyone, so a dial only ever waits for the peer
//! to bind, never for the peer to accept.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use oddeven_core::Rank;

use crate::error::{NetError, Result};
use crate::messages::{decode, encode_frame, limits, Message};
use crate::transport::{linked_ranks, Transport};

/// Configuration for connection setup.
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// How many times to dial a peer before giving up.
    pub connect_attempts: usize,
    /// Delay between dial attempts.
    pub retry_delay: Duration,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            connect_attempts: 50,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// TCP transport implementation.
pub struct TcpTransport {
    rank: Rank,
    size: usize,
    writers: HashMap<Rank, Mutex<OwnedWriteHalf>>,
    readers: HashMap<Rank, Mutex<OwnedReadHalf>>,
}

impl TcpTransport {
    /// Bind `addrs[rank]` and connect to every linked rank.
    ///
    /// `addrs` holds one listen address per rank, in rank order.
    pub async fn establish(
        rank: Rank,
        addrs: &[SocketAddr],
        observer: Rank,
        config: &TcpConfig,
    ) -> Result<Self> {
        let addr = addrs.get(rank.index()).ok_or_else(|| {
            NetError::Handshake(format!("no address for rank {} in {} addrs", rank, addrs.len()))
        })?;
        let listener = TcpListener::bind(addr).await?;
        Self::establish_with_listener(rank, listener, addrs, observer, config).await
    }

    /// Like [`TcpTransport::establish`], with a listener the caller already bound.
    pub async fn establish_with_listener(
        rank: Rank,
        listener: TcpListener,
        addrs: &[SocketAddr],
        observer: Rank,
        config: &TcpConfig,
    ) -> Result<Self> {
        let size = addrs.len();
        let links = linked_ranks(rank, size, observer);
        let (lower, higher): (Vec<Rank>, Vec<Rank>) = links.into_iter().partition(|r| *r < rank);

        let mut writers = HashMap::new();
        let mut readers = HashMap::new();

        for peer in higher {
            let stream = dial(addrs[peer.index()], config).await?;
            stream.set_nodelay(true)?;
            let (read, mut write) = stream.into_split();
            write_frame(&mut write, &Message::Hello { rank }).await?;
            tracing::debug!(rank = %rank, peer = %peer, "dialed peer");
            writers.insert(peer, Mutex::new(write));
            readers.insert(peer, Mutex::new(read));
        }

        let mut pending = lower;
        while !pending.is_empty() {
            let (stream, remote) = listener.accept().await?;
            stream.set_nodelay(true)?;
            let (mut read, write) = stream.into_split();
            let peer = match read_frame(&mut read, None).await? {
                Message::Hello { rank: peer } => peer,
                other => {
                    return Err(NetError::Handshake(format!(
                        "expected Hello from {}, got {}",
                        remote,
                        other.kind()
                    )))
                }
            };
            let Some(pos) = pending.iter().position(|r| *r == peer) else {
                return Err(NetError::Handshake(format!(
                    "rank {} does not expect a connection from rank {}",
                    rank, peer
                )));
            };
            pending.swap_remove(pos);
            tracing::debug!(rank = %rank, peer = %peer, "accepted peer");
            writers.insert(peer, Mutex::new(write));
            readers.insert(peer, Mutex::new(read));
        }

        Ok(Self {
            rank,
            size,
            writers,
            readers,
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    async fn send(&self, peer: Rank, message: Message) -> Result<()> {
        let writer = self.writers.get(&peer).ok_or(NetError::NotLinked {
            from: self.rank,
            peer,
        })?;
        let mut write = writer.lock().await;
        write_frame(&mut write, &message).await.map_err(|e| disconnect(e, peer))
    }

    async fn recv(&self, peer: Rank) -> Result<Message> {
        let reader = self.readers.get(&peer).ok_or(NetError::NotLinked {
            from: self.rank,
            peer,
        })?;
        let mut read = reader.lock().await;
        read_frame(&mut read, Some(peer)).await
    }
}

async fn dial(addr: SocketAddr, config: &TcpConfig) -> Result<TcpStream> {
    let attempts = config.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) if attempt < attempts => {
                tracing::warn!(%addr, attempt, error = %e, "connect failed, retrying");
                attempt += 1;
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn write_frame(write: &mut OwnedWriteHalf, message: &Message) -> Result<()> {
    let frame = encode_frame(message)?;
    write.write_all(&frame).await?;
    Ok(())
}

/// Read one frame. A clean close maps to `Disconnected` when the peer is known.
async fn read_frame(read: &mut OwnedReadHalf, peer: Option<Rank>) -> Result<Message> {
    let len = match read.read_u32().await {
        Ok(len) => len as usize,
        Err(e) => return Err(eof_to_disconnect(e, peer)),
    };
    if len > limits::MAX_FRAME_LEN {
        return Err(NetError::FrameTooLarge {
            len,
            max: limits::MAX_FRAME_LEN,
        });
    }
    let mut body = vec![0u8; len];
    read.read_exact(&mut body)
        .await
        .map_err(|e| eof_to_disconnect(e, peer))?;
    decode(&body)
}

fn eof_to_disconnect(e: std::io::Error, peer: Option<Rank>) -> NetError {
    match peer {
        Some(peer) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            NetError::Disconnected { peer }
        }
        _ => NetError::Io(e),
    }
}

fn disconnect(e: NetError, peer: Rank) -> NetError {
    match e {
        NetError::Io(io)
            if matches!(
                io.kind(),
                std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset
            ) =>
        {
            NetError::Disconnected { peer }
        }
        other => other,
    }
}
