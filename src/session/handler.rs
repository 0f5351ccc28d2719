//! Connection Session
//!
//! Each connected client is driven by one session task that owns the
//! connection's byte stream. The task loops: decode one command from the
//! accumulation buffer, dispatch it, encode the reply, write it back.
//!
//! ## Buffer management
//!
//! TCP is a stream, so a single read may deliver a partial command or
//! several pipelined commands at once. Inbound bytes accumulate in a
//! `BytesMut`; the decoder reports how much of the buffer each frame
//! consumed, and [`FrameError::Incomplete`] means "wait for more bytes".
//!
//! ## Error tiers
//!
//! A malformed frame never closes the connection: the session writes the
//! decoder's message as an error reply, drops the buffered bytes, and
//! keeps serving. Command-level failures come back from the dispatcher as
//! ordinary error replies. Only transport faults end the task, and a
//! client closing its end cleanly is a normal return, not a fault.

use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

use crate::commands::CommandTable;
use crate::protocol::{decode_command, FrameError, Reply};

/// Maximum size for the read buffer (64 KB)
const MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Counters shared by every session.
#[derive(Debug, Default)]
pub struct SessionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Faults that terminate a session.
///
/// A client disconnecting cleanly is not represented here; the session
/// loop returns `Ok(())` for that.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream ended in the middle of a frame
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// Buffer size limit exceeded
    #[error("buffer size limit exceeded")]
    BufferFull,
}

/// Drives one client connection to completion.
pub struct Session {
    /// The TCP stream for this connection
    stream: BufWriter<TcpStream>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// The command dispatch table (shared across sessions)
    commands: Arc<CommandTable>,

    /// Session statistics (shared)
    stats: Arc<SessionStats>,
}

impl Session {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        commands: Arc<CommandTable>,
        stats: Arc<SessionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            commands,
            stats,
        }
    }

    /// Runs the session until the client disconnects or a fault occurs.
    pub async fn run(mut self) -> Result<(), SessionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected"),
            Err(SessionError::Io(e)) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Session ended with error"),
        }

        self.stats.connection_closed();
        result
    }

    /// The decode-dispatch-reply loop.
    async fn main_loop(&mut self) -> Result<(), SessionError> {
        loop {
            self.drain_buffer().await?;

            if !self.read_more_data().await? {
                // Clean end of stream
                return Ok(());
            }
        }
    }

    /// Serves every complete frame currently in the buffer.
    async fn drain_buffer(&mut self) -> Result<(), SessionError> {
        loop {
            match decode_command(&self.buffer) {
                Ok((args, consumed)) => {
                    let _ = self.buffer.split_to(consumed);
                    trace!(
                        client = %self.addr,
                        consumed = consumed,
                        remaining = self.buffer.len(),
                        "Decoded command"
                    );

                    let reply = self.commands.execute(&args);
                    self.stats.command_processed();
                    self.send_reply(&reply).await?;
                }
                Err(FrameError::Incomplete) => return Ok(()),
                Err(e) => {
                    // Malformed frame: answer with an error and drop the
                    // buffered bytes, but keep the connection open.
                    warn!(client = %self.addr, error = %e, "Protocol error");
                    self.buffer.clear();
                    self.send_reply(&Reply::error(format!("ERR {}", e))).await?;
                    return Ok(());
                }
            }
        }
    }

    /// Reads more data from the socket into the buffer.
    ///
    /// Returns `Ok(false)` when the client closed its end cleanly.
    async fn read_more_data(&mut self) -> Result<bool, SessionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            warn!(
                client = %self.addr,
                size = self.buffer.len(),
                "Buffer size limit exceeded"
            );
            return Err(SessionError::BufferFull);
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            return if self.buffer.is_empty() {
                Ok(false)
            } else {
                // Partial frame left behind
                Err(SessionError::UnexpectedEof)
            };
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(true)
    }

    /// Encodes and writes one reply.
    async fn send_reply(&mut self, reply: &Reply) -> Result<(), SessionError> {
        let bytes = reply.encode();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(client = %self.addr, bytes = bytes.len(), "Sent reply");
        Ok(())
    }
}

/// Creates a [`Session`] for an accepted connection and runs it.
///
/// Faults are logged here; they never propagate to the accept loop or
/// touch other connections.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    commands: Arc<CommandTable>,
    stats: Arc<SessionStats>,
) {
    let session = Session::new(stream, addr, commands, stats);
    if let Err(e) = session.run().await {
        match e {
            SessionError::Io(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Session ended with error");
            }
        }
    }
}
