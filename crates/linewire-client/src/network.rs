//! Socket-facing event loop.
//!
//! [`NetworkLoop`] owns the TCP connection for its whole life. It waits on
//! the runtime reactor for socket readiness, moves bytes with non-blocking
//! reads and writes, and exchanges messages with the terminal loop only
//! through the two hand-off queues.
//!
//! # Lifecycle
//!
//! 1. Connect within [`ClientConfig::connect_timeout`]. On failure the loop
//!    never starts; [`InboundMessage::ConnectFailed`] is pushed instead of
//!    `Quit`.
//! 2. Multiplex: read interest is always registered, write interest only
//!    while encoded bytes are waiting. When nothing is waiting, the same wait
//!    also wakes on the next outbound message.
//! 3. Terminate on peer close, [`OutboundMessage::Quit`], or an I/O error.
//!    The socket is shut down and dropped, then exactly one
//!    [`InboundMessage::Quit`] is pushed so the UI can unwind.

use std::io;

use bytes::{Buf, BytesMut};
use tokio::{
    io::{AsyncWriteExt, Interest},
    net::TcpStream,
};

use crate::{
    ClientConfig, InboundMessage, LineCodec, NetworkError, OutboundMessage,
    codec::decode_line,
    queue::{HandoffReceiver, HandoffSender},
};

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection.
    PeerClosed,
    /// The UI asked to disconnect, or dropped its end of the queue.
    QuitRequested,
}

/// Network half of the client.
pub struct NetworkLoop {
    config: ClientConfig,
    outbound: HandoffReceiver<OutboundMessage>,
    inbound: HandoffSender<InboundMessage>,
}

impl NetworkLoop {
    /// Create a loop that consumes `outbound` and produces into `inbound`.
    pub fn new(
        config: ClientConfig,
        outbound: HandoffReceiver<OutboundMessage>,
        inbound: HandoffSender<InboundMessage>,
    ) -> Self {
        Self { config, outbound, inbound }
    }

    /// Connect to `host:port` and run until the session ends.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::Connect`] if the connection could not be
    ///   established. No `Quit` is pushed in this case.
    /// - [`NetworkError::Io`] if the socket failed mid-session. `Quit` has
    ///   already been pushed when this is returned.
    pub async fn run(mut self, host: &str, port: u16) -> Result<SessionEnd, NetworkError> {
        let target = format!("{host}:{port}");

        let stream = match self.connect(host, port).await {
            Ok(stream) => stream,
            Err(reason) => {
                tracing::warn!("Connect to {} failed: {}", target, reason);
                self.inbound.push(InboundMessage::ConnectFailed { reason: reason.clone() });
                return Err(NetworkError::Connect { target, reason });
            },
        };

        match stream.peer_addr() {
            Ok(peer) => {
                tracing::info!("Connected to {}", peer);
                self.inbound.push(InboundMessage::Connected { peer });
            },
            Err(e) => tracing::warn!("Connected to {} but peer address is unavailable: {}", target, e),
        }

        let mut session = Session::new(stream, &self.config);
        let result = session.drive(&mut self.outbound, &self.inbound).await;
        session.close().await;

        match &result {
            Ok(end) => tracing::info!("Session with {} ended: {:?}", target, end),
            Err(e) => tracing::error!("Session with {} failed: {}", target, e),
        }

        self.inbound.push(InboundMessage::Quit);
        result
    }

    /// Resolve and connect, bounded by the configured timeout.
    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream, String> {
        let timeout = self.config.connect_timeout;
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("timed out after {timeout:?}")),
        }
    }
}

/// Per-connection state: the socket and its two byte buffers.
struct Session {
    stream: TcpStream,
    codec: LineCodec,
    read_chunk_size: usize,
    /// Received bytes not yet terminated by `\n`.
    pending: BytesMut,
    /// Encoded bytes not yet accepted by the socket.
    unsent: BytesMut,
}

impl Session {
    fn new(stream: TcpStream, config: &ClientConfig) -> Self {
        Self {
            stream,
            codec: LineCodec::new(config.max_line_bytes),
            read_chunk_size: config.read_chunk_size.max(1),
            pending: BytesMut::new(),
            unsent: BytesMut::new(),
        }
    }

    async fn drive(
        &mut self,
        outbound: &mut HandoffReceiver<OutboundMessage>,
        inbound: &HandoffSender<InboundMessage>,
    ) -> Result<SessionEnd, NetworkError> {
        loop {
            // One outbound message at a time: the next is only taken once
            // the previous one has been fully written.
            let idle = self.unsent.is_empty();
            let interest =
                if idle { Interest::READABLE } else { Interest::READABLE | Interest::WRITABLE };

            tokio::select! {
                ready = self.stream.ready(interest) => {
                    let ready = ready?;
                    if ready.is_writable() {
                        self.write()?;
                    }
                    if (ready.is_readable() || ready.is_read_closed())
                        && let Some(end) = self.read(inbound)?
                    {
                        return Ok(end);
                    }
                },
                message = outbound.pop(), if idle => match message {
                    Some(OutboundMessage::UserLine(line)) => {
                        tracing::debug!("Queueing {} byte line", line.len());
                        self.codec.encode(&line, &mut self.unsent);
                    },
                    Some(OutboundMessage::Quit) => return Ok(SessionEnd::QuitRequested),
                    None => {
                        tracing::debug!("Outbound queue closed");
                        return Ok(SessionEnd::QuitRequested);
                    },
                },
            }
        }
    }

    /// Push as much of `unsent` as the socket accepts without blocking.
    fn write(&mut self) -> Result<(), NetworkError> {
        while !self.unsent.is_empty() {
            match self.stream.try_write(&self.unsent) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                Ok(n) => self.unsent.advance(n),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Issue one read and forward every completed line.
    ///
    /// Returns the session end on peer close.
    fn read(
        &mut self,
        inbound: &HandoffSender<InboundMessage>,
    ) -> Result<Option<SessionEnd>, NetworkError> {
        self.pending.reserve(self.read_chunk_size);

        match self.stream.try_read_buf(&mut self.pending) {
            Ok(0) => {
                if !self.pending.is_empty() {
                    // The last line never got its terminator
                    inbound.push(InboundMessage::ServerLine(decode_line(&self.pending)));
                    self.pending.clear();
                }
                Ok(Some(SessionEnd::PeerClosed))
            },
            Ok(n) => {
                tracing::debug!("Read {} bytes", n);
                self.forward_lines(inbound);
                Ok(None)
            },
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn forward_lines(&mut self, inbound: &HandoffSender<InboundMessage>) {
        let decoded = self.codec.decode(&self.pending);
        let consumed = self.pending.len() - decoded.remainder.len();

        for line in decoded.lines {
            inbound.push(InboundMessage::ServerLine(line));
        }

        self.pending.advance(consumed);
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!("Socket shutdown: {}", e);
        }
    }
}
