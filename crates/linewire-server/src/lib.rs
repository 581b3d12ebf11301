//! Linewire echo server.
//!
//! A companion to the client: accepts any number of TCP connections and
//! writes every byte it reads straight back to the same connection. It knows
//! nothing about lines; reframing is entirely the client's job, which makes
//! it a useful way to exercise the client's partial-line handling.
//!
//! # Components
//!
//! - [`ServerConfig`]: bind address, listen backlog, read size
//! - [`EchoServer`]: listening socket plus the accept loop
//! - [`ServerError`]: startup and transport failures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;

use std::{future::Future, net::SocketAddr};

pub use config::ServerConfig;
pub use error::ServerError;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpSocket, TcpStream},
    task::JoinSet,
};

/// Concurrent echo server.
pub struct EchoServer {
    listener: TcpListener,
    read_buffer_size: usize,
}

impl EchoServer {
    /// Create and bind a new server.
    ///
    /// The socket has `SO_REUSEADDR` set so a restarted server can rebind
    /// while old connections sit in `TIME_WAIT`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for an unparsable address or a zero
    /// read size, [`ServerError::Transport`] if the socket cannot be bound.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ServerError::Config(format!("invalid bind address {:?}: {e}", config.bind_address))
        })?;
        if config.read_buffer_size == 0 {
            return Err(ServerError::Config("read buffer size must be non-zero".to_string()));
        }

        let socket = if addr.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(config.backlog)?;

        Ok(Self { listener, read_buffer_size: config.read_buffer_size })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and echo until the process is killed.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending()).await
    }

    /// Accept and echo until `shutdown` completes.
    ///
    /// Each connection runs on its own task. On shutdown the listener is
    /// closed and every open connection is aborted.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        tracing::info!("Server starting on {}", self.local_addr()?);

        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, closing {} connections", connections.len());
                    break;
                }

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::info!("New connection from {}", peer);
                        connections.spawn(echo(stream, peer, self.read_buffer_size));
                    },
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                    },
                },

                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        tracing::error!("Connection task failed: {}", e);
                    }
                }
            }
        }

        connections.shutdown().await;
        Ok(())
    }
}

/// Echo one connection until the peer closes it.
async fn echo(mut stream: TcpStream, peer: SocketAddr, read_buffer_size: usize) {
    let mut buf = vec![0u8; read_buffer_size];

    let result = async {
        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                return Ok::<_, std::io::Error>(());
            }

            tracing::debug!("Echo {} bytes to {}: {}", n, peer, String::from_utf8_lossy(&buf[..n]));
            stream.write_all(&buf[..n]).await?;
        }
    }
    .await;

    match result {
        Ok(()) => tracing::info!("Connection from {} closed", peer),
        Err(e) => tracing::warn!("Connection from {} failed: {}", peer, e),
    }
}
