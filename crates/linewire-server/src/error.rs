//! Server error types.

use std::fmt;

/// Errors that can occur in the server.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration error (unparsable bind address, zero buffer size).
    ///
    /// Fatal: prevents startup. Fix the arguments and restart.
    Config(String),

    /// Socket error while binding, listening or accepting.
    ///
    /// Bind failures are fatal; accept failures are logged and the loop
    /// keeps going.
    Transport(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
