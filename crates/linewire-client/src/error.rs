//! Network loop errors.

use std::io;

use thiserror::Error;

/// Errors that end a network session.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Resolution, timeout or refusal before the session started.
    #[error("failed to connect to {target}: {reason}")]
    Connect {
        /// `host:port` that was dialled.
        target: String,
        /// Underlying cause.
        reason: String,
    },

    /// Socket failure after the session started.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
