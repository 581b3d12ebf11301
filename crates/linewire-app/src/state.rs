//! Observable application state.
//!
//! The view model the frontend renders from: received lines and the
//! connection status shown in the output frame.

use std::net::SocketAddr;

/// Connection state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for the network loop to report.
    Connecting,
    /// Session established.
    Connected {
        /// Remote address.
        peer: SocketAddr,
    },
    /// Session over; the network loop has exited.
    Closed,
    /// Connect attempt failed; the network loop never started.
    Failed {
        /// Error description.
        reason: String,
    },
}

impl ConnectionState {
    /// Whether a network loop is still around to consume outbound messages.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected { .. })
    }
}

/// Append-only history of received lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scrollback {
    lines: Vec<String>,
}

impl Scrollback {
    /// Create an empty scrollback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a received line.
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// All lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines received.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
