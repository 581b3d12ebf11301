//! Messages carried by the hand-off queues.
//!
//! [`OutboundMessage`] flows from the terminal loop to the network loop,
//! [`InboundMessage`] flows back. Both directions carry a `Quit` sentinel so
//! either side can unwind the other cooperatively.

use std::net::SocketAddr;

/// Text typed by the user to disconnect. Matched case-insensitively, never
/// transmitted on the wire.
pub const QUIT_SENTINEL: &str = ";quit";

/// UI to network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// A line the user submitted, without its terminator.
    UserLine(String),
    /// Stop the network loop. Never written to the socket.
    Quit,
}

impl OutboundMessage {
    /// Interpret a submitted input buffer.
    ///
    /// The exact text `;quit`, in any letter case, becomes [`Self::Quit`].
    /// Everything else, surrounding whitespace included, is sent verbatim.
    pub fn from_input(text: String) -> Self {
        if text.eq_ignore_ascii_case(QUIT_SENTINEL) { Self::Quit } else { Self::UserLine(text) }
    }
}

/// Network to UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Connection established.
    Connected {
        /// Address of the remote end.
        peer: SocketAddr,
    },
    /// Connect attempt failed. The network loop never started; no `Quit`
    /// follows.
    ConnectFailed {
        /// Human readable cause.
        reason: String,
    },
    /// One decoded line received from the server.
    ServerLine(String),
    /// The session is over and the network loop has released the socket.
    Quit,
}
