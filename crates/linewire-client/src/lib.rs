//! Linewire client core
//!
//! The socket-facing half of the linewire terminal client. It owns the TCP
//! connection and talks to the UI exclusively through two hand-off queues, so
//! the terminal loop never blocks on the network and the network loop never
//! blocks on the user.
//!
//! # Components
//!
//! - [`LineCodec`]: reframes raw bytes into text lines, escaping bytes that
//!   are not valid text
//! - [`handoff`]: unbounded FIFO queues between the UI and network tasks
//! - [`NetworkLoop`]: connect, multiplex reads and writes, decode, shut down
//! - [`OutboundMessage`] / [`InboundMessage`]: what flows through the queues
//!
//! # Data flow
//!
//! ```text
//! keystrokes -> App -> outbound queue -> NetworkLoop -> socket
//! socket -> NetworkLoop -> LineCodec -> inbound queue -> App -> scrollback
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod config;
mod error;
mod message;
pub mod network;
pub mod queue;

pub use codec::{Decoded, LineCodec, escape_bytes};
pub use config::ClientConfig;
pub use error::NetworkError;
pub use message::{InboundMessage, OutboundMessage, QUIT_SENTINEL};
pub use network::{NetworkLoop, SessionEnd};
pub use queue::{HandoffReceiver, HandoffSender, PopError, handoff};
