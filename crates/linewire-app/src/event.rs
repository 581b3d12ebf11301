//! Application input events.
//!
//! Events originate from two sources: the keyboard (through the driver) and
//! the network loop (through the inbound queue).

use linewire_client::InboundMessage;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input, including resize.
    Key(KeyInput),

    /// Message from the network loop.
    Inbound(InboundMessage),
}
