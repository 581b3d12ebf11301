//! Application side-effects.
//!
//! The [`AppAction`] enum represents instructions produced by the
//! [`crate::App`] state machine for the terminal loop to execute.

use linewire_client::OutboundMessage;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// The input buffer changed.
    RenderInput,

    /// The scrollback or connection state changed.
    RenderOutput,

    /// Geometry changed: resolve the layout again and redraw every pane.
    Redraw,

    /// Hand a message to the network loop.
    Send(OutboundMessage),

    /// Leave the terminal loop.
    Quit,
}
