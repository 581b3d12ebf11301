//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the client completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the terminal loop to
//! execute.
//!
//! # Responsibilities
//!
//! - Owns the input buffer and edits it per key category.
//! - Appends received lines to the scrollback.
//! - Tracks connection state and terminal dimensions for rendering.

use std::mem;

use linewire_client::{InboundMessage, OutboundMessage};

use crate::{AppAction, AppEvent, ConnectionState, KeyCategory, KeyInput, KeyMap, Scrollback};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Server address shown in the output frame.
    server_addr: String,
    /// Key classification table.
    keymap: KeyMap,
    /// Line being typed.
    input: String,
    /// Lines received from the server.
    scrollback: Scrollback,
    /// Connection state.
    state: ConnectionState,
}

impl App {
    /// Create a new App for the given server address.
    pub fn new(server_addr: String) -> Self {
        Self::with_keymap(server_addr, KeyMap::standard())
    }

    /// Create a new App with custom key bindings.
    pub fn with_keymap(server_addr: String, keymap: KeyMap) -> Self {
        Self {
            server_addr,
            keymap,
            input: String::new(),
            scrollback: Scrollback::new(),
            state: ConnectionState::Connecting,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Inbound(message) => self.handle_inbound(message),
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match self.keymap.classify(key) {
            KeyCategory::Printable => match key {
                KeyInput::Char(c) => {
                    self.input.push(c);
                    vec![AppAction::RenderInput]
                },
                other => self.mark_undefined(other),
            },
            KeyCategory::Backspace => {
                if self.input.pop().is_some() { vec![AppAction::RenderInput] } else { vec![] }
            },
            KeyCategory::Enter => self.submit(),
            KeyCategory::Escape => {
                if self.input.is_empty() {
                    return vec![];
                }
                self.input.clear();
                vec![AppAction::RenderInput]
            },
            KeyCategory::Kill => vec![AppAction::Quit],
            // The driver reads the new geometry itself
            KeyCategory::Resize => vec![AppAction::Redraw],
            KeyCategory::Discard => vec![],
            KeyCategory::Undefined => self.mark_undefined(key),
        }
    }

    /// Show an unrecognised key in the input line so it can be bound later.
    fn mark_undefined(&mut self, key: KeyInput) -> Vec<AppAction> {
        tracing::debug!("Undefined key: {:?}", key);
        self.input.push_str(&format!("(?{key})"));
        vec![AppAction::RenderInput]
    }

    /// Handle Enter: hand the buffer to the network loop.
    fn submit(&mut self) -> Vec<AppAction> {
        let text = mem::take(&mut self.input);

        if text.is_empty() {
            return vec![];
        }

        match OutboundMessage::from_input(text) {
            // Nobody left to answer with a Quit of their own
            OutboundMessage::Quit if !self.state.is_live() => vec![AppAction::Quit],
            message => vec![AppAction::Send(message), AppAction::RenderInput],
        }
    }

    fn handle_inbound(&mut self, message: InboundMessage) -> Vec<AppAction> {
        match message {
            InboundMessage::ServerLine(line) => {
                self.scrollback.push(line);
                vec![AppAction::RenderOutput]
            },
            InboundMessage::Connected { peer } => {
                self.state = ConnectionState::Connected { peer };
                vec![AppAction::RenderOutput]
            },
            InboundMessage::ConnectFailed { reason } => {
                self.state = ConnectionState::Failed { reason };
                vec![AppAction::RenderOutput]
            },
            InboundMessage::Quit => {
                self.state = ConnectionState::Closed;
                vec![AppAction::Quit]
            },
        }
    }

    /// Current text in the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Received lines.
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.state
    }

    /// Server address (host:port).
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }
}
