//! Application layer for linewire
//!
//! Pure state machine and generic terminal loop for the UI half of the
//! client. Nothing here touches a real terminal: the [`Driver`] trait is the
//! seam where a frontend plugs in key polling and rendering, so the same loop
//! runs under a scripted driver in tests.
//!
//! # Components
//!
//! - [`App`]: input buffer, scrollback and connection state
//! - [`KeyMap`]: classifies a [`KeyInput`] into a [`KeyCategory`]
//! - [`Driver`]: trait for platform-specific key input and rendering
//! - [`TerminalLoop`]: ties App, Driver and the hand-off queues together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod keymap;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::{Driver, Pane};
pub use event::AppEvent;
pub use input::KeyInput;
pub use keymap::{KeyCategory, KeyMap};
pub use runtime::{DEFAULT_TICK, ExitReason, TerminalLoop};
pub use state::{ConnectionState, Scrollback};
