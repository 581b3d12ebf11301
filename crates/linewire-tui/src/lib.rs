//! Terminal UI for linewire
//!
//! A thin shell over [`linewire_app::Driver`] that provides terminal-specific
//! I/O. All loop logic lives in the generic [`linewire_app::TerminalLoop`].
//!
//! This crate only handles key decoding, layout and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use linewire_app::{App, Driver, KeyInput, TerminalLoop};
pub use terminal::{TerminalDriver, TerminalError};
