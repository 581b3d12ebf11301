//! Driver trait for abstracting terminal I/O.
//!
//! The [`Driver`] trait decouples the terminal loop from a specific terminal
//! library. The production frontend implements it with crossterm and
//! ratatui; tests implement it with a script of keys.

use std::{future::Future, time::Duration};

use crate::App;

/// A pane that can be redrawn on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// The line being typed.
    Input,
    /// Scrollback and connection state.
    Output,
}

/// Abstracts key input and rendering for the terminal loop.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type. Any error ends
///   the terminal loop.
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait at most `timeout` for the next key.
    ///
    /// Returns `None` when the wait expires without input.
    fn poll_key(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<crate::KeyInput>, Self::Error>>;

    /// Redraw one pane from the current application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App, pane: Pane) -> Result<(), Self::Error>;

    /// Re-derive window geometry and redraw everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal is too small for the layout or
    /// rendering fails.
    fn redraw(&mut self, app: &App) -> Result<(), Self::Error>;
}
