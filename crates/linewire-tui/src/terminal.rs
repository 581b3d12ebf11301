//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use linewire_app::{App, Driver, KeyInput, Pane};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use thiserror::Error;

use crate::ui::{self, Layout, LayoutError, ResolvedLayout};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal too small for the layout.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Terminal event stream ended.
    #[error("terminal event stream closed")]
    EventsClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns raw mode and the alternate screen for its whole lifetime; both are
/// restored on drop, so an error anywhere in the loop still leaves a usable
/// shell behind.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    layout: Layout,
    resolved: ResolvedLayout,
}

impl TerminalDriver {
    /// Take over the terminal and resolve `layout` against its size.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched to raw mode or is
    /// too small for the layout.
    pub fn new(layout: Layout) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let resolved = layout.resolve(Self::area(&terminal)?)?;

        Ok(Self { terminal, event_stream: EventStream::new(), layout, resolved })
    }

    fn area(terminal: &Terminal<CrosstermBackend<Stdout>>) -> Result<Rect, TerminalError> {
        let size = terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    fn draw(&mut self, app: &App) -> Result<(), TerminalError> {
        let resolved = &self.resolved;
        self.terminal.draw(|frame| ui::render(frame, app, resolved))?;
        Ok(())
    }
}

/// Convert a crossterm key event to `KeyInput`.
pub fn convert_key(event: KeyEvent) -> KeyInput {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        // Raw mode reports Ctrl-\ as Ctrl-4
        KeyCode::Char('4') if ctrl => KeyInput::Ctrl('\\'),
        KeyCode::Char(c) if ctrl => KeyInput::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(_) if alt => KeyInput::Unknown,
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Esc => KeyInput::Esc,
        KeyCode::Tab => KeyInput::Tab,
        KeyCode::BackTab => KeyInput::BackTab,
        KeyCode::Delete => KeyInput::Delete,
        KeyCode::Insert => KeyInput::Insert,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        KeyCode::PageUp => KeyInput::PageUp,
        KeyCode::PageDown => KeyInput::PageDown,
        KeyCode::F(n) => KeyInput::Function(n),
        _ => KeyInput::Unknown,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind != KeyEventKind::Release => {
                        Ok(Some(convert_key(key_event)))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(KeyInput::Resize(cols, rows))),
                    Some(Ok(_)) => Ok(None),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Err(TerminalError::EventsClosed),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => Ok(None),
        }
    }

    fn render(&mut self, app: &App, pane: Pane) -> Result<(), Self::Error> {
        // ratatui redraws whole frames and only flushes the cells that changed
        tracing::trace!("Render {:?}", pane);
        self.draw(app)
    }

    fn redraw(&mut self, app: &App) -> Result<(), Self::Error> {
        let area = Self::area(&self.terminal)?;
        self.resolved = self.layout.resolve(area)?;
        tracing::debug!("Layout resolved for {}x{}", area.width, area.height);

        self.terminal.autoresize()?;
        self.terminal.clear()?;
        self.draw(app)
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
