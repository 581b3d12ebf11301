//! Terminal-agnostic keyboard input.

use std::fmt;

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing. Resize is delivered
/// in-band with keys, the way curses reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Character without modifiers other than shift.
    Char(char),
    /// Character chorded with Ctrl. Always lowercase.
    Ctrl(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Escape key.
    Esc,
    /// Tab key.
    Tab,
    /// Shift-Tab.
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key `F<n>`.
    Function(u8),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// A key the frontend could not name.
    Unknown,
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "U+{:04X}", u32::from(*c)),
            Self::Ctrl(c) => write!(f, "^{}", c.to_ascii_uppercase()),
            Self::Function(n) => write!(f, "F{n}"),
            Self::Resize(cols, rows) => write!(f, "resize {cols}x{rows}"),
            other => write!(f, "{other:?}"),
        }
    }
}
