//! Key classification.
//!
//! Every key the terminal reports falls into exactly one [`KeyCategory`].
//! The [`KeyMap`] table is built once at startup; classifying a key is a
//! single hash lookup plus a fallback rule for plain characters.

use std::collections::HashMap;

use crate::KeyInput;

/// What a key does to the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    /// Append the character.
    Printable,
    /// Drop the last character.
    Backspace,
    /// Submit the line.
    Enter,
    /// Clear the line without sending.
    Escape,
    /// Leave the client.
    Kill,
    /// Re-derive geometry and redraw everything.
    Resize,
    /// Navigation and editing keys the single-line input ignores.
    Discard,
    /// Anything unrecognised. Shows a diagnostic marker.
    Undefined,
}

/// Lookup table from keys to categories.
#[derive(Debug, Clone)]
pub struct KeyMap {
    table: HashMap<KeyInput, KeyCategory>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeyMap {
    /// The default bindings.
    ///
    /// Non-control characters are printable unless bound here. Ctrl-C
    /// arrives as a key in raw mode and kills like Ctrl-D; Ctrl-\ is
    /// swallowed.
    pub fn standard() -> Self {
        use KeyCategory::{Backspace, Discard, Enter, Escape, Kill};

        let bindings = [
            (KeyInput::Backspace, Backspace),
            (KeyInput::Ctrl('h'), Backspace),
            (KeyInput::Enter, Enter),
            (KeyInput::Ctrl('j'), Enter),
            (KeyInput::Ctrl('m'), Enter),
            (KeyInput::Esc, Escape),
            (KeyInput::Ctrl('d'), Kill),
            (KeyInput::Ctrl('c'), Kill),
            (KeyInput::Ctrl('\\'), Discard),
            (KeyInput::Tab, Discard),
            (KeyInput::BackTab, Discard),
            (KeyInput::Up, Discard),
            (KeyInput::Down, Discard),
            (KeyInput::Left, Discard),
            (KeyInput::Right, Discard),
            (KeyInput::Home, Discard),
            (KeyInput::End, Discard),
            (KeyInput::PageUp, Discard),
            (KeyInput::PageDown, Discard),
            (KeyInput::Delete, Discard),
            (KeyInput::Insert, Discard),
        ];

        Self { table: bindings.into_iter().collect() }
    }

    /// Override the category of a single key.
    pub fn bind(&mut self, key: KeyInput, category: KeyCategory) {
        self.table.insert(key, category);
    }

    /// Category of `key`.
    pub fn classify(&self, key: KeyInput) -> KeyCategory {
        if let Some(category) = self.table.get(&key) {
            return *category;
        }

        match key {
            KeyInput::Char(c) if !c.is_control() => KeyCategory::Printable,
            KeyInput::Resize(..) => KeyCategory::Resize,
            _ => KeyCategory::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_characters_are_printable() {
        let keymap = KeyMap::standard();

        for c in ['a', 'Z', '0', ' ', '~', 'é', '漢'] {
            assert_eq!(keymap.classify(KeyInput::Char(c)), KeyCategory::Printable, "{c:?}");
        }
    }

    #[test]
    fn control_characters_are_undefined() {
        let keymap = KeyMap::standard();

        assert_eq!(keymap.classify(KeyInput::Char('\u{1}')), KeyCategory::Undefined);
        assert_eq!(keymap.classify(KeyInput::Ctrl('x')), KeyCategory::Undefined);
        assert_eq!(keymap.classify(KeyInput::Function(1)), KeyCategory::Undefined);
        assert_eq!(keymap.classify(KeyInput::Unknown), KeyCategory::Undefined);
    }

    #[test]
    fn editing_keys() {
        let keymap = KeyMap::standard();

        assert_eq!(keymap.classify(KeyInput::Backspace), KeyCategory::Backspace);
        assert_eq!(keymap.classify(KeyInput::Ctrl('h')), KeyCategory::Backspace);
        assert_eq!(keymap.classify(KeyInput::Enter), KeyCategory::Enter);
        assert_eq!(keymap.classify(KeyInput::Ctrl('m')), KeyCategory::Enter);
        assert_eq!(keymap.classify(KeyInput::Esc), KeyCategory::Escape);
    }

    #[test]
    fn kill_keys() {
        let keymap = KeyMap::standard();

        assert_eq!(keymap.classify(KeyInput::Ctrl('d')), KeyCategory::Kill);
        assert_eq!(keymap.classify(KeyInput::Ctrl('c')), KeyCategory::Kill);
    }

    #[test]
    fn navigation_is_discarded() {
        let keymap = KeyMap::standard();

        for key in [KeyInput::Tab, KeyInput::Left, KeyInput::PageDown, KeyInput::Delete] {
            assert_eq!(keymap.classify(key), KeyCategory::Discard, "{key:?}");
        }
    }

    #[test]
    fn any_resize_is_resize() {
        assert_eq!(KeyMap::standard().classify(KeyInput::Resize(1, 1)), KeyCategory::Resize);
    }

    #[test]
    fn bindings_override_the_printable_rule() {
        let mut keymap = KeyMap::standard();
        keymap.bind(KeyInput::Char('`'), KeyCategory::Discard);

        assert_eq!(keymap.classify(KeyInput::Char('`')), KeyCategory::Discard);
    }
}
