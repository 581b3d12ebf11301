//! Line framing for the wire.
//!
//! The protocol is plain text separated by `\n`. Decoding never fails: a chunk
//! that is not valid UTF-8 is rendered byte by byte, printable ASCII as-is and
//! everything else as a `\xHH` token. There is no partial recovery, so a
//! single stray byte escapes every line completed by that chunk.
//!
//! The codec holds no state between calls. Bytes after the last terminator
//! come back as [`Decoded::remainder`] and the caller decides how long to keep
//! them.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

/// Line terminator used in both directions.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Default cap on the encoded length of one outbound line, terminator
/// excluded.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024;

/// Result of decoding one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    /// Complete lines, terminators stripped, in arrival order.
    pub lines: Vec<String>,
    /// Bytes after the last terminator. Empty if the input ended with one.
    pub remainder: &'a [u8],
}

/// Splits inbound bytes into lines and frames outbound lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCodec {
    max_line_bytes: usize,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

impl LineCodec {
    /// Create a codec that truncates outbound lines to `max_line_bytes`.
    pub fn new(max_line_bytes: usize) -> Self {
        Self { max_line_bytes }
    }

    /// Outbound truncation length.
    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes
    }

    /// Split `data` on `\n` and decode every complete line.
    ///
    /// The complete lines are validated together: if any of them is not
    /// UTF-8, all of them are escaped.
    pub fn decode<'a>(&self, data: &'a [u8]) -> Decoded<'a> {
        let Some(last) = data.iter().rposition(|&b| b == LINE_TERMINATOR) else {
            return Decoded { lines: Vec::new(), remainder: data };
        };

        let (complete, rest) = data.split_at(last);
        let lines = match std::str::from_utf8(complete) {
            Ok(text) => text.split('\n').map(str::to_owned).collect(),
            // One bad byte degrades every line in the chunk
            Err(_) => complete.split(|&b| b == LINE_TERMINATOR).map(escape_bytes).collect(),
        };

        // `rest` still starts with the terminator found above
        Decoded { lines, remainder: &rest[1..] }
    }

    /// Append `line` to `dst` as one wire frame.
    ///
    /// Text longer than the configured limit is cut at the last character
    /// boundary that fits, so the frame is always valid UTF-8.
    pub fn encode(&self, line: &str, dst: &mut BytesMut) {
        let text = truncate_to_boundary(line, self.max_line_bytes);
        dst.reserve(text.len() + 1);
        dst.put_slice(text.as_bytes());
        dst.put_u8(LINE_TERMINATOR);
    }
}

/// Decode a single line, falling back to byte escaping.
pub fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => escape_bytes(bytes),
    }
}

/// Render every byte: printable ASCII as itself, anything else as `\xHH`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if is_printable(byte) {
            out.push(char::from(byte));
        } else {
            // Writing to a String cannot fail
            let _ = write!(out, "\\x{byte:02x}");
        }
    }
    out
}

/// Printable ASCII: graphic characters, space, and the whitespace controls
/// `\t`, `\n`, `\r`, `\x0b`, `\x0c`.
fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn truncate_to_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
