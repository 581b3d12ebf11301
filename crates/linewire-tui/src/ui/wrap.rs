//! Display-width aware wrapping.
//!
//! Widths are terminal cells, not bytes or chars: a CJK ideograph takes two
//! cells, a combining mark none. Tabs render as one space and other control
//! characters are dropped, since the terminal would otherwise move the
//! cursor behind ratatui's back.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells `c` occupies once sanitised.
fn cell_width(c: char) -> usize {
    if c == '\t' { 1 } else { c.width().unwrap_or(0) }
}

/// Characters as they will be drawn.
fn sanitised(line: &str) -> impl Iterator<Item = char> + '_ {
    line.chars().filter_map(|c| match c {
        '\t' => Some(' '),
        c if c.is_control() => None,
        c => Some(c),
    })
}

/// Split `line` into rows no wider than `width` cells.
///
/// An empty line still occupies one row. A character wider than `width`
/// gets a row of its own rather than being lost.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;

    for c in sanitised(line) {
        let w = cell_width(c);
        if used + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(c);
        used += w;
    }

    rows.push(row);
    rows
}

/// The last `height` rows of `lines` wrapped to `width`, oldest first.
///
/// Walks backwards from the newest line and stops once the pane is full, so
/// cost is bounded by the pane size and not the scrollback length.
pub fn tail_rows(lines: &[String], width: usize, height: usize) -> Vec<String> {
    let mut rows = Vec::with_capacity(height);

    for line in lines.iter().rev() {
        if rows.len() >= height {
            break;
        }
        let wrapped = wrap_line(line, width);
        let take = wrapped.len().min(height - rows.len());
        rows.extend(wrapped.into_iter().rev().take(take));
    }

    rows.reverse();
    rows
}

/// Longest suffix of `text` that fits in `width` cells.
pub fn fit_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }

    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        used += cell_width(c);
        if used > width {
            break;
        }
        start = idx;
    }
    &text[start..]
}
