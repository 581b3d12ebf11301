//! Input line
//!
//! Prompt in the frame, then as much of the buffer's tail as fits, then a
//! reverse-video cell standing in for the cursor.

use linewire_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::wrap;

const PROMPT: &str = "> ";
const CURSOR_WIDTH: usize = 1;

/// Render the input frame, prompt and buffer.
pub fn render(frame: &mut Frame, app: &App, frame_area: Rect, text_area: Rect) {
    frame.render_widget(Block::default().borders(Borders::ALL), frame_area);

    // Prompt sits in the cells between the left border and the text
    let prompt_x = frame_area.x + 1;
    let prompt_width = text_area.x.saturating_sub(prompt_x);
    if prompt_width > 0 {
        let prompt_area = Rect { x: prompt_x, width: prompt_width, ..text_area };
        frame.render_widget(Paragraph::new(PROMPT), prompt_area);
    }

    let room = usize::from(text_area.width).saturating_sub(CURSOR_WIDTH);
    let visible = wrap::fit_tail(app.input(), room);
    let line = Line::from(vec![
        Span::raw(visible),
        Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
    ]);

    frame.render_widget(Paragraph::new(line), text_area);
}

