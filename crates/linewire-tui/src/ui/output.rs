//! Output pane
//!
//! Scrollback wrapped to the pane, newest row at the bottom, inside a frame
//! whose title names the server and the connection state.

use linewire_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::wrap;

/// Render the output frame and its scrollback.
pub fn render(frame: &mut Frame, app: &App, frame_area: Rect, text_area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title(app));
    frame.render_widget(block, frame_area);

    let rows = wrap::tail_rows(
        app.scrollback().lines(),
        usize::from(text_area.width),
        usize::from(text_area.height),
    );

    // Fewer rows than the pane holds: keep them against the bottom edge
    let used = rows.len() as u16;
    let area = Rect { y: text_area.bottom() - used, height: used, ..text_area };

    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn title(app: &App) -> Line<'static> {
    let state = match app.connection_state() {
        ConnectionState::Connecting => {
            Span::styled("connecting", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected { .. } => Span::styled(
            "connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Closed => {
            Span::styled("closed", Style::default().fg(Color::DarkGray))
        },
        ConnectionState::Failed { reason } => {
            Span::styled(format!("failed: {reason}"), Style::default().fg(Color::Red))
        },
    };

    Line::from(vec![
        Span::raw(format!(" {} ", app.server_addr())),
        Span::raw("| "),
        state,
        Span::raw(" "),
    ])
}
