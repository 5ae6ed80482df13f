// TUI widget modules for each dashboard panel, plus the shared rendering of
// non-ready panel states.

pub mod diagnostics;
pub mod leagues;
pub mod matches;
pub mod prediction;
pub mod standings;
pub mod status_bar;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use matchday_core::protocol::Panel;

/// Bordered block whose border is highlighted when the panel has focus.
pub fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

/// The message line for a panel that has nothing ready to show, or `None`
/// once it holds data. Empty states are informational and never share the
/// error color.
pub fn status_line<T>(panel: &Panel<T>, idle_text: &str) -> Option<Line<'static>> {
    let (text, style) = match panel {
        Panel::Ready(_) => return None,
        Panel::Idle => (idle_text.to_string(), Style::default().fg(Color::DarkGray)),
        Panel::Loading => (
            "Loading...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Panel::Empty(message) => (message.clone(), Style::default().fg(Color::Cyan)),
        Panel::Failed(message) => (
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    Some(Line::from(Span::styled(text, style)))
}

/// Render `line` inside `block`, wrapped.
pub fn render_status(frame: &mut Frame, area: Rect, block: Block<'static>, line: Line<'static>) {
    let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
