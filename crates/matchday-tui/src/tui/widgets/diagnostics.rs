// Diagnostics overlay widget.
//
// Centered modal over the dashboard showing the server's database counts and
// how raw league names map to canonical and display names. Shown while
// `ViewState::show_diagnostics` is true.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use matchday_core::model::DatabaseDiagnostics;
use matchday_core::protocol::Panel;

use super::status_line;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 72;
const DIALOG_HEIGHT: u16 = 18;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Server diagnostics ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = match &state.diagnostics {
        Panel::Ready(diagnostics) => diagnostic_lines(diagnostics),
        other => status_line(other, "No diagnostics loaded.")
            .into_iter()
            .collect(),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog_area);
}

pub fn diagnostic_lines(d: &DatabaseDiagnostics) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Scheduled matches: ", label),
            Span::raw(d.scheduled_matches.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Completed matches: ", label),
            Span::raw(d.completed_matches.to_string()),
        ]),
        Line::from(vec![
            Span::styled("League table rows: ", label),
            Span::raw(d.league_table_rows.to_string()),
        ]),
        Line::default(),
    ];

    if d.leagues.is_empty() {
        lines.push(Line::from(Span::styled("No league mappings.", label)));
        return lines;
    }
    lines.push(Line::from(Span::styled(
        "raw -> standardized -> display",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for mapping in &d.leagues {
        let raw = if mapping.raw.is_empty() { "-" } else { mapping.raw.as_str() };
        lines.push(Line::from(format!(
            "{raw} -> {} -> {}",
            mapping.standardized, mapping.display
        )));
    }
    lines
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
