// Match list widget.
//
// One line per match: time, fixture, kind, and whether the server can
// predict it. The prediction note for the match under the cursor is shown
// on the last line of the panel.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use matchday_core::model::{MatchKind, MatchSummary};
use matchday_core::protocol::Panel;

use super::{panel_block, render_status, status_line};
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Matches;
    let title = match state.league_title() {
        Some(league) => format!("Matches - {league}"),
        None => "Matches".to_string(),
    };
    let block = panel_block(title, focused);

    let list = match &state.matches {
        Panel::Ready(list) => list,
        other => {
            if let Some(line) = status_line(other, "Select a league to see its matches.") {
                render_status(frame, area, block, line);
            }
            return;
        }
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [list_area, note_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let items: Vec<ListItem> = list.matches.iter().map(match_line).map(ListItem::new).collect();
    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let widget = List::new(items).highlight_style(highlight).highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.match_cursor));
    frame.render_stateful_widget(widget, list_area, &mut list_state);

    if let Some(m) = list.matches.get(state.match_cursor) {
        let note = Paragraph::new(Line::from(Span::styled(
            m.prediction_note.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
        frame.render_widget(note, note_area);
    }
}

/// "18:40  ARS vs LEE  scheduled  ✓"
pub fn match_line(m: &MatchSummary) -> Line<'static> {
    let kind_color = match m.kind {
        MatchKind::Scheduled => Color::White,
        MatchKind::Historical => Color::DarkGray,
    };
    let (mark, mark_color) = if m.predictable {
        ("✓", Color::Green)
    } else {
        ("·", Color::DarkGray)
    };
    let mut spans = vec![
        Span::styled(format!("{:>5}  ", m.scheduled_time), Style::default().fg(Color::Gray)),
        Span::styled(m.fixture_label(), Style::default().fg(Color::White)),
        Span::styled(format!("  {}", m.kind.label()), Style::default().fg(kind_color)),
    ];
    if let Some(status) = m.status.as_deref().filter(|s| !s.eq_ignore_ascii_case(m.kind.label())) {
        spans.push(Span::styled(format!(" ({status})"), Style::default().fg(Color::Gray)));
    }
    spans.push(Span::styled(format!("  {mark}"), Style::default().fg(mark_color)));
    Line::from(spans)
}
