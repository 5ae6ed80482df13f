// Status bar widget: server, selected league, active sort, last refresh.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use matchday_core::protocol::Panel;
use matchday_core::table::SortState;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [activity dot] [server] | [league] | [sort] | [updated]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = activity_indicator(state);
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let league = state
        .league_title()
        .unwrap_or("No league selected")
        .to_string();

    let mut spans = vec![
        Span::styled(format!(" {dot} "), Style::default().fg(dot_color)),
        Span::styled(
            "matchday",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if !state.server.is_empty() {
        spans.push(Span::styled(
            format!(" @ {}", state.server),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(separator());
    spans.push(Span::styled(league, Style::default().fg(Color::White)));
    spans.push(separator());
    spans.push(Span::styled(sort_label(state.sort), Style::default().fg(Color::White)));
    if let Some(at) = state.last_refresh {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Yellow while anything is loading, red if any panel failed, green
/// otherwise.
pub fn activity_indicator(state: &ViewState) -> (&'static str, Color) {
    let loading = state.leagues.is_loading()
        || state.matches.is_loading()
        || state.standings.is_loading()
        || state.prediction.is_loading();
    let failed = matches!(state.leagues, Panel::Failed(_))
        || matches!(state.matches, Panel::Failed(_))
        || matches!(state.standings, Panel::Failed(_))
        || matches!(state.prediction, Panel::Failed(_));
    if loading {
        ("●", Color::Yellow)
    } else if failed {
        ("●", Color::Red)
    } else {
        ("●", Color::Green)
    }
}

/// E.g. "Sort: Pts ▼"
pub fn sort_label(sort: SortState) -> String {
    format!("Sort: {} {}", sort.key.label(), sort.direction.arrow())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
