// League list widget: every league the server knows, with the selected one
// marked.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;

use matchday_core::protocol::Panel;

use super::{panel_block, render_status, status_line};
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Leagues;
    let block = panel_block(format!("Leagues ({})", state.league_count()), focused);

    let leagues = match &state.leagues {
        Panel::Ready(leagues) => leagues,
        other => {
            if let Some(line) = status_line(other, "Waiting for leagues...") {
                render_status(frame, area, block, line);
            }
            return;
        }
    };

    let selected_id = state.selected_league.as_ref().map(|l| l.identifier.as_str());
    let items: Vec<ListItem> = leagues
        .iter()
        .map(|league| {
            let style = if selected_id == Some(league.identifier.as_str()) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(league.display_name.clone()).style(style)
        })
        .collect();

    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.league_cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}
