// Standings table widget.
//
// Columns follow `SortKey::ALL`. The active sort column header carries a
// direction arrow. Row colors come from `zone_for` on league position, so
// the top and bottom bands stay put when the table is re-sorted.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table, TableState};
use ratatui::Frame;

use matchday_core::model::{FormResult, TeamStanding};
use matchday_core::protocol::Panel;
use matchday_core::table::{zone_for, SortKey, SortState, Zone};

use super::{panel_block, render_status, status_line};
use crate::tui::{Focus, ViewState};

const WIDTHS: [Constraint; 11] = [
    Constraint::Length(4),  // #
    Constraint::Min(12),    // Team
    Constraint::Length(4),  // MP
    Constraint::Length(4),  // W
    Constraint::Length(4),  // D
    Constraint::Length(4),  // L
    Constraint::Length(4),  // GF
    Constraint::Length(4),  // GA
    Constraint::Length(5),  // GD
    Constraint::Length(5),  // Pts
    Constraint::Length(7),  // Form
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Standings;
    let title = match state.league_title() {
        Some(league) => format!("Standings - {league}"),
        None => "Standings".to_string(),
    };
    let block = panel_block(title, focused);

    let rows = match &state.standings {
        Panel::Ready(rows) => rows,
        other => {
            if let Some(line) = status_line(other, "Select a league to see its table.") {
                render_status(frame, area, block, line);
            }
            return;
        }
    };

    let header = Row::new(header_cells(state.sort)).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let len = rows.len();
    let body: Vec<Row> = rows
        .iter()
        .map(|row| standing_row(row, zone_for(row.position, len, state.highlight_rows)))
        .collect();

    let table = Table::new(body, WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        });

    let mut table_state = TableState::default().with_selected(Some(state.standings_cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Column labels with the sort arrow appended to the active column.
pub fn header_cells(sort: SortState) -> Vec<String> {
    SortKey::ALL
        .iter()
        .map(|&key| {
            if key == sort.key {
                format!("{}{}", key.label(), sort.direction.arrow())
            } else {
                key.label().to_string()
            }
        })
        .collect()
}

pub fn zone_style(zone: Zone) -> Style {
    match zone {
        Zone::Top => Style::default().fg(Color::Green),
        Zone::Middle => Style::default(),
        Zone::Bottom => Style::default().fg(Color::Red),
    }
}

fn form_color(result: FormResult) -> Color {
    match result {
        FormResult::Win => Color::Green,
        FormResult::Draw => Color::Yellow,
        FormResult::Loss => Color::Red,
    }
}

fn form_line(form: &[FormResult]) -> Line<'static> {
    Line::from(
        form.iter()
            .map(|&r| Span::styled(r.as_char().to_string(), Style::default().fg(form_color(r))))
            .collect::<Vec<_>>(),
    )
}

fn standing_row(row: &TeamStanding, zone: Zone) -> Row<'static> {
    let gd = if row.goal_difference > 0 {
        format!("+{}", row.goal_difference)
    } else {
        row.goal_difference.to_string()
    };
    Row::new(vec![
        Cell::from(row.position.to_string()),
        Cell::from(row.team_name.clone()),
        Cell::from(row.played.to_string()),
        Cell::from(row.wins.to_string()),
        Cell::from(row.draws.to_string()),
        Cell::from(row.losses.to_string()),
        Cell::from(row.goals_for.to_string()),
        Cell::from(row.goals_against.to_string()),
        Cell::from(gd),
        Cell::from(row.points.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(form_line(&row.recent_form)),
    ])
    .style(zone_style(zone))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
