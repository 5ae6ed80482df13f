// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------------------+
// | Status Bar (1 row)                                            |
// +-----------+--------------------------------+-----------------+
// | Leagues   | Matches (40%)                  | Prediction      |
// | (22 cols) +--------------------------------+ (32%)           |
// |           | Standings (60%)                |                 |
// +-----------+--------------------------------+-----------------+
// | Help Bar (1 row)                                              |
// +--------------------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub leagues: Rect,
    pub matches: Rect,
    pub standings: Rect,
    pub prediction: Rect,
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: leagues | center | prediction
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(40),
            Constraint::Percentage(32),
        ])
        .split(middle);

    let leagues = horizontal[0];
    let center = horizontal[1];
    let prediction = horizontal[2];

    // Center vertical: matches (40%) | standings (60%)
    let center_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(center);

    AppLayout {
        status_bar,
        leagues,
        matches: center_sections[0],
        standings: center_sections[1],
        prediction,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
