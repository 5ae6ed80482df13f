// Terminal dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the orchestrator has loaded.
// The orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::debug;

use matchday_core::model::{DatabaseDiagnostics, LeagueRef, MatchList, PredictionResult, TeamStanding};
use matchday_core::protocol::{Panel, UiUpdate, UserCommand};
use matchday_core::table::SortState;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Panel that receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Leagues,
    Matches,
    Standings,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Leagues => Focus::Matches,
            Focus::Matches => Focus::Standings,
            Focus::Standings => Focus::Leagues,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Leagues => Focus::Standings,
            Focus::Matches => Focus::Leagues,
            Focus::Standings => Focus::Matches,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the orchestrator's state for rendering.
///
/// Updated incrementally via `UiUpdate` messages. `render_frame` reads this
/// struct to draw the dashboard.
pub struct ViewState {
    pub leagues: Panel<Vec<LeagueRef>>,
    pub selected_league: Option<LeagueRef>,
    pub matches: Panel<MatchList>,
    pub standings: Panel<Vec<TeamStanding>>,
    /// Active standings sort, shown as an arrow in the table header.
    pub sort: SortState,
    pub prediction: Panel<PredictionResult>,
    /// "HOME vs AWAY" of the last prediction request.
    pub prediction_fixture: Option<String>,
    pub diagnostics: Panel<DatabaseDiagnostics>,
    pub show_diagnostics: bool,
    pub focus: Focus,
    pub league_cursor: usize,
    pub match_cursor: usize,
    pub standings_cursor: usize,
    pub last_refresh: Option<DateTime<Local>>,
    /// Rows highlighted at each end of the standings table.
    pub highlight_rows: usize,
    /// Server address shown in the status bar.
    pub server: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            leagues: Panel::Idle,
            selected_league: None,
            matches: Panel::Idle,
            standings: Panel::Idle,
            sort: SortState::default(),
            prediction: Panel::Idle,
            prediction_fixture: None,
            diagnostics: Panel::Idle,
            show_diagnostics: false,
            focus: Focus::Leagues,
            league_cursor: 0,
            match_cursor: 0,
            standings_cursor: 0,
            last_refresh: None,
            highlight_rows: 3,
            server: String::new(),
        }
    }
}

impl ViewState {
    pub fn new(server: impl Into<String>, highlight_rows: usize) -> Self {
        ViewState {
            server: server.into(),
            highlight_rows,
            ..ViewState::default()
        }
    }

    pub fn league_count(&self) -> usize {
        self.leagues.ready().map_or(0, Vec::len)
    }

    pub fn match_count(&self) -> usize {
        self.matches.ready().map_or(0, |list| list.matches.len())
    }

    pub fn standings_count(&self) -> usize {
        self.standings.ready().map_or(0, Vec::len)
    }

    /// Title for the center panels: the server's display name for the
    /// loaded league when it sent one, otherwise the selected league's.
    pub fn league_title(&self) -> Option<&str> {
        self.matches
            .ready()
            .and_then(|list| list.league_display_name.as_deref())
            .or_else(|| self.selected_league.as_ref().map(|l| l.display_name.as_str()))
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Leagues(panel) => {
            state.leagues = panel;
            // The cursor only moves once a list arrives; a reload lands back
            // on the selected league.
            if let Some(leagues) = state.leagues.ready() {
                let selected = state.selected_league.as_ref().and_then(|current| {
                    leagues.iter().position(|l| l.identifier == current.identifier)
                });
                state.league_cursor = match selected {
                    Some(index) => index,
                    None => clamp_cursor(state.league_cursor, leagues.len()),
                };
            }
        }
        UiUpdate::LeagueSelected(league) => {
            state.selected_league = Some(league);
            state.match_cursor = 0;
            state.standings_cursor = 0;
        }
        UiUpdate::Matches(panel) => {
            state.matches = panel;
            state.match_cursor = clamp_cursor(state.match_cursor, state.match_count());
        }
        UiUpdate::Standings { panel, sort } => {
            state.standings = panel;
            state.sort = sort;
            state.standings_cursor = clamp_cursor(state.standings_cursor, state.standings_count());
        }
        UiUpdate::StandingsSorted { rows, sort } => {
            state.sort = sort;
            if let Panel::Ready(held) = &mut state.standings {
                *held = rows;
            }
        }
        UiUpdate::Prediction { fixture, panel } => {
            state.prediction_fixture = Some(fixture);
            state.prediction = panel;
        }
        UiUpdate::Diagnostics(panel) => {
            state.diagnostics = panel;
        }
        UiUpdate::Refreshed(at) => {
            state.last_refresh = Some(at);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::leagues::render(frame, layout.leagues, state);
    widgets::matches::render(frame, layout.matches, state);
    widgets::standings::render(frame, layout.standings, state);
    widgets::prediction::render(frame, layout.prediction, state);
    render_help_bar(frame, &layout, state);

    if state.show_diagnostics {
        widgets::diagnostics::render(frame, frame.area(), state);
    }
}

/// Keyboard hints for the focused panel.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.show_diagnostics {
        return " d/Esc:Close | q:Quit";
    }
    match state.focus {
        Focus::Leagues => " Tab:Focus | j/k:Move | Enter:Select league | r:Refresh | d:Diagnostics | q:Quit",
        Focus::Matches => " Tab:Focus | j/k:Move | Enter:Predict | r:Refresh | d:Diagnostics | q:Quit",
        Focus::Standings => {
            " Tab:Focus | j/k:Move | 1-9,0,-:Sort # Team MP W D L GF GA GD Pts Form | q:Quit"
        }
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            // UI updates from the orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator is gone
                    None => break Ok(()),
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            debug!(?cmd, "user command");
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
