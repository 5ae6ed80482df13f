// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// orchestrator, or into local ViewState mutations (focus, cursor movement,
// the diagnostics overlay).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use matchday_core::protocol::UserCommand;
use matchday_core::table::SortKey;

use super::{Focus, ViewState};

/// Standings sort keys in key order: `1`-`9`, then `0`, then `-`.
const SORT_KEYS: [char; 11] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-'];

/// Map a key character to the standings column it sorts.
pub fn sort_key_for(c: char) -> Option<SortKey> {
    SORT_KEYS
        .iter()
        .position(|&k| k == c)
        .map(|i| SortKey::ALL[i])
}

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator. Returns `None` when it was handled locally by mutating
/// `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.show_diagnostics {
        return handle_overlay(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('r') => Some(UserCommand::Refresh),
        KeyCode::Char('d') => {
            view_state.show_diagnostics = true;
            Some(UserCommand::LoadDiagnostics)
        }

        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.previous();
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(view_state, 1);
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            move_cursor(view_state, isize::MIN);
            None
        }
        KeyCode::End | KeyCode::Char('G') => {
            move_cursor(view_state, isize::MAX);
            None
        }

        KeyCode::Enter => activate(view_state),

        KeyCode::Char(c) if view_state.focus == Focus::Standings => {
            sort_key_for(c).map(UserCommand::SortStandings)
        }

        _ => None,
    }
}

/// While the diagnostics overlay is open only close and quit keys act.
fn handle_overlay(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('d') | KeyCode::Esc => {
            view_state.show_diagnostics = false;
            None
        }
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

/// Enter: select the league or request a prediction for the match under
/// the cursor.
fn activate(view_state: &ViewState) -> Option<UserCommand> {
    match view_state.focus {
        Focus::Leagues => {
            let league = view_state.leagues.ready()?.get(view_state.league_cursor)?;
            Some(UserCommand::SelectLeague(league.identifier.clone()))
        }
        Focus::Matches => {
            let list = view_state.matches.ready()?;
            let m = list.matches.get(view_state.match_cursor)?;
            Some(UserCommand::RequestPrediction {
                home_team: m.home_team.clone(),
                away_team: m.away_team.clone(),
            })
        }
        Focus::Standings => None,
    }
}

fn move_cursor(view_state: &mut ViewState, delta: isize) {
    let (cursor, len) = match view_state.focus {
        Focus::Leagues => (&mut view_state.league_cursor, view_state.leagues.ready().map_or(0, Vec::len)),
        Focus::Matches => (
            &mut view_state.match_cursor,
            view_state.matches.ready().map_or(0, |l| l.matches.len()),
        ),
        Focus::Standings => (
            &mut view_state.standings_cursor,
            view_state.standings.ready().map_or(0, Vec::len),
        ),
    };
    if len == 0 {
        *cursor = 0;
        return;
    }
    let max = len - 1;
    *cursor = if delta < 0 {
        cursor.saturating_sub(delta.unsigned_abs())
    } else {
        cursor.saturating_add(delta as usize).min(max)
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
