// Application state and orchestration logic.
//
// The central event loop that coordinates fetch completions and user
// commands from the renderer. Owns all mutable session state (league list,
// current selection, match list, standings table) and pushes UI updates to
// the render loop.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::client::LeagueApi;
use crate::api::error::FetchError;
use crate::config::Config;
use crate::model::{LeagueRef, MatchList, PredictionOutcome};
use crate::pipeline;
use crate::protocol::{FetchEvent, Panel, UiUpdate, UserCommand};
use crate::table::{SortKey, SortState, StandingsTable};

pub const NO_LEAGUES: &str = "No leagues available.";
pub const NO_MATCHES: &str = "No matches available for this league.";
pub const NO_STANDINGS: &str = "No league table data available.";
pub const PREDICTION_UNAVAILABLE: &str = "Prediction unavailable - insufficient historical data.";
const NOT_PREDICTABLE: &str = "Prediction not available for this match.";
const NO_LEAGUE_SELECTED: &str = "Select a league first.";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete session state.
pub struct AppState {
    pub config: Config,
    pub leagues: Vec<LeagueRef>,
    pub current_league: Option<LeagueRef>,
    /// Matches for the current league; empty until the fetch completes.
    pub matches: MatchList,
    pub table: StandingsTable,
    /// Monotonically increasing selection token. Incremented on every league
    /// selection; match and standings results carrying any other value are
    /// discarded in `handle_fetch_event`.
    pub selection_generation: u64,
    /// Same scheme for predictions: a newer match click supersedes an older
    /// one still in flight.
    pub prediction_generation: u64,
    api: Arc<dyn LeagueApi>,
    /// Spawned tasks send their results back through clones of this sender.
    fetch_tx: mpsc::Sender<FetchEvent>,
    selection_tasks: Vec<JoinHandle<()>>,
    prediction_task: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn LeagueApi>, fetch_tx: mpsc::Sender<FetchEvent>) -> Self {
        let table = StandingsTable::new(SortState::ascending(config.ui.default_sort));
        AppState {
            config,
            leagues: Vec::new(),
            current_league: None,
            matches: MatchList::default(),
            table,
            selection_generation: 0,
            prediction_generation: 0,
            api,
            fetch_tx,
            selection_tasks: Vec::new(),
            prediction_task: None,
        }
    }

    /// Spawn a league list fetch. Not selection-scoped: the list is the same
    /// whichever request answers last.
    pub fn request_leagues(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = pipeline::load_leagues(api.as_ref()).await;
            let _ = tx.send(FetchEvent::Leagues(result)).await;
        });
    }

    /// Look up a league by identifier, falling back to a derived display name
    /// when it is not in the loaded list.
    pub fn resolve_league(&self, identifier: &str) -> LeagueRef {
        self.leagues
            .iter()
            .find(|l| l.identifier == identifier)
            .cloned()
            .unwrap_or_else(|| LeagueRef {
                identifier: identifier.to_string(),
                display_name: pipeline::title_case(identifier),
            })
    }

    /// Make `league` the current selection: bump the selection token, abort
    /// the previous selection's fetches, clear held data and spawn the match
    /// and standings fetches. The two run concurrently.
    pub fn select_league(&mut self, league: LeagueRef) -> u64 {
        self.cancel_selection_tasks();
        self.selection_generation += 1;
        let generation = self.selection_generation;

        self.matches = MatchList::default();
        self.table = std::mem::take(&mut self.table).load(Vec::new());

        let identifier = league.identifier.clone();
        self.current_league = Some(league);

        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        let id = identifier.clone();
        let matches = tokio::spawn(async move {
            let result = pipeline::load_matches(api.as_ref(), &id).await;
            let _ = tx.send(FetchEvent::Matches { generation, result }).await;
        });

        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        let id = identifier.clone();
        let standings = tokio::spawn(async move {
            let result = pipeline::load_standings(api.as_ref(), &id).await;
            let _ = tx.send(FetchEvent::Standings { generation, result }).await;
        });

        self.selection_tasks = vec![matches, standings];
        info!(league = %identifier, generation, "league selected");
        generation
    }

    /// Spawn a prediction fetch for a fixture in the current league,
    /// superseding any prediction still in flight.
    pub fn spawn_prediction(&mut self, home_team: &str, away_team: &str) -> Option<u64> {
        let league = self.current_league.as_ref()?.identifier.clone();
        if let Some(handle) = self.prediction_task.take() {
            handle.abort();
        }
        self.prediction_generation += 1;
        let generation = self.prediction_generation;

        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        let home = home_team.to_string();
        let away = away_team.to_string();
        let fixture = format!("{home} vs {away}");
        self.prediction_task = Some(tokio::spawn(async move {
            let result = pipeline::load_prediction(api.as_ref(), &league, &home, &away).await;
            let _ = tx
                .send(FetchEvent::Prediction {
                    generation,
                    fixture,
                    result,
                })
                .await;
        }));
        debug!(home_team, away_team, generation, "prediction requested");
        Some(generation)
    }

    pub fn request_diagnostics(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = pipeline::load_diagnostics(api.as_ref()).await;
            let _ = tx.send(FetchEvent::Diagnostics(result)).await;
        });
    }

    /// Toggle the standings sort; the rows are re-ordered in place.
    pub fn sort_standings(&mut self, key: SortKey) -> SortState {
        self.table = std::mem::take(&mut self.table).toggle_sort(key);
        self.table.sort_state()
    }

    fn cancel_selection_tasks(&mut self) {
        for handle in self.selection_tasks.drain(..) {
            handle.abort();
        }
    }

    /// Abort every in-flight fetch tied to the selection or a prediction.
    pub fn cancel_all(&mut self) {
        self.cancel_selection_tasks();
        if let Some(handle) = self.prediction_task.take() {
            handle.abort();
        }
    }

    /// The league named by `ui.default_league`, matched on identifier or
    /// display name, ignoring case.
    fn default_league(&self) -> Option<LeagueRef> {
        let wanted = self.config.ui.default_league.as_deref()?;
        self.leagues
            .iter()
            .find(|l| {
                l.identifier.eq_ignore_ascii_case(wanted)
                    || l.display_name.eq_ignore_ascii_case(wanted)
            })
            .cloned()
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Fetch completions from spawned tasks
/// 2. User commands from the renderer
///
/// Requests the league list on start. Returns when `Quit` arrives or the
/// command channel closes.
pub async fn run(
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StandingsSorted {
            rows: Vec::new(),
            sort: state.table.sort_state(),
        })
        .await;
    let _ = ui_tx.send(UiUpdate::Leagues(Panel::Loading)).await;
    state.request_leagues();

    loop {
        tokio::select! {
            // --- Fetch completions ---
            event = fetch_rx.recv() => {
                match event {
                    Some(event) => handle_fetch_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("Fetch channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_all();
    info!("Application event loop exiting");
    Ok(())
}

/// Inline message for a failed fetch. The detailed error goes to the log.
fn failure_message(what: &str, err: &FetchError) -> String {
    warn!(error = %err, "failed to load {what}");
    format!("Failed to load {what}. {}", err.user_message())
}

/// Apply a fetch completion to state and forward it to the renderer.
///
/// **Generation check**: match, standings and prediction results carry the
/// token they were issued under. A mismatch means the user has moved on
/// (new league, new match click) and the result is dropped.
pub async fn handle_fetch_event(
    state: &mut AppState,
    event: FetchEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        FetchEvent::Leagues(Ok(leagues)) => {
            info!(count = leagues.len(), "leagues loaded");
            state.leagues = leagues;
            let panel = if state.leagues.is_empty() {
                Panel::Empty(NO_LEAGUES.to_string())
            } else {
                Panel::Ready(state.leagues.clone())
            };
            let _ = ui_tx.send(UiUpdate::Leagues(panel)).await;
            let _ = ui_tx.send(UiUpdate::Refreshed(Local::now())).await;

            if state.current_league.is_none() {
                if let Some(league) = state.default_league() {
                    info!(league = %league.identifier, "selecting configured default league");
                    begin_selection(state, league, ui_tx).await;
                }
            }
        }
        FetchEvent::Leagues(Err(err)) => {
            let message = failure_message("leagues", &err);
            let _ = ui_tx.send(UiUpdate::Leagues(Panel::Failed(message))).await;
        }

        FetchEvent::Matches { generation, result } => {
            if generation != state.selection_generation {
                debug!(
                    generation,
                    current = state.selection_generation,
                    "discarding stale matches result"
                );
                return;
            }
            let panel = match result {
                Ok(list) if list.matches.is_empty() => {
                    state.matches = list;
                    Panel::Empty(NO_MATCHES.to_string())
                }
                Ok(list) => {
                    info!(count = list.matches.len(), generation, "matches loaded");
                    state.matches = list.clone();
                    Panel::Ready(list)
                }
                Err(err) => {
                    state.matches = MatchList::default();
                    Panel::Failed(failure_message("matches", &err))
                }
            };
            let _ = ui_tx.send(UiUpdate::Matches(panel)).await;
        }

        FetchEvent::Standings { generation, result } => {
            if generation != state.selection_generation {
                debug!(
                    generation,
                    current = state.selection_generation,
                    "discarding stale standings result"
                );
                return;
            }
            let panel = match result {
                Ok(list) => {
                    state.table = std::mem::take(&mut state.table).load(list.standings);
                    if state.table.is_empty() {
                        Panel::Empty(NO_STANDINGS.to_string())
                    } else {
                        info!(rows = state.table.len(), generation, "standings loaded");
                        Panel::Ready(state.table.rows().to_vec())
                    }
                }
                Err(err) => {
                    state.table = std::mem::take(&mut state.table).load(Vec::new());
                    Panel::Failed(failure_message("league table", &err))
                }
            };
            let sort = state.table.sort_state();
            let _ = ui_tx.send(UiUpdate::Standings { panel, sort }).await;
        }

        FetchEvent::Prediction {
            generation,
            fixture,
            result,
        } => {
            if generation != state.prediction_generation {
                debug!(
                    generation,
                    current = state.prediction_generation,
                    "discarding stale prediction result"
                );
                return;
            }
            state.prediction_task = None;
            let panel = match result {
                Ok(PredictionOutcome::Ready(prediction)) => Panel::Ready(prediction),
                Ok(PredictionOutcome::Unavailable) => {
                    info!(%fixture, "prediction unavailable");
                    Panel::Empty(PREDICTION_UNAVAILABLE.to_string())
                }
                Err(err) => Panel::Failed(failure_message("prediction", &err)),
            };
            let _ = ui_tx.send(UiUpdate::Prediction { fixture, panel }).await;
        }

        FetchEvent::Diagnostics(result) => {
            let panel = match result {
                Ok(diagnostics) => Panel::Ready(diagnostics),
                Err(err) => Panel::Failed(failure_message("diagnostics", &err)),
            };
            let _ = ui_tx.send(UiUpdate::Diagnostics(panel)).await;
        }
    }
}

/// Signal loading for both selection panels, then spawn their fetches.
async fn begin_selection(state: &mut AppState, league: LeagueRef, ui_tx: &mpsc::Sender<UiUpdate>) {
    let sort = state.table.sort_state();
    let _ = ui_tx.send(UiUpdate::LeagueSelected(league.clone())).await;
    let _ = ui_tx.send(UiUpdate::Matches(Panel::Loading)).await;
    let _ = ui_tx
        .send(UiUpdate::Standings {
            panel: Panel::Loading,
            sort,
        })
        .await;
    state.select_league(league);
}

/// Handle a user command from the renderer.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Refresh => {
            info!("Refreshing leagues");
            let _ = ui_tx.send(UiUpdate::Leagues(Panel::Loading)).await;
            state.request_leagues();
            if let Some(league) = state.current_league.clone() {
                begin_selection(state, league, ui_tx).await;
            }
        }
        UserCommand::SelectLeague(identifier) => {
            let league = state.resolve_league(&identifier);
            begin_selection(state, league, ui_tx).await;
        }
        UserCommand::SortStandings(key) => {
            let sort = state.sort_standings(key);
            debug!(key = %sort.key, direction = ?sort.direction, "standings sorted");
            let _ = ui_tx
                .send(UiUpdate::StandingsSorted {
                    rows: state.table.rows().to_vec(),
                    sort,
                })
                .await;
        }
        UserCommand::RequestPrediction {
            home_team,
            away_team,
        } => {
            let fixture = format!("{home_team} vs {away_team}");
            if state.current_league.is_none() {
                let _ = ui_tx
                    .send(UiUpdate::Prediction {
                        fixture,
                        panel: Panel::Empty(NO_LEAGUE_SELECTED.to_string()),
                    })
                    .await;
                return;
            }

            // The server's flag is authoritative; an unknown fixture is left
            // for the server to judge.
            let listed = state
                .matches
                .matches
                .iter()
                .find(|m| m.home_team == home_team && m.away_team == away_team);
            if let Some(m) = listed.filter(|m| !m.predictable) {
                let note = if m.prediction_note.is_empty() {
                    NOT_PREDICTABLE.to_string()
                } else {
                    m.prediction_note.clone()
                };
                let _ = ui_tx
                    .send(UiUpdate::Prediction {
                        fixture,
                        panel: Panel::Empty(note),
                    })
                    .await;
                return;
            }

            let _ = ui_tx
                .send(UiUpdate::Prediction {
                    fixture,
                    panel: Panel::Loading,
                })
                .await;
            state.spawn_prediction(&home_team, &away_team);
        }
        UserCommand::LoadDiagnostics => {
            let _ = ui_tx.send(UiUpdate::Diagnostics(Panel::Loading)).await;
            state.request_diagnostics();
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
