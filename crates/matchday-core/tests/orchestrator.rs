// End-to-end tests for the orchestrator loop, driven over its channels with
// an in-memory API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use matchday_core::api::wire::{
    DiagnosticsResponse, LeaguesResponse, MatchesResponse, PredictionResponse, TableResponse,
};
use matchday_core::api::{FetchError, LeagueApi};
use matchday_core::app::{self, AppState, NO_MATCHES, NO_STANDINGS, PREDICTION_UNAVAILABLE};
use matchday_core::config::{ApiConfig, Config, UiConfig};
use matchday_core::model::{MatchList, TeamStanding};
use matchday_core::protocol::{Panel, UiUpdate, UserCommand};
use matchday_core::table::{SortDirection, SortKey};
use reqwest::Url;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// "slow virtual" blocks until `release` is notified; "broken virtual"
/// fails every selection-scoped request; "quiet virtual" has no data;
/// "flaky virtual" fails while `outage` is set and serves data otherwise.
struct ScriptedApi {
    release: Arc<Notify>,
    outage: Arc<AtomicBool>,
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn table_row(position: u32, team: &str, points: u32, gf: u32, ga: u32) -> Value {
    json!({
        "position": position, "team_name": team, "points": points, "matches_played": 10,
        "wins": points / 3, "draws": points % 3, "losses": 0,
        "goals_for": gf, "goals_against": ga, "goal_difference": 999,
        "last_5_results": "W,W,D,L,W,W"
    })
}

#[async_trait]
impl LeagueApi for ScriptedApi {
    async fn leagues(&self) -> Result<LeaguesResponse, FetchError> {
        Ok(decode(json!({
            "leagues": [
                "premier league",
                {"value": "slow virtual", "display": "Slow Virtual League"},
                "broken virtual",
                "quiet virtual",
                "flaky virtual"
            ]
        })))
    }

    async fn matches(&self, league: &str) -> Result<MatchesResponse, FetchError> {
        if league == "flaky virtual" {
            if self.outage.load(Ordering::SeqCst) {
                return Err(FetchError::transport(
                    "/matches/flaky%20virtual",
                    None,
                    "connection refused",
                ));
            }
            return Ok(decode(json!({"matches": [
                {"home_team": "NEW", "away_team": "ERA", "type": "scheduled", "can_predict": true}
            ]})));
        }
        match league {
            "slow virtual" => {
                self.release.notified().await;
                Ok(decode(json!({"matches": [
                    {"home_team": "OLD", "away_team": "STALE", "type": "scheduled"}
                ]})))
            }
            "premier league" => Ok(decode(json!({
                "matches": [
                    {"home_team": "ARS", "away_team": "LEE", "type": "scheduled",
                     "match_time": "18:40", "can_predict": true, "event_id": 1},
                    {"home_team": "CHE", "away_team": "MUN", "type": "historical",
                     "can_predict": true, "event_id": "2"}
                ],
                "league_display": "Premier League",
                "league_standardized": "premier league"
            }))),
            "broken virtual" => Err(FetchError::transport(
                "/matches/broken%20virtual",
                Some(503),
                "server returned 503",
            )),
            _ => Ok(decode(json!({"matches": []}))),
        }
    }

    async fn league_table(&self, league: &str) -> Result<TableResponse, FetchError> {
        if league == "flaky virtual" {
            if self.outage.load(Ordering::SeqCst) {
                return Err(FetchError::transport(
                    "/league_table/flaky%20virtual",
                    None,
                    "connection refused",
                ));
            }
            return Ok(decode(json!({"league_table": [table_row(1, "NEW", 9, 6, 2)]})));
        }
        match league {
            "slow virtual" => {
                self.release.notified().await;
                Ok(decode(json!({"league_table": [table_row(1, "OLD", 3, 1, 0)]})))
            }
            "premier league" => Ok(decode(json!({"league_table": [
                table_row(1, "ARS", 30, 25, 7),
                table_row(2, "che", 21, 18, 10),
                table_row(3, "Bou", 10, 9, 20)
            ]}))),
            "broken virtual" => Err(FetchError::transport(
                "/league_table/broken%20virtual",
                Some(500),
                "server returned 500",
            )),
            _ => Ok(decode(json!({}))),
        }
    }

    async fn prediction(
        &self,
        _league: &str,
        home_team: &str,
        _away_team: &str,
    ) -> Result<PredictionResponse, FetchError> {
        if home_team == "CHE" {
            return Ok(decode(json!({})));
        }
        Ok(decode(json!({"prediction": {
            "home_team": home_team, "away_team": "LEE",
            "home_win_prob": 60.0, "draw_prob": 25.0, "away_win_prob": 15.0,
            "predicted_result": "1", "predicted_score": "2:0",
            "over_2_5": "Under", "btts": "No", "formatted": "ARS look strong"
        }})))
    }

    async fn diagnostics(&self) -> Result<DiagnosticsResponse, FetchError> {
        Ok(decode(json!({"database_status": {
            "scheduled_matches_count": 2,
            "completed_matches_count": 40,
            "league_tables_count": 3,
            "standardized_leagues": []
        }})))
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    release: Arc<Notify>,
    outage: Arc<AtomicBool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start() -> Self {
        let release = Arc::new(Notify::new());
        let outage = Arc::new(AtomicBool::new(true));
        let api = ScriptedApi {
            release: Arc::clone(&release),
            outage: Arc::clone(&outage),
        };
        let config = Config {
            api: ApiConfig {
                base_url: Url::parse("http://127.0.0.1:5000").unwrap(),
                timeout: Duration::from_secs(1),
                user_agent: "matchday-test".into(),
            },
            ui: UiConfig::default(),
        };
        let (fetch_tx, fetch_rx) = mpsc::channel(32);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, ui_rx) = mpsc::channel(128);
        let state = AppState::new(config, Arc::new(api), fetch_tx);
        let handle = tokio::spawn(app::run(fetch_rx, cmd_rx, ui_tx, state));
        Harness {
            cmd_tx,
            ui_rx,
            release,
            outage,
            handle,
        }
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    /// Receive updates until `pick` returns something, with a timeout.
    async fn next_matching<T>(&mut self, mut pick: impl FnMut(UiUpdate) -> Option<T>) -> T {
        let wait = async {
            loop {
                let update = self.ui_rx.recv().await.expect("ui channel closed");
                if let Some(found) = pick(update) {
                    return found;
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for update")
    }

    async fn settled_matches(&mut self) -> Panel<MatchList> {
        self.next_matching(|u| match u {
            UiUpdate::Matches(panel) if !panel.is_loading() => Some(panel),
            _ => None,
        })
        .await
    }

    async fn settled_standings(&mut self) -> Panel<Vec<TeamStanding>> {
        self.next_matching(|u| match u {
            UiUpdate::Standings { panel, .. } if !panel.is_loading() => Some(panel),
            _ => None,
        })
        .await
    }

    /// Both selection panels once they have left the loading state. The two
    /// fetches may complete in either order.
    async fn settled_selection(&mut self) -> (Panel<MatchList>, Panel<Vec<TeamStanding>>) {
        let mut matches = None;
        let mut standings = None;
        while matches.is_none() || standings.is_none() {
            self.next_matching(|u| match u {
                UiUpdate::Matches(panel) if !panel.is_loading() => {
                    matches = Some(panel);
                    Some(())
                }
                UiUpdate::Standings { panel, .. } if !panel.is_loading() => {
                    standings = Some(panel);
                    Some(())
                }
                _ => None,
            })
            .await;
        }
        (matches.unwrap(), standings.unwrap())
    }

    async fn wait_for_leagues(&mut self) {
        self.next_matching(|u| match u {
            UiUpdate::Leagues(Panel::Ready(leagues)) => Some(leagues),
            _ => None,
        })
        .await;
    }

    async fn shutdown(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        let result = self.handle.await.unwrap();
        assert!(result.is_ok());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leagues_get_display_labels() {
    let mut h = Harness::start();
    let leagues = h
        .next_matching(|u| match u {
            UiUpdate::Leagues(Panel::Ready(leagues)) => Some(leagues),
            _ => None,
        })
        .await;
    assert_eq!(leagues[0].display_name, "Premier League");
    assert_eq!(leagues[1].display_name, "Slow Virtual League");
    assert_eq!(leagues[2].identifier, "broken virtual");
    h.shutdown().await;
}

#[tokio::test]
async fn selecting_a_league_loads_matches_and_standings() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("premier league".into())).await;

    let selected = h
        .next_matching(|u| match u {
            UiUpdate::LeagueSelected(league) => Some(league),
            _ => None,
        })
        .await;
    assert_eq!(selected.display_name, "Premier League");

    let (matches, standings) = h.settled_selection().await;
    let Panel::Ready(list) = matches else {
        panic!("expected matches");
    };
    assert_eq!(list.matches.len(), 2);
    assert_eq!(list.matches[0].event_id, "1");
    assert_eq!(list.league_identifier.as_deref(), Some("premier league"));

    let Panel::Ready(rows) = standings else {
        panic!("expected standings");
    };
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(
            row.goal_difference,
            row.goals_for as i32 - row.goals_against as i32
        );
        assert!(row.recent_form.len() <= 5);
    }
    h.shutdown().await;
}

#[tokio::test]
async fn stale_selection_never_reaches_the_renderer() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;

    h.send(UserCommand::SelectLeague("slow virtual".into())).await;
    h.send(UserCommand::SelectLeague("premier league".into())).await;

    let (matches, standings) = h.settled_selection().await;
    let Panel::Ready(list) = matches else {
        panic!("expected matches for the newer selection");
    };
    assert_eq!(list.matches[0].home_team, "ARS");
    let Panel::Ready(rows) = standings else {
        panic!("expected standings for the newer selection");
    };
    assert_eq!(rows[0].team_name, "ARS");

    // Let the superseded fetches finish if they are still alive.
    h.release.notify_waiters();
    let late = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match h.ui_rx.recv().await {
                Some(UiUpdate::Matches(_)) | Some(UiUpdate::Standings { .. }) => return true,
                Some(_) => continue,
                None => return false,
            }
        }
    })
    .await;
    assert!(late.is_err(), "a stale selection result was rendered");
    h.shutdown().await;
}

#[tokio::test]
async fn empty_league_is_informational() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("quiet virtual".into())).await;

    let (matches, standings) = h.settled_selection().await;
    assert_eq!(matches, Panel::Empty(NO_MATCHES.to_string()));
    assert_eq!(standings, Panel::Empty(NO_STANDINGS.to_string()));
    h.shutdown().await;
}

#[tokio::test]
async fn transport_failure_is_an_error_state() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("broken virtual".into())).await;

    let (matches, standings) = h.settled_selection().await;
    assert!(matches!(matches, Panel::Failed(ref m) if m.starts_with("Failed to load matches")));
    assert!(matches!(standings, Panel::Failed(_)));
    assert_ne!(standings, Panel::Empty(NO_STANDINGS.to_string()));
    h.shutdown().await;
}

#[tokio::test]
async fn refresh_recovers_a_failed_selection() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("flaky virtual".into())).await;
    let (matches, standings) = h.settled_selection().await;
    assert!(matches!(matches, Panel::Failed(_)));
    assert!(matches!(standings, Panel::Failed(_)));

    h.outage.store(false, Ordering::SeqCst);
    h.send(UserCommand::Refresh).await;

    let first = h
        .next_matching(|u| match u {
            UiUpdate::Leagues(panel) => Some(panel),
            _ => None,
        })
        .await;
    assert!(first.is_loading());

    // The list reload and the re-selection run concurrently; collect all
    // four results in whatever order they land.
    let mut leagues = None;
    let mut reselected = None;
    let mut matches = None;
    let mut standings = None;
    while leagues.is_none() || reselected.is_none() || matches.is_none() || standings.is_none() {
        h.next_matching(|u| match u {
            UiUpdate::Leagues(Panel::Ready(list)) => {
                leagues = Some(list);
                Some(())
            }
            UiUpdate::LeagueSelected(league) => {
                reselected = Some(league);
                Some(())
            }
            UiUpdate::Matches(panel) if !panel.is_loading() => {
                matches = Some(panel);
                Some(())
            }
            UiUpdate::Standings { panel, .. } if !panel.is_loading() => {
                standings = Some(panel);
                Some(())
            }
            _ => None,
        })
        .await;
    }
    assert_eq!(leagues.unwrap().len(), 5);
    assert_eq!(reselected.unwrap().identifier, "flaky virtual");

    let Some(Panel::Ready(list)) = matches else {
        panic!("expected matches after refresh");
    };
    assert_eq!(list.matches[0].home_team, "NEW");
    let Some(Panel::Ready(rows)) = standings else {
        panic!("expected standings after refresh");
    };
    assert_eq!(rows[0].team_name, "NEW");
    h.shutdown().await;
}

#[tokio::test]
async fn sort_toggle_twice_reverses_order() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("premier league".into())).await;
    h.settled_standings().await;

    h.send(UserCommand::SortStandings(SortKey::TeamName)).await;
    let (rows, sort) = h
        .next_matching(|u| match u {
            UiUpdate::StandingsSorted { rows, sort } if !rows.is_empty() => Some((rows, sort)),
            _ => None,
        })
        .await;
    let names: Vec<_> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, ["ARS", "Bou", "che"]);
    assert_eq!(sort.direction, SortDirection::Ascending);

    h.send(UserCommand::SortStandings(SortKey::TeamName)).await;
    let (rows, sort) = h
        .next_matching(|u| match u {
            UiUpdate::StandingsSorted { rows, sort } if !rows.is_empty() => Some((rows, sort)),
            _ => None,
        })
        .await;
    let names: Vec<_> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, ["che", "Bou", "ARS"]);
    assert_eq!(sort.direction, SortDirection::Descending);
    h.shutdown().await;
}

#[tokio::test]
async fn prediction_ready_and_unavailable() {
    let mut h = Harness::start();
    h.wait_for_leagues().await;
    h.send(UserCommand::SelectLeague("premier league".into())).await;
    h.settled_matches().await;

    h.send(UserCommand::RequestPrediction {
        home_team: "ARS".into(),
        away_team: "LEE".into(),
    })
    .await;
    let (fixture, panel) = h
        .next_matching(|u| match u {
            UiUpdate::Prediction { fixture, panel } if !panel.is_loading() => Some((fixture, panel)),
            _ => None,
        })
        .await;
    assert_eq!(fixture, "ARS vs LEE");
    let Panel::Ready(prediction) = panel else {
        panic!("expected a prediction");
    };
    assert_eq!(prediction.predicted_score, "2:0");
    assert_eq!(prediction.result_label(), "Home win");

    h.send(UserCommand::RequestPrediction {
        home_team: "CHE".into(),
        away_team: "MUN".into(),
    })
    .await;
    let panel = h
        .next_matching(|u| match u {
            UiUpdate::Prediction { panel, .. } if !panel.is_loading() => Some(panel),
            _ => None,
        })
        .await;
    assert_eq!(panel, Panel::Empty(PREDICTION_UNAVAILABLE.to_string()));
    h.shutdown().await;
}

#[tokio::test]
async fn diagnostics_are_delivered() {
    let mut h = Harness::start();
    h.send(UserCommand::LoadDiagnostics).await;
    let diagnostics = h
        .next_matching(|u| match u {
            UiUpdate::Diagnostics(Panel::Ready(d)) => Some(d),
            _ => None,
        })
        .await;
    assert_eq!(diagnostics.completed_matches, 40);
    h.shutdown().await;
}
