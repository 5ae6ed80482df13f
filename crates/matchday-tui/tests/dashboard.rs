// Dashboard tests: keys go through the input handler to a live orchestrator,
// updates come back into a ViewState, and the frame is rendered into a
// TestBackend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use matchday_core::api::wire::{
    DiagnosticsResponse, LeaguesResponse, MatchesResponse, PredictionResponse, TableResponse,
};
use matchday_core::api::{FetchError, LeagueApi};
use matchday_core::app::{self, AppState};
use matchday_core::config::{ApiConfig, Config, UiConfig};
use matchday_core::protocol::{Panel, UiUpdate, UserCommand};
use matchday_tui::tui::{apply_ui_update, input, render_frame, Focus, ViewState};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use reqwest::Url;
use serde_json::json;
use tokio::sync::mpsc;

struct DemoApi;

#[async_trait]
impl LeagueApi for DemoApi {
    async fn leagues(&self) -> Result<LeaguesResponse, FetchError> {
        Ok(serde_json::from_value(json!({"leagues": ["england virtual", "italy virtual"]})).unwrap())
    }

    async fn matches(&self, league: &str) -> Result<MatchesResponse, FetchError> {
        if league == "italy virtual" {
            return Err(FetchError::transport("/matches/italy%20virtual", Some(502), "bad gateway"));
        }
        Ok(serde_json::from_value(json!({
            "matches": [
                {"home_team": "ARS", "away_team": "LEE", "type": "scheduled", "match_time": "18:40",
                 "can_predict": true, "prediction_note": "Based on 12 historical matches"}
            ],
            "league_display": "England Virtual League"
        }))
        .unwrap())
    }

    async fn league_table(&self, league: &str) -> Result<TableResponse, FetchError> {
        if league == "italy virtual" {
            return Ok(serde_json::from_value(json!({"league_table": []})).unwrap());
        }
        Ok(serde_json::from_value(json!({"league_table": [
            {"position": 1, "team_name": "ARS", "points": 30, "matches_played": 12, "wins": 9,
             "draws": 3, "losses": 0, "goals_for": 25, "goals_against": 7, "last_5_results": "WWDWW"},
            {"position": 2, "team_name": "LEE", "points": 4, "matches_played": 12, "wins": 1,
             "draws": 1, "losses": 10, "goals_for": 6, "goals_against": 30, "last_5_results": "LLDLL"}
        ]}))
        .unwrap())
    }

    async fn prediction(
        &self,
        _league: &str,
        _home: &str,
        _away: &str,
    ) -> Result<PredictionResponse, FetchError> {
        Ok(serde_json::from_value(json!({"prediction": {
            "home_win_prob": 61.0, "draw_prob": 22.0, "away_win_prob": 17.0,
            "predicted_result": "1", "predicted_score": "2:0",
            "over_2_5": "Under", "btts": "No", "formatted": "Home side in form"
        }}))
        .unwrap())
    }

    async fn diagnostics(&self) -> Result<DiagnosticsResponse, FetchError> {
        Err(FetchError::transport("/debug/database", None, "connection refused"))
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

struct Session {
    view: ViewState,
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
}

impl Session {
    fn start() -> Self {
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
        let state = AppState::new(config, Arc::new(DemoApi), fetch_tx);
        tokio::spawn(app::run(fetch_rx, cmd_rx, ui_tx, state));
        Session {
            view: ViewState::new("http://127.0.0.1:5000/", 1),
            cmd_tx,
            ui_rx,
        }
    }

    /// Feed a key through the input handler, forwarding any command.
    async fn press(&mut self, code: KeyCode) {
        if let Some(cmd) = input::handle_key(key(code), &mut self.view) {
            self.cmd_tx.send(cmd).await.unwrap();
        }
    }

    /// Apply updates until `done` holds for the view.
    async fn pump_until(&mut self, done: impl Fn(&ViewState) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done(&self.view) {
                let update = self.ui_rx.recv().await.expect("orchestrator stopped");
                apply_ui_update(&mut self.view, update);
            }
        })
        .await
        .expect("timed out waiting for the view");
    }

    fn screen(&self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(150, 40)).unwrap();
        terminal.draw(|frame| render_frame(frame, &self.view)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(150)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn select_first_league(&mut self) {
        self.pump_until(|v| v.league_count() == 2).await;
        self.press(KeyCode::Enter).await;
        self.pump_until(|v| {
            !v.matches.is_loading()
                && !v.standings.is_loading()
                && !matches!(v.matches, Panel::Idle)
                && !matches!(v.standings, Panel::Idle)
        })
        .await;
    }
}

#[tokio::test]
async fn selecting_a_league_fills_the_dashboard() {
    let mut s = Session::start();
    s.select_first_league().await;

    let screen = s.screen();
    assert!(screen.contains("England Virtual"));
    assert!(screen.contains("Matches - England Virtual League"));
    assert!(screen.contains("18:40  ARS vs LEE"));
    assert!(screen.contains("Standings - England Virtual League"));
    assert!(screen.contains("+18"));
    assert!(screen.contains("-24"));
    assert!(screen.contains("#▲"));
    assert!(screen.contains("Updated"));
}

#[tokio::test]
async fn sort_keys_reorder_the_table() {
    let mut s = Session::start();
    s.select_first_league().await;

    s.press(KeyCode::Tab).await;
    s.press(KeyCode::Tab).await;
    assert_eq!(s.view.focus, Focus::Standings);

    // '0' sorts by points, ascending first.
    s.press(KeyCode::Char('0')).await;
    s.pump_until(|v| v.standings.ready().is_some_and(|rows| rows[0].team_name == "LEE"))
        .await;
    assert!(s.screen().contains("Pts▲"));

    s.press(KeyCode::Char('0')).await;
    s.pump_until(|v| v.standings.ready().is_some_and(|rows| rows[0].team_name == "ARS"))
        .await;
    assert!(s.screen().contains("Pts▼"));
}

#[tokio::test]
async fn enter_on_a_match_shows_its_prediction() {
    let mut s = Session::start();
    s.select_first_league().await;

    s.press(KeyCode::Tab).await;
    s.press(KeyCode::Enter).await;
    s.pump_until(|v| v.prediction.ready().is_some()).await;

    let screen = s.screen();
    assert!(screen.contains("Prediction - ARS vs LEE"));
    assert!(screen.contains("Score: 2:0"));
    assert!(screen.contains("Home side in form"));
}

#[tokio::test]
async fn failure_and_empty_states_render_differently() {
    let mut s = Session::start();
    s.pump_until(|v| v.league_count() == 2).await;
    s.press(KeyCode::Down).await;
    s.press(KeyCode::Enter).await;
    s.pump_until(|v| {
        matches!(v.matches, Panel::Failed(_)) && matches!(v.standings, Panel::Empty(_))
    })
    .await;

    let screen = s.screen();
    assert!(screen.contains("Failed to load matches."));
    assert!(screen.contains("No league table data available."));
}

#[tokio::test]
async fn diagnostics_overlay_reports_errors() {
    let mut s = Session::start();
    s.press(KeyCode::Char('d')).await;
    s.pump_until(|v| matches!(v.diagnostics, Panel::Failed(_))).await;

    let screen = s.screen();
    assert!(screen.contains("Server diagnostics"));
    assert!(screen.contains("Could not reach the server"));

    s.press(KeyCode::Esc).await;
    assert!(!s.view.show_diagnostics);
}
