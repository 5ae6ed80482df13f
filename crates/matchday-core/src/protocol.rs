// Messages exchanged between the orchestrator, its fetch tasks, and the
// renderer.
//
// Flow:
//   renderer --UserCommand--> app::run --spawn--> fetch task
//   fetch task --FetchEvent--> app::run --UiUpdate--> renderer

use chrono::{DateTime, Local};

use crate::api::error::FetchError;
use crate::model::{
    DatabaseDiagnostics, LeagueRef, MatchList, PredictionOutcome, PredictionResult,
    StandingsList, TeamStanding,
};
use crate::table::{SortKey, SortState};

// ---------------------------------------------------------------------------
// Panel state
// ---------------------------------------------------------------------------

/// Presentation state of one display region.
///
/// `Empty` is informational ("no matches", "insufficient data") and must be
/// rendered differently from `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Idle,
    Loading,
    Ready(T),
    Empty(String),
    Failed(String),
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel::Idle
    }
}

impl<T> Panel<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer -> orchestrator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Reload the league list and re-select the current league.
    Refresh,
    /// Select a league by identifier.
    SelectLeague(String),
    /// Toggle the standings sort on a column.
    SortStandings(SortKey),
    /// Fetch a prediction for a match in the current league.
    RequestPrediction {
        home_team: String,
        away_team: String,
    },
    LoadDiagnostics,
    Quit,
}

// ---------------------------------------------------------------------------
// Orchestrator -> renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Leagues(Panel<Vec<LeagueRef>>),
    LeagueSelected(LeagueRef),
    Matches(Panel<MatchList>),
    /// Standings after a load (or a load starting/failing).
    Standings {
        panel: Panel<Vec<TeamStanding>>,
        sort: SortState,
    },
    /// Rows re-ordered by a sort toggle. Only meaningful when the standings
    /// panel already holds rows; the sort indicator always follows `sort`.
    StandingsSorted {
        rows: Vec<TeamStanding>,
        sort: SortState,
    },
    Prediction {
        fixture: String,
        panel: Panel<PredictionResult>,
    },
    Diagnostics(Panel<DatabaseDiagnostics>),
    /// The league list was refreshed successfully at this time.
    Refreshed(DateTime<Local>),
}

// ---------------------------------------------------------------------------
// Fetch task -> orchestrator
// ---------------------------------------------------------------------------

/// Completion of a spawned fetch. Selection-scoped results carry the
/// generation they were issued under.
#[derive(Debug)]
pub enum FetchEvent {
    Leagues(Result<Vec<LeagueRef>, FetchError>),
    Matches {
        generation: u64,
        result: Result<MatchList, FetchError>,
    },
    Standings {
        generation: u64,
        result: Result<StandingsList, FetchError>,
    },
    Prediction {
        generation: u64,
        fixture: String,
        result: Result<PredictionOutcome, FetchError>,
    },
    Diagnostics(Result<DatabaseDiagnostics, FetchError>),
}
