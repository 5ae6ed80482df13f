// Response bodies exactly as the prediction server sends them.
//
// Only the fields the client consumes are declared; serde ignores the rest
// (the server also sends aliases such as MP/GD/Pts and sample rows).
// Required fields are what make a body "well shaped": a missing one turns
// into `FetchError::InvalidShape` at decode time.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// GET /leagues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<WireLeague>,
    /// Informational only; the array length is authoritative.
    #[serde(default)]
    pub count: Option<u64>,
}

/// Older servers send bare names, newer ones send `{value, display}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireLeague {
    Name(String),
    Labeled { value: String, display: String },
}

// ---------------------------------------------------------------------------
// GET /matches/{league}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Option<Vec<WireMatch>>,
    #[serde(default)]
    pub league_display: Option<String>,
    #[serde(default)]
    pub league_standardized: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMatch {
    pub home_team: String,
    pub away_team: String,
    #[serde(rename = "type")]
    pub kind: WireMatchKind,
    #[serde(default)]
    pub match_time: Option<String>,
    #[serde(default)]
    pub can_predict: bool,
    #[serde(default)]
    pub prediction_note: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMatchKind {
    Scheduled,
    Historical,
}

// ---------------------------------------------------------------------------
// GET /league_table/{league}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TableResponse {
    #[serde(default)]
    pub league_table: Option<Vec<WireStanding>>,
    #[serde(default)]
    pub league_display: Option<String>,
    #[serde(default)]
    pub league_standardized: Option<String>,
}

/// `goal_difference` is deliberately absent: it is recomputed locally.
#[derive(Debug, Clone, Deserialize)]
pub struct WireStanding {
    pub position: u32,
    pub team_name: String,
    pub points: u32,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    #[serde(default)]
    pub last_5_results: Option<WireForm>,
}

/// Recent form arrives as "WWDLW" / "W,D,L" or as `["W", "D"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireForm {
    Text(String),
    List(Vec<String>),
}

// ---------------------------------------------------------------------------
// GET /predict/{league}/{home}/{away}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub prediction: Option<WirePrediction>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictionResponse {
    /// The server answers 400 with an `error` text when it lacks history
    /// for the fixture.
    pub fn reports_insufficient_data(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| e.to_ascii_lowercase().contains("insufficient"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePrediction {
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub predicted_result: String,
    pub predicted_score: String,
    pub over_2_5: String,
    pub btts: String,
    #[serde(default)]
    pub formatted: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub league_display: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /debug/database
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsResponse {
    pub database_status: WireDatabaseStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDatabaseStatus {
    pub scheduled_matches_count: u64,
    pub completed_matches_count: u64,
    pub league_tables_count: u64,
    #[serde(default)]
    pub standardized_leagues: Vec<WireLeagueMapping>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLeagueMapping {
    #[serde(deserialize_with = "string_or_null")]
    pub raw: String,
    pub standardized: String,
    pub display: String,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Event ids are strings from the scraper but integers from older rows.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
