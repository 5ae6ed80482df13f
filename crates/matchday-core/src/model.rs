// Normalized records handed to renderers.
//
// Everything in here is produced by the fetch pipeline from the API's wire
// shapes. Renderers never see wire types.

// ---------------------------------------------------------------------------
// Leagues
// ---------------------------------------------------------------------------

/// A league the API knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRef {
    /// Canonical key sent back to the API in request paths.
    pub identifier: String,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// An upcoming fixture.
    Scheduled,
    /// A completed fixture offered when nothing is scheduled.
    Historical,
}

impl MatchKind {
    pub fn label(self) -> &'static str {
        match self {
            MatchKind::Scheduled => "scheduled",
            MatchKind::Historical => "historical",
        }
    }
}

/// One match returned for a league.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub home_team: String,
    pub away_team: String,
    pub event_id: String,
    pub kind: MatchKind,
    pub scheduled_time: String,
    pub status: Option<String>,
    /// Server-computed; the client never derives this itself.
    pub predictable: bool,
    pub prediction_note: String,
}

impl MatchSummary {
    /// "HOME vs AWAY"
    pub fn fixture_label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// Result of `load_matches`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchList {
    pub matches: Vec<MatchSummary>,
    pub league_display_name: Option<String>,
    pub league_identifier: Option<String>,
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Maximum number of entries kept in `TeamStanding::recent_form`.
pub const MAX_RECENT_FORM: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    /// Parse a single result letter (case-insensitive). Anything other than
    /// W, D or L yields `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

/// One team's aggregate record within a league table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStanding {
    pub position: u32,
    pub team_name: String,
    pub points: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Always `goals_for - goals_against`; see `recompute_goal_difference`.
    pub goal_difference: i32,
    /// Most recent results in the order the server supplied them.
    pub recent_form: Vec<FormResult>,
}

impl TeamStanding {
    /// Derive `goal_difference` from the goal tallies.
    pub fn recompute_goal_difference(&mut self) {
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
    }

    /// Recent form as a compact string, e.g. "WDLWW".
    pub fn form_string(&self) -> String {
        self.recent_form.iter().map(|r| r.as_char()).collect()
    }
}

/// Result of `load_standings`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandingsList {
    pub standings: Vec<TeamStanding>,
    pub league_display_name: Option<String>,
    pub league_identifier: Option<String>,
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

/// A server-generated prediction for one fixture. Probabilities are
/// percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub league_display: Option<String>,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub predicted_result: String,
    pub predicted_score: String,
    pub over_2_5: String,
    pub both_teams_score: String,
    pub formatted_analysis: String,
}

impl PredictionResult {
    /// Sum of the three outcome probabilities (should be close to 100).
    pub fn probability_total(&self) -> f64 {
        self.home_win_prob + self.draw_prob + self.away_win_prob
    }

    /// Human label for `predicted_result` ("1", "X", "2").
    pub fn result_label(&self) -> &str {
        match self.predicted_result.as_str() {
            "1" => "Home win",
            "X" | "x" => "Draw",
            "2" => "Away win",
            other => other,
        }
    }
}

/// `load_prediction` either yields a prediction or reports that the server
/// lacks the history to make one. Neither is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Ready(PredictionResult),
    Unavailable,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// How one raw league name from the data source maps to its canonical and
/// display forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueMapping {
    pub raw: String,
    pub standardized: String,
    pub display: String,
}

/// Aggregate counts reported by the diagnostic endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseDiagnostics {
    pub scheduled_matches: u64,
    pub completed_matches: u64,
    pub league_table_rows: u64,
    pub leagues: Vec<LeagueMapping>,
}
