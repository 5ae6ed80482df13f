// Sortable standings model.
//
// `StandingsTable` owns the last-loaded standings for one league plus the
// active sort. Operations consume the table and hand it back, so the owner
// (the app orchestrator) always holds exactly one explicit instance.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::TeamStanding;

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// A sortable standings column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Position,
    TeamName,
    Played,
    Wins,
    Draws,
    Losses,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    Points,
    RecentForm,
}

impl SortKey {
    /// Columns in display order.
    pub const ALL: [SortKey; 11] = [
        SortKey::Position,
        SortKey::TeamName,
        SortKey::Played,
        SortKey::Wins,
        SortKey::Draws,
        SortKey::Losses,
        SortKey::GoalsFor,
        SortKey::GoalsAgainst,
        SortKey::GoalDifference,
        SortKey::Points,
        SortKey::RecentForm,
    ];

    /// Numeric columns compare by value; the rest compare as
    /// case-insensitive text.
    pub fn is_numeric(self) -> bool {
        !matches!(self, SortKey::TeamName | SortKey::RecentForm)
    }

    /// Short column header.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Position => "#",
            SortKey::TeamName => "Team",
            SortKey::Played => "MP",
            SortKey::Wins => "W",
            SortKey::Draws => "D",
            SortKey::Losses => "L",
            SortKey::GoalsFor => "GF",
            SortKey::GoalsAgainst => "GA",
            SortKey::GoalDifference => "GD",
            SortKey::Points => "Pts",
            SortKey::RecentForm => "Form",
        }
    }

    /// Name used in config files.
    pub fn config_name(self) -> &'static str {
        match self {
            SortKey::Position => "position",
            SortKey::TeamName => "team_name",
            SortKey::Played => "played",
            SortKey::Wins => "wins",
            SortKey::Draws => "draws",
            SortKey::Losses => "losses",
            SortKey::GoalsFor => "goals_for",
            SortKey::GoalsAgainst => "goals_against",
            SortKey::GoalDifference => "goal_difference",
            SortKey::Points => "points",
            SortKey::RecentForm => "recent_form",
        }
    }

    fn numeric_value(self, row: &TeamStanding) -> i64 {
        match self {
            SortKey::Position => i64::from(row.position),
            SortKey::Played => i64::from(row.played),
            SortKey::Wins => i64::from(row.wins),
            SortKey::Draws => i64::from(row.draws),
            SortKey::Losses => i64::from(row.losses),
            SortKey::GoalsFor => i64::from(row.goals_for),
            SortKey::GoalsAgainst => i64::from(row.goals_against),
            SortKey::GoalDifference => i64::from(row.goal_difference),
            SortKey::Points => i64::from(row.points),
            SortKey::TeamName | SortKey::RecentForm => 0,
        }
    }

    /// Ascending comparison of two rows under this key.
    pub fn compare(self, a: &TeamStanding, b: &TeamStanding) -> Ordering {
        match self {
            SortKey::TeamName => cmp_ignore_case(&a.team_name, &b.team_name),
            SortKey::RecentForm => cmp_ignore_case(&a.form_string(), &b.form_string()),
            numeric => numeric.numeric_value(a).cmp(&numeric.numeric_value(b)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|k| k.config_name() == wanted)
            .ok_or_else(|| format!("unknown sort key `{s}`"))
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// ---------------------------------------------------------------------------
// SortState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        SortState {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Same key flips direction; a new key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            SortState {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            SortState::ascending(key)
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        SortState::ascending(SortKey::Position)
    }
}

// ---------------------------------------------------------------------------
// StandingsTable
// ---------------------------------------------------------------------------

/// Standings for the currently selected league under the active sort.
///
/// Ordering uses a stable sort: rows with equal keys keep their relative
/// order from before the sort.
#[derive(Debug, Clone, Default)]
pub struct StandingsTable {
    rows: Vec<TeamStanding>,
    sort: SortState,
}

impl StandingsTable {
    pub fn new(sort: SortState) -> Self {
        StandingsTable {
            rows: Vec::new(),
            sort,
        }
    }

    /// Replace the held rows wholesale. Goal difference is recomputed for
    /// every row and the current sort is applied to the new data; the sort
    /// state itself is left alone.
    pub fn load(mut self, standings: Vec<TeamStanding>) -> Self {
        self.rows = standings;
        for row in &mut self.rows {
            row.recompute_goal_difference();
        }
        self.apply_sort();
        self
    }

    /// Toggle the sort on `key` (see `SortState::toggled`) and reorder the
    /// rows in place.
    pub fn toggle_sort(mut self, key: SortKey) -> Self {
        self.sort = self.sort.toggled(key);
        self.apply_sort();
        self
    }

    pub fn rows(&self) -> &[TeamStanding] {
        &self.rows
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn apply_sort(&mut self) {
        let SortState { key, direction } = self.sort;
        self.rows.sort_by(|a, b| {
            let ord = key.compare(a, b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Presentation zones
// ---------------------------------------------------------------------------

/// Highlight band a row falls into, derived from league position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Top,
    Middle,
    Bottom,
}

/// Classify `position` in a table of `len` rows where the first and last
/// `band` positions are highlighted. Top wins when the bands overlap.
pub fn zone_for(position: u32, len: usize, band: usize) -> Zone {
    let position = position as usize;
    if position >= 1 && position <= band {
        Zone::Top
    } else if position > len.saturating_sub(band) {
        Zone::Bottom
    } else {
        Zone::Middle
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
