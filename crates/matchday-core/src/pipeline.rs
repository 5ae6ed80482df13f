// Data fetch pipeline: wire bodies in, normalized records out.
//
// Each `load_*` function performs one request through a `LeagueApi` and
// converts the body into the types in `crate::model`. Failures come back as
// `FetchError`; callers turn them into inline messages. Nothing here retries.

use tracing::debug;

use crate::api::client::LeagueApi;
use crate::api::error::FetchError;
use crate::api::wire::{
    WireForm, WireLeague, WireLeagueMapping, WireMatch, WireMatchKind, WirePrediction,
    WireStanding,
};
use crate::model::{
    DatabaseDiagnostics, FormResult, LeagueMapping, LeagueRef, MatchKind, MatchList,
    MatchSummary, PredictionOutcome, PredictionResult, StandingsList, TeamStanding,
    MAX_RECENT_FORM,
};

/// Shown for a scheduled match whose kick-off time is unknown.
const UNKNOWN_TIME: &str = "TBD";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Fetch the league list. Bare names get a title-cased display label;
/// `{value, display}` entries keep their display text verbatim.
pub async fn load_leagues(api: &dyn LeagueApi) -> Result<Vec<LeagueRef>, FetchError> {
    let body = api.leagues().await?;
    if let Some(count) = body.count {
        if count as usize != body.leagues.len() {
            debug!(count, actual = body.leagues.len(), "league count mismatch");
        }
    }
    Ok(body.leagues.into_iter().map(league_ref).collect())
}

/// Fetch matches for `league`. A missing or empty array is an empty list.
pub async fn load_matches(api: &dyn LeagueApi, league: &str) -> Result<MatchList, FetchError> {
    let body = api.matches(league).await?;
    Ok(MatchList {
        matches: body
            .matches
            .unwrap_or_default()
            .into_iter()
            .map(match_summary)
            .collect(),
        league_display_name: body.league_display,
        league_identifier: body.league_standardized,
    })
}

/// Fetch the league table for `league`, recomputing goal difference for
/// every row. Rows keep the server's order.
pub async fn load_standings(
    api: &dyn LeagueApi,
    league: &str,
) -> Result<StandingsList, FetchError> {
    let body = api.league_table(league).await?;
    Ok(StandingsList {
        standings: body
            .league_table
            .unwrap_or_default()
            .into_iter()
            .map(team_standing)
            .collect(),
        league_display_name: body.league_display,
        league_identifier: body.league_standardized,
    })
}

/// Fetch a prediction. A body without `prediction` means the server lacks
/// the history for this fixture.
pub async fn load_prediction(
    api: &dyn LeagueApi,
    league: &str,
    home_team: &str,
    away_team: &str,
) -> Result<PredictionOutcome, FetchError> {
    let body = api.prediction(league, home_team, away_team).await?;
    Ok(match body.prediction {
        Some(p) => PredictionOutcome::Ready(prediction_result(p)),
        None => PredictionOutcome::Unavailable,
    })
}

/// Fetch operator diagnostics from the debug endpoint.
pub async fn load_diagnostics(api: &dyn LeagueApi) -> Result<DatabaseDiagnostics, FetchError> {
    let status = api.diagnostics().await?.database_status;
    Ok(DatabaseDiagnostics {
        scheduled_matches: status.scheduled_matches_count,
        completed_matches: status.completed_matches_count,
        league_table_rows: status.league_tables_count,
        leagues: status
            .standardized_leagues
            .into_iter()
            .map(league_mapping)
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn league_ref(entry: WireLeague) -> LeagueRef {
    match entry {
        WireLeague::Name(name) => LeagueRef {
            display_name: title_case(&name),
            identifier: name,
        },
        WireLeague::Labeled { value, display } => LeagueRef {
            identifier: value,
            display_name: display,
        },
    }
}

fn match_summary(m: WireMatch) -> MatchSummary {
    let kind = match m.kind {
        WireMatchKind::Scheduled => MatchKind::Scheduled,
        WireMatchKind::Historical => MatchKind::Historical,
    };
    MatchSummary {
        home_team: m.home_team,
        away_team: m.away_team,
        event_id: m.event_id.unwrap_or_default(),
        kind,
        scheduled_time: m
            .match_time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TIME.to_string()),
        status: m.status,
        predictable: m.can_predict,
        prediction_note: m.prediction_note.unwrap_or_default(),
    }
}

fn team_standing(row: WireStanding) -> TeamStanding {
    let mut standing = TeamStanding {
        position: row.position,
        team_name: row.team_name,
        points: row.points,
        played: row.matches_played,
        wins: row.wins,
        draws: row.draws,
        losses: row.losses,
        goals_for: row.goals_for,
        goals_against: row.goals_against,
        goal_difference: 0,
        recent_form: row.last_5_results.map(parse_form).unwrap_or_default(),
    };
    standing.recompute_goal_difference();
    standing
}

fn prediction_result(p: WirePrediction) -> PredictionResult {
    PredictionResult {
        home_team: p.home_team,
        away_team: p.away_team,
        league_display: p.league_display,
        home_win_prob: p.home_win_prob,
        draw_prob: p.draw_prob,
        away_win_prob: p.away_win_prob,
        predicted_result: p.predicted_result,
        predicted_score: p.predicted_score,
        over_2_5: p.over_2_5,
        both_teams_score: p.btts,
        formatted_analysis: p.formatted,
    }
}

fn league_mapping(m: WireLeagueMapping) -> LeagueMapping {
    LeagueMapping {
        raw: m.raw,
        standardized: m.standardized,
        display: m.display,
    }
}

/// Uppercase the first letter of every word, leaving the rest untouched:
/// "premier league" -> "Premier League".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Read up to `MAX_RECENT_FORM` results, skipping separators and anything
/// that is not W, D or L.
pub fn parse_form(form: WireForm) -> Vec<FormResult> {
    match form {
        WireForm::Text(text) => text
            .chars()
            .filter_map(FormResult::from_char)
            .take(MAX_RECENT_FORM)
            .collect(),
        WireForm::List(items) => items
            .iter()
            .filter_map(|item| item.trim().chars().next().and_then(FormResult::from_char))
            .take(MAX_RECENT_FORM)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
