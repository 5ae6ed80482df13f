// HTTP client for the prediction server.
//
// `LeagueApi` is the seam between the pipeline and the network: the HTTP
// implementation below talks to the real server, tests plug in an
// in-memory fake. Every method returns the raw wire body; normalization
// lives in `crate::pipeline`.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::FetchError;
use super::wire::{
    DiagnosticsResponse, LeaguesResponse, MatchesResponse, PredictionResponse, TableResponse,
};
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// LeagueApi
// ---------------------------------------------------------------------------

/// The five read-only exchanges the client performs.
#[async_trait]
pub trait LeagueApi: Send + Sync {
    async fn leagues(&self) -> Result<LeaguesResponse, FetchError>;

    async fn matches(&self, league: &str) -> Result<MatchesResponse, FetchError>;

    async fn league_table(&self, league: &str) -> Result<TableResponse, FetchError>;

    async fn prediction(
        &self,
        league: &str,
        home_team: &str,
        away_team: &str,
    ) -> Result<PredictionResponse, FetchError>;

    async fn diagnostics(&self) -> Result<DiagnosticsResponse, FetchError>;
}

// ---------------------------------------------------------------------------
// HttpLeagueApi
// ---------------------------------------------------------------------------

/// `LeagueApi` over HTTP using a shared reqwest client.
pub struct HttpLeagueApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpLeagueApi {
    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Join `segments` onto the base URL. Each segment is percent-encoded on
    /// its own, so league and team names containing spaces or slashes stay a
    /// single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch(&self, segments: &[&str]) -> Result<RawResponse, FetchError> {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(&path, None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(&path, Some(status.as_u16()), e.to_string()))?;

        debug!(%path, status = status.as_u16(), bytes = body.len(), "response received");
        Ok(RawResponse { path, status, body })
    }
}

#[async_trait]
impl LeagueApi for HttpLeagueApi {
    async fn leagues(&self) -> Result<LeaguesResponse, FetchError> {
        self.fetch(&["leagues"]).await?.into_json()
    }

    async fn matches(&self, league: &str) -> Result<MatchesResponse, FetchError> {
        self.fetch(&["matches", league]).await?.into_json()
    }

    async fn league_table(&self, league: &str) -> Result<TableResponse, FetchError> {
        self.fetch(&["league_table", league]).await?.into_json()
    }

    async fn prediction(
        &self,
        league: &str,
        home_team: &str,
        away_team: &str,
    ) -> Result<PredictionResponse, FetchError> {
        let raw = self.fetch(&["predict", league, home_team, away_team]).await?;

        // "Not enough history" comes back as a 400 with an error body.
        if raw.status == StatusCode::BAD_REQUEST {
            if let Ok(body) = serde_json::from_str::<PredictionResponse>(&raw.body) {
                if body.reports_insufficient_data() {
                    return Ok(PredictionResponse {
                        prediction: None,
                        error: body.error,
                    });
                }
            }
        }

        raw.into_json()
    }

    async fn diagnostics(&self) -> Result<DiagnosticsResponse, FetchError> {
        self.fetch(&["debug", "database"]).await?.into_json()
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

struct RawResponse {
    path: String,
    status: StatusCode,
    body: String,
}

impl RawResponse {
    /// Non-success statuses are transport failures; bodies that do not
    /// decode into `T` are shape failures.
    fn into_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        if !self.status.is_success() {
            return Err(FetchError::transport(
                self.path,
                Some(self.status.as_u16()),
                format!("server returned {}", self.status),
            ));
        }
        decode(&self.path, &self.body)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::invalid_shape(path, e.to_string()))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
