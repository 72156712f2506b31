// Sleeper API gateway.
//
// Thin typed wrapper over the public Sleeper JSON endpoints. Pure I/O; all
// optional upstream fields are defaulted once at deserialization so the
// aggregation code never touches raw JSON. No retries, no caching: each run
// fetches every resource exactly once.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const SLEEPER_BASE: &str = "https://api.sleeper.app/v1";

pub type GatewayResult<T> = Result<T, GatewayError>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `GET /state/nfl`: current season and week.
#[derive(Debug, Clone, Deserialize)]
pub struct NflState {
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub season_type: String,
}

/// `GET /league/{id}`: league metadata. Only the fields the report needs.
#[derive(Debug, Clone, Deserialize)]
pub struct League {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: String,
}

/// A league participant.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A team slot in the league. `owner_id` may be absent (orphaned roster);
/// that degrades to a placeholder owner label downstream, never an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    pub roster_id: u64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<TeamMetadata>,
}

/// Optional team metadata carried by rosters and matchup entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

/// One roster's row in a weekly matchup. Two rows sharing a `matchup_id`
/// form a pairing; a lone row is a bye.
///
/// `players_points` deserializes into a `BTreeMap` so iteration order (and
/// therefore tie order in the top-performer list) is stable across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchupEntry {
    #[serde(default)]
    pub matchup_id: Option<u64>,
    pub roster_id: u64,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub players_points: BTreeMap<String, f64>,
    #[serde(default)]
    pub starters: Vec<String>,
    #[serde(default)]
    pub metadata: Option<TeamMetadata>,
}

impl RawMatchupEntry {
    pub fn team_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.team_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One entry in the `GET /players/nfl` dump. The full payload carries dozens
/// of fields per player; only the name parts matter here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEntry {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Best display name for a player entry: `full_name` when present, else
/// "first last" assembled from whichever parts exist.
pub(crate) fn player_display_name(entry: &PlayerEntry) -> Option<String> {
    if let Some(full) = entry.full_name.as_deref() {
        let full = full.trim();
        if !full.is_empty() {
            return Some(full.to_string());
        }
    }
    let first = entry.first_name.as_deref().unwrap_or("").trim();
    let last = entry.last_name.as_deref().unwrap_or("").trim();
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Upstream data source for one league week.
///
/// The orchestrator is written against this trait; `SleeperClient` is the
/// production implementation and tests substitute in-memory stubs.
#[async_trait]
pub trait LeagueGateway {
    async fn nfl_state(&self) -> GatewayResult<NflState>;
    async fn league(&self, league_id: &str) -> GatewayResult<League>;
    async fn users(&self, league_id: &str) -> GatewayResult<Vec<User>>;
    async fn rosters(&self, league_id: &str) -> GatewayResult<Vec<Roster>>;
    async fn matchups(&self, league_id: &str, week: u32) -> GatewayResult<Vec<RawMatchupEntry>>;
    /// Player-id to display-name table. Callers treat a failure here as
    /// recoverable and substitute an empty map.
    async fn player_names(&self) -> GatewayResult<HashMap<String, String>>;
}

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// HTTP client for the public Sleeper API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SleeperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SleeperClient {
    pub fn new() -> Self {
        Self::with_base_url(SLEEPER_BASE.to_string())
    }

    /// Point the client at a different base URL (used by tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Request {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode { url, source: e })
    }
}

#[async_trait]
impl LeagueGateway for SleeperClient {
    async fn nfl_state(&self) -> GatewayResult<NflState> {
        self.get("/state/nfl").await
    }

    async fn league(&self, league_id: &str) -> GatewayResult<League> {
        self.get(&format!("/league/{league_id}")).await
    }

    async fn users(&self, league_id: &str) -> GatewayResult<Vec<User>> {
        self.get(&format!("/league/{league_id}/users")).await
    }

    async fn rosters(&self, league_id: &str) -> GatewayResult<Vec<Roster>> {
        self.get(&format!("/league/{league_id}/rosters")).await
    }

    async fn matchups(&self, league_id: &str, week: u32) -> GatewayResult<Vec<RawMatchupEntry>> {
        self.get(&format!("/league/{league_id}/matchups/{week}"))
            .await
    }

    async fn player_names(&self) -> GatewayResult<HashMap<String, String>> {
        let players: HashMap<String, PlayerEntry> = self.get("/players/nfl").await?;
        let names = players
            .into_iter()
            .filter_map(|(id, entry)| player_display_name(&entry).map(|name| (id, name)))
            .collect();
        Ok(names)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
