// Integration tests for the weekly report pipeline.
//
// These tests exercise the library crate's public API end-to-end with an
// in-memory gateway: fetch sequencing and defaults, owner resolution through
// configured alias tables, matchup projection, and the written Markdown
// artifact. No network access is involved.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use reqwest::StatusCode;

use sleeper_gazette::app;
use sleeper_gazette::config::{
    Config, CredentialsConfig, LeagueConfig, LlmConfig, OwnerAliases, ReportConfig,
};
use sleeper_gazette::markdown;
use sleeper_gazette::sleeper::{
    GatewayError, GatewayResult, League, LeagueGateway, NflState, RawMatchupEntry, Roster,
    TeamMetadata, User,
};

// ===========================================================================
// Test helpers
// ===========================================================================

/// In-memory gateway serving canned league data.
struct StubGateway {
    state_week: u32,
    users: Vec<User>,
    rosters: Vec<Roster>,
    matchups: Vec<RawMatchupEntry>,
    player_names: Option<HashMap<String, String>>,
}

impl StubGateway {
    fn new(matchups: Vec<RawMatchupEntry>) -> Self {
        Self {
            state_week: 3,
            users: vec![
                test_user("u1", "alice", "alice_ff"),
                test_user("u2", "bob", "bobby"),
            ],
            rosters: vec![test_roster(1, Some("u1")), test_roster(2, Some("u2"))],
            matchups,
            player_names: Some(HashMap::new()),
        }
    }
}

#[async_trait]
impl LeagueGateway for StubGateway {
    async fn nfl_state(&self) -> GatewayResult<NflState> {
        Ok(NflState {
            season: "2025".into(),
            week: self.state_week,
            season_type: "regular".into(),
        })
    }

    async fn league(&self, _league_id: &str) -> GatewayResult<League> {
        Ok(League {
            name: "Backyard Bowl".into(),
            season: "2025".into(),
        })
    }

    async fn users(&self, _league_id: &str) -> GatewayResult<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn rosters(&self, _league_id: &str) -> GatewayResult<Vec<Roster>> {
        Ok(self.rosters.clone())
    }

    async fn matchups(&self, _league_id: &str, _week: u32) -> GatewayResult<Vec<RawMatchupEntry>> {
        Ok(self.matchups.clone())
    }

    async fn player_names(&self) -> GatewayResult<HashMap<String, String>> {
        match &self.player_names {
            Some(names) => Ok(names.clone()),
            None => Err(GatewayError::Status {
                url: "stub://players/nfl".into(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }),
        }
    }
}

fn test_user(id: &str, display_name: &str, username: &str) -> User {
    User {
        user_id: id.to_string(),
        display_name: Some(display_name.to_string()),
        username: Some(username.to_string()),
    }
}

fn test_roster(roster_id: u64, owner_id: Option<&str>) -> Roster {
    Roster {
        roster_id,
        owner_id: owner_id.map(str::to_string),
        metadata: None,
    }
}

fn test_entry(matchup_id: u64, roster_id: u64, points: f64) -> RawMatchupEntry {
    RawMatchupEntry {
        matchup_id: Some(matchup_id),
        roster_id,
        points,
        players_points: BTreeMap::new(),
        starters: Vec::new(),
        metadata: None,
    }
}

fn test_config() -> Config {
    Config {
        league: LeagueConfig {
            id: "league-1".into(),
        },
        report: ReportConfig {
            week: None,
            output_dir: "reports".into(),
            tone: "witty".into(),
            language: "en".into(),
        },
        llm: LlmConfig {
            model: "claude-sonnet-4-5-20250929".into(),
            max_tokens: 800,
        },
        owners: OwnerAliases::default(),
        credentials: CredentialsConfig {
            anthropic_api_key: Some("sk-ant-test-key".into()),
        },
    }
}

// ===========================================================================
// Payload assembly
// ===========================================================================

#[tokio::test]
async fn assembles_scenario_payload() {
    let mut home = test_entry(1, 1, 100.5);
    home.players_points =
        BTreeMap::from([("p1".to_string(), 30.0), ("p2".to_string(), 20.0)]);
    let mut away = test_entry(1, 2, 95.25);
    away.players_points = BTreeMap::from([("p3".to_string(), 25.0)]);

    // Away-first input order: home/away assignment must come from roster ids.
    let gateway = StubGateway::new(vec![away, home]);
    let config = test_config();

    let payload = app::assemble_payload(&gateway, &config).await.unwrap();

    assert_eq!(payload.league_name, "Backyard Bowl");
    assert_eq!(payload.season, "2025");
    assert_eq!(payload.week, 3);
    assert_eq!(payload.matchups.len(), 1);

    let m = &payload.matchups[0];
    assert_eq!(m.home.owner, "ALICE");
    assert!((m.home.points - 100.5).abs() < f64::EPSILON);
    assert_eq!(m.home.top, vec!["p1 (30.0)", "p2 (20.0)"]);

    let away = m.away.as_ref().expect("two entries form a full pairing");
    assert_eq!(away.owner, "BOB");
    assert!((away.points - 95.25).abs() < f64::EPSILON);
    assert_eq!(away.top, vec!["p3 (25.0)"]);
}

#[tokio::test]
async fn configured_week_overrides_state_week() {
    let gateway = StubGateway::new(vec![test_entry(1, 1, 10.0)]);
    let mut config = test_config();
    config.report.week = Some(13);

    let payload = app::assemble_payload(&gateway, &config).await.unwrap();
    assert_eq!(payload.week, 13);
}

#[tokio::test]
async fn missing_week_falls_back_to_state_week() {
    let mut gateway = StubGateway::new(vec![test_entry(1, 1, 10.0)]);
    gateway.state_week = 7;

    let payload = app::assemble_payload(&gateway, &test_config())
        .await
        .unwrap();
    assert_eq!(payload.week, 7);
}

#[tokio::test]
async fn player_name_failure_degrades_to_raw_ids() {
    let mut entry = test_entry(1, 1, 50.0);
    entry.starters = vec!["4046".into(), "6794".into()];
    entry.players_points = BTreeMap::from([("4046".to_string(), 28.9)]);

    let mut gateway = StubGateway::new(vec![entry]);
    gateway.player_names = None; // lookup fails; the run must not

    let payload = app::assemble_payload(&gateway, &test_config())
        .await
        .unwrap();
    let home = &payload.matchups[0].home;
    assert_eq!(home.starters, vec!["4046", "6794"]);
    assert_eq!(home.top, vec!["4046 (28.9)"]);
}

#[tokio::test]
async fn alias_tables_from_config_drive_owner_labels() {
    let mut entry = test_entry(1, 1, 80.0);
    entry.metadata = Some(TeamMetadata {
        team_name: Some("Mudville Nine".into()),
    });

    let gateway = StubGateway::new(vec![entry, test_entry(1, 2, 70.0)]);
    let mut config = test_config();
    config
        .owners
        .team_names
        .insert("Mudville Nine".into(), "Casey".into());
    config.owners.aliases.insert("bobby".into(), "Bobby K".into());

    let payload = app::assemble_payload(&gateway, &config).await.unwrap();
    let m = &payload.matchups[0];
    assert_eq!(m.home.owner, "Casey");
    assert_eq!(m.away.as_ref().unwrap().owner, "Bobby K");
}

#[tokio::test]
async fn bye_pairing_survives_end_to_end() {
    let gateway = StubGateway::new(vec![test_entry(4, 2, 66.6)]);

    let payload = app::assemble_payload(&gateway, &test_config())
        .await
        .unwrap();
    assert_eq!(payload.matchups.len(), 1);
    assert_eq!(payload.matchups[0].home.team_name, "Team 2");
    assert!(payload.matchups[0].away.is_none());
}

#[tokio::test]
async fn malformed_matchup_row_fails_the_run() {
    let mut entry = test_entry(1, 1, 10.0);
    entry.matchup_id = None;
    let gateway = StubGateway::new(vec![entry]);

    let err = app::assemble_payload(&gateway, &test_config())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("malformed"));
}

// ===========================================================================
// Written artifact
// ===========================================================================

#[tokio::test]
async fn written_report_has_front_matter_and_padded_name() {
    let gateway = StubGateway::new(vec![test_entry(1, 1, 100.0)]);
    let mut config = test_config();
    config.report.week = Some(3);

    let payload = app::assemble_payload(&gateway, &config).await.unwrap();

    let tmp = std::env::temp_dir().join("gazette_pipeline_artifact");
    let _ = std::fs::remove_dir_all(&tmp);

    let path = markdown::write_report(&tmp, payload.week, "The report body.").unwrap();
    assert!(path.ends_with("week-03.md"));

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("---"));
    assert_eq!(lines.next(), Some("title: \"Week 3 – Weekly Report\""));
    assert!(lines.next().unwrap().starts_with("generated: \""));
    assert_eq!(lines.next(), Some("---"));
    assert!(content.ends_with("The report body.\n"));

    let _ = std::fs::remove_dir_all(&tmp);
}
