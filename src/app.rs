// Run orchestration.
//
// One invocation handles exactly one league week: fetch every upstream
// resource in a fixed sequence, aggregate, make a single generate call, and
// write the report file. Only the player-name lookup and quota exhaustion
// are recoverable; every other failure propagates and the process exits
// non-zero without writing anything.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm::client::{ClaudeClient, LlmError};
use crate::llm::prompt;
use crate::markdown;
use crate::matchup::{self, ReportPayload};
use crate::owner::OwnerResolver;
use crate::sleeper::{LeagueGateway, SleeperClient};

/// Fetch all upstream resources for the target week and aggregate them into
/// the renderer payload.
///
/// Fetch order is fixed: state, league, users, rosters, matchups, player
/// names. The player-name fetch is best-effort; its failure is downgraded to
/// an empty map here, where the default is visible, rather than deep inside
/// the aggregation.
pub async fn assemble_payload<G: LeagueGateway>(
    gateway: &G,
    config: &Config,
) -> anyhow::Result<ReportPayload> {
    let state = gateway
        .nfl_state()
        .await
        .context("failed to fetch league state")?;
    let week = config.report.week.unwrap_or(state.week);

    let league_id = config.league.id.as_str();
    let league = gateway
        .league(league_id)
        .await
        .context("failed to fetch league")?;
    let users = gateway
        .users(league_id)
        .await
        .context("failed to fetch users")?;
    let rosters = gateway
        .rosters(league_id)
        .await
        .context("failed to fetch rosters")?;
    let entries = gateway
        .matchups(league_id, week)
        .await
        .context("failed to fetch matchups")?;

    let player_names = match gateway.player_names().await {
        Ok(names) => names,
        Err(e) => {
            warn!("player name lookup failed, falling back to raw ids: {e}");
            HashMap::new()
        }
    };

    let owners = matchup::owner_lookup(&users, &rosters);
    let resolver = OwnerResolver::from_config(&config.owners);
    let matchups = matchup::project_matchups(&entries, &owners, &resolver, &player_names)
        .context("matchup data is malformed")?;

    info!(week, pairings = matchups.len(), "aggregated matchups");

    Ok(ReportPayload {
        league_name: league.name,
        season: state.season,
        week,
        matchups,
    })
}

/// Turn the payload into report prose via one generate call.
///
/// Quota exhaustion still produces an artifact: a notice plus the raw
/// structured payload for human review. Any other API failure is fatal.
pub async fn render_report(
    payload: &ReportPayload,
    llm: &ClaudeClient,
    config: &Config,
) -> anyhow::Result<String> {
    let system = prompt::system_prompt(&config.report.tone, &config.report.language);
    let user = prompt::build_user_prompt(payload);

    match llm.complete(&system, &user, config.llm.max_tokens).await {
        Ok(text) => Ok(text),
        Err(LlmError::QuotaExhausted { message }) => {
            warn!("generate call hit quota limits, writing raw payload instead: {message}");
            quota_fallback(payload)
        }
        Err(e) => Err(e).context("report generation failed"),
    }
}

/// Substitute body for the report when no prose could be generated.
fn quota_fallback(payload: &ReportPayload) -> anyhow::Result<String> {
    let raw = serde_json::to_string_pretty(payload)
        .context("failed to serialize matchup payload for the fallback report")?;
    Ok(format!(
        "*Note: generative API quota exhausted. No prose this week.*\n\nMatchups (raw data):\n{raw}"
    ))
}

/// Execute one full run and return the path of the written report.
pub async fn run(config: &Config) -> anyhow::Result<PathBuf> {
    let gateway = SleeperClient::new();
    // Validation guarantees the key is present; the empty default is unreachable.
    let api_key = config
        .credentials
        .anthropic_api_key
        .clone()
        .unwrap_or_default();
    let llm = ClaudeClient::new(api_key, config.llm.model.clone());

    let payload = assemble_payload(&gateway, config).await?;
    let text = render_report(&payload, &llm, config).await?;

    let path = markdown::write_report(Path::new(&config.report.output_dir), payload.week, &text)
        .context("failed to write report file")?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
