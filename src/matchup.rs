// Matchup grouping and projection.
//
// Takes the raw per-roster matchup rows for one week and produces the
// head-to-head view the report is written from: a deterministic home/away
// assignment, resolved owner labels, named starters, and a ranked
// top-performer list per side. Every missing or malformed field degrades to
// a documented default; only a row without its grouping key aborts the run.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

use crate::owner::OwnerResolver;
use crate::sleeper::{RawMatchupEntry, Roster, User};

/// Team label for the missing side of a single-entry pairing.
pub const BYE_TEAM_LABEL: &str = "BYE / n/a";

/// How many top performers each side lists.
const TOP_PERFORMER_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataShapeError {
    #[error("matchup entry for roster {roster_id} has no matchup_id")]
    MissingMatchupId { roster_id: u64 },
}

// ---------------------------------------------------------------------------
// Projection types
// ---------------------------------------------------------------------------

/// One side of a pairing, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupSide {
    pub team_name: String,
    pub owner: String,
    pub points: f64,
    pub starters: Vec<String>,
    /// At most three entries, formatted `"{name} ({points})"` with one
    /// decimal, sorted by descending contributed points.
    pub top: Vec<String>,
}

/// A head-to-head pairing. `away` is `None` on a bye week.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupProjection {
    pub home: MatchupSide,
    pub away: Option<MatchupSide>,
}

/// The renderer's input: everything the prompt may reference.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub league_name: String,
    pub season: String,
    pub week: u32,
    pub matchups: Vec<MatchupProjection>,
}

/// Owner-name inputs for one roster, joined from users and rosters.
#[derive(Debug, Clone, Default)]
pub struct OwnerInfo {
    pub display_name: Option<String>,
    pub username: Option<String>,
}

// ---------------------------------------------------------------------------
// Owner lookup
// ---------------------------------------------------------------------------

/// Join users onto rosters by `owner_id`, keyed by `roster_id`.
///
/// A roster whose owner cannot be found still gets an (empty) entry so the
/// projection always resolves to some label downstream.
pub fn owner_lookup(users: &[User], rosters: &[Roster]) -> HashMap<u64, OwnerInfo> {
    let users_by_id: HashMap<&str, &User> = users
        .iter()
        .map(|user| (user.user_id.as_str(), user))
        .collect();

    rosters
        .iter()
        .map(|roster| {
            let info = roster
                .owner_id
                .as_deref()
                .and_then(|owner_id| users_by_id.get(owner_id))
                .map(|user| OwnerInfo {
                    display_name: user.display_name.clone(),
                    username: user.username.clone(),
                })
                .unwrap_or_default();
            (roster.roster_id, info)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Grouping and projection
// ---------------------------------------------------------------------------

/// Partition entries by `matchup_id`, preserving first-seen id order.
///
/// The output order drives the numbering in the rendered report, so it must
/// be stable for identical input regardless of how many entries each pairing
/// has.
fn group_by_matchup(
    entries: &[RawMatchupEntry],
) -> Result<Vec<Vec<&RawMatchupEntry>>, DataShapeError> {
    let mut order: Vec<u64> = Vec::new();
    let mut groups: HashMap<u64, Vec<&RawMatchupEntry>> = HashMap::new();

    for entry in entries {
        let id = entry.matchup_id.ok_or(DataShapeError::MissingMatchupId {
            roster_id: entry.roster_id,
        })?;
        let group = groups.entry(id).or_default();
        if group.is_empty() {
            order.push(id);
        }
        group.push(entry);
    }

    Ok(order
        .into_iter()
        .map(|id| groups.remove(&id).unwrap_or_default())
        .collect())
}

/// Build the full projection for one week of raw matchup rows.
///
/// `owners` comes from [`owner_lookup`]; `player_names` may be empty, in
/// which case starters and top performers fall back to raw player ids.
pub fn project_matchups(
    entries: &[RawMatchupEntry],
    owners: &HashMap<u64, OwnerInfo>,
    resolver: &OwnerResolver,
    player_names: &HashMap<String, String>,
) -> Result<Vec<MatchupProjection>, DataShapeError> {
    let groups = group_by_matchup(entries)?;

    let projections = groups
        .into_iter()
        .filter_map(|group| {
            let (first, second) = match group.as_slice() {
                [only] => (*only, None),
                [a, b, ..] => {
                    // Smaller roster_id is home, whatever the input order.
                    if a.roster_id <= b.roster_id {
                        (*a, Some(*b))
                    } else {
                        (*b, Some(*a))
                    }
                }
                [] => return None,
            };

            Some(MatchupProjection {
                home: project_side(first, owners, resolver, player_names),
                away: second.map(|entry| project_side(entry, owners, resolver, player_names)),
            })
        })
        .collect();

    Ok(projections)
}

/// Project a single roster's row into a renderable side.
fn project_side(
    entry: &RawMatchupEntry,
    owners: &HashMap<u64, OwnerInfo>,
    resolver: &OwnerResolver,
    player_names: &HashMap<String, String>,
) -> MatchupSide {
    let team_name = entry
        .team_name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Team {}", entry.roster_id));

    let info = owners.get(&entry.roster_id).cloned().unwrap_or_default();
    let owner = resolver.resolve(
        entry.team_name(),
        info.display_name.as_deref(),
        info.username.as_deref(),
    );

    MatchupSide {
        team_name,
        owner,
        points: sanitize_points(entry.points),
        starters: starter_names(&entry.starters, player_names),
        top: top_performers(&entry.players_points, player_names),
    }
}

/// Coerce a score to a finite value; anything else renders as 0.0.
fn sanitize_points(points: f64) -> f64 {
    if points.is_finite() {
        points
    } else {
        0.0
    }
}

/// Map starter ids to display names, keeping the raw id when no name is
/// known. Never drops a starter.
fn starter_names(starters: &[String], player_names: &HashMap<String, String>) -> Vec<String> {
    starters
        .iter()
        .map(|id| player_names.get(id).cloned().unwrap_or_else(|| id.clone()))
        .collect()
}

/// Rank the per-player point contributions and render the top three.
///
/// Ties keep the map's iteration order, which is stable because the wire
/// type stores `players_points` in a `BTreeMap`.
fn top_performers(
    players_points: &BTreeMap<String, f64>,
    player_names: &HashMap<String, String>,
) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = players_points
        .iter()
        .map(|(id, points)| (id, sanitize_points(*points)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .take(TOP_PERFORMER_COUNT)
        .map(|(id, points)| {
            let name = player_names.get(id).cloned().unwrap_or_else(|| id.clone());
            format!("{name} ({points:.1})")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
