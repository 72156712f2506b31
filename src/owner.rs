// Owner label resolution.
//
// Sleeper team names and usernames drift over the season (people rename
// teams and accounts), so a roster is labeled through a layered, best-effort
// lookup rather than a single exact key. Alias tables are plain configuration
// injected at construction; an empty table degrades labeling quality only.

use std::collections::HashMap;

use crate::config::OwnerAliases;

/// Placeholder label when no input yields anything usable.
pub const UNKNOWN_OWNER: &str = "UNKNOWN";

/// Resolves a roster's display label from curated alias tables with a
/// deterministic fallback chain. Never fails, never returns an empty string.
#[derive(Debug, Clone, Default)]
pub struct OwnerResolver {
    /// Known team names, keyed lower-cased.
    team_names: HashMap<String, String>,
    /// Catch-all table, probed with team name, display name, and username.
    aliases: HashMap<String, String>,
}

impl OwnerResolver {
    pub fn new(
        team_names: &HashMap<String, String>,
        aliases: &HashMap<String, String>,
    ) -> Self {
        Self {
            team_names: normalize_keys(team_names),
            aliases: normalize_keys(aliases),
        }
    }

    pub fn from_config(owners: &OwnerAliases) -> Self {
        Self::new(&owners.team_names, &owners.aliases)
    }

    /// Resolve an owner label.
    ///
    /// Precedence (first match wins, comparison case-insensitive and
    /// whitespace-trimmed):
    /// 1. team-name table, probed with the team name
    /// 2. alias table, probed with team name, then display name, then username
    /// 3. upper-cased display name
    /// 4. upper-cased username
    /// 5. `UNKNOWN`
    ///
    /// Alias hits keep their configured casing; the upper-cased fallbacks make
    /// unresolved labels visually distinct from curated ones.
    pub fn resolve(
        &self,
        team_name: Option<&str>,
        display_name: Option<&str>,
        username: Option<&str>,
    ) -> String {
        if let Some(key) = team_name.and_then(normalize) {
            if let Some(label) = self.team_names.get(&key) {
                return label.clone();
            }
        }

        let candidates = [team_name, display_name, username]
            .into_iter()
            .filter_map(|value| value.and_then(normalize));
        for key in candidates {
            if let Some(label) = self.aliases.get(&key) {
                return label.clone();
            }
        }

        for fallback in [display_name, username] {
            if let Some(value) = fallback {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_uppercase();
                }
            }
        }

        UNKNOWN_OWNER.to_string()
    }
}

/// Lower-case and trim a lookup candidate; empty inputs are skipped entirely.
fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn normalize_keys(table: &HashMap<String, String>) -> HashMap<String, String> {
    table
        .iter()
        .filter_map(|(key, label)| normalize(key).map(|k| (k, label.clone())))
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
