// Prompt templates for the weekly report.
//
// Constructs compact, structured prompts for the Claude API. The user prompt
// carries every number the report may cite so the model focuses on narrative
// rather than arithmetic, and the system prompt pins tone, language, and the
// rule that the supplied data is the only source of truth.

use crate::matchup::{MatchupSide, ReportPayload, BYE_TEAM_LABEL};
use crate::owner::UNKNOWN_OWNER;

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

/// Return the system prompt for the report generation call.
///
/// `tone` is one of `neutral`, `witty`, `trash`; `language` is `de` or `en`.
/// Unknown values fall back to the witty German register, matching the
/// config defaults.
pub fn system_prompt(tone: &str, language: &str) -> String {
    let style = match tone {
        "trash" => {
            "Cheeky and loose with short punchlines, but never insulting. \
             Sports slang is welcome."
        }
        "neutral" => "Matter-of-fact and compact, in a sports-journalism register.",
        _ => "Relaxed and humorous, short sentences, sports-journalism register.",
    };
    let lang = match language {
        "en" => "English",
        _ => "German",
    };

    format!(
        "You are a sports editor writing fantasy football weekly reports.\n\
         Write in {lang}. Style: {style}\n\
         Rules:\n\
         - Write 3-6 sentences per matchup.\n\
         - Use concrete player and team names, scores, and standout performances.\n\
         - One punchy headline per matchup (max 8 words).\n\
         - No insults, no accusations, no over-the-top trash talk.\n\
         - Stick to the data you are given (never invent statistics)."
    )
}

// ---------------------------------------------------------------------------
// User prompt
// ---------------------------------------------------------------------------

/// Build the user prompt from the aggregated weekly payload.
pub fn build_user_prompt(payload: &ReportPayload) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "League: {}\nSeason: {}\nWeek: {}\n\nMatchups:\n",
        payload.league_name, payload.season, payload.week
    ));

    for (i, matchup) in payload.matchups.iter().enumerate() {
        prompt.push_str(&format!("#{}\n", i + 1));
        push_side(&mut prompt, "Home", &matchup.home);
        match &matchup.away {
            Some(away) => push_side(&mut prompt, "Away", away),
            None => {
                prompt.push_str(&format!(
                    "Away: {BYE_TEAM_LABEL} ({UNKNOWN_OWNER}) - 0.00 Pts\nTop: -\n"
                ));
            }
        }
        prompt.push_str(&format!(
            "Starters(Home): {}\n",
            join_or_dash(&matchup.home.starters)
        ));
        let away_starters = matchup
            .away
            .as_ref()
            .map(|side| join_or_dash(&side.starters))
            .unwrap_or_else(|| "-".to_string());
        prompt.push_str(&format!("Starters(Away): {away_starters}\n---\n"));
    }

    prompt.push_str(&format!(
        "\nTask: produce the weekly report as one Markdown block.\n\
         Structure:\n\
         - H1: \"Week {} – Weekly Report\"\n\
         - Then per matchup:\n\
         \x20 - H2: \"Matchup #N – Home vs Away (Score)\"\n\
         \x20 - H3: a short headline\n\
         \x20 - One paragraph (3-6 sentences)\n\
         - At the end: 3 bullet points \"Notable Performances\" (league-wide), \
         based on the top performers",
        payload.week
    ));

    prompt
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn push_side(prompt: &mut String, label: &str, side: &MatchupSide) {
    prompt.push_str(&format!(
        "{label}: {} ({}) - {:.2} Pts\nTop: {}\n",
        side.team_name,
        side.owner,
        side.points,
        join_or_dash(&side.top)
    ));
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::{MatchupProjection, MatchupSide};

    fn side(team: &str, owner: &str, points: f64) -> MatchupSide {
        MatchupSide {
            team_name: team.to_string(),
            owner: owner.to_string(),
            points,
            starters: vec!["Josh Allen".into(), "CeeDee Lamb".into()],
            top: vec!["Josh Allen (30.0)".into()],
        }
    }

    fn payload(matchups: Vec<MatchupProjection>) -> ReportPayload {
        ReportPayload {
            league_name: "Test League".into(),
            season: "2025".into(),
            week: 4,
            matchups,
        }
    }

    // ---- System prompt ----

    #[test]
    fn system_prompt_varies_by_tone() {
        let neutral = system_prompt("neutral", "en");
        let witty = system_prompt("witty", "en");
        let trash = system_prompt("trash", "en");
        assert!(neutral.contains("Matter-of-fact"));
        assert!(witty.contains("humorous"));
        assert!(trash.contains("punchlines"));
        assert_ne!(neutral, witty);
        assert_ne!(witty, trash);
    }

    #[test]
    fn system_prompt_selects_language() {
        assert!(system_prompt("witty", "de").contains("Write in German"));
        assert!(system_prompt("witty", "en").contains("Write in English"));
    }

    #[test]
    fn system_prompt_pins_data_to_payload() {
        let sp = system_prompt("neutral", "en");
        assert!(sp.contains("never invent statistics"));
        assert!(sp.contains("max 8 words"));
    }

    // ---- User prompt ----

    #[test]
    fn user_prompt_contains_header_and_sides() {
        let p = payload(vec![MatchupProjection {
            home: side("Alpha", "ALICE", 100.5),
            away: Some(side("Beta", "BOB", 95.25)),
        }]);
        let prompt = build_user_prompt(&p);

        assert!(prompt.contains("League: Test League"));
        assert!(prompt.contains("Season: 2025"));
        assert!(prompt.contains("Week: 4"));
        assert!(prompt.contains("#1"));
        assert!(prompt.contains("Home: Alpha (ALICE) - 100.50 Pts"));
        assert!(prompt.contains("Away: Beta (BOB) - 95.25 Pts"));
        assert!(prompt.contains("Starters(Home): Josh Allen, CeeDee Lamb"));
        assert!(prompt.contains("Week 4 – Weekly Report"));
        assert!(prompt.contains("Notable Performances"));
    }

    #[test]
    fn user_prompt_renders_bye_placeholder() {
        let p = payload(vec![MatchupProjection {
            home: side("Lonely", "ZOE", 60.0),
            away: None,
        }]);
        let prompt = build_user_prompt(&p);

        assert!(prompt.contains("Away: BYE / n/a (UNKNOWN) - 0.00 Pts"));
        assert!(prompt.contains("Starters(Away): -"));
    }

    #[test]
    fn user_prompt_renders_dash_for_empty_lists() {
        let mut home = side("Alpha", "ALICE", 0.0);
        home.starters.clear();
        home.top.clear();
        let p = payload(vec![MatchupProjection { home, away: None }]);
        let prompt = build_user_prompt(&p);

        assert!(prompt.contains("Top: -"));
        assert!(prompt.contains("Starters(Home): -"));
    }

    #[test]
    fn user_prompt_numbers_multiple_matchups() {
        let p = payload(vec![
            MatchupProjection {
                home: side("A", "A1", 1.0),
                away: Some(side("B", "B1", 2.0)),
            },
            MatchupProjection {
                home: side("C", "C1", 3.0),
                away: Some(side("D", "D1", 4.0)),
            },
        ]);
        let prompt = build_user_prompt(&p);
        assert!(prompt.contains("#1"));
        assert!(prompt.contains("#2"));
    }
}
