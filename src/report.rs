// Text reports for the CLI commands. Every report is a pure function to a
// String so tests can assert on output without capturing stdout.

use std::fmt::Write;

use crate::analysis::rules::KeeperRules;
use crate::analysis::KeeperAnalysisRow;
use crate::config::Config;
use crate::data::draft::{DraftFile, DraftPick};

// ---------------------------------------------------------------------------
// Shared formatting helpers
// ---------------------------------------------------------------------------

fn level_emoji(level: &str) -> &'static str {
    match level {
        "Platinum" => "🏆",
        "Gold" => "🥇",
        "Silver" => "🥈",
        "Bronze" => "🥉",
        _ => "",
    }
}

/// Capitalize the first letter, e.g. "snake" -> "Snake".
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// "Round  3 (Pick  27)" for drafted players, a flat label otherwise.
fn slot_label(pick: &DraftPick) -> String {
    match (pick.round, pick.overall_pick) {
        (Some(round), Some(overall)) => format!("Round {round:>2} (Pick {overall:>3})"),
        (Some(round), None) => format!("Round {round:>2}"),
        _ => "Waiver/FA".to_string(),
    }
}

/// Picks sorted by overall pick, undrafted entries last.
fn sorted_by_overall<'a>(mut picks: Vec<&'a DraftPick>) -> Vec<&'a DraftPick> {
    picks.sort_by_key(|p| p.overall_pick.unwrap_or(u32::MAX));
    picks
}

// ---------------------------------------------------------------------------
// Trivial commands
// ---------------------------------------------------------------------------

pub fn hello() -> String {
    "Hello World!".to_string()
}

pub fn status(config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LOL Keepers app is ready!");
    let _ = writeln!(out, "League: {}", config.league.name);
    let _ = writeln!(out, "Debug mode: {}", config.server.debug);
    let _ = writeln!(out, "Draft results: {}", config.data.draft_results);
    let _ = writeln!(out, "Projections: {}", config.data.projections);
    out
}

// ---------------------------------------------------------------------------
// Draft reports
// ---------------------------------------------------------------------------

pub fn draft_summary(draft: &DraftFile, season: i32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🏈 {season} Fantasy Football Draft Summary");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Total Teams: {}", draft.draft_info.total_teams);
    let _ = writeln!(out, "Total Rounds: {}", draft.draft_info.total_rounds);
    let _ = writeln!(out, "Draft Type: {}", title_case(&draft.draft_info.draft_type));
    if let Some(date) = draft.draft_info.draft_date {
        let _ = writeln!(out, "Draft Date: {date}");
    }
    let _ = writeln!(out, "Total Players Drafted: {}", draft.draft_picks.len());

    let _ = writeln!(out, "\n📋 Teams & Managers:");
    for team in &draft.teams {
        let _ = writeln!(
            out,
            "  {:2}. {} (Manager: {}) {}",
            team.team_id,
            team.team_name,
            team.manager,
            level_emoji(&team.level)
        );
    }
    out
}

pub fn league_standings(draft: &DraftFile, season: i32) -> String {
    let mut teams: Vec<_> = draft.teams.iter().collect();
    teams.sort_by_key(|t| t.rank);

    let mut out = String::new();
    let _ = writeln!(out, "🏆 League Standings - {season} Season");
    let _ = writeln!(out, "{}", "=".repeat(55));
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<25} {:<8} Level",
        "Rank", "Manager", "Team", "Rating"
    );
    let _ = writeln!(out, "{}", "-".repeat(55));

    for team in teams {
        let name: String = team.team_name.chars().take(24).collect();
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<25} {:<8} {} {}",
            team.rank,
            team.manager,
            name,
            team.rating,
            team.level,
            level_emoji(&team.level)
        );
    }
    out
}

pub fn team_roster(draft: &DraftFile, query: &str) -> String {
    let matches = draft.find_teams(query);

    if matches.is_empty() {
        return format!("❌ No team found matching '{query}'\n");
    }
    if matches.len() > 1 {
        let mut out = String::from("Multiple teams found:\n");
        for team in matches {
            let _ = writeln!(out, "  - {}", team.team_name);
        }
        return out;
    }

    let team = matches[0];
    let picks = sorted_by_overall(draft.picks_for_team(team.team_id));

    let mut out = String::new();
    let _ = writeln!(out, "\n🏈 {} (Manager: {})", team.team_name, team.manager);
    let _ = writeln!(
        out,
        "Rank: #{} | Rating: {} | Level: {}",
        team.rank, team.rating, team.level
    );
    let _ = writeln!(out, "{}", "=".repeat(60));
    for pick in picks {
        let keeper = if pick.keeper_status { " (K)" } else { "" };
        let _ = writeln!(out, "{}: {}{}", slot_label(pick), pick.player_name, keeper);
    }
    out
}

// ---------------------------------------------------------------------------
// Keeper reports
// ---------------------------------------------------------------------------

pub fn list_keepers(draft: &DraftFile, season: i32) -> String {
    let keepers = sorted_by_overall(draft.keepers());

    if keepers.is_empty() {
        return "📋 No keepers currently marked in the system.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "🔒 {season} League Keepers");
    let _ = writeln!(out, "{}", "=".repeat(50));
    for keeper in keepers {
        let _ = writeln!(out, "{}: {}", slot_label(keeper), keeper.player_name);
        let _ = writeln!(
            out,
            "    Team: {} (Manager: {})",
            keeper.drafting_team,
            draft.manager_for(keeper)
        );
    }
    out
}

pub fn eligible_keepers(draft: &DraftFile, rules: &KeeperRules, season: i32) -> String {
    let keepers = sorted_by_overall(draft.keepers());

    if keepers.is_empty() {
        return "📋 No keepers currently marked in the system.\n".to_string();
    }

    let next = season + 1;
    let mut out = String::new();
    let _ = writeln!(out, "🔒 {season} Keepers - {next} Eligibility Status");
    let _ = writeln!(out, "{}", "=".repeat(55));

    let mut eligible_count = 0usize;
    let total = keepers.len();
    for keeper in keepers {
        let verdict = if rules.eligible(keeper) {
            eligible_count += 1;
            "✅ Eligible"
        } else {
            "❌ NOT Eligible"
        };
        let _ = writeln!(out, "{}: {} - {}", slot_label(keeper), keeper.player_name, verdict);
        let _ = writeln!(
            out,
            "    Team: {} (Manager: {})",
            keeper.drafting_team,
            draft.manager_for(keeper)
        );
    }

    let _ = writeln!(
        out,
        "\n📊 Summary: {eligible_count}/{total} current keepers are eligible for {next}"
    );
    out
}

pub fn keeper_ineligible(draft: &DraftFile, rules: &KeeperRules, season: i32) -> String {
    let ineligible = sorted_by_overall(
        draft
            .draft_picks
            .iter()
            .filter(|p| !rules.eligible(p))
            .collect(),
    );

    let next = season + 1;
    if ineligible.is_empty() {
        return format!("📋 All players are eligible to be kept for {next}.\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "🚫 Players NOT Eligible for {next} Keepers");
    let _ = writeln!(out, "{}", "=".repeat(50));
    for pick in ineligible {
        let marker = if pick.keeper_status {
            format!(" ({season} Keeper)")
        } else {
            String::new()
        };
        let _ = writeln!(out, "{}: {}{}", slot_label(pick), pick.player_name, marker);
        let _ = writeln!(
            out,
            "    Team: {} (Manager: {})",
            pick.drafting_team,
            draft.manager_for(pick)
        );
    }
    out
}

/// The full analysis report. `rows` should already be shaped the way the
/// caller wants them shown (sorted by overall pick, excluded positions
/// removed); `unmatched_projections` is the count of projection rows with
/// no drafted player.
pub fn keeper_analysis(
    rows: &[KeeperAnalysisRow],
    unmatched_projections: usize,
    season: i32,
) -> String {
    let next = season + 1;
    let mut out = String::new();
    let _ = writeln!(out, "📊 Keeper Analysis - {season} vs {next} Projections");
    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "Total Players: {}", rows.len());

    let matched = rows.iter().filter(|r| r.projected_rank.is_some()).count();
    let _ = writeln!(out, "Players with {next} rankings: {matched}/{}", rows.len());
    if unmatched_projections > 0 {
        let _ = writeln!(
            out,
            "Ranked players nobody drafted: {unmatched_projections}"
        );
    }

    let keepers: Vec<&KeeperAnalysisRow> = rows.iter().filter(|r| r.keeper_status).collect();
    if !keepers.is_empty() {
        let _ = writeln!(out, "\n🔒 Current Keepers with {next} Projections:");
        let _ = writeln!(out, "{}", "-".repeat(80));
        for keeper in &keepers {
            let eligible = if keeper.keeper_eligible { "✅" } else { "❌" };
            let _ = writeln!(out, "{:<25} | {}", keeper.player_name, keeper.manager);

            let season_part = match keeper.draft_round {
                Some(round) => format!("{season}: R{round:>2}"),
                None => format!("{season}: Waiver/FA"),
            };
            let keeper_part = match keeper.keeper_round {
                Some(round) => format!("Keeper: R{round}"),
                None => "Keeper: n/a".to_string(),
            };
            match (keeper.projected_rank, &keeper.position_rank, keeper.projected_round) {
                (Some(rank), Some(pos), Some(round)) => {
                    let _ = writeln!(
                        out,
                        "  {season_part} | {next}: #{rank:>3} ({pos}) -> R{round} | {keeper_part} {eligible}"
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "  {season_part} | {next}: Not Ranked | {keeper_part} {eligible}"
                    );
                }
            }
        }
    }

    let mut valuable: Vec<&KeeperAnalysisRow> = rows.iter().filter(|r| r.valuable).collect();
    valuable.sort_by_key(|r| std::cmp::Reverse(r.keeper_value.unwrap_or(i64::MIN)));
    valuable.truncate(10);

    if !valuable.is_empty() {
        let _ = writeln!(
            out,
            "\n💎 Best Keeper Values (projected to go earlier than their keeper cost):"
        );
        let _ = writeln!(out, "{}", "-".repeat(50));
        for row in valuable {
            if let Some(value) = row.keeper_value {
                let _ = writeln!(out, "{:<25} | +{value} rounds value", row.player_name);
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
