// Integration tests for lol-keepers.
//
// These tests exercise the full system end-to-end using the library crate's
// public API: file loading, the analysis builder, the keeper rules, the CLI
// reports, the update-keeper mutation, and the web routes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lol_keepers::analysis::rules::KeeperRules;
use lol_keepers::analysis::{
    build_keeper_analysis, exclude_positions, managers, recommendations_for, sort_by_overall_pick,
    unmatched_projections,
};
use lol_keepers::cli::{toggle_keeper, ToggleOutcome};
use lol_keepers::config::{Config, DataPaths, KeeperConfig, LeagueConfig, ServerConfig};
use lol_keepers::data::draft::{DraftDataError, DraftFile};
use lol_keepers::data::projections::{self, ProjectionError};
use lol_keepers::{report, web};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn load_fixture_draft() -> DraftFile {
    DraftFile::load(&fixture("draft_results.json")).expect("fixture draft should load")
}

fn load_fixture_projections() -> Vec<lol_keepers::data::projections::ProjectionRecord> {
    projections::load_projections(&fixture("fantasy_pros.csv"))
        .expect("fixture projections should load")
}

fn default_rules() -> KeeperRules {
    KeeperRules::from_config(&KeeperConfig::default())
}

/// A config pointing at the fixture files.
fn fixture_config() -> Config {
    Config {
        league: LeagueConfig::default(),
        keeper: KeeperConfig::default(),
        data: DataPaths {
            draft_results: fixture("draft_results.json").display().to_string(),
            projections: fixture("fantasy_pros.csv").display().to_string(),
        },
        server: ServerConfig::default(),
    }
}

// ===========================================================================
// Builder properties
// ===========================================================================

#[test]
fn builder_emits_one_row_per_pick_in_file_order() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rows = build_keeper_analysis(&draft, &records, &default_rules());

    assert_eq!(rows.len(), draft.draft_picks.len());
    for (row, pick) in rows.iter().zip(&draft.draft_picks) {
        assert_eq!(row.player_name, pick.player_name);
    }
}

#[test]
fn builder_is_a_pure_function() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rules = default_rules();

    let first = build_keeper_analysis(&draft, &records, &rules);
    let second = build_keeper_analysis(&draft, &records, &rules);
    assert_eq!(first, second);
}

#[test]
fn join_is_case_insensitive_and_first_match_wins() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rows = build_keeper_analysis(&draft, &records, &default_rules());

    // "ELITE receiver" in the draft file joins "elite Receiver" in the CSV.
    let elite = rows.iter().find(|r| r.player_name == "ELITE receiver").unwrap();
    assert_eq!(elite.projected_rank, Some(3));

    // "Late Bloomer" appears twice in the CSV; the rank-15 row wins.
    let late = rows.iter().find(|r| r.player_name == "Late Bloomer").unwrap();
    assert_eq!(late.projected_rank, Some(15));
}

#[test]
fn pick_without_projection_keeps_null_columns() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rows = build_keeper_analysis(&draft, &records, &default_rules());

    let ghost = rows.iter().find(|r| r.player_name == "Ghost Player").unwrap();
    assert_eq!(ghost.projected_rank, None);
    assert_eq!(ghost.position_rank, None);
    assert_eq!(ghost.projected_round, None);
    assert_eq!(ghost.keeper_value, None);
    // Draft-side derivation is unaffected: round 5 keeps at round 4.
    assert_eq!(ghost.keeper_round, Some(4));
}

#[test]
fn derived_columns_match_the_league_rules() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rows = build_keeper_analysis(&draft, &records, &default_rules());

    // Round-9 pick, market rank 15 (round 2): +6 rounds of value.
    let late = rows.iter().find(|r| r.player_name == "Late Bloomer").unwrap();
    assert_eq!(late.keeper_round, Some(8));
    assert_eq!(late.projected_round, Some(2));
    assert_eq!(late.keeper_value, Some(6));
    assert!(late.valuable);

    // Waiver pickup keeps at round 5; kept this season, so ineligible and
    // never flagged valuable despite the +2 surplus.
    let waiver = rows.iter().find(|r| r.player_name == "Waiver Wonder").unwrap();
    assert_eq!(waiver.keeper_round, Some(5));
    assert_eq!(waiver.projected_round, Some(3));
    assert_eq!(waiver.keeper_value, Some(2));
    assert!(!waiver.keeper_eligible);
    assert!(!waiver.valuable);

    // Explicit file flag wins over the policy.
    let flagged = rows.iter().find(|r| r.player_name == "Flagged Guy").unwrap();
    assert!(!flagged.keeper_eligible);
}

#[test]
fn eligibility_is_deterministic_per_pick() {
    let draft = load_fixture_draft();
    let rules = default_rules();
    for pick in &draft.draft_picks {
        assert_eq!(rules.eligible(pick), rules.eligible(&pick.clone()));
    }
}

#[test]
fn shaping_sorts_and_excludes_positions() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let mut rows = build_keeper_analysis(&draft, &records, &default_rules());
    sort_by_overall_pick(&mut rows);

    // Undrafted waiver pickup sorts last.
    assert_eq!(rows.first().unwrap().player_name, "Star Runner");
    assert_eq!(rows.last().unwrap().player_name, "Waiver Wonder");

    let filtered = exclude_positions(rows, &KeeperConfig::default().excluded_positions);
    assert!(filtered.iter().all(|r| r.player_name != "Kick Master"));
    assert_eq!(filtered.len(), draft.draft_picks.len() - 1);
}

#[test]
fn unmatched_projections_are_the_undrafted_rows() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let extra = unmatched_projections(&draft, &records);

    let names: Vec<&str> = extra.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Undrafted Rookie"]);
}

#[test]
fn managers_and_recommendations() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rows = build_keeper_analysis(&draft, &records, &default_rules());

    assert_eq!(managers(&rows), vec!["Alex", "Jordan", "Sam"]);

    // Jordan's best eligible keeper is the round-9 bargain.
    let recs = recommendations_for(&rows, "Jordan", 5);
    assert_eq!(recs[0].player_name, "Late Bloomer");
}

// ===========================================================================
// Error taxonomy
// ===========================================================================

#[test]
fn missing_draft_file_is_file_not_found() {
    let err = DraftFile::load(Path::new("tests/fixtures/no_such_file.json")).unwrap_err();
    assert!(matches!(err, DraftDataError::FileNotFound { .. }));
}

#[test]
fn malformed_draft_json_is_a_format_error() {
    let tmp = std::env::temp_dir().join("keepers_it_bad_json");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("draft_results.json");
    std::fs::write(&path, "{\"draft_info\": oops").unwrap();

    let err = DraftFile::load(&path).unwrap_err();
    assert!(matches!(err, DraftDataError::Format { .. }));

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn duplicate_pick_is_invalid_data() {
    let tmp = std::env::temp_dir().join("keepers_it_dup_pick");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();

    let text = std::fs::read_to_string(fixture("draft_results.json")).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let picks = doc["draft_picks"].as_array_mut().unwrap();
    let dup = picks[0].clone();
    picks.push(dup);

    let path = tmp.join("draft_results.json");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    let err = DraftFile::load(&path).unwrap_err();
    assert!(matches!(err, DraftDataError::Invalid(_)));

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn malformed_projection_row_is_a_csv_error() {
    let err = projections::load_projections_from_str(
        "RK,PLAYER NAME,POS\n1,Good Player,WR1\nbad,Broken Row,RB1",
    )
    .unwrap_err();
    assert!(matches!(err, ProjectionError::Csv { .. }));
}

// ===========================================================================
// update-keeper mutation cycle
// ===========================================================================

#[test]
fn toggle_and_save_roundtrip() {
    let tmp = std::env::temp_dir().join("keepers_it_toggle");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("draft_results.json");
    std::fs::copy(fixture("draft_results.json"), &path).unwrap();

    let mut draft = DraftFile::load(&path).unwrap();
    let outcome = toggle_keeper(&mut draft, "late bloomer");
    assert_eq!(
        outcome,
        ToggleOutcome::Toggled {
            player_name: "Late Bloomer".to_string(),
            now_keeper: true,
        }
    );
    draft.save(&path).unwrap();

    let reloaded = DraftFile::load(&path).unwrap();
    let pick = reloaded
        .draft_picks
        .iter()
        .find(|p| p.player_name == "Late Bloomer")
        .unwrap();
    assert!(pick.keeper_status);
    // Unrelated records survive the rewrite untouched.
    assert!(!reloaded
        .draft_picks
        .iter()
        .find(|p| p.player_name == "Flagged Guy")
        .unwrap()
        .next_keeper_eligible);

    let _ = std::fs::remove_dir_all(&tmp);
}

// ===========================================================================
// CLI reports over fixtures
// ===========================================================================

#[test]
fn reports_render_the_fixture_league() {
    let draft = load_fixture_draft();
    let rules = default_rules();

    let summary = report::draft_summary(&draft, 2024);
    assert!(summary.contains("Total Teams: 3"));
    assert!(summary.contains("Total Players Drafted: 8"));
    assert!(summary.contains("Alpha Squad (Manager: Sam)"));

    let standings = report::league_standings(&draft, 2024);
    assert!(standings.find("Sam").unwrap() < standings.find("Jordan").unwrap());

    let roster = report::team_roster(&draft, "beta");
    assert!(roster.contains("Beta Bunch (Manager: Alex)"));
    assert!(roster.contains("Waiver/FA: Waiver Wonder (K)"));

    let keepers = report::list_keepers(&draft, 2024);
    assert!(keepers.contains("Star Runner"));
    assert!(keepers.contains("Waiver Wonder"));
    assert!(!keepers.contains("Ghost Player"));

    let eligible = report::eligible_keepers(&draft, &rules, 2024);
    assert!(eligible.contains("📊 Summary: 0/2 current keepers are eligible for 2025"));

    let ineligible = report::keeper_ineligible(&draft, &rules, 2024);
    assert!(ineligible.contains("Star Runner (2024 Keeper)"));
    assert!(ineligible.contains("Flagged Guy"));
}

#[test]
fn analysis_report_over_fixtures() {
    let draft = load_fixture_draft();
    let records = load_fixture_projections();
    let rules = default_rules();

    let mut rows = build_keeper_analysis(&draft, &records, &rules);
    sort_by_overall_pick(&mut rows);
    let rows = exclude_positions(rows, &KeeperConfig::default().excluded_positions);
    let unmatched = unmatched_projections(&draft, &records).len();

    let out = report::keeper_analysis(&rows, unmatched, 2024);
    assert!(out.contains("Total Players: 7"));
    assert!(out.contains("Players with 2025 rankings: 5/7"));
    assert!(out.contains("Ranked players nobody drafted: 1"));
    assert!(out.contains("💎 Best Keeper Values"));
    assert!(out.contains("Late Bloomer"));
    assert!(out.contains("+6 rounds value"));
}

// ===========================================================================
// Web surface over fixtures
// ===========================================================================

#[tokio::test]
async fn web_page_and_api_serve_the_fixture_league() {
    let routes = web::routes(Arc::new(fixture_config()));

    let resp = warp::test::request().path("/").reply(&routes).await;
    assert_eq!(resp.status(), 200);
    let body = String::from_utf8_lossy(resp.body());
    assert!(body.contains("<td>Star Runner</td>"));
    assert!(body.contains("<option>Jordan</option>"));
    assert!(!body.contains("Kick Master"));

    let resp = warp::test::request().path("/api/players").reply(&routes).await;
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["total_count"], 7);

    let resp = warp::test::request()
        .path("/api/keeper-recommendations/Jordan")
        .reply(&routes)
        .await;
    let json: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(json["recommendations"][0]["player_name"], "Late Bloomer");
}
