// Keeper analysis builder: joins draft picks with projections and derives
// the keeper cost, eligibility, and value columns for every pick.
//
// The builder is a pure transform. It never drops a pick (a pick with no
// projection keeps null projection columns) and it preserves the pick
// order of the draft file; filtering and sorting belong to callers.

pub mod rules;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use self::rules::KeeperRules;
use crate::data::draft::DraftFile;
use crate::data::normalize_name;
use crate::data::projections::ProjectionRecord;

// ---------------------------------------------------------------------------
// Output row
// ---------------------------------------------------------------------------

/// One player's complete keeper picture: the draft facts, the joined
/// projection (when one matched), and the derived keeper columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeeperAnalysisRow {
    pub player_name: String,
    pub manager: String,
    pub draft_round: Option<u32>,
    pub overall_pick: Option<u32>,
    pub keeper_status: bool,
    pub keeper_eligible: bool,
    pub waiver_pickup: bool,
    /// Overall draft-market rank for next season; None when no projection
    /// row matched this player.
    pub projected_rank: Option<u32>,
    pub position_rank: Option<String>,
    pub projected_round: Option<u32>,
    pub keeper_round: Option<u32>,
    /// keeper_round - projected_round; None unless both sides are known.
    pub keeper_value: Option<i64>,
    /// Eligible and worth more than the league's value bar.
    pub valuable: bool,
}

impl KeeperAnalysisRow {
    /// The bare position label ("WR12" -> "WR"), when a projection matched.
    pub fn position(&self) -> Option<&str> {
        self.position_rank
            .as_deref()
            .map(crate::data::projections::position_label)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the full analysis: one row per draft pick, in draft-file order.
pub fn build_keeper_analysis(
    draft: &DraftFile,
    projections: &[ProjectionRecord],
    rules: &KeeperRules,
) -> Vec<KeeperAnalysisRow> {
    let by_name = index_by_name(projections);

    let mut unmatched = 0usize;
    let rows: Vec<KeeperAnalysisRow> = draft
        .draft_picks
        .iter()
        .map(|pick| {
            let projection = by_name.get(normalize_name(&pick.player_name).as_str()).copied();
            if projection.is_none() {
                unmatched += 1;
            }

            let keeper_round = rules.keeper_round(pick);
            let projected_round = projection.map(|p| rules.projected_round(p.rank));
            let keeper_value = match (projected_round, keeper_round) {
                (Some(projected), Some(cost)) => Some(rules.keeper_value(projected, cost)),
                _ => None,
            };
            let keeper_eligible = rules.eligible(pick);

            KeeperAnalysisRow {
                player_name: pick.player_name.clone(),
                manager: draft.manager_for(pick).to_string(),
                draft_round: pick.round,
                overall_pick: pick.overall_pick,
                keeper_status: pick.keeper_status,
                keeper_eligible,
                waiver_pickup: pick.waiver_pickup,
                projected_rank: projection.map(|p| p.rank),
                position_rank: projection.map(|p| p.position_rank.clone()),
                projected_round,
                keeper_round,
                keeper_value,
                valuable: keeper_eligible
                    && keeper_value.is_some_and(|value| rules.is_value(value)),
            }
        })
        .collect();

    if unmatched > 0 {
        debug!(
            "{unmatched} of {} picks have no projection row",
            rows.len()
        );
    }

    rows
}

/// Index projections by normalized name. Duplicate names keep the first
/// occurrence (file order), matching how the join resolves ambiguity.
fn index_by_name(projections: &[ProjectionRecord]) -> HashMap<String, &ProjectionRecord> {
    let mut by_name: HashMap<String, &ProjectionRecord> = HashMap::new();
    for record in projections {
        let key = normalize_name(&record.name);
        if by_name.contains_key(&key) {
            warn!("duplicate projection entry for '{}', keeping the first", record.name);
            continue;
        }
        by_name.insert(key, record);
    }
    by_name
}

/// Projection rows with no matching draft pick. They never enter keeper
/// reports but general projection views may show them.
pub fn unmatched_projections<'a>(
    draft: &DraftFile,
    projections: &'a [ProjectionRecord],
) -> Vec<&'a ProjectionRecord> {
    let drafted: std::collections::HashSet<String> = draft
        .draft_picks
        .iter()
        .map(|p| normalize_name(&p.player_name))
        .collect();
    projections
        .iter()
        .filter(|p| !drafted.contains(&normalize_name(&p.name)))
        .collect()
}

// ---------------------------------------------------------------------------
// Caller-side shaping
// ---------------------------------------------------------------------------

/// Sort rows by original overall pick, picks without one last. Stable, so
/// unpicked rows stay in file order among themselves.
pub fn sort_by_overall_pick(rows: &mut [KeeperAnalysisRow]) {
    rows.sort_by_key(|row| row.overall_pick.unwrap_or(u32::MAX));
}

/// Drop rows whose position is on the excluded list. Rows with no matched
/// projection have no position and are kept.
pub fn exclude_positions(
    rows: Vec<KeeperAnalysisRow>,
    excluded: &[String],
) -> Vec<KeeperAnalysisRow> {
    rows.into_iter()
        .filter(|row| match row.position() {
            Some(pos) => !excluded.iter().any(|ex| ex.eq_ignore_ascii_case(pos)),
            None => true,
        })
        .collect()
}

/// Sorted distinct manager names, for filter dropdowns.
pub fn managers(rows: &[KeeperAnalysisRow]) -> Vec<String> {
    let mut names: Vec<String> = rows.iter().map(|row| row.manager.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// A manager's eligible keepers ranked by value (best first), capped at
/// `limit`. Rows with unknown value sort last.
pub fn recommendations_for<'a>(
    rows: &'a [KeeperAnalysisRow],
    manager: &str,
    limit: usize,
) -> Vec<&'a KeeperAnalysisRow> {
    let mut candidates: Vec<&KeeperAnalysisRow> = rows
        .iter()
        .filter(|row| row.manager == manager && row.keeper_eligible)
        .collect();
    candidates.sort_by_key(|row| std::cmp::Reverse(row.keeper_value.unwrap_or(i64::MIN)));
    candidates.truncate(limit);
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
