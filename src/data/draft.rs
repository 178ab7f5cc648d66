// Draft results: the JSON snapshot of who was drafted, by whom, and each
// player's current keeper flag. Also the write target for `update-keeper`,
// the one mutating command.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::normalize_name;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DraftDataError {
    #[error("draft results file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("malformed draft results in {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid draft data: {0}")]
    Invalid(String),

    #[error("failed to write draft results to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// File model (external contract)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftFile {
    pub draft_info: DraftInfo,
    pub teams: Vec<Team>,
    pub draft_picks: Vec<DraftPick>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftInfo {
    pub total_teams: u32,
    pub total_rounds: u32,
    /// e.g. "snake" or "auction"; reports title-case it for display.
    pub draft_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: u32,
    pub team_name: String,
    pub manager: String,
    /// Final league rank for the recorded season.
    pub rank: u32,
    pub rating: u32,
    /// Tier label: "Platinum", "Gold", "Silver", "Bronze".
    pub level: String,
}

/// A single draft pick record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    pub player_name: String,
    /// Display name of the drafting team (fallback when the team table has
    /// no entry for `team_id`).
    pub drafting_team: String,
    pub team_id: u32,
    /// Absent for players acquired outside the draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_pick: Option<u32>,
    /// Whether the player is currently marked as a keeper.
    pub keeper_status: bool,
    /// Explicit league ruling on next-season eligibility. Defaults to true;
    /// a false here is final regardless of the eligibility policy.
    #[serde(rename = "2025_keeper_eligible", default = "default_true")]
    pub next_keeper_eligible: bool,
    #[serde(default)]
    pub waiver_pickup: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading / saving
// ---------------------------------------------------------------------------

impl DraftFile {
    /// Load and validate draft results from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DraftDataError> {
        let text = std::fs::read_to_string(path).map_err(|_| DraftDataError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let file = Self::parse(&text).map_err(|e| DraftDataError::Format {
            path: path.to_path_buf(),
            source: e,
        })?;
        file.validate()?;
        Ok(file)
    }

    /// Parse draft results from a JSON string. Exposed for tests; `load`
    /// wraps this with path context and validation.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Write the draft results back out, pretty-printed like the source file.
    pub fn save(&self, path: &Path) -> Result<(), DraftDataError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| DraftDataError::Format {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json + "\n").map_err(|e| DraftDataError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Enforce the structural invariant: a (player, team) pair may appear at
    /// most once in the pick list.
    pub fn validate(&self) -> Result<(), DraftDataError> {
        let mut seen: HashSet<(String, u32)> = HashSet::new();
        for pick in &self.draft_picks {
            let key = (normalize_name(&pick.player_name), pick.team_id);
            if !seen.insert(key) {
                return Err(DraftDataError::Invalid(format!(
                    "duplicate draft pick for player `{}` on team {}",
                    pick.player_name, pick.team_id
                )));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn team(&self, team_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    /// Resolve the manager for a pick's team, falling back to the pick's
    /// own team name when the team table has no entry.
    pub fn manager_for<'a>(&'a self, pick: &'a DraftPick) -> &'a str {
        self.team(pick.team_id)
            .map(|t| t.manager.as_str())
            .unwrap_or(&pick.drafting_team)
    }

    /// Case-insensitive substring search over team names.
    pub fn find_teams(&self, query: &str) -> Vec<&Team> {
        let needle = query.trim().to_lowercase();
        self.teams
            .iter()
            .filter(|t| t.team_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive substring search over player names, returning pick
    /// indices so callers can mutate matches in place.
    pub fn find_pick_indices(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.draft_picks
            .iter()
            .enumerate()
            .filter(|(_, p)| p.player_name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn picks_for_team(&self, team_id: u32) -> Vec<&DraftPick> {
        self.draft_picks
            .iter()
            .filter(|p| p.team_id == team_id)
            .collect()
    }

    pub fn keepers(&self) -> Vec<&DraftPick> {
        self.draft_picks.iter().filter(|p| p.keeper_status).collect()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
