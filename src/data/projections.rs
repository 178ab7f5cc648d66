// Projection data loading.
//
// Reads FantasyPros-format draft ranking CSVs: a header row with RK,
// PLAYER NAME, POS (a position-rank label like "WR12") and assorted extra
// columns the loader ignores.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player's draft-market projection for the upcoming season.
#[derive(Debug, Clone)]
pub struct ProjectionRecord {
    /// Overall draft rank (1-indexed).
    pub rank: u32,
    pub name: String,
    pub team: String,
    /// Position-rank label as published, e.g. "WR12" or "QB3".
    pub position_rank: String,
}

impl ProjectionRecord {
    /// The bare position label: the leading letters of the position rank
    /// ("WR12" -> "WR", "DST5" -> "DST").
    pub fn position(&self) -> &str {
        position_label(&self.position_rank)
    }
}

/// Strip the rank suffix off a position-rank label.
pub fn position_label(position_rank: &str) -> &str {
    let end = position_rank
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(position_rank.len());
    &position_rank[..end]
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("projections file not found: {path}")]
    FileNotFound { path: String },

    #[error("malformed projections in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid projection data: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private), FantasyPros format
// ---------------------------------------------------------------------------

/// FantasyPros ranking row. Extra columns (TIER, BYE WEEK, SOS SEASON, ...)
/// are absorbed via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
struct RawFantasyProsRow {
    #[serde(rename = "RK")]
    rank: u32,
    #[serde(rename = "PLAYER NAME")]
    player_name: String,
    #[serde(rename = "TEAM", default)]
    team: String,
    #[serde(rename = "POS")]
    pos: String,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read projections from any reader. A malformed row is an error, not a
/// skip: the file is a fixed external contract and a bad row means the
/// export is broken.
fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<ProjectionRecord>, ProjectionError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawFantasyProsRow>() {
        let raw = result.map_err(|e| ProjectionError::Csv {
            path: "<reader>".to_string(),
            source: e,
        })?;
        let name = raw.player_name.trim().to_string();
        if name.is_empty() {
            return Err(ProjectionError::Validation(format!(
                "row with rank {} has an empty PLAYER NAME",
                raw.rank
            )));
        }
        if raw.rank == 0 {
            return Err(ProjectionError::Validation(format!(
                "player '{name}' has rank 0; ranks are 1-indexed"
            )));
        }
        records.push(ProjectionRecord {
            rank: raw.rank,
            name,
            team: raw.team.trim().to_string(),
            position_rank: raw.pos.trim().to_uppercase(),
        });
    }
    Ok(records)
}

/// Load projections from a CSV file, in file order.
pub fn load_projections(path: &Path) -> Result<Vec<ProjectionRecord>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|_| ProjectionError::FileNotFound {
        path: path.display().to_string(),
    })?;
    let records = load_from_reader(file).map_err(|e| match e {
        ProjectionError::Csv { source, .. } => ProjectionError::Csv {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })?;
    if records.is_empty() {
        warn!(
            "projections file {} contains no rows; all picks will be unranked",
            path.display()
        );
    }
    Ok(records)
}

/// Load projections from an in-memory CSV string. Used by tests and anywhere
/// the data is already in hand.
pub fn load_projections_from_str(text: &str) -> Result<Vec<ProjectionRecord>, ProjectionError> {
    load_from_reader(text.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
