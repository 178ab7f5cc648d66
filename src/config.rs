// Configuration loading and parsing (config/league.toml + environment).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("invalid environment variable `{name}`: {message}")]
    EnvError { name: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub keeper: KeeperConfig,
    pub data: DataPaths,
    pub server: ServerConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file. Every section
/// is optional so a partial file overrides only what it names.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    #[serde(default)]
    league: LeagueConfig,
    #[serde(default)]
    keeper: KeeperConfig,
    #[serde(default)]
    data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub name: String,
    /// The season the draft file records. Keeper decisions apply to the
    /// following season (`season + 1`).
    pub season: i32,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            name: "LOL Keepers".to_string(),
            season: 2024,
        }
    }
}

/// Which eligibility rule the league plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityPolicy {
    /// A player kept this season cannot be kept again next season.
    NoConsecutive,
    /// A kept player stays eligible until their keeper round has escalated
    /// down to the configured floor.
    RoundFloor,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// Overall-rank divisor for the projected draft round (league size).
    pub ranks_per_round: u32,
    /// The round a waiver pickup is kept at.
    pub waiver_keeper_round: u32,
    /// How many rounds earlier than the draft round a keeper costs.
    pub round_discount: u32,
    /// Keeper cost never escalates above this round.
    pub min_keeper_round: u32,
    pub eligibility: EligibilityPolicy,
    /// For `round-floor` eligibility: a kept player whose keeper round has
    /// reached this round is done.
    pub round_floor: u32,
    /// Rounds of surplus required before a keeper counts as a value.
    pub value_threshold: i64,
    /// Position labels hidden from keeper reports and the web table.
    pub excluded_positions: Vec<String>,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        KeeperConfig {
            ranks_per_round: 12,
            waiver_keeper_round: 5,
            round_discount: 1,
            min_keeper_round: 1,
            eligibility: EligibilityPolicy::NoConsecutive,
            round_floor: 1,
            value_threshold: 0,
            excluded_positions: vec!["K".to_string(), "DST".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub draft_results: String,
    pub projections: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            draft_results: "data/draft_results.json".to_string(),
            projections: "data/fantasy_pros.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment-sourced server settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Build server settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build server settings from any name -> value lookup. Split out from
    /// `from_env` so tests don't have to mutate process-global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let host = lookup("LOL_KEEPERS_HOST").unwrap_or(defaults.host);

        let port = match lookup("LOL_KEEPERS_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::EnvError {
                name: "LOL_KEEPERS_PORT".to_string(),
                message: format!("expected a port number, got `{raw}`"),
            })?,
            None => defaults.port,
        };

        let debug = match lookup("LOL_KEEPERS_DEBUG") {
            Some(raw) => matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
            None => defaults.debug,
        };

        Ok(ServerConfig { host, port, debug })
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from `config/league.toml` under `base_dir`, falling
/// back to built-in defaults when the file is absent, then overlay the
/// environment-sourced server settings.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");

    let file: LeagueFile = if league_path.exists() {
        let text =
            std::fs::read_to_string(&league_path).map_err(|_| ConfigError::FileNotFound {
                path: league_path.clone(),
            })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?
    } else {
        LeagueFile {
            league: LeagueConfig::default(),
            keeper: KeeperConfig::default(),
            data: DataPaths::default(),
        }
    };

    let config = Config {
        league: file.league,
        keeper: file.keeper,
        data: file.data,
        server: ServerConfig::from_env()?,
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let keeper = &config.keeper;

    if keeper.ranks_per_round == 0 {
        return Err(ConfigError::ValidationError {
            field: "keeper.ranks_per_round".into(),
            message: "must be greater than 0".into(),
        });
    }

    if keeper.waiver_keeper_round == 0 {
        return Err(ConfigError::ValidationError {
            field: "keeper.waiver_keeper_round".into(),
            message: "must be greater than 0 (rounds are 1-indexed)".into(),
        });
    }

    if keeper.min_keeper_round == 0 {
        return Err(ConfigError::ValidationError {
            field: "keeper.min_keeper_round".into(),
            message: "must be greater than 0 (rounds are 1-indexed)".into(),
        });
    }

    if keeper.round_floor == 0 {
        return Err(ConfigError::ValidationError {
            field: "keeper.round_floor".into(),
            message: "must be greater than 0 (rounds are 1-indexed)".into(),
        });
    }

    if config.data.draft_results.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.draft_results".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data.projections.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.projections".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
