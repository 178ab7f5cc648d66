// CLI command definitions and handlers.

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::analysis::rules::KeeperRules;
use crate::analysis::{self, build_keeper_analysis, exclude_positions, sort_by_overall_pick};
use crate::config::Config;
use crate::data::draft::DraftFile;
use crate::data::projections;
use crate::report;
use crate::web;

#[derive(Debug, Parser)]
#[command(name = "lol-keepers")]
#[command(about = "Keeper-league analysis over static draft results and projections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a greeting (smoke test)
    Hello,
    /// Show application status and configured paths
    Status,
    /// Draft overview: totals plus the team/manager list
    DraftSummary,
    /// Teams sorted by final season rank
    LeagueStandings,
    /// Show one team's roster (case-insensitive name search)
    TeamRoster {
        /// Team name, or part of one
        name: String,
    },
    /// All players currently marked as keepers
    ListKeepers,
    /// Current keepers with their next-season eligibility
    EligibleKeepers,
    /// Players not eligible to be kept next season
    KeeperIneligible,
    /// The full draft-vs-projections keeper table
    KeeperAnalysis,
    /// Toggle a player's keeper flag (rewrites the draft file)
    UpdateKeeper {
        /// Player name, or part of one
        player: String,
    },
    /// Serve the keeper-analysis web page
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Hello => println!("{}", report::hello()),
        Commands::Status => print!("{}", report::status(&config)),
        Commands::DraftSummary => {
            let draft = load_draft(&config)?;
            print!("{}", report::draft_summary(&draft, config.league.season));
        }
        Commands::LeagueStandings => {
            let draft = load_draft(&config)?;
            print!("{}", report::league_standings(&draft, config.league.season));
        }
        Commands::TeamRoster { name } => {
            let draft = load_draft(&config)?;
            print!("{}", report::team_roster(&draft, &name));
        }
        Commands::ListKeepers => {
            let draft = load_draft(&config)?;
            print!("{}", report::list_keepers(&draft, config.league.season));
        }
        Commands::EligibleKeepers => {
            let draft = load_draft(&config)?;
            let rules = KeeperRules::from_config(&config.keeper);
            print!("{}", report::eligible_keepers(&draft, &rules, config.league.season));
        }
        Commands::KeeperIneligible => {
            let draft = load_draft(&config)?;
            let rules = KeeperRules::from_config(&config.keeper);
            print!("{}", report::keeper_ineligible(&draft, &rules, config.league.season));
        }
        Commands::KeeperAnalysis => {
            let draft = load_draft(&config)?;
            let records = projections::load_projections(Path::new(&config.data.projections))
                .context("failed to load projections")?;
            let rules = KeeperRules::from_config(&config.keeper);

            let mut rows = build_keeper_analysis(&draft, &records, &rules);
            sort_by_overall_pick(&mut rows);
            let rows = exclude_positions(rows, &config.keeper.excluded_positions);
            let unmatched = analysis::unmatched_projections(&draft, &records).len();

            print!("{}", report::keeper_analysis(&rows, unmatched, config.league.season));
        }
        Commands::UpdateKeeper { player } => {
            run_update_keeper(&config, &player)?;
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            web::serve(config).await?;
        }
    }
    Ok(())
}

fn load_draft(config: &Config) -> anyhow::Result<DraftFile> {
    DraftFile::load(Path::new(&config.data.draft_results))
        .context("failed to load draft results")
}

// ---------------------------------------------------------------------------
// update-keeper
// ---------------------------------------------------------------------------

/// Result of attempting to toggle a keeper flag.
#[derive(Debug, PartialEq)]
pub enum ToggleOutcome {
    NotFound,
    /// More than one pick matched; nothing was changed. Entries are
    /// (player_name, drafting_team, currently_keeper).
    Ambiguous(Vec<(String, String, bool)>),
    Toggled {
        player_name: String,
        now_keeper: bool,
    },
}

/// Find the pick matching `query` and flip its keeper flag in memory.
/// The caller decides whether to persist the change.
pub fn toggle_keeper(draft: &mut DraftFile, query: &str) -> ToggleOutcome {
    let matches = draft.find_pick_indices(query);

    match matches.as_slice() {
        [] => ToggleOutcome::NotFound,
        [idx] => {
            let pick = &mut draft.draft_picks[*idx];
            pick.keeper_status = !pick.keeper_status;
            ToggleOutcome::Toggled {
                player_name: pick.player_name.clone(),
                now_keeper: pick.keeper_status,
            }
        }
        many => ToggleOutcome::Ambiguous(
            many.iter()
                .map(|&idx| {
                    let pick = &draft.draft_picks[idx];
                    (
                        pick.player_name.clone(),
                        pick.drafting_team.clone(),
                        pick.keeper_status,
                    )
                })
                .collect(),
        ),
    }
}

fn run_update_keeper(config: &Config, query: &str) -> anyhow::Result<()> {
    let path = Path::new(&config.data.draft_results);
    let mut draft = load_draft(config)?;

    match toggle_keeper(&mut draft, query) {
        ToggleOutcome::NotFound => {
            println!("❌ No player found matching '{query}'");
        }
        ToggleOutcome::Ambiguous(candidates) => {
            println!("Multiple players found:");
            for (i, (name, team, is_keeper)) in candidates.iter().enumerate() {
                let status = if *is_keeper { " (K)" } else { "" };
                println!("  {}. {name} - {team}{status}", i + 1);
            }
        }
        ToggleOutcome::Toggled {
            player_name,
            now_keeper,
        } => {
            draft
                .save(path)
                .context("failed to write updated draft results")?;
            info!("keeper flag for '{player_name}' set to {now_keeper}");
            let status_text = if now_keeper { "keeper" } else { "non-keeper" };
            println!("✅ Updated {player_name} to {status_text} status");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
