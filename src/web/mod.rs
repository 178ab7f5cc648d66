// HTTP surface: the keeper-analysis table page plus the small JSON API.
//
// Every request re-reads the two data files and rebuilds the analysis from
// scratch. The files are tiny and static, so a rebuild per request is the
// whole caching story.

pub mod page;

use std::convert::Infallible;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::analysis::rules::KeeperRules;
use crate::analysis::{
    self, build_keeper_analysis, exclude_positions, sort_by_overall_pick, KeeperAnalysisRow,
};
use crate::config::Config;
use crate::data::draft::DraftFile;
use crate::data::projections;

/// How many keeper recommendations each manager gets.
const RECOMMENDATION_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PlayersResponse {
    players: Vec<KeeperAnalysisRow>,
    total_count: usize,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ManagersResponse {
    managers: Vec<String>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    manager: String,
    recommendations: Vec<KeeperAnalysisRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    status: &'static str,
}

fn error_body(message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: message.into(),
        status: "error",
    }
}

// ---------------------------------------------------------------------------
// Per-request data assembly
// ---------------------------------------------------------------------------

/// Load both files and build the display-shaped analysis (sorted by overall
/// pick, excluded positions removed).
fn load_rows(config: &Config) -> anyhow::Result<Vec<KeeperAnalysisRow>> {
    let draft = DraftFile::load(Path::new(&config.data.draft_results))
        .context("failed to load draft results")?;
    let records = projections::load_projections(Path::new(&config.data.projections))
        .context("failed to load projections")?;

    let rules = KeeperRules::from_config(&config.keeper);
    let mut rows = build_keeper_analysis(&draft, &records, &rules);
    sort_by_overall_pick(&mut rows);
    Ok(exclude_positions(rows, &config.keeper.excluded_positions))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn analysis_page_handler(config: Arc<Config>) -> Result<impl Reply, Infallible> {
    match load_rows(&config) {
        Ok(rows) => {
            let managers = analysis::managers(&rows);
            let html = page::render_analysis_page(
                &rows,
                &managers,
                &config.league.name,
                config.league.season,
            );
            Ok(warp::reply::with_status(warp::reply::html(html), StatusCode::OK))
        }
        Err(e) => {
            error!("analysis page failed: {e:#}");
            let html = page::render_error_page(&format!("{e:#}"));
            Ok(warp::reply::with_status(
                warp::reply::html(html),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn players_handler(config: Arc<Config>) -> Result<impl Reply, Infallible> {
    match load_rows(&config) {
        Ok(rows) => {
            let total_count = rows.len();
            let body = PlayersResponse {
                players: rows,
                total_count,
                status: "success",
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK))
        }
        Err(e) => {
            error!("players endpoint failed: {e:#}");
            Ok(warp::reply::with_status(
                warp::reply::json(&error_body(format!("{e:#}"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn managers_handler(config: Arc<Config>) -> Result<impl Reply, Infallible> {
    match load_rows(&config) {
        Ok(rows) => {
            let body = ManagersResponse {
                managers: analysis::managers(&rows),
                status: "success",
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK))
        }
        Err(e) => {
            error!("managers endpoint failed: {e:#}");
            Ok(warp::reply::with_status(
                warp::reply::json(&error_body(format!("{e:#}"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn recommendations_handler(
    manager: String,
    config: Arc<Config>,
) -> Result<impl Reply, Infallible> {
    match load_rows(&config) {
        Ok(rows) => {
            let recommendations: Vec<KeeperAnalysisRow> =
                analysis::recommendations_for(&rows, &manager, RECOMMENDATION_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect();
            let message = if recommendations.is_empty() {
                Some("No eligible keepers found for this manager".to_string())
            } else {
                None
            };
            let body = RecommendationsResponse {
                manager,
                recommendations,
                message,
                status: "success",
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK))
        }
        Err(e) => {
            error!("recommendations endpoint failed: {e:#}");
            Ok(warp::reply::with_status(
                warp::reply::json(&error_body(format!("{e:#}"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Routes + server
// ---------------------------------------------------------------------------

/// Build the complete route tree.
pub fn routes(
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let config_filter = warp::any().map(move || config.clone());

    let analysis_page = warp::path::end()
        .and(warp::get())
        .and(config_filter.clone())
        .and_then(analysis_page_handler);

    let players = warp::path("api")
        .and(warp::path("players"))
        .and(warp::path::end())
        .and(warp::get())
        .and(config_filter.clone())
        .and_then(players_handler);

    let managers = warp::path("api")
        .and(warp::path("managers"))
        .and(warp::path::end())
        .and(warp::get())
        .and(config_filter.clone())
        .and_then(managers_handler);

    let recommendations = warp::path("api")
        .and(warp::path("keeper-recommendations"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(config_filter.clone())
        .and_then(recommendations_handler);

    let not_found = warp::any().map(|| {
        warp::reply::with_status(
            warp::reply::json(&error_body("Not found")),
            StatusCode::NOT_FOUND,
        )
    });

    analysis_page
        .or(players)
        .or(managers)
        .or(recommendations)
        .or(not_found)
}

/// Run the web server until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid LOL_KEEPERS_HOST `{}`", config.server.host))?;
    let port = config.server.port;

    info!("keeper analysis server listening on http://{host}:{port}");
    warp::serve(routes(Arc::new(config))).run((host, port)).await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
