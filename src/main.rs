// LOL Keepers entry point.
//
// Startup sequence:
// 1. Load .env and parse the CLI arguments
// 2. Load config (config/league.toml + environment)
// 3. Initialize tracing to stderr (stdout belongs to the reports)
// 4. Dispatch the subcommand

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use lol_keepers::cli;
use lol_keepers::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = cli::Cli::parse();

    let config = config::load_config().context("failed to load configuration")?;
    init_tracing(config.server.debug).context("failed to initialize logging")?;
    debug!(
        "config loaded: league={}, season={}, draft={}",
        config.league.name, config.league.season, config.data.draft_results
    );

    cli::run(args, config).await
}

/// Initialize tracing to stderr so stdout stays clean for report output.
/// Debug mode (LOL_KEEPERS_DEBUG) lowers the default filter; RUST_LOG
/// still wins when set.
fn init_tracing(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if debug {
        "lol_keepers=debug,info"
    } else {
        "lol_keepers=info,warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
