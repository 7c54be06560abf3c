use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use transit_server::adjacency::{AdjacencyConfig, AdjacencyError, AdjacencyService};
use transit_server::cache::{CacheConfig, CachedGateway};
use transit_server::domain::{AdjacencyResult, Stop, StopId};
use transit_server::mbta::{DEFAULT_BASE_URL, MbtaClient, MbtaConfig};
use transit_server::registry::{StopRegistry, StopSnapshot, StopSnapshotConfig};

/// Exit code for an unknown stop id.
const EXIT_STOP_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "transit-server")]
#[command(about = "Query MBTA rail stops, their lines and their adjacent stops", long_about = None)]
struct Cli {
    /// MBTA V3 API key (optional; raises the rate limit)
    #[arg(long, env = "MBTA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the MBTA V3 API
    #[arg(long, env = "MBTA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Stop list snapshot file, shared between runs
    #[arg(long, env = "STOP_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Hours before the snapshot is considered stale
    #[arg(long, default_value_t = 24)]
    snapshot_ttl_hours: u64,

    /// Maximum concurrent upstream requests
    #[arg(long, default_value_t = 5)]
    max_concurrent: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every light and heavy rail stop
    Stops,
    /// Show one stop
    Stop {
        #[arg(value_name = "STOP_ID")]
        stop_id: String,
    },
    /// List the lines serving a stop's station
    Lines {
        #[arg(value_name = "STOP_ID")]
        stop_id: String,
    },
    /// Show the stops before and after a stop on each line through it
    Adjacent {
        #[arg(value_name = "STOP_ID")]
        stop_id: String,
    },
    /// Re-fetch the stop list and rewrite the snapshot
    Refresh,
}

#[derive(Serialize)]
struct LinesOutput<'a> {
    stop: &'a StopId,
    lines: Vec<String>,
}

#[derive(Serialize)]
struct AdjacentOutput {
    stop: Stop,
    lines: Vec<AdjacencyResult>,
}

#[derive(Serialize)]
struct RefreshOutput {
    stops: usize,
    fetched_at: chrono::DateTime<chrono::Utc>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(AdjacencyError::StopNotFound(id)) = e.downcast_ref::<AdjacencyError>() {
                eprintln!("Unknown stop: {id}");
                return ExitCode::from(EXIT_STOP_NOT_FOUND);
            }
            error!(error = %format!("{e:#}"), "query failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mbta_config = MbtaConfig::new(cli.api_key)
        .with_base_url(cli.base_url)
        .with_max_concurrent(cli.max_concurrent)
        .with_timeout(cli.timeout);
    let client = MbtaClient::new(mbta_config).context("failed to create MBTA client")?;
    let gateway = Arc::new(CachedGateway::new(client, &CacheConfig::default()));

    let mut registry = StopRegistry::new(gateway.clone());
    if let Some(path) = cli.snapshot {
        let ttl = Duration::from_secs(cli.snapshot_ttl_hours * 60 * 60);
        registry = registry.with_snapshot(StopSnapshot::new(
            StopSnapshotConfig::new(path).with_ttl(ttl),
        ));
    }

    let config = AdjacencyConfig::default();
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    match cli.command {
        Commands::Stops => {
            let index = registry.all_stops().await.map_err(AdjacencyError::from)?;
            print_json(index.stops())?;
        }
        Commands::Stop { stop_id } => {
            let stop = service.find_stop(&parse_stop_id(&stop_id)?).await?;
            print_json(&stop)?;
        }
        Commands::Lines { stop_id } => {
            let stop_id = parse_stop_id(&stop_id)?;
            let lines = service.lines_through_stop(&stop_id).await?;
            print_json(&LinesOutput {
                stop: &stop_id,
                lines,
            })?;
        }
        Commands::Adjacent { stop_id } => {
            let stop = service.find_stop(&parse_stop_id(&stop_id)?).await?;
            let lines = service.adjacent_to(&stop).await?;
            print_json(&AdjacentOutput { stop, lines })?;
        }
        Commands::Refresh => {
            let index = registry.refresh().await.map_err(AdjacencyError::from)?;
            print_json(&RefreshOutput {
                stops: index.len(),
                fetched_at: index.fetched_at(),
            })?;
        }
    }

    Ok(())
}

fn parse_stop_id(raw: &str) -> anyhow::Result<StopId> {
    StopId::parse_normalized(raw).with_context(|| format!("invalid stop id {raw:?}"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
