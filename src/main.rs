//! `foi-engine`: serves the deadline engine over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use foi_deadline_engine::api::{AppState, create_router};
use foi_deadline_engine::config::{CONFIG_FILE_NAME, ConfigLoader};
use foi_deadline_engine::error::EngineError;
use foi_deadline_engine::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "foi-engine",
    about = "Business-day deadline and compliance engine for FOI requests",
    version
)]
struct Cli {
    /// Directory containing engine.yaml
    #[arg(long, default_value = "config")]
    config: PathBuf,
    /// Override the configured bind address (e.g. 0.0.0.0:8080)
    #[arg(long)]
    bind: Option<String>,
    /// Override the configured log filter
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] EngineError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("invalid bind address '{value}': {source}")]
    BindAddress {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("foi-engine: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let mut config = ConfigLoader::load(&cli.config)?.into_config();

    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }

    telemetry::init(&config.telemetry)?;

    let bind_address = &config.server.bind_address;
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|source| StartupError::BindAddress {
            value: bind_address.clone(),
            source,
        })?;

    info!(
        path = %cli.config.join(CONFIG_FILE_NAME).display(),
        statute = %config.statute.code,
        year_boundary = %config.calendar.year_boundary,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "foi-engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}
