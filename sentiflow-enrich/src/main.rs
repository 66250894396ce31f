//! sentiflow-enrich - Sentiment Enrichment Microservice
//!
//! **Module Identity:**
//! - Name: sentiflow-enrich
//! - Port: 5732 (default)
//!
//! Receives pushed posts, scores them and stores the enriched records.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use sentiflow_common::config::{load_toml_config, resolve_data_root};
use sentiflow_enrich::db::init_database_pool;
use sentiflow_enrich::pipeline::EnrichmentPipeline;
use sentiflow_enrich::scorer::VaderAnalyzer;
use sentiflow_enrich::sinks::SqliteSinks;
use sentiflow_enrich::AppState;

/// sentiflow-enrich command line
#[derive(Parser, Debug)]
#[command(version, about = "Sentiment enrichment service", long_about = None)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "SENTIFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Data root folder (overrides SENTIFLOW_DATA_ROOT and TOML)
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// HTTP port (overrides TOML)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides TOML)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_toml_config(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    info!(
        "Starting Sentiflow Enrichment (sentiflow-enrich) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let data_root = resolve_data_root(args.data_root.as_deref(), &config);
    let db_path = args
        .database
        .unwrap_or_else(|| config.enrich.database_path(&data_root));
    info!("Database: {}", db_path.display());

    let pool = init_database_pool(&db_path).await?;
    let sinks = SqliteSinks::new(pool, config.enrich.max_lock_wait_ms);

    let pipeline = Arc::new(EnrichmentPipeline::new(
        Arc::new(VaderAnalyzer::new()),
        Arc::new(sinks.clone()),
        Arc::new(sinks.clone()),
    ));

    let state = AppState::new(pipeline, sinks);
    let app = sentiflow_enrich::build_router(state).layer(TraceLayer::new_for_http());

    let port = args.port.unwrap_or(config.enrich.port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Push endpoint: http://127.0.0.1:{}/push", port);

    axum::serve(listener, app).await?;

    Ok(())
}
