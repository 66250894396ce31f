//! sentiflow-ingest - Dataset Ingestion Microservice
//!
//! **Module Identity:**
//! - Name: sentiflow-ingest
//! - Port: 5731 (default)
//!
//! Republishes a labeled sentiment dataset as a stream of synthetic live
//! posts, pushed to sentiflow-enrich.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use sentiflow_common::config::{load_toml_config, resolve_data_root};
use sentiflow_ingest::publisher::HttpPushPublisher;
use sentiflow_ingest::storage::FsObjectStore;
use sentiflow_ingest::AppState;

/// sentiflow-ingest command line
#[derive(Parser, Debug)]
#[command(version, about = "Dataset ingestion service", long_about = None)]
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

    /// Push endpoint of the enrichment service (overrides TOML)
    #[arg(long, env = "SENTIFLOW_PUSH_URL")]
    push_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_toml_config(args.config.as_deref())?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    info!(
        "Starting Sentiflow Ingestion (sentiflow-ingest) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let data_root = resolve_data_root(args.data_root.as_deref(), &config);
    let bucket_root = config.ingest.bucket_root(&data_root);
    std::fs::create_dir_all(&bucket_root)?;
    info!("Bucket root: {}", bucket_root.display());

    let push_url = args.push_url.unwrap_or_else(|| config.ingest.push_url.clone());
    let publisher = HttpPushPublisher::new(push_url, &config.ingest.topic)?;
    info!("Publishing to {}", publisher.push_url());

    let state = AppState::new(
        Arc::new(FsObjectStore::new(bucket_root)),
        Arc::new(publisher),
        config.ingest.default_bucket.clone(),
    );
    let app = sentiflow_ingest::build_router(state).layer(TraceLayer::new_for_http());

    let port = args.port.unwrap_or(config.ingest.port);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
