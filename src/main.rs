//! sitelens main entry point
//!
//! This is the command-line interface for the sitelens URL analysis service.

use clap::Parser;
use sitelens::analyzer::Analyzer;
use sitelens::config::load_config;
use sitelens::server::build_router;
use sitelens::service::JobService;
use sitelens::storage::open_store;
use sitelens::worker::{QueueSignal, Worker};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// sitelens: an asynchronous URL analysis service
///
/// sitelens accepts URLs over a small HTTP API, analyzes each page in the
/// background (HTML version, title, heading counts, link classification,
/// login form detection), and serves the stored results for polling.
#[derive(Parser, Debug)]
#[command(name = "sitelens")]
#[command(version = "0.1.0")]
#[command(about = "An asynchronous URL analysis service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    run_service(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitelens=info,warn"),
            1 => EnvFilter::new("sitelens=debug,info"),
            2 => EnvFilter::new("sitelens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Wires up the store, worker, and HTTP server, then runs until interrupted
async fn run_service(config: sitelens::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use std::path::Path;

    let store = Arc::new(open_store(Path::new(&config.store.database_path))?);
    tracing::info!("Opened job store at {}", config.store.database_path);

    let signal = Arc::new(QueueSignal::new());
    let service = Arc::new(JobService::new(store.clone(), signal.clone()));

    let analyzer = Analyzer::new()?;
    let worker = Worker::new(
        store,
        analyzer,
        signal,
        Duration::from_millis(config.worker.retry_interval_ms),
    );

    // Ctrl-C flips the token; the server and worker both watch it
    let shutdown = CancellationToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            ctrl_c_token.cancel();
        }
    });

    let worker_handle = tokio::spawn(worker.run(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    tracing::info!("Listening on {}", config.server.listen_addr);

    let server_token = shutdown.clone();
    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(async move { server_token.cancelled().await })
        .await?;

    // The server has stopped accepting requests; let the worker finish its
    // current cycle before exiting
    worker_handle.await?;
    tracing::info!("Shutdown complete");

    Ok(())
}
