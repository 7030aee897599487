//! pingsweep Binary Entry Point
//!
//! Runs one sweep over the configured targets while serving live results.
//! Core functionality is provided by the `pingsweep` library crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pingsweep::{
    EmptyPolicy, IcmpProber, Sweep,
    config::{AppConfig, parse_duration},
    server::{AppState, create_router},
    targets::load_targets,
};
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pingsweep - concurrent reachability sweep with a live results API
#[derive(Parser, Debug)]
#[command(name = "pingsweep", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PINGSWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long, env = "PINGSWEEP_WORKERS")]
    workers: Option<usize>,

    /// Timeout per target (e.g. 1s, 500ms)
    #[arg(short, long, env = "PINGSWEEP_TIMEOUT", value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// Number of echo requests per target
    #[arg(short = 'n', long, env = "PINGSWEEP_COUNT")]
    count: Option<u32>,

    /// File with targets (one per line)
    #[arg(short, long, env = "PINGSWEEP_FILE")]
    file: Option<PathBuf>,

    /// What to do when neither a file nor targets are given
    #[arg(long, value_enum, env = "PINGSWEEP_ON_EMPTY")]
    on_empty: Option<EmptyPolicy>,

    /// Server bind address (overrides config file)
    #[arg(long, env = "PINGSWEEP_SERVER_BIND")]
    server_bind: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, env = "PINGSWEEP_SERVER_PORT")]
    server_port: Option<u16>,

    /// Do not print a line per result
    #[arg(short, long)]
    quiet: bool,

    /// Exit when the sweep completes instead of serving results until Ctrl+C
    #[arg(long)]
    exit_on_complete: bool,

    /// Targets to probe when no file is given
    targets: Vec<String>,
}

impl Cli {
    /// Apply CLI/env overrides (CLI > ENV > config file).
    fn apply(&self, config: &mut AppConfig) {
        if let Some(workers) = self.workers {
            config.sweep.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            config.sweep.timeout = timeout;
        }
        if let Some(count) = self.count {
            config.sweep.count = count;
        }
        if let Some(ref file) = self.file {
            config.targets.file = Some(file.clone());
        }
        if let Some(policy) = self.on_empty {
            config.targets.on_empty = policy;
        }
        if let Some(ref bind) = self.server_bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.server_port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the result lines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pingsweep=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let targets = load_targets(
        config.targets.file.as_deref(),
        &cli.targets,
        config.targets.on_empty,
    )
    .inspect_err(|e| tracing::error!("Error reading targets: {}", e))?;

    tracing::info!(
        "Targets: {}, workers: {}, timeout: {:?}, count: {}",
        targets.len(),
        config.sweep.workers,
        config.sweep.timeout,
        config.sweep.count,
    );

    let sweep = Sweep::new(Arc::new(IcmpProber::new()), config.sweep.clone(), targets)?
        .with_console(!cli.quiet);

    // The results API is up before the first probe goes out.
    let app = create_router(AppState {
        store: sweep.store(),
    });
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Results available at: http://{}/results", addr);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    let interrupted = tokio::select! {
        _ = sweep.run() => false,
        _ = shutdown_signal() => {
            tracing::warn!("Interrupted before the sweep completed");
            true
        }
    };

    if !interrupted && !cli.exit_on_complete {
        tracing::info!("Sweep finished, still serving results. Press Ctrl+C to exit");
        shutdown_signal().await;
    }

    let _ = stop_tx.send(());
    server.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
