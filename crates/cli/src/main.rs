//! `keyrouter`: consistent-hashing lookup service.
//!
//! # Usage
//!
//! ```text
//! keyrouter                                   # services.toml, 0.0.0.0:8080
//! keyrouter --services /etc/keyrouter.toml    # custom services file
//! keyrouter --address 127.0.0.1:9000 --log-level debug
//! kill -HUP <pid>                             # reload the services file
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::load_services;
use registry::Registry;
use server::LookupServer;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "keyrouter",
    version,
    about = "A simple microservice for consistent hashing of service entries"
)]
struct Cli {
    /// Location of the services file.
    #[arg(long, default_value = "services.toml", env = "KEYROUTER_SERVICES")]
    services: PathBuf,

    /// Address to bind to.
    #[arg(long, default_value = "0.0.0.0:8080", env = "KEYROUTER_ADDRESS")]
    address: String,

    /// Minimum log level. `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level);

    let registry = Arc::new(Registry::new());
    let count = load_services(&registry, &cli.services)
        .with_context(|| format!("initial load of {}", cli.services.display()))?;
    info!(services = count, path = %cli.services.display(), "services loaded");

    spawn_reloader(Arc::clone(&registry), cli.services.clone())?;

    info!(address = %cli.address, "ready to serve");
    LookupServer::new(registry)
        .serve_with_shutdown(&cli.address, shutdown_signal())
        .await
        .with_context(|| format!("server on {} failed", cli.address))?;

    info!("shutdown complete");
    Ok(())
}

/// Reload the services file on every SIGHUP.
///
/// A failed reload is logged and the registry keeps serving what it has.
#[cfg(unix)]
fn spawn_reloader(registry: Arc<Registry>, path: PathBuf) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hups = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hups.recv().await.is_some() {
            info!(path = %path.display(), "reloading services");
            // Redistribution holds the registry write lock; keep it off the async workers.
            let reload = {
                let registry = Arc::clone(&registry);
                let path = path.clone();
                tokio::task::spawn_blocking(move || load_services(&registry, &path))
            };
            match reload.await {
                Ok(Ok(count)) => info!(services = count, "reload complete"),
                Ok(Err(e)) => {
                    error!(error = %format!("{e:#}"), "reload failed, keeping previous state")
                }
                Err(e) => error!(error = %e, "reload task failed"),
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_reloader(_registry: Arc<Registry>, _path: PathBuf) -> Result<()> {
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}
