//! Prometheus exporter for the i2pd web console.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use i2pd_exporter::{ConsoleClient, ExporterConfig, HttpServer, StatusCollector};

/// Prometheus exporter for the i2pd web console.
#[derive(Parser, Debug)]
#[command(name = "i2pd-exporter")]
#[command(about = "Export i2pd router status as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<String>,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// i2pd web console URL (overrides config).
    #[arg(long)]
    url: Option<String>,

    /// Console request timeout in seconds (overrides config).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ExporterConfig::load_from_file(config_path)?
    } else {
        ExporterConfig::default()
    };

    // CLI flags win over the file
    if let Some(listen) = args.listen {
        config.http.listen = listen;
    }
    if let Some(url) = args.url {
        config.console.url = url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.console.timeout_secs = timeout_secs;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    i2pd_common::init_tracing(&config.logging)?;

    info!("Starting i2pd exporter");

    let listen_addr: SocketAddr = config
        .http
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let client = ConsoleClient::new(&config.console)?;
    info!(
        url = %client.url(),
        timeout_secs = config.console.timeout_secs,
        "Scraping i2pd console"
    );

    let collector = Arc::new(StatusCollector::new(client));
    let http_server = HttpServer::new(collector, listen_addr, config.http.path.clone());

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut http_task = tokio::spawn(http_server.run(shutdown_rx));

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate() => {
            info!("Received SIGTERM, shutting down...");
        }
        result = &mut http_task => {
            // Returning before shutdown means the server failed
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(anyhow::anyhow!("HTTP server task failed: {}", e)),
            };
        }
    }

    shutdown_tx.send(true)?;

    match tokio::time::timeout(Duration::from_secs(5), http_task).await {
        Ok(Ok(Err(e))) => error!("HTTP server error: {}", e),
        Err(_) => error!("HTTP server did not stop within 5s"),
        _ => {}
    }

    info!("Exporter stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
