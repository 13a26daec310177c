//! Internet connectivity monitor daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config::loader ──▶ ConfigStore ◀── config::watcher (reload)
//!                                          │
//!                                          ▼
//!                                   ┌──────────────┐   listener count > 0
//!                                   │StatusTracker │◀──────────────────── subscribe()
//!                                   └──────┬───────┘
//!                                          │ every interval
//!                                          ▼
//!                              ┌───────────────────────┐
//!                              │ReachabilityAggregator │  first success wins
//!                              └───────────┬───────────┘
//!                                 ┌────────┼────────┐
//!                                 ▼        ▼        ▼
//!                            AddressProbe per target (HTTP GET, 200 = up)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

use connectivity_monitor::config::{load_config, ConfigWatcher, MonitorConfig};
use connectivity_monitor::observability::{logging, metrics};
use connectivity_monitor::{ReqwestClient, StatusTracker};

#[derive(Parser)]
#[command(name = "connectivity-monitor")]
#[command(about = "Watch internet connectivity by probing HTTP endpoints", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single check, print the status and exit (0 = connected, 1 = disconnected).
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        targets = config.targets.len(),
        check_interval_ms = config.check_interval_ms,
        check_timeout_ms = config.check_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = Arc::new(ReqwestClient::new()?);
    let tracker = StatusTracker::new(client, config.to_store()?);

    if cli.once {
        let status = tracker.connection_status().await;
        println!("{status}");
        return Ok(if status.is_connected() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let (mut updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(updates), Some(watcher.run()?))
        }
        None => (None, None),
    };

    let mut subscription = tracker.subscribe();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            status = subscription.recv() => match status {
                Some(status) => println!("{status}"),
                None => break,
            },
            Some(new_config) = next_update(&mut updates) => {
                apply_reload(&tracker, &config, new_config);
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

/// Next reloaded config, or never when hot reload is off.
async fn next_update(
    updates: &mut Option<mpsc::UnboundedReceiver<MonitorConfig>>,
) -> Option<MonitorConfig> {
    match updates {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn apply_reload(tracker: &StatusTracker, current: &MonitorConfig, new_config: MonitorConfig) {
    if new_config.check_interval_ms != current.check_interval_ms
        || new_config.check_timeout_ms != current.check_timeout_ms
    {
        tracing::warn!("check_interval_ms and check_timeout_ms changes take effect after restart");
    }

    match new_config.to_targets() {
        Ok(targets) => {
            tracing::info!(targets = targets.len(), "Applying reloaded target list");
            tracker.set_addresses(targets);
        }
        Err(e) => tracing::error!(error = %e, "Reloaded targets are invalid, keeping current list"),
    }
}
