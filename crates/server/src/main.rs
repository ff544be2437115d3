mod approvals;
mod bootstrap;
mod crm;
mod health;
mod services;
mod slack_api;
#[cfg(test)]
mod testing;

use anyhow::Result;
use suplo_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use suplo_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let transport_mode = if app.slack_runner.is_noop_transport() { "noop" } else { "socket" };
    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        transport_mode,
    )
    .await?;

    tracing::info!(
        event_name = "system.server.slack_transport_mode",
        transport_mode,
        correlation_id = "bootstrap",
        "slack runner transport mode initialized"
    );

    app.slack_runner.start().await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        "suplo-server started"
    );
    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "suplo-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
