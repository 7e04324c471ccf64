mod app;
mod bootstrap;
mod chat;
mod health;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tickertalk_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;

fn init_logging(config: &AppConfig) {
    use tickertalk_core::config::LogFormat::*;
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
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let application = bootstrap::bootstrap_with_config(config)?;
    let address = application.config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let router = app::router(
        application.runtime.clone(),
        application.config.server.static_dir.as_deref(),
    );

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        enrichment_enabled = application.runtime.enrichment_enabled(),
        "tickertalk-server listening"
    );

    let shutdown = Arc::new(Notify::new());
    let drain_signal = shutdown.clone();
    let serve = axum::serve(listener, router)
        .with_graceful_shutdown(async move { drain_signal.notified().await })
        .into_future();
    let mut serve = std::pin::pin!(serve);

    let finished = tokio::select! {
        result = &mut serve => Some(result),
        signal = wait_for_shutdown() => {
            signal?;
            None
        }
    };

    match finished {
        Some(result) => result?,
        None => {
            tracing::info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                grace_secs = application.config.server.graceful_shutdown_secs,
                "draining in-flight requests"
            );
            shutdown.notify_one();
            let grace = Duration::from_secs(application.config.server.graceful_shutdown_secs);
            match tokio::time::timeout(grace, serve).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!(
                    event_name = "system.server.drain_timeout",
                    correlation_id = "shutdown",
                    "grace period elapsed before all requests finished"
                ),
            }
        }
    }

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "tickertalk-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
