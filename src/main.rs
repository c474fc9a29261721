// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::application::console::Console;
use crate::application::dashboard_service::DashboardService;
use crate::application::knowledge_service::KnowledgeService;
use crate::infrastructure::backend_client::HttpDashboardClient;
use crate::infrastructure::config::load_console_config;
use crate::infrastructure::knowledge_client::HttpKnowledgeClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_console_config()?;

    // Create source clients (infrastructure layer)
    let dashboard_client = Arc::new(HttpDashboardClient::new(
        config.backend.base_url.clone(),
        config.backend.timeout(),
    )?);
    let knowledge_client = Arc::new(HttpKnowledgeClient::new(
        config.knowledge.base_url.clone(),
        config.knowledge.timeout(),
    )?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(dashboard_client, config.backend.timeout());
    let console = Console::new(
        dashboard_service,
        config.refresh.discipline,
        config.metrics.clone(),
    );
    let knowledge_service = KnowledgeService::new(knowledge_client);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let auto_refresh = if config.refresh.interval_secs > 0 {
        let interval = Duration::from_secs(config.refresh.interval_secs);
        Some(console.spawn_auto_refresh(interval, shutdown_rx))
    } else {
        tracing::info!("Auto-refresh disabled");
        None
    };

    // Create application state
    let state = Arc::new(AppState {
        console,
        knowledge_service,
    });

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(
        "Starting command console on {} (backend {}, refresh discipline {:?})",
        addr,
        config.backend.base_url,
        config.refresh.discipline
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = auto_refresh {
        let _ = handle.await;
    }

    Ok(())
}
