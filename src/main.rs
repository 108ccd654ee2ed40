use anyhow::Context;
use figma_relay::app::{router, AppState};
use figma_relay::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "figma_relay=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting figma-relay...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!("Loaded {:?}", config);

    let addr = config.bind_addr()?;
    tracing::info!(
        "Forwarding to {} (timeout {}s)",
        config.figma_api_base,
        config.figma_timeout_secs
    );

    let app_state = AppState::from_config(&config).context("Failed to build Figma client")?;
    let app = router(app_state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
