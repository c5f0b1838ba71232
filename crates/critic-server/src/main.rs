use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use critic_server::config::ServerConfig;
use critic_server::routes;
use critic_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("critic=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let addr = format!("0.0.0.0:{}", config.port);

    if config.llm_api_key.is_none() {
        tracing::warn!("No LLM API key configured, /analyze is disabled");
    }
    if config.omdb_api_key.is_none() {
        tracing::warn!("No OMDb API key configured, /api/search is disabled");
    }

    let state = Arc::new(AppState::from_config(&config)?);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
