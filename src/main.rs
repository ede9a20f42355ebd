use std::sync::Arc;

use anyhow::Context;
use prompt_relay::{
    config::RelayConfig,
    routes,
    services::model_backend::OllamaBackend,
    state::AppState,
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env().context("reading relay configuration")?;

    let backend = OllamaBackend::new(&config.ollama_host, config.ollama_timeout)
        .context("building Ollama client")?;
    let state = Arc::new(AppState::new(
        Arc::new(backend),
        config.model.clone(),
        config.max_inflight,
    ));

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    info!(
        addr = %config.addr,
        model = %config.model,
        backend = %config.ollama_host,
        max_inflight = config.max_inflight,
        "prompt relay listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("prompt relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
