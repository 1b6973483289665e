use anyhow::Context;
use tower_http::cors::CorsLayer;

use concierge_client::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let state = std::sync::Arc::new(
        AppState::new(&config).context("could not create agent client")?,
    );

    // Health check runs in the background; the first request may hit a cold backend.
    let warmup = state.orchestrator.clone();
    tokio::spawn(async move {
        warmup.start().await;
    });

    let app = routes::create_router(&config.static_dir)
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, backend = %config.backend_url, "concierge client listening");
    axum::serve(listener, app).await?;
    Ok(())
}
