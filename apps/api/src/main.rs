mod config;
mod errors;
mod layout;
mod models;
mod preview;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::LayoutBudget;
use crate::routes::build_router;
use crate::state::AppState;

const PREVIEW_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    let budget = LayoutBudget::default();
    info!(
        capacity = budget.capacity,
        content_height_px = budget.geometry.content_height_px(),
        "Layout budget at default style"
    );
    info!(
        max_blocks_per_section = config.max_blocks_per_section,
        consistency_tolerance_pages = config.consistency_tolerance_pages,
        "Layout limits"
    );

    let state = AppState::new(config.clone());
    state.previews.spawn_sweeper(PREVIEW_SWEEP_INTERVAL);
    info!(
        ttl_secs = config.preview_session_ttl_secs,
        max_sessions = config.max_preview_sessions,
        "Preview session sweeper started"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
