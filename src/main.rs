//! Thinking globe server
//!
//! Plays back a staged "AI reasoning" sequence for each question: knowledge
//! nodes are revealed one by one, then the answer is narrated step by step.

mod api;
mod config;
mod runtime;
mod scene;
mod session;
mod state_machine;
mod store;

use api::{create_router, AppState};
use config::Config;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thinking_globe=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env();
    tracing::info!(
        port = config.port,
        seed = ?config.rng_seed,
        reveal_delay_ms = config.sequencer.reveal_delay.as_millis(),
        narration_delay_ms = config.sequencer.narration_delay.as_millis(),
        zoom_delay_ms = config.sequencer.zoom_delay.as_millis(),
        "Configuration loaded"
    );

    // Create application state; the globe opens on a fresh session
    let state = AppState::new(&config);
    state.runtime.create_session();

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Thinking globe server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
