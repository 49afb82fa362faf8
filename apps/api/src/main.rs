mod config;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::FontPair;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.log_directive())
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting onepage API v{}", env!("CARGO_PKG_VERSION"));

    // Load the plain/bold pairing once; every layout shares it
    let fonts = match &config.font_paths {
        Some((regular, bold)) => FontPair::from_files(regular, bold).with_context(|| {
            format!(
                "loading fonts {} / {}",
                regular.display(),
                bold.display()
            )
        })?,
        None => FontPair::standard(),
    };
    info!(
        "Fonts: {} / {}",
        fonts.regular.base_font, fonts.bold.base_font
    );

    let state = AppState::new(config.clone(), fonts);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
