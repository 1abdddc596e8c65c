//! Grid Duel API
//!
//! Run with: `cargo run --package gridduel-api -- --bind 0.0.0.0:3000`

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gridduel_api::config::Config;
use gridduel_api::{routes, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("gridduel_api=info".parse()?))
        .init();

    let config = Config::parse();
    let rules = config.ruleset();
    tracing::info!(
        ?rules,
        capacity = config.channel_capacity.get(),
        max_sessions = config.max_sessions.get(),
        "starting"
    );

    let state = Arc::new(AppStateInner::new(
        rules,
        config.channel_capacity,
        config.max_sessions,
    ));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("Grid Duel API running on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
