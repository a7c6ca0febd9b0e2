use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_inventory::{config::Config, controllers, services::sweep::ExpirySweep, AppState};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting seat inventory service");

    let app_state = AppState::new(config.clone()).await?;

    // --- Start background tasks ---

    // Expiry sweep: releases timed-out holds through the normal command path
    let sweep = ExpirySweep::new(app_state.clone());
    task::spawn(sweep.run_periodically());

    // --- Start the web server ---

    let app = Router::new()
        .route("/", get(|| async { "Seat Inventory API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
