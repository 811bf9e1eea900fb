mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::{AppState, SharedGeocoder};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/check", get(handlers::check))
        .route("/api/networks", get(handlers::networks))
        .route("/api/tiers", get(handlers::tiers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app = build_router(Arc::new(state));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Heatnet server listening on http://{} (Ctrl+C to stop)", addr);

    axum::serve(listener, app).await
}
