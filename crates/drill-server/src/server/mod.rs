//! Drill HTTP Server
//!
//! Answer-event endpoint for the web front end:
//! - `POST /next` takes `null` or `{previous, response}` and returns the
//!   next question with the bucket weight report
//! - `GET /api/stats` and `GET /api/health` for inspection

pub mod handlers;
pub mod state;

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use drill_core::DrillEngine;
pub use state::AppState;

/// Build the axum router with all routes
pub fn build_router(engine: DrillEngine, port: u16) -> (Router, AppState) {
    let state = AppState::new(engine);
    (build_router_with_state(state.clone(), port), state)
}

pub fn build_router_with_state(state: AppState, port: u16) -> Router {
    let origins = [
        format!("http://127.0.0.1:{}", port),
        format!("http://localhost:{}", port),
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
    .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/next", post(handlers::next_question))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().concurrency_limit(50).layer(cors))
        .with_state(state)
}

/// Serve until the process is stopped
pub async fn serve(engine: DrillEngine, host: IpAddr, port: u16) -> anyhow::Result<()> {
    let (app, _state) = build_router(engine, port);
    let addr = SocketAddr::new(host, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Drill server listening at http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
