pub mod banners;
pub mod health;
pub mod metrics;
pub mod websocket;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// API routes, with the UI served from `static_dir` for every other path.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/banners", get(banners::list_banners))
        .route(
            "/banner/{id}",
            get(banners::get_banner).post(banners::update_banner),
        )
        .route("/ws", get(websocket::ws_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
