use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{dashboard, health, news, prices, watchlist};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(dashboard::index))
        .nest("/health", health::router())
        .nest("/api/watchlist", watchlist::router())
        .nest("/api/prices", prices::router())
        .nest("/api/charts", prices::chart_router())
        .nest("/api/news", news::router())
        .nest("/api/dashboard", dashboard::router())
        .route("/api/refresh", post(dashboard::refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
