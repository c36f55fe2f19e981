use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    info!("GET /health - Health check");
    Json(json!({
        "status": "OK",
        "cached_entries": state.cache.len(),
        "cache_ttl_secs": state.config.cache_ttl_secs,
    }))
}
