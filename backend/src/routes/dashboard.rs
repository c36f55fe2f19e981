use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Dashboard, DashboardQueryParams};
use crate::services::dashboard_service::{self, DashboardContext};
use crate::services::market_service;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard))
}

pub async fn index() -> Html<&'static str> {
    info!("GET / - Serving dashboard page");
    Html(INDEX_HTML)
}

pub async fn get_dashboard(
    Query(params): Query<DashboardQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, AppError> {
    info!("GET /dashboard - Building dashboard");
    let request = dashboard_service::parse_request(&params, &state.config)?;
    let ctx = DashboardContext::from_state(&state);

    let dashboard = dashboard_service::build_dashboard(&ctx, &request)
        .await
        .map_err(|e| {
            error!("Failed to build dashboard: {}", e);
            e
        })?;
    Ok(Json(dashboard))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub cleared: usize,
}

/// Manual "Sync Market Data": drops every cached series, quote and headline.
pub async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    info!("POST /refresh - Clearing market data cache");
    Json(RefreshResponse {
        cleared: market_service::refresh(&state.cache),
    })
}
