use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{NewsHeadline, NewsQueryParams};
use crate::routes::watchlist::lookup;
use crate::services::news_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_ticker_news))
}

pub async fn get_ticker_news(
    Path(ticker): Path<String>,
    Query(params): Query<NewsQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsHeadline>>, AppError> {
    info!("GET /news/{} - Getting headlines", ticker);
    let entry = lookup(&ticker)?;

    // News disabled: an empty list, not an error
    let Some(provider) = state.news_provider.as_deref() else {
        return Ok(Json(Vec::new()));
    };

    let limit = params.limit.unwrap_or(state.config.news_limit);
    let headlines = news_service::fetch_news(provider, &state.cache, entry.ticker, limit)
        .await
        .map_err(|e| {
            error!("Failed to get news for {}: {}", ticker, e);
            e
        })?;
    Ok(Json(headlines.to_vec()))
}
