use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{Category, WatchlistEntry};
use crate::services::watchlist_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_watchlist))
        .route("/categories", get(list_categories))
        .route("/:ticker", get(get_entry))
}

pub async fn list_watchlist() -> Json<&'static [WatchlistEntry]> {
    info!("GET /watchlist - Listing watchlist");
    Json(watchlist_service::list_watchlist())
}

pub async fn list_categories() -> Json<&'static [Category]> {
    info!("GET /watchlist/categories - Listing categories");
    Json(watchlist_service::list_categories())
}

pub async fn get_entry(Path(ticker): Path<String>) -> Result<Json<WatchlistEntry>, AppError> {
    info!("GET /watchlist/{} - Getting entry", ticker);
    lookup(&ticker).map(|entry| Json(*entry))
}

/// Resolves a path ticker to its watchlist entry.
pub(crate) fn lookup(ticker: &str) -> Result<&'static WatchlistEntry, AppError> {
    watchlist_service::find_entry(ticker)
        .ok_or_else(|| AppError::NotFound(format!("{} is not on the watchlist", ticker)))
}
