use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{ChartStyle, PriceSeries, QuoteView, TimeRange};
use crate::routes::watchlist::lookup;
use crate::services::{chart_service, market_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_price_series))
        .route("/:ticker/quote", get(get_quote))
}

pub fn chart_router() -> Router<AppState> {
    Router::new()
        .route("/:ticker", get(get_chart))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub range: Option<String>,
    pub style: Option<String>,
}

impl SeriesQuery {
    fn range(&self, state: &AppState) -> Result<TimeRange, AppError> {
        match &self.range {
            Some(raw) => Ok(raw.parse::<TimeRange>()?),
            None => Ok(state.config.default_range),
        }
    }

    fn style(&self, state: &AppState) -> Result<ChartStyle, AppError> {
        match &self.style {
            Some(raw) => Ok(raw.parse::<ChartStyle>()?),
            None => Ok(state.config.default_style),
        }
    }
}

pub async fn get_price_series(
    Path(ticker): Path<String>,
    Query(query): Query<SeriesQuery>,
    State(state): State<AppState>,
) -> Result<Json<PriceSeries>, AppError> {
    info!("GET /prices/{} - Getting price series", ticker);
    let entry = lookup(&ticker)?;
    let range = query.range(&state)?;

    let series = market_service::fetch_price_series(
        state.price_provider.as_ref(),
        &state.cache,
        entry.ticker,
        range,
    )
    .await
    .map_err(|e| {
        error!("Failed to get price series for {}: {}", ticker, e);
        e
    })?;
    Ok(Json((*series).clone()))
}

pub async fn get_quote(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<QuoteView>, AppError> {
    info!("GET /prices/{}/quote - Getting quote", ticker);
    let entry = lookup(&ticker)?;

    let quote = market_service::fetch_quote(state.price_provider.as_ref(), &state.cache, entry.ticker)
        .await
        .map_err(|e| {
            error!("Failed to get quote for {}: {}", ticker, e);
            e
        })?;
    Ok(Json(QuoteView::from((*quote).clone())))
}

/// Chart spec for one ticker; `204 No Content` when there is nothing to draw.
pub async fn get_chart(
    Path(ticker): Path<String>,
    Query(query): Query<SeriesQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    info!("GET /charts/{} - Rendering chart", ticker);
    let entry = lookup(&ticker)?;
    let range = query.range(&state)?;
    let style = query.style(&state)?;

    let series = market_service::fetch_price_series(
        state.price_provider.as_ref(),
        &state.cache,
        entry.ticker,
        range,
    )
    .await?;

    match chart_service::render_chart(&series, style, &state.config.chart_theme) {
        Some(chart) => Ok(Json(chart).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
