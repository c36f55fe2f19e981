use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{PriceSeries, QuoteSnapshot, TimeRange};
use crate::services::ttl_cache::MarketDataCache;

/// Price history for `ticker` over `range`, served from cache while fresh.
///
/// Either returns a non-empty, strictly time-ordered series or
/// `AppError::DataUnavailable`. Failures are not cached.
pub async fn fetch_price_series(
    provider: &dyn PriceProvider,
    cache: &MarketDataCache,
    ticker: &str,
    range: TimeRange,
) -> Result<Arc<PriceSeries>, AppError> {
    let key = (ticker.to_string(), range);
    if let Some(series) = cache.series.get(&key) {
        info!("✓ Cache hit for {} ({})", ticker, range);
        return Ok(series);
    }

    info!("Cache miss for {} ({}), fetching from provider", ticker, range);
    let bars = provider
        .fetch_history(ticker, range)
        .await
        .map_err(|e| provider_failure(ticker, e))?;

    let raw_count = bars.len();
    let series = PriceSeries::new(ticker, range, bars);
    if series.is_empty() {
        warn!("Provider returned no usable bars for {} ({})", ticker, range);
        return Err(AppError::data_unavailable(ticker, "empty price series"));
    }
    if series.len() < raw_count {
        warn!(
            "Dropped {} malformed or duplicate bars for {} ({})",
            raw_count - series.len(),
            ticker,
            range
        );
    }

    Ok(cache.series.insert(key, series))
}

/// Latest quote for `ticker`, served from cache while fresh.
pub async fn fetch_quote(
    provider: &dyn PriceProvider,
    cache: &MarketDataCache,
    ticker: &str,
) -> Result<Arc<QuoteSnapshot>, AppError> {
    let key = ticker.to_string();
    if let Some(quote) = cache.quotes.get(&key) {
        info!("✓ Quote cache hit for {}", ticker);
        return Ok(quote);
    }

    let quote = provider
        .fetch_quote(ticker)
        .await
        .map_err(|e| provider_failure(ticker, e))?;

    if !quote.last_price.is_finite() || !quote.previous_close.is_finite() {
        warn!("Provider returned a non-finite quote for {}", ticker);
        return Err(AppError::data_unavailable(ticker, "malformed quote"));
    }

    Ok(cache.quotes.insert(key, quote))
}

/// Manual refresh. Returns the number of cache entries dropped.
pub fn refresh(cache: &MarketDataCache) -> usize {
    let cleared = cache.clear_all();
    info!("🔄 Manual refresh cleared {} cached entries", cleared);
    cleared
}

fn provider_failure(ticker: &str, err: PriceProviderError) -> AppError {
    match &err {
        PriceProviderError::RateLimited => warn!("Rate limited when fetching {}", ticker),
        _ => warn!("Provider error for {}: {}", ticker, err),
    }
    AppError::from_provider(ticker, err)
}
