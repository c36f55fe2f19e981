use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{PriceBar, QuoteSnapshot, TimeRange};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance provider - free chart API, no API key required.
///
/// Covers equities and the `-USD` crypto pairs on the watchlist.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<YahooResult, PriceProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        debug!("Yahoo chart request {} range={} interval={}", ticker, range, interval);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", interval), ("range", range)])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        first_result(body)
    }
}

/// Shared HTTP client setup for Yahoo endpoints.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; HoldingsTracker/0.1)")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(
                "Failed to build HTTP client with {:?} timeout, using defaults: {}",
                timeout, e
            );
            reqwest::Client::new()
        })
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    currency: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn first_result(body: YahooChartResponse) -> Result<YahooResult, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    body.chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(PriceProviderError::NotFound)
}

fn bars_from_result(result: &YahooResult) -> Result<Vec<PriceBar>, PriceProviderError> {
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?;

    let len = result.timestamp.len();
    if [&quote.open, &quote.high, &quote.low, &quote.close]
        .iter()
        .any(|column| column.len() != len)
    {
        return Err(PriceProviderError::Parse(
            "Timestamp and OHLC arrays have different lengths".into(),
        ));
    }

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // Skip null values (market holidays, partial bars)
            let open = quote.open[i]?;
            let high = quote.high[i]?;
            let low = quote.low[i]?;
            let close = quote.close[i]?;
            let timestamp = chrono::DateTime::from_timestamp(*ts, 0)?;

            Some(PriceBar { timestamp, open, high, low, close })
        })
        .collect();

    Ok(bars)
}

fn quote_from_result(ticker: &str, result: &YahooResult) -> Result<QuoteSnapshot, PriceProviderError> {
    let closes: Vec<f64> = result
        .indicators
        .quote
        .first()
        .map(|q| q.close.iter().flatten().copied().collect())
        .unwrap_or_default();

    let last_price = result
        .meta
        .regular_market_price
        .or_else(|| closes.last().copied())
        .ok_or_else(|| PriceProviderError::BadResponse("missing market price".into()))?;

    // previousClose is only reported for intraday ranges; fall back to the
    // second-to-last daily close, then to the close before the chart window.
    let previous_close = result
        .meta
        .previous_close
        .or_else(|| closes.len().checked_sub(2).map(|i| closes[i]))
        .or(result.meta.chart_previous_close)
        .ok_or_else(|| PriceProviderError::BadResponse("missing previous close".into()))?;

    Ok(QuoteSnapshot {
        ticker: ticker.to_string(),
        last_price,
        previous_close,
        currency: result.meta.currency.clone(),
        fetched_at: Utc::now(),
    })
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_history(
        &self,
        ticker: &str,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, PriceProviderError> {
        let result = self.fetch_chart(ticker, range.as_str(), range.interval()).await?;
        bars_from_result(&result)
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<QuoteSnapshot, PriceProviderError> {
        let result = self.fetch_chart(ticker, "5d", "1d").await?;
        quote_from_result(ticker, &result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "DJT",
                    "regularMarketPrice": 24.5,
                    "chartPreviousClose": 22.0
                },
                "timestamp": [1767600000, 1767686400, 1767772800],
                "indicators": {
                    "quote": [{
                        "open":  [23.0, null, 24.0],
                        "high":  [23.5, 24.2, 24.9],
                        "low":   [22.8, 23.1, 23.9],
                        "close": [23.2, 24.0, 24.5],
                        "volume": [1000, 1200, 900]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    fn parse(json: &str) -> Result<YahooResult, PriceProviderError> {
        let body: YahooChartResponse = serde_json::from_str(json).unwrap();
        first_result(body)
    }

    #[test]
    fn test_bars_skip_null_values() {
        let result = parse(CHART_JSON).unwrap();
        let bars = bars_from_result(&result).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 23.2);
        assert_eq!(bars[1].open, 24.0);
        assert_eq!(bars[1].timestamp.timestamp(), 1767772800);
    }

    #[test]
    fn test_quote_falls_back_to_previous_daily_close() {
        let result = parse(CHART_JSON).unwrap();
        let quote = quote_from_result("DJT", &result).unwrap();

        assert_eq!(quote.last_price, 24.5);
        assert_eq!(quote.previous_close, 24.0);
        assert_eq!(quote.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_api_error_maps_to_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse(json), Err(PriceProviderError::NotFound)));
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        let json = CHART_JSON.replace("\"close\": [23.2, 24.0, 24.5]", "\"close\": [23.2]");
        let result = parse(&json).unwrap();
        assert!(matches!(bars_from_result(&result), Err(PriceProviderError::Parse(_))));
    }

    #[test]
    fn test_empty_result_has_no_bars() {
        let json = r#"{"chart":{"result":[{"meta":{"currency":"USD"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let result = parse(json).unwrap();
        assert!(bars_from_result(&result).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let provider = YahooFinanceProvider::new("http://127.0.0.1:1/", Duration::from_secs(2));

        let err = provider
            .fetch_history("DJT", TimeRange::FiveDays)
            .await
            .unwrap_err();
        assert!(matches!(err, PriceProviderError::Network(_)));
    }
}
