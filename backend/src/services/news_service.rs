use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::yahoofinance::build_client;
use crate::models::NewsHeadline;
use crate::services::ttl_cache::MarketDataCache;

/// Hard cap on headlines per ticker.
pub const MAX_HEADLINES: usize = 20;

/// Trait for news providers
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_headlines(
        &self,
        ticker: &str,
        max_results: usize,
    ) -> Result<Vec<NewsHeadline>, AppError>;
}

/// Yahoo Finance search API (returns recent stories per symbol)
pub struct YahooNewsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooNewsProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooNewsItem {
    title: String,
    #[serde(default)]
    publisher: String,
    link: String,
    provider_publish_time: Option<i64>,
}

impl From<YahooNewsItem> for NewsHeadline {
    fn from(item: YahooNewsItem) -> Self {
        Self {
            title: item.title,
            publisher: item.publisher,
            link: item.link,
            published_at: item
                .provider_publish_time
                .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        }
    }
}

#[async_trait]
impl NewsProvider for YahooNewsProvider {
    async fn fetch_headlines(
        &self,
        ticker: &str,
        max_results: usize,
    ) -> Result<Vec<NewsHeadline>, AppError> {
        info!("Fetching news from Yahoo for {}", ticker);

        let count = max_results.min(MAX_HEADLINES).to_string();
        let response = self
            .client
            .get(format!("{}/v1/finance/search", self.base_url))
            .query(&[("q", ticker), ("newsCount", count.as_str()), ("quotesCount", "0")])
            .send()
            .await
            .map_err(|e| {
                error!("Yahoo news request failed: {}", e);
                AppError::data_unavailable(ticker, format!("News API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Yahoo news error {} for {}", status, ticker);
            return Err(AppError::data_unavailable(
                ticker,
                format!("News API returned error {}", status),
            ));
        }

        let body: YahooSearchResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Yahoo news response: {}", e);
            AppError::data_unavailable(ticker, format!("Failed to parse news response: {}", e))
        })?;

        Ok(into_headlines(body, max_results))
    }
}

fn into_headlines(body: YahooSearchResponse, max_results: usize) -> Vec<NewsHeadline> {
    body.news
        .into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .take(max_results)
        .map(NewsHeadline::from)
        .collect()
}

/// Headlines for `ticker`, cached like price data.
pub async fn fetch_news(
    provider: &dyn NewsProvider,
    cache: &MarketDataCache,
    ticker: &str,
    limit: usize,
) -> Result<Arc<Vec<NewsHeadline>>, AppError> {
    let limit = limit.clamp(1, MAX_HEADLINES);
    let key = ticker.to_string();

    if let Some(cached) = cache.news.get(&key) {
        info!("✓ News cache hit for {}", ticker);
        return Ok(trim(cached, limit));
    }

    // Always fetch the full cap so a later, larger limit is still a cache hit
    let headlines = provider.fetch_headlines(ticker, MAX_HEADLINES).await?;
    Ok(trim(cache.news.insert(key, headlines), limit))
}

fn trim(headlines: Arc<Vec<NewsHeadline>>, limit: usize) -> Arc<Vec<NewsHeadline>> {
    if headlines.len() <= limit {
        return headlines;
    }
    Arc::new(headlines.iter().take(limit).cloned().collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct FakeNews {
        pub calls: AtomicUsize,
        pub count: usize,
    }

    impl FakeNews {
        pub(crate) fn new(count: usize) -> Self {
            Self { calls: AtomicUsize::new(0), count }
        }
    }

    #[async_trait]
    impl NewsProvider for FakeNews {
        async fn fetch_headlines(
            &self,
            ticker: &str,
            max_results: usize,
        ) -> Result<Vec<NewsHeadline>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.count.min(max_results))
                .map(|i| NewsHeadline {
                    title: format!("{} headline {}", ticker, i),
                    publisher: "Wire".into(),
                    link: format!("https://example.com/{}/{}", ticker, i),
                    published_at: None,
                })
                .collect())
        }
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "count": 2,
            "quotes": [],
            "news": [
                {"uuid": "a", "title": "DJT shares jump", "publisher": "Reuters",
                 "link": "https://example.com/a", "providerPublishTime": 1767600000, "type": "STORY"},
                {"uuid": "b", "title": "  ", "publisher": "AP", "link": "https://example.com/b"}
            ]
        }"#;
        let body: YahooSearchResponse = serde_json::from_str(json).unwrap();
        let headlines = into_headlines(body, 5);

        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].publisher, "Reuters");
        assert_eq!(headlines[0].published_at.unwrap().timestamp(), 1767600000);
    }

    #[tokio::test]
    async fn test_news_is_cached_and_trimmed() {
        let provider = FakeNews::new(8);
        let cache = MarketDataCache::new(ChronoDuration::hours(1));

        let first = fetch_news(&provider, &cache, "DJT", 3).await.unwrap();
        let second = fetch_news(&provider, &cache, "DJT", 5).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
