use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PriceBar, QuoteSnapshot, TimeRange};

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data found")]
    NotFound,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Raw bars for `ticker` over `range`. Ordering is not guaranteed.
    async fn fetch_history(
        &self,
        ticker: &str,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, PriceProviderError>;

    async fn fetch_quote(&self, ticker: &str) -> Result<QuoteSnapshot, PriceProviderError>;
}
