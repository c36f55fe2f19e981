use std::sync::Arc;
use crate::config::AppConfig;
use crate::external::price_provider::PriceProvider;
use crate::services::news_service::NewsProvider;
use crate::services::ttl_cache::MarketDataCache;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub price_provider: Arc<dyn PriceProvider>,
    /// `None` when news is disabled.
    pub news_provider: Option<Arc<dyn NewsProvider>>,
    pub cache: MarketDataCache,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        price_provider: Arc<dyn PriceProvider>,
        news_provider: Option<Arc<dyn NewsProvider>>,
    ) -> Self {
        let cache = MarketDataCache::new(config.cache_ttl());
        Self {
            config: Arc::new(config),
            price_provider,
            news_provider,
            cache,
        }
    }
}
