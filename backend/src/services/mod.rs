pub mod chart_service;
pub mod dashboard_service;
pub mod market_service;
pub mod news_service;
pub mod ttl_cache;
pub mod watchlist_service;
