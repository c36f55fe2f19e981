mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::price_provider::PriceProvider;
use crate::external::yahoofinance::YahooFinanceProvider;
use crate::logging::{init_logging, LoggingConfig};
use crate::services::news_service::{NewsProvider, YahooNewsProvider};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env()).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let config = AppConfig::from_env();
    tracing::info!(
        "📊 Using Yahoo Finance at {} (cache TTL {}s, default range {})",
        config.market_data_base_url,
        config.cache_ttl_secs,
        config.default_range
    );

    let price_provider: Arc<dyn PriceProvider> = Arc::new(YahooFinanceProvider::new(
        &config.market_data_base_url,
        config.http_timeout,
    ));

    let news_provider: Option<Arc<dyn NewsProvider>> = if config.news_enabled {
        let provider: Arc<dyn NewsProvider> = Arc::new(YahooNewsProvider::new(
            &config.market_data_base_url,
            config.http_timeout,
        ));
        Some(provider)
    } else {
        tracing::info!("News headlines disabled (NEWS_ENABLED=false)");
        None
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, price_provider, news_provider);
    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Holdings tracker running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
