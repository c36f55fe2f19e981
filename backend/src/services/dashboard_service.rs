use futures::future::join_all;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::dashboard::GRID_COLUMNS;
use crate::models::{
    CategorySection, ChartStyle, ChartTheme, Dashboard, DashboardCard, DashboardLayout,
    DashboardQueryParams, DashboardRequest, QuoteView, SidebarItem, TimeRange, WatchlistEntry,
};
use crate::services::chart_service::render_chart;
use crate::services::market_service::{fetch_price_series, fetch_quote};
use crate::services::news_service::{fetch_news, NewsProvider};
use crate::services::ttl_cache::MarketDataCache;
use crate::services::watchlist_service;
use crate::state::AppState;

/// Borrowed view of everything a dashboard pass needs.
pub struct DashboardContext<'a> {
    pub provider: &'a dyn PriceProvider,
    pub news: Option<&'a dyn NewsProvider>,
    pub cache: &'a MarketDataCache,
    pub theme: &'a ChartTheme,
    pub news_limit: usize,
}

impl<'a> DashboardContext<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            provider: state.price_provider.as_ref(),
            news: state.news_provider.as_deref(),
            cache: &state.cache,
            theme: &state.config.chart_theme,
            news_limit: state.config.news_limit,
        }
    }
}

/// Validates query parameters, filling gaps from the configured defaults.
pub fn parse_request(
    params: &DashboardQueryParams,
    config: &AppConfig,
) -> Result<DashboardRequest, AppError> {
    let range = match &params.range {
        Some(raw) => raw.parse::<TimeRange>()?,
        None => config.default_range,
    };
    let style = match &params.style {
        Some(raw) => raw.parse::<ChartStyle>()?,
        None => config.default_style,
    };
    let layout = match &params.layout {
        Some(raw) => raw.parse::<DashboardLayout>()?,
        None => DashboardLayout::default(),
    };

    Ok(DashboardRequest {
        range,
        style,
        layout,
        ticker: params.ticker.clone().filter(|t| !t.trim().is_empty()),
        include_news: params.news.unwrap_or(true),
    })
}

/// One stateless pass over the watchlist.
///
/// Provider failures never fail the whole dashboard; they end up as inline
/// messages on the affected card. Only an unknown `ticker` in the single
/// layout is an error.
pub async fn build_dashboard(
    ctx: &DashboardContext<'_>,
    request: &DashboardRequest,
) -> Result<Dashboard, AppError> {
    info!(
        "Building {} dashboard (range {}, style {})",
        request.layout, request.range, request.style
    );

    let mut dashboard = Dashboard {
        layout: request.layout,
        range: request.range,
        style: request.style,
        generated_at: chrono::Utc::now(),
        sections: Vec::new(),
        sidebar: Vec::new(),
        selected: None,
    };

    match request.layout {
        DashboardLayout::Grid => {
            dashboard.sections = build_sections(ctx, request).await;
        }
        DashboardLayout::Single => {
            let selected = match &request.ticker {
                Some(ticker) => watchlist_service::find_entry(ticker)
                    .ok_or_else(|| AppError::NotFound(format!("{} is not on the watchlist", ticker)))?,
                None => watchlist_service::list_watchlist()
                    .first()
                    .ok_or_else(|| AppError::NotFound("watchlist is empty".to_string()))?,
            };

            dashboard.sidebar = watchlist_service::list_watchlist()
                .iter()
                .map(|e| SidebarItem {
                    ticker: e.ticker,
                    display_name: e.display_name,
                    category: e.category,
                    selected: e.ticker == selected.ticker,
                })
                .collect();
            dashboard.selected =
                Some(build_card(ctx, selected, request.range, request.style, request.include_news).await);
        }
    }

    Ok(dashboard)
}

async fn build_sections(ctx: &DashboardContext<'_>, request: &DashboardRequest) -> Vec<CategorySection> {
    let groups = watchlist_service::grouped_by_category();

    let mut sections = Vec::with_capacity(groups.len());
    for (category, entries) in groups {
        let cards = join_all(entries.into_iter().map(|entry| {
            build_card(ctx, entry, request.range, request.style, request.include_news)
        }))
        .await;

        sections.push(CategorySection {
            category: *category,
            rows: cards.chunks(GRID_COLUMNS).map(|row| row.to_vec()).collect(),
        });
    }
    sections
}

/// Builds the card for one holding.
pub async fn build_card(
    ctx: &DashboardContext<'_>,
    entry: &'static WatchlistEntry,
    range: TimeRange,
    style: ChartStyle,
    include_news: bool,
) -> DashboardCard {
    let ticker = entry.ticker;

    let (series, quote) = futures::join!(
        fetch_price_series(ctx.provider, ctx.cache, ticker, range),
        fetch_quote(ctx.provider, ctx.cache, ticker),
    );

    let (chart, chart_error) = match series {
        Ok(series) => (render_chart(&series, style, ctx.theme), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let (quote, quote_error) = match quote {
        Ok(quote) => (Some(QuoteView::from((*quote).clone())), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let news = match (include_news, ctx.news) {
        (true, Some(provider)) => match fetch_news(provider, ctx.cache, ticker, ctx.news_limit).await {
            Ok(headlines) => headlines.to_vec(),
            Err(e) => {
                warn!("Skipping headlines for {}: {}", ticker, e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    DashboardCard {
        entry: *entry,
        quote_url: watchlist_service::quote_page_url(ticker),
        range,
        range_options: TimeRange::selector_with(range),
        quote,
        quote_error,
        chart,
        chart_error,
        news,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_service::tests::{sample_bars, FakeProvider};
    use crate::services::news_service::tests::FakeNews;
    use chrono::Duration;
    use std::sync::atomic::Ordering;

    fn request(layout: DashboardLayout, ticker: Option<&str>) -> DashboardRequest {
        DashboardRequest {
            range: TimeRange::YearToDate,
            style: ChartStyle::Line,
            layout,
            ticker: ticker.map(str::to_string),
            include_news: true,
        }
    }

    #[test]
    fn test_parse_request_defaults_and_errors() {
        let config = AppConfig::default();

        let parsed = parse_request(&DashboardQueryParams::default(), &config).unwrap();
        assert_eq!(parsed.range, TimeRange::YearToDate);
        assert_eq!(parsed.layout, DashboardLayout::Grid);
        assert!(parsed.include_news);

        let bad = DashboardQueryParams {
            range: Some("forever".into()),
            ..Default::default()
        };
        assert!(matches!(parse_request(&bad, &config), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_grid_groups_cards_in_rows_of_three() {
        let provider = FakeProvider::with_bars(sample_bars());
        let news = FakeNews::new(2);
        let cache = MarketDataCache::new(Duration::hours(1));
        let theme = ChartTheme::default();
        let ctx = DashboardContext {
            provider: &provider,
            news: Some(&news),
            cache: &cache,
            theme: &theme,
            news_limit: 5,
        };

        let dashboard = build_dashboard(&ctx, &request(DashboardLayout::Grid, None)).await.unwrap();

        assert_eq!(dashboard.sections.len(), 3);
        for section in &dashboard.sections {
            assert!(section.rows.iter().all(|row| row.len() <= GRID_COLUMNS));
            for card in section.rows.iter().flatten() {
                assert!(card.chart.is_some());
                assert_eq!(card.quote.as_ref().unwrap().change_percent, Some(2.0));
                assert_eq!(card.news.len(), 2);
                assert!(card.quote_url.ends_with(card.entry.ticker));
            }
        }
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_inline_message() {
        let provider = FakeProvider::failing();
        let cache = MarketDataCache::new(Duration::hours(1));
        let theme = ChartTheme::default();
        let ctx = DashboardContext {
            provider: &provider,
            news: None,
            cache: &cache,
            theme: &theme,
            news_limit: 5,
        };

        let dashboard = build_dashboard(&ctx, &request(DashboardLayout::Grid, None)).await.unwrap();
        let card = &dashboard.sections[0].rows[0][0];

        assert!(card.chart.is_none());
        assert!(card.chart_error.as_deref().unwrap().starts_with("Data unavailable for WLFI-USD"));
        assert!(card.quote.is_none());
        assert!(card.quote_error.is_some());
        assert!(card.news.is_empty());
    }

    #[tokio::test]
    async fn test_single_layout_selects_requested_ticker() {
        let provider = FakeProvider::with_bars(sample_bars());
        let cache = MarketDataCache::new(Duration::hours(1));
        let theme = ChartTheme::default();
        let ctx = DashboardContext {
            provider: &provider,
            news: None,
            cache: &cache,
            theme: &theme,
            news_limit: 5,
        };

        let dashboard = build_dashboard(&ctx, &request(DashboardLayout::Single, Some("gev")))
            .await
            .unwrap();

        assert!(dashboard.sections.is_empty());
        assert_eq!(dashboard.sidebar.len(), 9);
        assert_eq!(dashboard.sidebar.iter().filter(|i| i.selected).count(), 1);
        assert_eq!(dashboard.selected.unwrap().entry.ticker, "GEV");
        assert_eq!(provider.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_card_range_options_contain_requested_range() {
        let provider = FakeProvider::with_bars(sample_bars());
        let cache = MarketDataCache::new(Duration::hours(1));
        let theme = ChartTheme::default();
        let ctx = DashboardContext {
            provider: &provider,
            news: None,
            cache: &cache,
            theme: &theme,
            news_limit: 5,
        };
        let mut req = request(DashboardLayout::Single, Some("MP"));
        req.range = TimeRange::ThreeMonths;

        let card = build_dashboard(&ctx, &req).await.unwrap().selected.unwrap();

        assert_eq!(card.range, TimeRange::ThreeMonths);
        assert!(card.range_options.contains(&TimeRange::ThreeMonths));
        assert_eq!(card.range_options.len(), 4);
    }

    #[tokio::test]
    async fn test_single_layout_unknown_ticker() {
        let provider = FakeProvider::with_bars(sample_bars());
        let cache = MarketDataCache::new(Duration::hours(1));
        let theme = ChartTheme::default();
        let ctx = DashboardContext {
            provider: &provider,
            news: None,
            cache: &cache,
            theme: &theme,
            news_limit: 5,
        };

        let err = build_dashboard(&ctx, &request(DashboardLayout::Single, Some("AAPL")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
