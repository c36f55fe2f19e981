use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::external::yahoofinance::DEFAULT_BASE_URL;
use crate::models::{ChartStyle, ChartTheme, TimeRange};

/// Upper bound for `CACHE_TTL_SECS` (one year).
pub const MAX_CACHE_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Service configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cache_ttl_secs: i64,
    pub default_range: TimeRange,
    pub default_style: ChartStyle,
    pub market_data_base_url: String,
    pub news_enabled: bool,
    pub news_limit: usize,
    pub http_timeout: Duration,
    pub chart_theme: ChartTheme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cache_ttl_secs: 3600,
            default_range: TimeRange::YearToDate,
            default_style: ChartStyle::Line,
            market_data_base_url: DEFAULT_BASE_URL.to_string(),
            news_enabled: true,
            news_limit: 5,
            http_timeout: Duration::from_secs(10),
            chart_theme: ChartTheme::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable
    /// values fall back to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let theme = defaults.chart_theme.clone();

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            cache_ttl_secs: bounded_ttl(
                parse_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_secs),
                defaults.cache_ttl_secs,
            ),
            default_range: parse_or(&lookup, "DEFAULT_RANGE", defaults.default_range),
            default_style: parse_or(&lookup, "DEFAULT_CHART_STYLE", defaults.default_style),
            market_data_base_url: lookup("MARKET_DATA_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.market_data_base_url),
            news_enabled: parse_or(&lookup, "NEWS_ENABLED", defaults.news_enabled),
            news_limit: parse_or(&lookup, "NEWS_LIMIT", defaults.news_limit),
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )),
            chart_theme: ChartTheme {
                line_color: lookup("CHART_LINE_COLOR").unwrap_or(theme.line_color),
                height: parse_or(&lookup, "CHART_HEIGHT", theme.height),
                background: lookup("CHART_BACKGROUND").unwrap_or(theme.background),
                ..theme
            },
        }
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs)
    }
}

fn bounded_ttl(secs: i64, default: i64) -> i64 {
    if (0..=MAX_CACHE_TTL_SECS).contains(&secs) {
        secs
    } else {
        warn!(
            "Ignoring out-of-range CACHE_TTL_SECS={} (allowed 0..={}), using default",
            secs, MAX_CACHE_TTL_SECS
        );
        default
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid {}='{}', using default", name, raw);
                default
            }
        },
        None => default,
    }
}
