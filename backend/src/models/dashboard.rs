use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::chart::{ChartSpec, ChartStyle};
use super::news::NewsHeadline;
use super::price_series::TimeRange;
use super::quote::QuoteView;
use super::watchlist::{Category, WatchlistEntry};

/// Cards per row in the grid layout.
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DashboardLayout {
    /// Every holding, grouped by category.
    #[default]
    Grid,
    /// Sidebar ticker list plus one selected holding.
    Single,
}

impl fmt::Display for DashboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardLayout::Grid => write!(f, "grid"),
            DashboardLayout::Single => write!(f, "single"),
        }
    }
}

impl FromStr for DashboardLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(DashboardLayout::Grid),
            "single" | "sidebar" => Ok(DashboardLayout::Single),
            other => Err(format!(
                "Invalid layout '{}'. Must be 'grid' or 'single'",
                other
            )),
        }
    }
}

/// Raw query string for `GET /api/dashboard`; parsed by the route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQueryParams {
    pub range: Option<String>,
    pub style: Option<String>,
    pub layout: Option<String>,
    pub ticker: Option<String>,
    pub news: Option<bool>,
}

/// Validated dashboard request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub range: TimeRange,
    pub style: ChartStyle,
    pub layout: DashboardLayout,
    pub ticker: Option<String>,
    pub include_news: bool,
}

/// Everything needed to render one holding.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCard {
    pub entry: WatchlistEntry,
    pub quote_url: String,
    pub range: TimeRange,
    pub range_options: Vec<TimeRange>,
    pub quote: Option<QuoteView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_error: Option<String>,
    pub chart: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsHeadline>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    pub category: Category,
    pub rows: Vec<Vec<DashboardCard>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SidebarItem {
    pub ticker: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub layout: DashboardLayout,
    pub range: TimeRange,
    pub style: ChartStyle,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<CategorySection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sidebar: Vec<SidebarItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<DashboardCard>,
}
