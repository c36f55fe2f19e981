pub mod chart;
pub mod dashboard;
mod news;
mod price_series;
mod quote;
pub mod watchlist;

pub use chart::{ChartSpec, ChartStyle, ChartTheme};
pub use dashboard::{
    CategorySection, Dashboard, DashboardCard, DashboardLayout, DashboardQueryParams,
    DashboardRequest, SidebarItem,
};
pub use news::{NewsHeadline, NewsQueryParams};
pub use price_series::{PriceBar, PriceSeries, TimeRange};
pub use quote::{QuoteSnapshot, QuoteView};
pub use watchlist::{Category, WatchlistEntry};
