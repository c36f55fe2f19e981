use crate::models::watchlist::{CATEGORIES, HOLDINGS};
use crate::models::{Category, WatchlistEntry};

const QUOTE_PAGE_BASE: &str = "https://finance.yahoo.com/quote";

/// The static watchlist, in display order.
pub fn list_watchlist() -> &'static [WatchlistEntry] {
    HOLDINGS
}

pub fn list_categories() -> &'static [Category] {
    CATEGORIES
}

/// Case-insensitive lookup by ticker.
pub fn find_entry(ticker: &str) -> Option<&'static WatchlistEntry> {
    let ticker = ticker.trim();
    HOLDINGS.iter().find(|e| e.ticker.eq_ignore_ascii_case(ticker))
}

/// Entries grouped by category, both in declaration order. Empty categories are skipped.
pub fn grouped_by_category() -> Vec<(&'static Category, Vec<&'static WatchlistEntry>)> {
    CATEGORIES
        .iter()
        .map(|category| {
            let entries: Vec<&'static WatchlistEntry> =
                HOLDINGS.iter().filter(|e| e.category == category.key).collect();
            (category, entries)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

/// Public quote page for `ticker`.
pub fn quote_page_url(ticker: &str) -> String {
    format!("{}/{}", QUOTE_PAGE_BASE, ticker)
}
