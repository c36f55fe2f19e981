use serde::Serialize;
use std::fmt;

// ==============================================================================
// Watchlist Models
// ==============================================================================

/// A group of holdings shown together on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

/// Disclosed size of a holding. Disclosures are often only a rounded label.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Quantity {
    Units(f64),
    Label(&'static str),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Units(units) => write!(f, "{}", units),
            Quantity::Label(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WatchlistEntry {
    pub ticker: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub owner: &'static str,
    pub note: Option<&'static str>,
    /// ISO `YYYY-MM-DD`.
    pub purchase_date: &'static str,
    pub purchase_price: f64,
    pub quantity: Quantity,
}

// ==============================================================================
// Holdings table
// ==============================================================================

pub static CATEGORIES: &[Category] = &[
    Category { key: "crypto", title: "Crypto & DeFi", icon: "🚀" },
    Category { key: "energy", title: "Energy & Infrastructure", icon: "⚡" },
    Category { key: "tech", title: "Tech & Real Estate", icon: "🏢" },
];

// Figures as of the Feb 2026 disclosures.
pub static HOLDINGS: &[WatchlistEntry] = &[
    // Crypto & DeFi
    WatchlistEntry {
        ticker: "WLFI-USD",
        display_name: "World Liberty Financial",
        category: "crypto",
        owner: "Don Jr / Eric / Barron",
        note: Some("Governance token"),
        purchase_date: "2024-10-15",
        purchase_price: 0.015,
        quantity: Quantity::Label("5M Tokens"),
    },
    WatchlistEntry {
        ticker: "BTC-USD",
        display_name: "Bitcoin",
        category: "crypto",
        owner: "Strategic Reserve / Family Trust",
        note: None,
        purchase_date: "2025-01-20",
        purchase_price: 102450.00,
        quantity: Quantity::Label("15.5 BTC"),
    },
    WatchlistEntry {
        ticker: "ETH-USD",
        display_name: "Ethereum",
        category: "crypto",
        owner: "Family Trust",
        note: None,
        purchase_date: "2024-05-12",
        purchase_price: 2450.00,
        quantity: Quantity::Label("1,200 ETH"),
    },
    // Energy & Infrastructure
    WatchlistEntry {
        ticker: "DOMI",
        display_name: "Dominari Holdings",
        category: "energy",
        owner: "Don Jr / Eric",
        note: None,
        purchase_date: "2025-02-11",
        purchase_price: 1.10,
        quantity: Quantity::Label("750k Shares"),
    },
    WatchlistEntry {
        ticker: "GEV",
        display_name: "GE Vernova",
        category: "energy",
        owner: "Trump Org Trust",
        note: None,
        purchase_date: "2026-01-20",
        purchase_price: 178.45,
        quantity: Quantity::Units(2500.0),
    },
    WatchlistEntry {
        ticker: "MP",
        display_name: "MP Materials",
        category: "energy",
        owner: "Don Jr (Advisory)",
        note: Some("Rare-earth miner"),
        purchase_date: "2025-05-10",
        purchase_price: 18.20,
        quantity: Quantity::Label("50k Shares"),
    },
    // Tech & Real Estate
    WatchlistEntry {
        ticker: "DJT",
        display_name: "Trump Media (DJT)",
        category: "tech",
        owner: "Donald J. Trump",
        note: None,
        purchase_date: "2024-03-26",
        purchase_price: 35.00,
        quantity: Quantity::Label("114M Shares"),
    },
    WatchlistEntry {
        ticker: "PSQH",
        display_name: "PublicSquare",
        category: "tech",
        owner: "Don Jr",
        note: None,
        purchase_date: "2023-07-20",
        purchase_price: 5.40,
        quantity: Quantity::Label("697k Shares"),
    },
    WatchlistEntry {
        ticker: "UMAC",
        display_name: "Unusual Machines",
        category: "tech",
        owner: "Don Jr",
        note: None,
        purchase_date: "2024-02-14",
        purchase_price: 1.65,
        quantity: Quantity::Label("200k Shares"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    #[test]
    fn test_tickers_are_unique() {
        let tickers: HashSet<_> = HOLDINGS.iter().map(|e| e.ticker).collect();
        assert_eq!(tickers.len(), HOLDINGS.len());
    }

    #[test]
    fn test_every_entry_has_known_category() {
        for entry in HOLDINGS {
            assert!(
                CATEGORIES.iter().any(|c| c.key == entry.category),
                "{} has unknown category {}",
                entry.ticker,
                entry.category
            );
        }
    }

    #[test]
    fn test_purchase_dates_parse() {
        for entry in HOLDINGS {
            assert!(
                NaiveDate::parse_from_str(entry.purchase_date, "%Y-%m-%d").is_ok(),
                "bad date for {}",
                entry.ticker
            );
        }
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::Label("15.5 BTC").to_string(), "15.5 BTC");
        assert_eq!(Quantity::Units(2500.0).to_string(), "2500");

        let gev = HOLDINGS.iter().find(|e| e.ticker == "GEV").unwrap();
        assert_eq!(serde_json::to_value(gev).unwrap()["quantity"], 2500.0);
    }
}
