use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest traded price plus the previous session's close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub ticker: String,
    pub last_price: f64,
    pub previous_close: f64,
    pub currency: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl QuoteSnapshot {
    pub fn percent_change(&self) -> Option<f64> {
        percent_change(self.last_price, self.previous_close)
    }
}

/// `(last - previous_close) / previous_close * 100`, rounded to two decimals.
///
/// Returns `None` when `previous_close` is zero or either input is not finite.
pub fn percent_change(last: f64, previous_close: f64) -> Option<f64> {
    if previous_close == 0.0 || !previous_close.is_finite() || !last.is_finite() {
        return None;
    }
    let raw = (last - previous_close) / previous_close * 100.0;
    Some((raw * 100.0).round() / 100.0)
}

/// Quote with the derived change, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: QuoteSnapshot,
    pub change_percent: Option<f64>,
    /// Signed display string such as `+1.23%`.
    pub change_label: Option<String>,
}

impl From<QuoteSnapshot> for QuoteView {
    fn from(quote: QuoteSnapshot) -> Self {
        let change_percent = quote.percent_change();
        Self {
            quote,
            change_percent,
            change_label: change_percent.map(|p| format!("{:+.2}%", p)),
        }
    }
}
