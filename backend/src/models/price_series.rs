use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback window for a price history request, in the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeRange {
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "ytd")]
    #[default]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl TimeRange {
    pub const ALL: [TimeRange; 9] = [
        TimeRange::FiveDays,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::YearToDate,
        TimeRange::OneYear,
        TimeRange::TwoYears,
        TimeRange::FiveYears,
        TimeRange::Max,
    ];

    /// Values offered by the per-card range selector.
    pub const SELECTOR: [TimeRange; 3] = [
        TimeRange::OneMonth,
        TimeRange::YearToDate,
        TimeRange::OneYear,
    ];

    /// Selector values plus `current` when the selector lacks it, in range order.
    pub fn selector_with(current: TimeRange) -> Vec<TimeRange> {
        TimeRange::ALL
            .into_iter()
            .filter(|r| *r == current || TimeRange::SELECTOR.contains(r))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::FiveDays => "5d",
            TimeRange::OneMonth => "1mo",
            TimeRange::ThreeMonths => "3mo",
            TimeRange::SixMonths => "6mo",
            TimeRange::YearToDate => "ytd",
            TimeRange::OneYear => "1y",
            TimeRange::TwoYears => "2y",
            TimeRange::FiveYears => "5y",
            TimeRange::Max => "max",
        }
    }

    /// Bar interval requested from the provider for this window.
    pub fn interval(&self) -> &'static str {
        match self {
            TimeRange::FiveDays => "1h",
            TimeRange::FiveYears | TimeRange::Max => "1wk",
            _ => "1d",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TimeRange::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Invalid range '{}'. Must be one of: {}",
                    s,
                    TimeRange::ALL.map(|r| r.as_str()).join(", ")
                )
            })
    }
}

/// One OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Price history for one ticker over one window, oldest bar first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub range: TimeRange,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series from raw provider bars.
    ///
    /// Bars with non-finite prices are dropped, the rest are sorted by
    /// timestamp and duplicate timestamps keep the last bar seen, so the
    /// resulting series is always strictly increasing in time.
    pub fn new(ticker: impl Into<String>, range: TimeRange, bars: Vec<PriceBar>) -> Self {
        let mut bars: Vec<PriceBar> = bars.into_iter().filter(PriceBar::is_well_formed).collect();
        // stable sort, then keep the later duplicate
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        let series = Self {
            ticker: ticker.into(),
            range,
            bars: deduped,
        };
        debug_assert!(series.is_ordered());
        series
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when timestamps are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2026, 1, day, 14, 30, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    #[test]
    fn test_range_parsing() {
        assert_eq!("ytd".parse::<TimeRange>().unwrap(), TimeRange::YearToDate);
        assert_eq!(" 1Y ".parse::<TimeRange>().unwrap(), TimeRange::OneYear);
        assert!("7w".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::default(), TimeRange::YearToDate);
    }

    #[test]
    fn test_selector_includes_current_range() {
        assert_eq!(TimeRange::selector_with(TimeRange::YearToDate), TimeRange::SELECTOR.to_vec());
        assert_eq!(
            TimeRange::selector_with(TimeRange::ThreeMonths),
            vec![
                TimeRange::OneMonth,
                TimeRange::ThreeMonths,
                TimeRange::YearToDate,
                TimeRange::OneYear
            ]
        );
    }

    #[test]
    fn test_range_serde_uses_provider_names() {
        let json = serde_json::to_string(&TimeRange::OneMonth).unwrap();
        assert_eq!(json, "\"1mo\"");
    }

    #[test]
    fn test_series_is_sorted_and_deduplicated() {
        let series = PriceSeries::new(
            "DJT",
            TimeRange::OneMonth,
            vec![bar(3, 30.0), bar(1, 10.0), bar(2, 20.0), bar(2, 21.0)],
        );

        assert_eq!(series.len(), 3);
        assert!(series.is_ordered());
        assert_eq!(series.bars[1].close, 21.0);
        assert_eq!(series.bars[2].close, 30.0);
    }

    #[test]
    fn test_series_drops_non_finite_bars() {
        let mut broken = bar(2, 20.0);
        broken.high = f64::NAN;

        let series = PriceSeries::new("DJT", TimeRange::OneMonth, vec![bar(1, 10.0), broken]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars[0].close, 10.0);
    }
}
