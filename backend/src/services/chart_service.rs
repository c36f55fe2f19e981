use crate::models::chart::{
    Axis, CandleSide, Layout, LineStyle, Margin, RangeSlider, Trace,
};
use crate::models::{ChartSpec, ChartStyle, ChartTheme, PriceSeries};

/// Turns a price series into a Plotly figure.
///
/// Pure function. An empty series yields `None` and the caller omits the chart.
pub fn render_chart(series: &PriceSeries, style: ChartStyle, theme: &ChartTheme) -> Option<ChartSpec> {
    if series.is_empty() {
        return None;
    }

    let x = series.bars.iter().map(|b| b.timestamp).collect();
    let trace = match style {
        ChartStyle::Line => Trace::Scatter {
            x,
            y: series.bars.iter().map(|b| b.close).collect(),
            mode: "lines",
            line: LineStyle {
                color: theme.line_color.clone(),
                width: theme.line_width,
            },
        },
        ChartStyle::Candlestick => Trace::Candlestick {
            x,
            open: series.bars.iter().map(|b| b.open).collect(),
            high: series.bars.iter().map(|b| b.high).collect(),
            low: series.bars.iter().map(|b| b.low).collect(),
            close: series.bars.iter().map(|b| b.close).collect(),
            increasing: side(&theme.increasing_color),
            decreasing: side(&theme.decreasing_color),
        },
    };

    Some(ChartSpec {
        ticker: series.ticker.clone(),
        style,
        data: vec![trace],
        layout: layout(style, theme),
    })
}

fn side(color: &str) -> CandleSide {
    CandleSide {
        line: LineStyle {
            color: color.to_string(),
            width: 1.0,
        },
    }
}

fn layout(style: ChartStyle, theme: &ChartTheme) -> Layout {
    Layout {
        height: theme.height,
        margin: Margin { l: 0, r: 0, t: 10, b: 0 },
        paper_bgcolor: theme.background.clone(),
        plot_bgcolor: theme.background.clone(),
        xaxis: Axis {
            visible: true,
            // Plotly adds a range slider under candlesticks by default
            rangeslider: (style == ChartStyle::Candlestick).then_some(RangeSlider { visible: false }),
        },
        yaxis: Axis {
            visible: false,
            rangeslider: None,
        },
        template: "none",
        showlegend: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceBar, TimeRange};
    use chrono::{TimeZone, Utc};

    fn series(bars: usize) -> PriceSeries {
        let bars = (0..bars)
            .map(|i| PriceBar {
                timestamp: Utc.with_ymd_and_hms(2026, 3, 1 + i as u32, 21, 0, 0).unwrap(),
                open: 10.0 + i as f64,
                high: 11.0 + i as f64,
                low: 9.0 + i as f64,
                close: 10.5 + i as f64,
            })
            .collect();
        PriceSeries::new("DOMI", TimeRange::OneMonth, bars)
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        let theme = ChartTheme::default();
        assert!(render_chart(&series(0), ChartStyle::Line, &theme).is_none());
        assert!(render_chart(&series(0), ChartStyle::Candlestick, &theme).is_none());
    }

    #[test]
    fn test_line_chart_uses_closes_and_theme() {
        let theme = ChartTheme::default();
        let chart = render_chart(&series(3), ChartStyle::Line, &theme).unwrap();

        match &chart.data[0] {
            Trace::Scatter { x, y, line, .. } => {
                assert_eq!(x.len(), 3);
                assert_eq!(y, &vec![10.5, 11.5, 12.5]);
                assert_eq!(line.color, "#cc0000");
            }
            other => panic!("expected scatter, got {:?}", other),
        }
        assert_eq!(chart.layout.height, 180);
        assert!(!chart.layout.yaxis.visible);
        assert!(chart.layout.xaxis.rangeslider.is_none());
    }

    #[test]
    fn test_candlestick_chart_carries_ohlc() {
        let chart = render_chart(&series(2), ChartStyle::Candlestick, &ChartTheme::default()).unwrap();

        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["data"][0]["type"], "candlestick");
        assert_eq!(value["data"][0]["high"][1], 12.0);
        assert_eq!(value["layout"]["xaxis"]["rangeslider"]["visible"], false);
        assert_eq!(value["ticker"], "DOMI");
    }
}
