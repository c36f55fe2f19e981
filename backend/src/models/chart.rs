use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Candlestick,
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartStyle::Line => write!(f, "line"),
            ChartStyle::Candlestick => write!(f, "candlestick"),
        }
    }
}

impl FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartStyle::Line),
            "candlestick" | "candle" => Ok(ChartStyle::Candlestick),
            other => Err(format!(
                "Invalid chart style '{}'. Must be 'line' or 'candlestick'",
                other
            )),
        }
    }
}

/// Colours and sizing applied to every generated chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    pub line_color: String,
    pub line_width: f64,
    pub height: u32,
    pub background: String,
    pub increasing_color: String,
    pub decreasing_color: String,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            line_color: "#cc0000".to_string(),
            line_width: 2.0,
            height: 180,
            background: "#f8f9fa".to_string(),
            increasing_color: "#2e7d32".to_string(),
            decreasing_color: "#cc0000".to_string(),
        }
    }
}

// ==============================================================================
// Plotly figure
// ==============================================================================

/// A Plotly.js figure: hand `data` and `layout` straight to `Plotly.newPlot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub ticker: String,
    pub style: ChartStyle,
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        mode: &'static str,
        line: LineStyle,
    },
    Candlestick {
        x: Vec<DateTime<Utc>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        increasing: CandleSide,
        decreasing: CandleSide,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSide {
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub height: u32,
    pub margin: Margin,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub template: &'static str,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}
