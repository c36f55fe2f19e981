use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single headline linked to a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Request parameters for fetching headlines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsQueryParams {
    /// Maximum number of headlines (default: configured NEWS_LIMIT)
    pub limit: Option<usize>,
}
