use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        AppError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    /// Wraps a provider failure for `ticker`.
    pub fn from_provider(ticker: &str, err: PriceProviderError) -> Self {
        Self::data_unavailable(ticker, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::DataUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
