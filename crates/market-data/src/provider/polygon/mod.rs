//! Polygon daily open/close provider implementation.
//!
//! Endpoint shape: `{base}/{SYMBOL}/{date}?apikey=…` returning
//! `{status, symbol, open, high, low, close, volume, afterHours, preMarket, from}`.
//! A payload whose `status` is not `"OK"` is a provider error even when the
//! HTTP status is 200.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::warn;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::errors::{MarketDataError, Result};
use crate::models::DailyQuote;
use crate::provider::traits::QuoteProvider;

const PROVIDER_ID: &str = "POLYGON";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Daily open/close quote provider backed by a Polygon-style REST API.
pub struct PolygonProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Raw daily open/close response payload.
#[derive(Debug, Deserialize)]
struct DailyOpenCloseResponse {
    status: Option<String>,
    symbol: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    #[serde(rename = "afterHours")]
    after_hours: Option<f64>,
    #[serde(rename = "preMarket")]
    pre_market: Option<f64>,
    from: Option<String>,
    message: Option<String>,
}

impl PolygonProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn map_status_error(&self, symbol: &str, status: StatusCode) -> MarketDataError {
        match status {
            StatusCode::NOT_FOUND => MarketDataError::SymbolNotFound(symbol.to_string()),
            StatusCode::TOO_MANY_REQUESTS => MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            },
            other => MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", other.as_u16()),
            },
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> MarketDataError {
        if err.is_timeout() {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::Network(err)
        }
    }

    fn into_quote(symbol: &str, response: DailyOpenCloseResponse) -> DailyQuote {
        DailyQuote {
            symbol: response
                .symbol
                .unwrap_or_else(|| symbol.to_uppercase()),
            status: response.status,
            open: response.open,
            high: response.high,
            low: response.low,
            close: response.close,
            // Providers report volume as a float for some symbols.
            volume: response.volume.map(|v| v as i64),
            after_hours: response.after_hours,
            pre_market: response.pre_market,
            from_date: response.from,
        }
    }
}

#[async_trait]
impl QuoteProvider for PolygonProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn daily_open_close(&self, symbol: &str, date: Option<NaiveDate>) -> Result<DailyQuote> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            symbol.to_uppercase(),
            date.format("%Y-%m-%d")
        );

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.map_status_error(symbol, status));
        }

        let payload: DailyOpenCloseResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if payload.status.as_deref() != Some("OK") {
            let message = payload
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(
                "Polygon returned non-OK status for {}: {}",
                symbol, message
            );
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            });
        }

        Ok(Self::into_quote(symbol, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_maps_to_quote() {
        let payload: DailyOpenCloseResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "symbol": "AAPL",
                "open": 150.0,
                "high": 155.0,
                "low": 149.0,
                "close": 152.0,
                "volume": 1000000.0,
                "afterHours": 151.5,
                "preMarket": 150.5,
                "from": "2024-01-10"
            }"#,
        )
        .unwrap();

        let quote = PolygonProvider::into_quote("AAPL", payload);
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.open, Some(150.0));
        assert_eq!(quote.volume, Some(1_000_000));
        assert_eq!(quote.after_hours, Some(151.5));
        assert_eq!(quote.pre_market, Some(150.5));
        assert_eq!(quote.from_date.as_deref(), Some("2024-01-10"));
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let payload: DailyOpenCloseResponse =
            serde_json::from_str(r#"{"status": "OK"}"#).unwrap();
        let quote = PolygonProvider::into_quote("msft", payload);
        assert_eq!(quote.symbol, "MSFT");
        assert!(quote.open.is_none());
        assert!(quote.volume.is_none());
    }
}
