//! MarketWatch performance scraper implementation.
//!
//! Locates a performance-labeled section in the stock page (a `div` whose
//! class mentions "performance", falling back to the first `table` whose
//! markup mentions it) and extracts label/value pairs from its two-column
//! rows. Labels are normalized to `snake_case`-ish keys: punctuation
//! stripped, spaces replaced with underscores, lowercased.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::warn;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::errors::{MarketDataError, Result};
use crate::models::{no_data_sentinel, PerformanceData};
use crate::provider::traits::PerformanceProvider;

const PROVIDER_ID: &str = "MARKETWATCH";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
    static ref DIV_SELECTOR: Selector = Selector::parse("div").expect("valid selector");
    static ref TABLE_SELECTOR: Selector = Selector::parse("table").expect("valid selector");
    static ref ROW_SELECTOR: Selector = Selector::parse("tr").expect("valid selector");
    static ref CELL_SELECTOR: Selector = Selector::parse("td, th").expect("valid selector");
}

/// Performance snippet provider backed by a MarketWatch-style stock page.
pub struct MarketWatchProvider {
    client: Client,
    base_url: String,
}

impl MarketWatchProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // The site serves a degraded page to clients without browser headers.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
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

    /// Extract label/value pairs from the performance section of a page.
    ///
    /// Returns the `no_data_found` sentinel when no section or rows match.
    fn extract_performance(html: &str, symbol: &str) -> PerformanceData {
        let document = Html::parse_document(html);

        let section = document
            .select(&DIV_SELECTOR)
            .find(|element| {
                element
                    .value()
                    .attr("class")
                    .is_some_and(|class| class.to_ascii_lowercase().contains("performance"))
            })
            .or_else(|| {
                document
                    .select(&TABLE_SELECTOR)
                    .find(|table| table.html().to_ascii_lowercase().contains("performance"))
            });

        let mut data = PerformanceData::new();
        if let Some(section) = section {
            for row in section.select(&ROW_SELECTOR) {
                let cells: Vec<ElementRef> = row.select(&CELL_SELECTOR).collect();
                if cells.len() >= 2 {
                    let label = normalize_label(&cell_text(&cells[0]));
                    let value = cell_text(&cells[1]);
                    if !label.is_empty() {
                        data.insert(label, value);
                    }
                }
            }
        }

        if data.is_empty() {
            warn!("No performance data found for {}", symbol);
            return no_data_sentinel(symbol);
        }
        data
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn normalize_label(label: &str) -> String {
    PUNCTUATION
        .replace_all(label, "")
        .replace(' ', "_")
        .to_lowercase()
}

#[async_trait]
impl PerformanceProvider for MarketWatchProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn performance(&self, symbol: &str) -> Result<PerformanceData> {
        let url = format!("{}/{}", self.base_url, symbol.to_lowercase());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.map_status_error(symbol, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        Ok(Self::extract_performance(&body, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERFORMANCE_PAGE: &str = r#"
        <html><body>
          <div class="element element--table performance">
            <table>
              <tr><td>5 Day</td><td>1.2%</td></tr>
              <tr><td>1 Month</td><td>-0.4%</td></tr>
              <tr><td>Y.T.D.</td><td>12.5%</td></tr>
              <tr><td>incomplete row</td></tr>
            </table>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_rows_from_performance_div() {
        let data = MarketWatchProvider::extract_performance(PERFORMANCE_PAGE, "AAPL");
        assert_eq!(data.get("5_day").map(String::as_str), Some("1.2%"));
        assert_eq!(data.get("1_month").map(String::as_str), Some("-0.4%"));
        assert_eq!(data.get("ytd").map(String::as_str), Some("12.5%"));
        assert!(!data.contains_key("status"));
    }

    #[test]
    fn test_falls_back_to_table_mentioning_performance() {
        let html = r#"
            <html><body>
              <table><tr><td>Performance</td><td></td></tr>
                     <tr><td>3 Month</td><td>4.0%</td></tr></table>
            </body></html>
        "#;
        let data = MarketWatchProvider::extract_performance(html, "TSLA");
        assert_eq!(data.get("3_month").map(String::as_str), Some("4.0%"));
    }

    #[test]
    fn test_no_section_returns_sentinel() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let data = MarketWatchProvider::extract_performance(html, "aapl");
        assert_eq!(data.get("status").map(String::as_str), Some("no_data_found"));
        assert_eq!(data.get("symbol").map(String::as_str), Some("AAPL"));
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(normalize_label("5 Day"), "5_day");
        assert_eq!(normalize_label("Y.T.D."), "ytd");
        assert_eq!(normalize_label("1 Year (est.)"), "1_year_est");
    }
}
