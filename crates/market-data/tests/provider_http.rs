//! HTTP-level provider tests against a mock server.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockfolio_market_data::{
    MarketDataError, MarketWatchProvider, PerformanceProvider, PolygonProvider, QuoteProvider,
};

fn quote_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

#[tokio::test]
async fn polygon_success_maps_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/AAPL/2024-01-10"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "symbol": "AAPL",
            "open": 150.0,
            "high": 155.0,
            "low": 149.0,
            "close": 152.0,
            "volume": 1000000,
            "afterHours": 151.5,
            "preMarket": 150.5,
            "from": "2024-01-10"
        })))
        .mount(&server)
        .await;

    let provider = PolygonProvider::new(server.uri(), "test-key").unwrap();
    let quote = provider
        .daily_open_close("aapl", Some(quote_date()))
        .await
        .unwrap();

    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.close, Some(152.0));
    assert_eq!(quote.volume, Some(1_000_000));
    assert_eq!(quote.status.as_deref(), Some("OK"));
}

#[tokio::test]
async fn polygon_404_is_symbol_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = PolygonProvider::new(server.uri(), "test-key").unwrap();
    let err = provider
        .daily_open_close("NOPE", Some(quote_date()))
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::SymbolNotFound(s) if s == "NOPE"));
}

#[tokio::test]
async fn polygon_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = PolygonProvider::new(server.uri(), "test-key").unwrap();
    let err = provider
        .daily_open_close("AAPL", Some(quote_date()))
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::RateLimited { .. }));
}

#[tokio::test]
async fn polygon_non_ok_payload_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "NOT_AUTHORIZED",
            "message": "API key required"
        })))
        .mount(&server)
        .await;

    let provider = PolygonProvider::new(server.uri(), "test-key").unwrap();
    let err = provider
        .daily_open_close("AAPL", Some(quote_date()))
        .await
        .unwrap_err();

    match err {
        MarketDataError::ProviderError { provider, message } => {
            assert_eq!(provider, "POLYGON");
            assert_eq!(message, "API key required");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn marketwatch_scrapes_performance_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/aapl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="performance">
                  <table>
                    <tr><td>5 Day</td><td>1.2%</td></tr>
                    <tr><td>1 Month</td><td>3.4%</td></tr>
                  </table>
                </div>
               </body></html>"#,
        ))
        .mount(&server)
        .await;

    let provider = MarketWatchProvider::new(server.uri()).unwrap();
    let data = provider.performance("AAPL").await.unwrap();

    assert_eq!(data.get("5_day").map(String::as_str), Some("1.2%"));
    assert_eq!(data.get("1_month").map(String::as_str), Some("3.4%"));
}

#[tokio::test]
async fn marketwatch_empty_page_returns_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let provider = MarketWatchProvider::new(server.uri()).unwrap();
    let data = provider.performance("GHOST").await.unwrap();

    assert_eq!(data.get("status").map(String::as_str), Some("no_data_found"));
    assert_eq!(data.get("symbol").map(String::as_str), Some("GHOST"));
}

#[tokio::test]
async fn marketwatch_500_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = MarketWatchProvider::new(server.uri()).unwrap();
    let err = provider.performance("AAPL").await.unwrap_err();

    assert!(matches!(err, MarketDataError::ProviderError { .. }));
}
