//! External market data sources for stockfolio.
//!
//! Two independent sources feed the stock record merge:
//! - Polygon-style daily open/close REST API ([`provider::polygon`])
//! - MarketWatch-style performance page scraper ([`provider::marketwatch`])
//!
//! Providers are exposed through the [`provider::QuoteProvider`] and
//! [`provider::PerformanceProvider`] traits so the orchestrator in
//! `stockfolio-core` can be wired with injected, pooled client handles.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, Result};
pub use models::{no_data_sentinel, DailyQuote, PerformanceData};
pub use provider::{MarketWatchProvider, PerformanceProvider, PolygonProvider, QuoteProvider};
