//! Provider trait definitions.
//!
//! The orchestrator depends on these traits rather than on concrete clients,
//! so live HTTP providers and test fakes are interchangeable.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{DailyQuote, PerformanceData};

/// A source of daily open/close quotes.
///
/// Pure read: a fetch has no side effects on the provider.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the daily open/close quote for `symbol`.
    ///
    /// `date` defaults to today (UTC) when `None`.
    async fn daily_open_close(&self, symbol: &str, date: Option<NaiveDate>) -> Result<DailyQuote>;
}

/// A source of scraped performance snippets.
#[async_trait]
pub trait PerformanceProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the performance label/value pairs for `symbol`.
    ///
    /// Finding no performance section is a soft failure: the implementation
    /// returns the [`crate::models::no_data_sentinel`] payload instead of an
    /// error. Errors are reserved for transport/HTTP-level failures.
    async fn performance(&self, symbol: &str) -> Result<PerformanceData>;
}
