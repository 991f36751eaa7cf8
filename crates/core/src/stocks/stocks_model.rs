use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockfolio_market_data::{DailyQuote, PerformanceData};

use crate::schema::stocks;

/// Database row for a stock record. `performance` is a JSON-encoded map.
#[derive(Queryable, Insertable, Identifiable, Debug, Clone)]
#[diesel(table_name = stocks)]
pub struct StockDb {
    pub id: String,
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub after_hours: Option<f64>,
    pub pre_market: Option<f64>,
    pub from_date: Option<String>,
    pub status: Option<String>,
    pub performance: Option<String>,
    pub amount: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Unified stock record returned to callers: persisted market data merged
/// with the user-owned `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub after_hours: Option<f64>,
    pub pre_market: Option<f64>,
    #[serde(rename = "from")]
    pub from_date: Option<String>,
    pub status: Option<String>,
    pub performance: HashMap<String, String>,
    pub amount: i64,
    pub updated_at: NaiveDateTime,
}

impl Stock {
    /// An empty record for a symbol nothing is known about yet.
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
            after_hours: None,
            pre_market: None,
            from_date: None,
            status: None,
            performance: HashMap::new(),
            amount: 0,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl From<StockDb> for Stock {
    fn from(row: StockDb) -> Self {
        let performance = decode_performance(&row.symbol, row.performance.as_deref());
        Stock {
            symbol: row.symbol,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            after_hours: row.after_hours,
            pre_market: row.pre_market,
            from_date: row.from_date,
            status: row.status,
            performance,
            amount: row.amount,
            updated_at: row.updated_at,
        }
    }
}

/// Input model for creating a stock record.
#[derive(Debug, Clone)]
pub struct NewStock {
    pub symbol: String,
    pub quote: Option<DailyQuote>,
    pub performance: PerformanceData,
    pub amount: i64,
}

impl NewStock {
    /// Merged payload for a freshly fetched symbol; `amount` starts at 0.
    pub fn from_sources(
        symbol: &str,
        quote: Option<DailyQuote>,
        performance: PerformanceData,
    ) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            quote,
            performance,
            amount: 0,
        }
    }

    /// A deposit against a symbol with no record yet: all market fields absent.
    pub fn deposit(symbol: &str, amount: i64) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            quote: None,
            performance: PerformanceData::new(),
            amount,
        }
    }

    pub(crate) fn into_row(self) -> StockDb {
        let now = Utc::now().naive_utc();
        let quote = self.quote;
        StockDb {
            id: Uuid::new_v4().to_string(),
            symbol: self.symbol,
            open: quote.as_ref().and_then(|q| q.open),
            high: quote.as_ref().and_then(|q| q.high),
            low: quote.as_ref().and_then(|q| q.low),
            close: quote.as_ref().and_then(|q| q.close),
            volume: quote.as_ref().and_then(|q| q.volume),
            after_hours: quote.as_ref().and_then(|q| q.after_hours),
            pre_market: quote.as_ref().and_then(|q| q.pre_market),
            from_date: quote.as_ref().and_then(|q| q.from_date.clone()),
            status: quote.as_ref().and_then(|q| q.status.clone()),
            performance: Some(encode_performance(&self.performance)),
            amount: self.amount,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Typed changeset for a market-data refresh.
///
/// `amount` is deliberately not a member: a refresh can never overwrite the
/// user-owned holding. Outer `None` skips a column, `Some(None)` nulls it.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = stocks)]
pub struct MarketDataUpdate {
    pub open: Option<Option<f64>>,
    pub high: Option<Option<f64>>,
    pub low: Option<Option<f64>>,
    pub close: Option<Option<f64>>,
    pub volume: Option<Option<i64>>,
    pub after_hours: Option<Option<f64>>,
    pub pre_market: Option<Option<f64>>,
    pub from_date: Option<Option<String>>,
    pub status: Option<Option<String>>,
    pub performance: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl MarketDataUpdate {
    /// Build the refresh changeset from the fan-out results.
    ///
    /// Quote fields are written only when the quote source produced data, so
    /// a failing quote provider leaves previously stored prices untouched.
    /// The performance map is always written (the scraper soft-fails to a
    /// sentinel rather than erroring).
    pub fn from_sources(quote: Option<&DailyQuote>, performance: &PerformanceData) -> Self {
        Self {
            open: quote.map(|q| q.open),
            high: quote.map(|q| q.high),
            low: quote.map(|q| q.low),
            close: quote.map(|q| q.close),
            volume: quote.map(|q| q.volume),
            after_hours: quote.map(|q| q.after_hours),
            pre_market: quote.map(|q| q.pre_market),
            from_date: quote.map(|q| q.from_date.clone()),
            status: quote.map(|q| q.status.clone()),
            performance: Some(encode_performance(performance)),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

/// Cache payload: the market-data subset of a record, never `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedMarketData {
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub after_hours: Option<f64>,
    pub pre_market: Option<f64>,
    #[serde(rename = "from")]
    pub from_date: Option<String>,
    pub status: Option<String>,
    pub performance: HashMap<String, String>,
    pub updated_at: NaiveDateTime,
}

impl CachedMarketData {
    pub fn from_stock(stock: &Stock) -> Self {
        Self {
            symbol: stock.symbol.clone(),
            open: stock.open,
            high: stock.high,
            low: stock.low,
            close: stock.close,
            volume: stock.volume,
            after_hours: stock.after_hours,
            pre_market: stock.pre_market,
            from_date: stock.from_date.clone(),
            status: stock.status.clone(),
            performance: stock.performance.clone(),
            updated_at: stock.updated_at,
        }
    }

    /// Rebuild the unified record from a cached payload plus the current
    /// durable `amount`.
    pub fn into_stock(self, amount: i64) -> Stock {
        Stock {
            symbol: self.symbol,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            after_hours: self.after_hours,
            pre_market: self.pre_market,
            from_date: self.from_date,
            status: self.status,
            performance: self.performance,
            amount,
            updated_at: self.updated_at,
        }
    }
}

pub(crate) fn encode_performance(performance: &PerformanceData) -> String {
    serde_json::to_string(performance).unwrap_or_else(|_| "{}".to_string())
}

pub(crate) fn decode_performance(symbol: &str, raw: Option<&str>) -> HashMap<String, String> {
    match raw {
        None => HashMap::new(),
        Some(blob) => serde_json::from_str(blob).unwrap_or_else(|e| {
            warn!("Invalid JSON in performance data for {}: {}", symbol, e);
            HashMap::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_performance_bad_json_is_empty() {
        assert!(decode_performance("AAPL", Some("not json")).is_empty());
        assert!(decode_performance("AAPL", None).is_empty());
    }

    #[test]
    fn test_decode_performance_round_trip() {
        let mut performance = PerformanceData::new();
        performance.insert("5_day".to_string(), "1.2%".to_string());
        let encoded = encode_performance(&performance);
        assert_eq!(decode_performance("AAPL", Some(&encoded)), performance);
    }

    #[test]
    fn test_refresh_changeset_skips_quote_columns_without_quote() {
        let update = MarketDataUpdate::from_sources(None, &PerformanceData::new());
        assert!(update.open.is_none());
        assert!(update.close.is_none());
        assert!(update.performance.is_some());
    }

    #[test]
    fn test_stock_serializes_with_wire_aliases() {
        let mut stock = Stock::empty("AAPL");
        stock.after_hours = Some(151.5);
        stock.from_date = Some("2024-01-10".to_string());
        let json = serde_json::to_value(&stock).unwrap();
        assert_eq!(json["afterHours"], 151.5);
        assert_eq!(json["from"], "2024-01-10");
        assert_eq!(json["amount"], 0);
    }
}
