use async_trait::async_trait;

use super::stocks_errors::Result;
use super::stocks_model::{MarketDataUpdate, NewStock, Stock};

/// Durable store for stock records.
///
/// All mutating operations run inside one transaction each: a mid-write
/// failure rolls back and surfaces as [`super::StockError::Persistence`].
#[async_trait]
pub trait StockRepositoryTrait: Send + Sync {
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>>;

    async fn create(&self, new_stock: NewStock) -> Result<Stock>;

    /// Applies a market-data refresh to an existing record, leaving `amount`
    /// untouched. Returns `None` when no record exists for the symbol.
    async fn update_market_data(
        &self,
        symbol: &str,
        update: MarketDataUpdate,
    ) -> Result<Option<Stock>>;

    /// Adds `delta` to the record's amount. Returns `None` when no record
    /// exists for the symbol.
    async fn update_amount(&self, symbol: &str, delta: i64) -> Result<Option<Stock>>;
}

#[async_trait]
pub trait StockServiceTrait: Send + Sync {
    /// Returns the unified record for a symbol: cached when fresh, otherwise
    /// fetched from both external sources, merged, persisted, and re-cached.
    async fn get_stock(&self, symbol: &str) -> Result<Stock>;

    /// Adds `amount` units to the symbol's holding, creating the record with
    /// empty market fields when absent. Never touches the cache tier.
    async fn update_stock_amount(&self, symbol: &str, amount: i64) -> Result<Stock>;

    /// Refreshes market data for a list of symbols (background job path).
    /// Returns the symbols that failed, with their error messages.
    async fn resync(&self, symbols: &[String]) -> Vec<(String, String)>;
}
