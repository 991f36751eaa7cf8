use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::db::{get_connection, DbPool};
use crate::schema::stocks;

use super::stocks_errors::{Result, StockError};
use super::stocks_model::{MarketDataUpdate, NewStock, Stock, StockDb};
use super::stocks_traits::StockRepositoryTrait;

/// Repository for managing stock records in the database
pub struct StockRepository {
    pool: Arc<DbPool>,
}

impl StockRepository {
    /// Creates a new StockRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn connection(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| StockError::Persistence(e.to_string()))
    }
}

#[async_trait]
impl StockRepositoryTrait for StockRepository {
    fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>> {
        let mut conn = self.connection()?;

        let row = stocks::table
            .filter(stocks::symbol.eq(symbol.to_uppercase()))
            .first::<StockDb>(&mut conn)
            .optional()
            .map_err(StockError::from)?;

        Ok(row.map(Stock::from))
    }

    async fn create(&self, new_stock: NewStock) -> Result<Stock> {
        let mut conn = self.connection()?;
        let row = new_stock.into_row();

        conn.transaction::<_, DieselError, _>(|conn| {
            diesel::insert_into(stocks::table)
                .values(&row)
                .execute(conn)?;
            Ok(())
        })?;

        Ok(row.into())
    }

    async fn update_market_data(
        &self,
        symbol: &str,
        update: MarketDataUpdate,
    ) -> Result<Option<Stock>> {
        let symbol = symbol.to_uppercase();
        let mut conn = self.connection()?;

        let row = conn.transaction::<_, DieselError, _>(|conn| {
            let affected = diesel::update(stocks::table.filter(stocks::symbol.eq(&symbol)))
                .set(&update)
                .execute(conn)?;
            if affected == 0 {
                return Ok(None);
            }
            stocks::table
                .filter(stocks::symbol.eq(&symbol))
                .first::<StockDb>(conn)
                .optional()
        })?;

        Ok(row.map(Stock::from))
    }

    async fn update_amount(&self, symbol: &str, delta: i64) -> Result<Option<Stock>> {
        let symbol = symbol.to_uppercase();
        let mut conn = self.connection()?;

        let row = conn.transaction::<_, DieselError, _>(|conn| {
            let existing = stocks::table
                .filter(stocks::symbol.eq(&symbol))
                .first::<StockDb>(conn)
                .optional()?;

            let Some(existing) = existing else {
                return Ok(None);
            };

            diesel::update(stocks::table.filter(stocks::symbol.eq(&symbol)))
                .set((
                    stocks::amount.eq(existing.amount + delta),
                    stocks::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            stocks::table
                .filter(stocks::symbol.eq(&symbol))
                .first::<StockDb>(conn)
                .optional()
        })?;

        Ok(row.map(Stock::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use stockfolio_market_data::{DailyQuote, PerformanceData};

    fn test_quote(symbol: &str) -> DailyQuote {
        DailyQuote {
            symbol: symbol.to_string(),
            status: Some("OK".to_string()),
            open: Some(150.0),
            high: Some(155.0),
            low: Some(149.0),
            close: Some(152.0),
            volume: Some(1_000_000),
            after_hours: Some(151.5),
            pre_market: Some(150.5),
            from_date: Some("2024-01-10".to_string()),
        }
    }

    fn setup() -> (tempfile::TempDir, StockRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("stocks.db");
        let db_path = db_path.to_str().unwrap();
        db::init(db_path).unwrap();
        let pool = db::create_pool(db_path).unwrap();
        db::run_migrations(&pool).unwrap();
        (dir, StockRepository::new(pool))
    }

    #[tokio::test]
    async fn test_create_and_get_by_symbol() {
        let (_dir, repository) = setup();

        let mut performance = PerformanceData::new();
        performance.insert("5_day".to_string(), "1.2%".to_string());

        let created = repository
            .create(NewStock::from_sources("aapl", Some(test_quote("AAPL")), performance))
            .await
            .unwrap();
        assert_eq!(created.symbol, "AAPL");
        assert_eq!(created.amount, 0);

        let fetched = repository.get_by_symbol("AAPL").unwrap().unwrap();
        assert_eq!(fetched.close, Some(152.0));
        assert_eq!(fetched.performance.get("5_day").map(String::as_str), Some("1.2%"));

        assert!(repository.get_by_symbol("MSFT").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_market_refresh_preserves_amount() {
        let (_dir, repository) = setup();

        repository
            .create(NewStock::deposit("AAPL", 10))
            .await
            .unwrap();

        let mut performance = PerformanceData::new();
        performance.insert("1_month".to_string(), "3.4%".to_string());
        let quote = test_quote("AAPL");

        let updated = repository
            .update_market_data("AAPL", MarketDataUpdate::from_sources(Some(&quote), &performance))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.amount, 10);
        assert_eq!(updated.close, Some(152.0));
        assert_eq!(updated.performance.get("1_month").map(String::as_str), Some("3.4%"));
    }

    #[tokio::test]
    async fn test_refresh_without_quote_keeps_market_fields() {
        let (_dir, repository) = setup();

        repository
            .create(NewStock::from_sources(
                "AAPL",
                Some(test_quote("AAPL")),
                PerformanceData::new(),
            ))
            .await
            .unwrap();

        let mut performance = PerformanceData::new();
        performance.insert("ytd".to_string(), "12.5%".to_string());

        let updated = repository
            .update_market_data("AAPL", MarketDataUpdate::from_sources(None, &performance))
            .await
            .unwrap()
            .unwrap();

        // Quote columns were skipped by the changeset, not nulled.
        assert_eq!(updated.close, Some(152.0));
        assert_eq!(updated.performance.get("ytd").map(String::as_str), Some("12.5%"));
    }

    #[tokio::test]
    async fn test_update_amount_accumulates() {
        let (_dir, repository) = setup();

        repository
            .create(NewStock::deposit("NEWSTOCK", 10))
            .await
            .unwrap();

        let updated = repository.update_amount("NEWSTOCK", 5).await.unwrap().unwrap();
        assert_eq!(updated.amount, 15);

        assert!(repository.update_amount("GHOST", 5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_market_data_missing_symbol_is_none() {
        let (_dir, repository) = setup();
        let result = repository
            .update_market_data(
                "GHOST",
                MarketDataUpdate::from_sources(None, &PerformanceData::new()),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
