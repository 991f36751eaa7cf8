//! The merge orchestrator.
//!
//! One lookup walks: cache check → concurrent fan-out to the quote and
//! performance sources → typed merge with the durable `amount` → persist →
//! cache refresh. Source and cache failures degrade to absences; only a
//! symbol unknown everywhere, or a persistence failure with no fresh quote
//! data, surfaces to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info, warn};

use stockfolio_market_data::{DailyQuote, PerformanceData, PerformanceProvider, QuoteProvider};

use crate::cache::{cache_key, CacheStore};

use super::stocks_errors::{Result, StockError};
use super::stocks_model::{CachedMarketData, MarketDataUpdate, NewStock, Stock};
use super::stocks_traits::{StockRepositoryTrait, StockServiceTrait};

pub struct StockService {
    repository: Arc<dyn StockRepositoryTrait>,
    cache: Arc<dyn CacheStore>,
    quote_provider: Arc<dyn QuoteProvider>,
    performance_provider: Arc<dyn PerformanceProvider>,
    cache_ttl: Duration,
}

impl StockService {
    pub fn new(
        repository: Arc<dyn StockRepositoryTrait>,
        cache: Arc<dyn CacheStore>,
        quote_provider: Arc<dyn QuoteProvider>,
        performance_provider: Arc<dyn PerformanceProvider>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            quote_provider,
            performance_provider,
            cache_ttl,
        }
    }

    /// Concurrent fan-out to both sources. Each failure is isolated and
    /// converted to an absence value for this request only.
    async fn fetch_sources(&self, symbol: &str) -> (Option<DailyQuote>, PerformanceData) {
        let (quote_result, performance_result) = tokio::join!(
            self.quote_provider.daily_open_close(symbol, None),
            self.performance_provider.performance(symbol)
        );

        let quote = match quote_result {
            Ok(quote) => Some(quote),
            Err(e) => {
                error!(
                    "{} quote fetch failed for {}: {}",
                    self.quote_provider.id(),
                    symbol,
                    e
                );
                None
            }
        };

        let performance = match performance_result {
            Ok(performance) => performance,
            Err(e) => {
                error!(
                    "{} performance fetch failed for {}: {}",
                    self.performance_provider.id(),
                    symbol,
                    e
                );
                PerformanceData::new()
            }
        };

        (quote, performance)
    }

    /// Persist the merged payload. Returns `Ok(None)` when persistence failed
    /// but fresh quote data lets us serve the in-memory merge instead.
    async fn persist_merge(
        &self,
        symbol: &str,
        existing: Option<&Stock>,
        quote: Option<&DailyQuote>,
        performance: &PerformanceData,
    ) -> Result<Option<Stock>> {
        let result = if existing.is_some() {
            self.repository
                .update_market_data(symbol, MarketDataUpdate::from_sources(quote, performance))
                .await
        } else {
            self.repository
                .create(NewStock::from_sources(
                    symbol,
                    quote.cloned(),
                    performance.clone(),
                ))
                .await
                .map(Some)
        };

        match result {
            Ok(stock) => Ok(stock),
            Err(e) if quote.is_some() => {
                error!(
                    "Database operation failed for {}, serving unpersisted merge: {}",
                    symbol, e
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// The merged view when persistence was skipped or failed: existing record
/// overlaid with the fresh performance map and, when present, the quote.
fn merge_unpersisted(
    symbol: &str,
    existing: Option<&Stock>,
    quote: Option<&DailyQuote>,
    performance: &PerformanceData,
) -> Stock {
    let mut stock = existing
        .cloned()
        .unwrap_or_else(|| Stock::empty(symbol));
    stock.performance = performance.clone();
    if let Some(quote) = quote {
        stock.open = quote.open;
        stock.high = quote.high;
        stock.low = quote.low;
        stock.close = quote.close;
        stock.volume = quote.volume;
        stock.after_hours = quote.after_hours;
        stock.pre_market = quote.pre_market;
        stock.from_date = quote.from_date.clone();
        stock.status = quote.status.clone();
    }
    stock.updated_at = Utc::now().naive_utc();
    stock
}

fn canonical_symbol(symbol: &str) -> Result<String> {
    let canonical = symbol.trim().to_uppercase();
    if canonical.is_empty() {
        return Err(StockError::InvalidData("Symbol cannot be empty".to_string()));
    }
    Ok(canonical)
}

#[async_trait]
impl StockServiceTrait for StockService {
    async fn get_stock(&self, symbol: &str) -> Result<Stock> {
        let symbol = canonical_symbol(symbol)?;
        let key = cache_key(&symbol);

        // Cache errors never surface: a failing cache tier reads as a miss.
        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                info!("Cache hit for {}", symbol);
                let amount = self
                    .repository
                    .get_by_symbol(&symbol)?
                    .map(|stock| stock.amount)
                    .unwrap_or(0);
                return Ok(cached.into_stock(amount));
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {}: {}", symbol, e),
        }

        let existing = self.repository.get_by_symbol(&symbol)?;
        let (quote, performance) = self.fetch_sources(&symbol).await;

        if quote.is_none() && existing.is_none() {
            return Err(StockError::NotFound(symbol));
        }

        let stock = match self
            .persist_merge(&symbol, existing.as_ref(), quote.as_ref(), &performance)
            .await?
        {
            Some(stock) => stock,
            None => merge_unpersisted(&symbol, existing.as_ref(), quote.as_ref(), &performance),
        };

        let market_data = CachedMarketData::from_stock(&stock);
        if let Err(e) = self.cache.set(&key, &market_data, Some(self.cache_ttl)).await {
            warn!("Cache write failed for {}: {}", symbol, e);
        }

        Ok(stock)
    }

    async fn update_stock_amount(&self, symbol: &str, amount: i64) -> Result<Stock> {
        let symbol = canonical_symbol(symbol)?;
        if amount < 0 {
            return Err(StockError::InvalidData(
                "Amount must be non-negative".to_string(),
            ));
        }

        match self.repository.update_amount(&symbol, amount).await? {
            Some(stock) => Ok(stock),
            None => self.repository.create(NewStock::deposit(&symbol, amount)).await,
        }
    }

    async fn resync(&self, symbols: &[String]) -> Vec<(String, String)> {
        let mut failed = Vec::new();

        for symbol in symbols {
            let symbol = match canonical_symbol(symbol) {
                Ok(symbol) => symbol,
                Err(e) => {
                    failed.push((symbol.clone(), e.to_string()));
                    continue;
                }
            };

            let (quote, performance) = self.fetch_sources(&symbol).await;
            let Some(quote) = quote else {
                failed.push((symbol, "quote source produced no data".to_string()));
                continue;
            };

            let result = match self.repository.get_by_symbol(&symbol) {
                Ok(Some(_)) => self
                    .repository
                    .update_market_data(
                        &symbol,
                        MarketDataUpdate::from_sources(Some(&quote), &performance),
                    )
                    .await
                    .map(|_| ()),
                Ok(None) => self
                    .repository
                    .create(NewStock::from_sources(&symbol, Some(quote), performance))
                    .await
                    .map(|_| ()),
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => info!("Synced market data for {}", symbol),
                Err(e) => {
                    error!("Resync failed for {}: {}", symbol, e);
                    failed.push((symbol, e.to_string()));
                }
            }
        }

        failed
    }
}
