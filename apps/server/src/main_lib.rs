use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use stockfolio_core::{
    cache::{CacheStore, RedisCache},
    db,
    stocks::{StockRepository, StockRepositoryTrait, StockService, StockServiceTrait},
};
use stockfolio_market_data::{
    MarketWatchProvider, PerformanceProvider, PolygonProvider, QuoteProvider,
};

const DEFAULT_POLYGON_BASE_URL: &str = "https://api.polygon.io/v1/open-close";
const DEFAULT_MARKETWATCH_BASE_URL: &str = "https://www.marketwatch.com/investing/stock";

pub struct AppState {
    pub stock_service: Arc<dyn StockServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;

    let repository: Arc<dyn StockRepositoryTrait> = Arc::new(StockRepository::new(pool));

    // Connection establishment is lazy; a down Redis only degrades lookups.
    let cache: Arc<dyn CacheStore> = Arc::new(RedisCache::new(&config.redis_url)?);

    let polygon_base_url = config
        .polygon_base_url
        .as_deref()
        .unwrap_or(DEFAULT_POLYGON_BASE_URL);
    let quote_provider: Arc<dyn QuoteProvider> = Arc::new(PolygonProvider::new(
        polygon_base_url,
        config.polygon_api_key.clone(),
    )?);

    let marketwatch_base_url = config
        .marketwatch_base_url
        .as_deref()
        .unwrap_or(DEFAULT_MARKETWATCH_BASE_URL);
    let performance_provider: Arc<dyn PerformanceProvider> =
        Arc::new(MarketWatchProvider::new(marketwatch_base_url)?);

    let stock_service = Arc::new(StockService::new(
        repository,
        cache,
        quote_provider,
        performance_provider,
        config.cache_ttl,
    ));

    Ok(Arc::new(AppState { stock_service }))
}
