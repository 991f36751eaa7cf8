//! Background scheduler for periodic market data resync.
//!
//! Re-fetches the configured symbols on a fixed interval and persists the
//! merged results without touching the cache tier, so interactive lookups
//! keep their own TTL semantics.

use std::sync::Arc;

use tokio::time::{interval, sleep, Duration};
use tracing::{info, warn};

use crate::config::Config;
use crate::main_lib::AppState;

/// Initial delay before the first sync, to let the server fully start.
const INITIAL_DELAY_SECS: u64 = 10;

pub fn start_market_sync_scheduler(state: Arc<AppState>, config: &Config) {
    let symbols = config.sync_symbols.clone();
    let sync_interval = config.sync_interval;
    if symbols.is_empty() {
        info!("Market sync scheduler disabled: no symbols configured");
        return;
    }

    tokio::spawn(async move {
        info!(
            "Market sync scheduler started ({} symbols, every {}s)",
            symbols.len(),
            sync_interval.as_secs()
        );
        sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut tick = interval(sync_interval);
        loop {
            tick.tick().await;
            let failed = state.stock_service.resync(&symbols).await;
            if failed.is_empty() {
                info!("Market sync completed for {} symbols", symbols.len());
            } else {
                for (symbol, reason) in &failed {
                    warn!("Market sync skipped {}: {}", symbol, reason);
                }
            }
        }
    });
}
