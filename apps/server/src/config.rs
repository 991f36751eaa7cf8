use std::{net::SocketAddr, time::Duration};

use stockfolio_core::stocks::DEFAULT_CACHE_TTL_SECS;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub redis_url: String,
    pub polygon_api_key: String,
    pub polygon_base_url: Option<String>,
    pub marketwatch_base_url: Option<String>,
    pub cache_ttl: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub sync_symbols: Vec<String>,
    pub sync_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("SF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid SF_LISTEN_ADDR");
        let db_path = std::env::var("SF_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let polygon_api_key = std::env::var("POLYGON_API_KEY").unwrap_or_default();
        let polygon_base_url = std::env::var("POLYGON_BASE_URL").ok();
        let marketwatch_base_url = std::env::var("MARKETWATCH_BASE_URL").ok();
        let cache_ttl_secs: u64 = std::env::var("SF_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        let cors_allow = std::env::var("SF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let sync_symbols = std::env::var("SF_SYNC_SYMBOLS")
            .unwrap_or_else(|_| "AAPL".into())
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        let sync_interval_secs: u64 = std::env::var("SF_SYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .unwrap_or(300);
        Self {
            listen_addr,
            db_path,
            redis_url,
            polygon_api_key,
            polygon_base_url,
            marketwatch_base_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            sync_symbols,
            sync_interval: Duration::from_secs(sync_interval_secs),
        }
    }
}
