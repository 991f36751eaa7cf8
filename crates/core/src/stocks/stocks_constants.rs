/// Default TTL for cached market data, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
