//! Core domain logic for stockfolio: durable store, cache tier, and the
//! per-symbol merge orchestration that assembles a unified stock record from
//! the persisted row, the daily quote source, and the scraped performance
//! source.

pub mod cache;
pub mod db;
pub mod errors;
pub mod schema;
pub mod stocks;

pub use errors::{Error, Result};
