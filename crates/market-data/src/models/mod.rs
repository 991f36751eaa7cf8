//! Data models shared by the providers.

mod performance;
mod quote;

pub use performance::{no_data_sentinel, PerformanceData};
pub use quote::DailyQuote;
