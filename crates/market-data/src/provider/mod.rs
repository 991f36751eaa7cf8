pub mod marketwatch;
pub mod polygon;
pub mod traits;

pub use marketwatch::MarketWatchProvider;
pub use polygon::PolygonProvider;
pub use traits::{PerformanceProvider, QuoteProvider};
