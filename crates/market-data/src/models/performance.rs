use std::collections::HashMap;

/// Label/value pairs scraped from the performance section of a stock page,
/// e.g. `{"5_day": "1.2%", "1_month": "-0.4%"}`.
pub type PerformanceData = HashMap<String, String>;

/// Soft-failure payload returned when the page yielded no performance rows.
///
/// The scrape succeeding but finding nothing is not an error: the orchestrator
/// still assembles a partial record around this sentinel.
pub fn no_data_sentinel(symbol: &str) -> PerformanceData {
    let mut data = PerformanceData::new();
    data.insert("status".to_string(), "no_data_found".to_string());
    data.insert("symbol".to_string(), symbol.to_uppercase());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_uppercases_symbol() {
        let data = no_data_sentinel("aapl");
        assert_eq!(data.get("status").map(String::as_str), Some("no_data_found"));
        assert_eq!(data.get("symbol").map(String::as_str), Some("AAPL"));
    }
}
