use serde::{Deserialize, Serialize};

/// Daily open/close data for one symbol, as reported by the quote provider.
///
/// Every market field is optional: the provider may omit fields for thinly
/// traded symbols, and the merge layer keeps absences as NULLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuote {
    pub symbol: String,
    pub status: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub after_hours: Option<f64>,
    pub pre_market: Option<f64>,
    /// Quote date as reported by the provider (YYYY-MM-DD).
    #[serde(rename = "from")]
    pub from_date: Option<String>,
}
