//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to an external market data source.
///
/// The merge orchestrator treats every variant as recoverable: a failing
/// source degrades to an absence value for that request only. The variants
/// exist so logs and tests can tell the failure modes apart.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the symbol (HTTP 404 equivalent).
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429 equivalent).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered but its payload reports a failure,
    /// or it returned an unexpected HTTP status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A transport-level error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MarketDataError>;

impl MarketDataError {
    /// True when the source itself was unreachable (as opposed to answering
    /// with an error).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "POLYGON".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: POLYGON");

        let error = MarketDataError::ProviderError {
            provider: "POLYGON".to_string(),
            message: "Unknown error".to_string(),
        };
        assert_eq!(format!("{}", error), "Provider error: POLYGON - Unknown error");
    }

    #[test]
    fn test_unavailable_classification() {
        let error = MarketDataError::Timeout {
            provider: "MARKETWATCH".to_string(),
        };
        assert!(error.is_unavailable());

        let error = MarketDataError::SymbolNotFound("AAPL".to_string());
        assert!(!error.is_unavailable());
    }
}
