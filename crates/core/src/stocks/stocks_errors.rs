use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for stock-related operations
#[derive(Debug, Error)]
pub enum StockError {
    /// The symbol is unknown everywhere: no durable record and no quote data.
    #[error("Stock {0} not found")]
    NotFound(String),

    /// A durable-store operation failed (the transaction was rolled back).
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for StockError {
    fn from(err: DieselError) -> Self {
        StockError::Persistence(err.to_string())
    }
}

/// Result type for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
