use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use stockfolio_core::errors::Error as CoreError;
use stockfolio_core::stocks::StockError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        ApiError::Core(CoreError::Stock(err))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(CoreError::Stock(StockError::NotFound(_))) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Core(CoreError::Stock(StockError::InvalidData(_))) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Core(e) => {
                tracing::error!("Core error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(StockError::NotFound("GHOST".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let err = ApiError::from(StockError::InvalidData("bad".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let err = ApiError::BadRequest("Amount must be non-negative".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_maps_to_500() {
        let err = ApiError::from(StockError::Persistence("disk full".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
