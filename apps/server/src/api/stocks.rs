use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockfolio_core::stocks::Stock;

/// Look up a stock: cached market data when fresh, otherwise a live fan-out
/// to the market data sources merged with the stored holding.
async fn get_stock(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Stock>> {
    let stock = state.stock_service.get_stock(&symbol).await?;
    Ok(Json(stock))
}

#[derive(Debug, Deserialize)]
struct DepositPayload {
    amount: i64,
}

/// Add purchased units to a symbol's holding, creating the record when none
/// exists yet.
async fn update_stock_amount(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DepositPayload>,
) -> ApiResult<(StatusCode, Json<Stock>)> {
    if payload.amount < 0 {
        return Err(ApiError::BadRequest(
            "Amount must be non-negative".to_string(),
        ));
    }
    let stock = state
        .stock_service
        .update_stock_amount(&symbol, payload.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock/{symbol}", get(get_stock).post(update_stock_amount))
}
