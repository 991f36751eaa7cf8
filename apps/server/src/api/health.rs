use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::main_lib::AppState;

async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "stockfolio-server",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(healthz))
}
