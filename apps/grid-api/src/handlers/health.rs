//! 健康检查
//!
//! - GET /health

use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "topologyLoaded": state.dataset.topology.is_some(),
        "statusLoaded": state.dataset.status.is_some(),
    }))
}
