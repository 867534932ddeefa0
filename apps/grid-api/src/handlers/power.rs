//! 电力图层显隐
//!
//! - GET /api/power-layer
//! - PUT /api/power-layer

use crate::AppState;
use api_contract::{ApiResponse, PowerLayerDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

pub async fn get_power_layer(State(state): State<AppState>) -> Response {
    let dto = PowerLayerDto {
        visible: state.engine.power_visible(),
    };
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}

/// 切换图层；隐藏后粒子接口返回空列表
pub async fn set_power_layer(
    State(state): State<AppState>,
    Json(req): Json<PowerLayerDto>,
) -> Response {
    state.engine.set_power_visible(req.visible);
    info!(target: "grid.api", visible = req.visible, "power_layer_toggled");
    (StatusCode::OK, Json(ApiResponse::success(req))).into_response()
}
