//! HTTP 响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码对应：
//! - bad_request_error：400 INVALID.REQUEST
//! - topology_missing_error：503 DATASET.TOPOLOGY_MISSING
//! - timeline_error：500 TIMELINE.UNAVAILABLE

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grid_timeline::TimelineError;

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 拓扑未加载
pub fn topology_missing_error() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiResponse::<()>::error(
            "DATASET.TOPOLOGY_MISSING",
            "topology not loaded",
        )),
    )
        .into_response()
}

/// 洪水瓦片目录不可读
pub fn timeline_error(err: TimelineError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("TIMELINE.UNAVAILABLE", message)),
    )
        .into_response()
}
