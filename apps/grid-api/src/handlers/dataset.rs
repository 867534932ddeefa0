//! 静态数据集 handlers
//!
//! - GET /api/precipitation

use crate::AppState;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// 降水点（加载时已过滤掉降水量为 0 的点）
pub async fn get_precipitation(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(&state.dataset.precipitation)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, state};

    #[tokio::test]
    async fn precipitation_points_are_listed() {
        let body = body_json(get_precipitation(State(state())).await).await;
        assert_eq!(body["data"][0]["precipitation"], 4.2);
        assert_eq!(body["data"][0]["coordinates"][0], 147.0);
    }
}
