//! 时间轴 handlers
//!
//! - GET /api/list-flood-folders：洪水瓦片子目录名
//! - GET /api/timesteps：可选时间步（目录不可读时为单个回退时间步，无可用时间步时为默认时间轴）

use crate::AppState;
use crate::utils::response::timeline_error;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grid_timeline::{default_timeline, list_flood_folders as read_flood_folders, load_timeline};

pub async fn list_flood_folders(State(state): State<AppState>) -> Response {
    match read_flood_folders(&state.flood_tiles_dir).await {
        Ok(folders) => (StatusCode::OK, Json(ApiResponse::success(folders))).into_response(),
        Err(err) => timeline_error(err),
    }
}

pub async fn get_timesteps(State(state): State<AppState>) -> Response {
    let mut timesteps = load_timeline(&state.flood_tiles_dir).await;
    if timesteps.is_empty() {
        timesteps = default_timeline();
    }
    (StatusCode::OK, Json(ApiResponse::success(timesteps))).into_response()
}
