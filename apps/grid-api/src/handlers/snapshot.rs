//! 快照 handlers
//!
//! - GET /api/infrastructure：合并后的拓扑
//! - GET /api/cables：电缆 GeoJSON 要素集合
//! - GET /api/junctions：连接点电弧
//! - GET /api/particles：粒子帧（`frame` 参数驱动动画时钟）
//! - GET /api/status-summary：状态计数
//!
//! `time` 缺省表示未选择时间步，所有设备按正常处理。

use crate::AppState;
use crate::utils::normalize_optional;
use crate::utils::response::topology_missing_error;
use api_contract::{ApiResponse, SnapshotQuery, StatusSummaryDto};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::Timestep;
use grid_particles::AnimationClock;
use grid_pipeline::Snapshot;
use grid_status::StatusSummary;
use grid_telemetry::record_snapshot_request;
use grid_timeline::timestep_for_time;

fn requested_timestep(query: &SnapshotQuery) -> Result<Option<Timestep>, Response> {
    let time = normalize_optional(query.time.clone(), "time")?;
    Ok(time.map(|time| timestep_for_time(&time)))
}

fn build_snapshot(state: &AppState, query: &SnapshotQuery) -> Result<Snapshot, Response> {
    record_snapshot_request();
    let timestep = requested_timestep(query)?;
    state
        .engine
        .snapshot(
            state.dataset.topology.as_ref(),
            state.dataset.status.as_ref(),
            timestep.as_ref(),
        )
        .ok_or_else(topology_missing_error)
}

pub async fn get_infrastructure(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    match build_snapshot(&state, &query) {
        Ok(snapshot) => {
            (StatusCode::OK, Json(ApiResponse::success(snapshot.merged))).into_response()
        }
        Err(response) => response,
    }
}

pub async fn get_cables(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    match build_snapshot(&state, &query) {
        Ok(snapshot) => {
            (StatusCode::OK, Json(ApiResponse::success(snapshot.cables))).into_response()
        }
        Err(response) => response,
    }
}

pub async fn get_junctions(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    match build_snapshot(&state, &query) {
        Ok(snapshot) => {
            (StatusCode::OK, Json(ApiResponse::success(snapshot.junctions))).into_response()
        }
        Err(response) => response,
    }
}

pub async fn get_particles(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    let clock = AnimationClock::at(query.frame.unwrap_or(0));
    match build_snapshot(&state, &query) {
        Ok(snapshot) => {
            let frames = snapshot.particle_frames(clock);
            (StatusCode::OK, Json(ApiResponse::success(frames))).into_response()
        }
        Err(response) => response,
    }
}

/// 只解析状态，不要求拓扑已加载
pub async fn get_status_summary(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Response {
    let timestep = match requested_timestep(&query) {
        Ok(timestep) => timestep,
        Err(response) => return response,
    };
    let statuses = state
        .engine
        .statuses(state.dataset.status.as_ref(), timestep.as_ref());
    let summary = StatusSummary::from_map(&statuses);
    let dto = StatusSummaryDto {
        time: timestep.map(|step| step.time),
        operational: summary.operational,
        warning: summary.warning,
        down: summary.down,
    };
    (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
}
