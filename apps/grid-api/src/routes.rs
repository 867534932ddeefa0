//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查与指标：/health, /metrics
//! - 时间轴：/api/list-flood-folders, /api/timesteps
//! - 快照：/api/infrastructure, /api/cables, /api/junctions, /api/particles,
//!   /api/status-summary（均接受 `time` 查询参数）
//! - 数据集：/api/precipitation
//! - 图层：/api/power-layer

use super::AppState;
use super::handlers::*;
use crate::middleware::request_context;
use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/api/list-flood-folders", get(list_flood_folders))
        .route("/api/timesteps", get(get_timesteps))
        .route("/api/infrastructure", get(get_infrastructure))
        .route("/api/cables", get(get_cables))
        .route("/api/junctions", get(get_junctions))
        .route("/api/particles", get(get_particles))
        .route("/api/status-summary", get(get_status_summary))
        .route("/api/precipitation", get(get_precipitation))
        .route(
            "/api/power-layer",
            get(get_power_layer).put(set_power_layer),
        )
}

/// 挂载状态与中间件（HTTP 追踪 + request_id/trace_id 注入）
pub fn create_app(state: AppState) -> Router {
    create_api_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(request_context)),
    )
}
