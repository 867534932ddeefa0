//! Telemetry 指标快照
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use grid_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    let snapshot_latency_us_avg = snapshot
        .snapshot_latency_us_total
        .checked_div(snapshot.snapshot_latency_us_count)
        .unwrap_or(0);
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            merges: snapshot.merges,
            merges_skipped: snapshot.merges_skipped,
            anomalies_active: snapshot.anomalies_active,
            cables_dropped: snapshot.cables_dropped,
            particles_generated: snapshot.particles_generated,
            particle_regenerations: snapshot.particle_regenerations,
            snapshot_requests: snapshot.snapshot_requests,
            snapshot_latency_us_avg,
        })),
    )
        .into_response()
}
