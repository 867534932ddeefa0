//! 稳定的 DTO 与 API 响应契约。
//!
//! 渲染层消费的输出形状：GeoJSON 电缆要素集合、粒子帧、连接点电弧，
//! 以及统一的 `ApiResponse` 封装。

use domain::{CableType, DeviceStatus, Rating};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 快照查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotQuery {
    /// `(waterdepth_)?YYYYMMDD_HHMMSS`；缺省表示未选择时间步。
    pub time: Option<String>,
    /// 动画帧号（仅粒子接口使用）。
    pub frame: Option<u32>,
}

/// 三维点 `[经度, 纬度, 高度]`。
pub type Point3 = [f64; 3];

/// GeoJSON 线几何。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<Point3> },
}

impl Geometry {
    pub fn coordinates(&self) -> &[Point3] {
        match self {
            Geometry::LineString { coordinates } => coordinates,
        }
    }
}

/// 电缆要素属性（静态属性 + 派生状态）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableProperties {
    pub cable_id: String,
    pub from: String,
    pub to: String,
    pub from_level: Option<u8>,
    pub to_level: Option<u8>,
    pub voltage: Option<Rating>,
    pub cable_type: Option<CableType>,
    pub status: DeviceStatus,
    pub color: String,
    pub capacity: Option<Rating>,
}

/// GeoJSON 电缆要素。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct CableFeature {
    pub properties: CableProperties,
    pub geometry: Geometry,
}

/// GeoJSON 要素集合。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<CableFeature>,
}

/// 连接点电弧。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JunctionArcDto {
    pub position: Point3,
    pub intensity: f64,
    pub color: [u8; 3],
    pub connections: u32,
}

/// 某一动画帧上的粒子采样。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleFrameDto {
    pub id: String,
    pub line_index: usize,
    pub segment_index: usize,
    pub position: Point3,
    pub alpha: f64,
    pub radius: f64,
    pub color: [u8; 3],
    pub fill_color: [u8; 4],
}

/// 状态计数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummaryDto {
    pub time: Option<String>,
    pub operational: u64,
    pub warning: u64,
    pub down: u64,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub merges: u64,
    pub merges_skipped: u64,
    pub anomalies_active: u64,
    pub cables_dropped: u64,
    pub particles_generated: u64,
    pub particle_regenerations: u64,
    pub snapshot_requests: u64,
    pub snapshot_latency_us_avg: u64,
}

/// 电力图层显隐。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerLayerDto {
    pub visible: bool,
}
