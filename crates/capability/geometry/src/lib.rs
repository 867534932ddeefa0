//! 电缆几何：坐标解析、悬垂弧线、GeoJSON 要素与连接点电弧。

use api_contract::{
    CableFeature, CableProperties, FeatureCollection, Geometry, JunctionArcDto, Point3,
};
use domain::{Cable, Coordinates, DeviceStatus, InfrastructureHierarchy};
use std::collections::HashMap;
use tracing::warn;

/// 连接点电弧高度。
pub const JUNCTION_ALTITUDE: f64 = 500.0;

/// 在四级设备中按 L1 → L4 顺序查找设备坐标。
pub fn resolve_coordinates(
    device_id: &str,
    hierarchy: &InfrastructureHierarchy,
) -> Option<Coordinates> {
    hierarchy
        .devices()
        .find(|device| device.id() == device_id)
        .map(|device| device.coordinates())
}

/// 设备 ID -> 坐标索引，一次构建，多次查询。
///
/// 重复 ID 以层级顺序中的第一个为准，与 `resolve_coordinates` 一致。
#[derive(Debug, Clone, Default)]
pub struct DeviceIndex<'a> {
    coordinates: HashMap<&'a str, Coordinates>,
}

impl<'a> DeviceIndex<'a> {
    pub fn new(hierarchy: &'a InfrastructureHierarchy) -> Self {
        let mut coordinates = HashMap::with_capacity(hierarchy.device_count());
        for device in hierarchy.devices() {
            coordinates
                .entry(device.id())
                .or_insert_with(|| device.coordinates());
        }
        Self { coordinates }
    }

    pub fn coordinates(&self, device_id: &str) -> Option<Coordinates> {
        self.coordinates.get(device_id).copied()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// 悬垂弧线参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcConfig {
    /// 端点高度。
    pub base_altitude: f64,
    /// 下垂量 = 水平跨度（度）× 系数。
    pub sag_factor: f64,
    /// 下垂量上限。
    pub max_sag: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            base_altitude: 30.0,
            sag_factor: 0.05,
            max_sag: 10.0,
        }
    }
}

impl ArcConfig {
    pub fn sag(&self, from: Coordinates, to: Coordinates) -> f64 {
        let distance = ((to[0] - from[0]).powi(2) + (to[1] - from[1]).powi(2)).sqrt();
        (distance * self.sag_factor).min(self.max_sag)
    }
}

/// 沿折线生成悬垂弧：每段插入一个下垂的中点，首尾位于基准高度。
pub fn arc_path_through(points: &[Coordinates], config: &ArcConfig) -> Vec<Point3> {
    let base = config.base_altitude;
    if points.len() < 2 {
        return points.iter().map(|p| [p[0], p[1], base]).collect();
    }
    let mut path = Vec::with_capacity(points.len() * 2 - 1);
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        path.push([start[0], start[1], base]);
        path.push([
            (start[0] + end[0]) / 2.0,
            (start[1] + end[1]) / 2.0,
            base - config.sag(start, end),
        ]);
    }
    if let Some(last) = points.last() {
        path.push([last[0], last[1], base]);
    }
    path
}

/// 两端点之间的悬垂弧（起点、下垂中点、终点）。
pub fn arc_path(from: Coordinates, to: Coordinates, config: &ArcConfig) -> Vec<Point3> {
    arc_path_through(&[from, to], config)
}

/// 可渲染电缆：原始记录、在电缆集合中的下标、弧线路径。
#[derive(Debug, Clone)]
pub struct CableGeometry<'a> {
    pub index: usize,
    pub cable: &'a Cable,
    pub path: Vec<Point3>,
}

/// 电缆几何构建结果。端点无法解析的电缆记入 `dropped`。
#[derive(Debug, Clone, Default)]
pub struct CableLayout<'a> {
    pub geometries: Vec<CableGeometry<'a>>,
    pub dropped: Vec<String>,
}

/// 为每条电缆解析端点并生成弧线；缺端点的电缆被丢弃并告警，不中断其余电缆。
pub fn layout_cables<'a>(
    cables: &'a [Cable],
    index: &DeviceIndex<'_>,
    config: &ArcConfig,
) -> CableLayout<'a> {
    let mut layout = CableLayout::default();
    for (position, cable) in cables.iter().enumerate() {
        match (index.coordinates(&cable.from), index.coordinates(&cable.to)) {
            (Some(from), Some(to)) => layout.geometries.push(CableGeometry {
                index: position,
                cable,
                path: arc_path(from, to, config),
            }),
            _ => {
                warn!(
                    target: "grid.geometry",
                    cable_id = %cable.cable_id,
                    from = %cable.from,
                    to = %cable.to,
                    "cable_endpoint_unresolved"
                );
                layout.dropped.push(cable.cable_id.clone());
            }
        }
    }
    layout
}

/// 电缆记录 + 路径 -> GeoJSON 要素。
pub fn cable_feature(cable: &Cable, path: Vec<Point3>) -> CableFeature {
    CableFeature {
        properties: CableProperties {
            cable_id: cable.cable_id.clone(),
            from: cable.from.clone(),
            to: cable.to.clone(),
            from_level: cable.from_level.map(|level| level.number()),
            to_level: cable.to_level.map(|level| level.number()),
            voltage: cable.voltage.clone(),
            cable_type: cable.cable_type,
            status: cable.status,
            color: cable.status.color_string(),
            capacity: cable.capacity.clone(),
        },
        geometry: Geometry::LineString { coordinates: path },
    }
}

pub fn feature_collection(geometries: &[CableGeometry<'_>]) -> FeatureCollection {
    FeatureCollection {
        features: geometries
            .iter()
            .map(|geometry| cable_feature(geometry.cable, geometry.path.clone()))
            .collect(),
    }
}

struct Junction {
    position: Point3,
    count: u32,
    status: DeviceStatus,
}

/// 连接点电弧：同一坐标（6 位小数）上汇聚多条电缆且未故障时生成。
///
/// 连接点状态取所连电缆中最严重者；强度 `min(0.2 + 0.1 × 连接数, 0.8)`。
pub fn junction_arcs(geometries: &[CableGeometry<'_>]) -> Vec<JunctionArcDto> {
    let mut order: Vec<Junction> = Vec::new();
    let mut keys: HashMap<String, usize> = HashMap::new();
    for geometry in geometries {
        let status = geometry.cable.status;
        let endpoints = [geometry.path.first(), geometry.path.last()];
        for point in endpoints.into_iter().flatten() {
            let key = format!("{:.6},{:.6}", point[0], point[1]);
            let slot = *keys.entry(key).or_insert_with(|| {
                order.push(Junction {
                    position: [point[0], point[1], JUNCTION_ALTITUDE],
                    count: 0,
                    status,
                });
                order.len() - 1
            });
            let junction = &mut order[slot];
            if status.severity() > junction.status.severity() {
                junction.status = status;
            }
            junction.count += 1;
        }
    }
    order
        .into_iter()
        .filter(|junction| junction.count > 1 && junction.status != DeviceStatus::Down)
        .map(|junction| JunctionArcDto {
            position: junction.position,
            intensity: (0.2 + f64::from(junction.count) * 0.1).min(0.8),
            color: junction.status.color(),
            connections: junction.count,
        })
        .collect()
}
