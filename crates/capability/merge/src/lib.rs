//! 拓扑与时间状态合并。
//!
//! 以静态拓扑为基准，逐字段重建每一条设备与电缆记录，覆盖其 status/risk 字段。
//! 输入拓扑只读，同一基准可针对不同时间步反复合并。

use domain::{
    Cable, CommunicationTower, DeviceStatus, InfrastructureHierarchy, PowerPlant, StatusMap,
    Substation, Topology, Transformer,
};
use tracing::debug;

/// 合并后写入设备的状态字段。
struct AppliedStatus {
    status: DeviceStatus,
    risk: i64,
    info: Option<String>,
}

/// 设备在状态表中则复制 status/risk（info 仅在非空时覆盖），否则强制为正常。
fn applied_status(device_id: &str, prior_info: Option<&String>, statuses: &StatusMap) -> AppliedStatus {
    match statuses.get(device_id) {
        Some(resolved) => AppliedStatus {
            status: resolved.status,
            risk: resolved.risk_level,
            info: if resolved.info.is_empty() {
                prior_info.cloned()
            } else {
                Some(resolved.info.clone())
            },
        },
        None => AppliedStatus {
            status: DeviceStatus::Operational,
            risk: 1,
            info: prior_info.cloned(),
        },
    }
}

fn merge_plant(plant: &PowerPlant, statuses: &StatusMap) -> PowerPlant {
    let applied = applied_status(&plant.id, plant.info.as_ref(), statuses);
    PowerPlant {
        status: applied.status,
        risk_level: applied.risk,
        info: applied.info,
        ..plant.clone()
    }
}

fn merge_substation(substation: &Substation, statuses: &StatusMap) -> Substation {
    let applied = applied_status(&substation.id, substation.info.as_ref(), statuses);
    Substation {
        status: applied.status,
        risk_level: applied.risk,
        info: applied.info,
        ..substation.clone()
    }
}

fn merge_transformer(transformer: &Transformer, statuses: &StatusMap) -> Transformer {
    let applied = applied_status(&transformer.id, transformer.info.as_ref(), statuses);
    Transformer {
        status: applied.status,
        risk_level: applied.risk,
        info: applied.info,
        ..transformer.clone()
    }
}

// L4 的风险字段为 `risk`
fn merge_tower(tower: &CommunicationTower, statuses: &StatusMap) -> CommunicationTower {
    let applied = applied_status(&tower.id, tower.info.as_ref(), statuses);
    CommunicationTower {
        status: applied.status,
        risk: applied.risk,
        info: applied.info,
        ..tower.clone()
    }
}

/// 单个端点在状态表中的状态，缺失视为正常。
fn endpoint_status(device_id: &str, statuses: &StatusMap) -> DeviceStatus {
    statuses
        .get(device_id)
        .map(|resolved| resolved.status)
        .unwrap_or(DeviceStatus::Operational)
}

/// 电缆状态：任一端故障则故障；否则任一端告警则告警；否则正常。
///
/// 只看两端设备，不做多跳传播。
pub fn cable_status(cable: &Cable, statuses: &StatusMap) -> DeviceStatus {
    let from = endpoint_status(&cable.from, statuses);
    let to = endpoint_status(&cable.to, statuses);
    if from == DeviceStatus::Down || to == DeviceStatus::Down {
        DeviceStatus::Down
    } else if from == DeviceStatus::Warning || to == DeviceStatus::Warning {
        DeviceStatus::Warning
    } else {
        DeviceStatus::Operational
    }
}

/// 重建电缆集合并写入派生状态。
pub fn propagate_cable_status(cables: &[Cable], statuses: &StatusMap) -> Vec<Cable> {
    cables
        .iter()
        .map(|cable| Cable {
            status: cable_status(cable, statuses),
            ..cable.clone()
        })
        .collect()
}

/// 合并拓扑与状态表，返回与输入互不共享的新拓扑。
pub fn merge_topology(topology: &Topology, statuses: &StatusMap) -> Topology {
    let hierarchy = &topology.infrastructure_hierarchy;
    let merged = Topology {
        infrastructure_hierarchy: InfrastructureHierarchy {
            level_1_power_plants: hierarchy
                .level_1_power_plants
                .iter()
                .map(|plant| merge_plant(plant, statuses))
                .collect(),
            level_2_substations: hierarchy
                .level_2_substations
                .iter()
                .map(|substation| merge_substation(substation, statuses))
                .collect(),
            level_3_transformers: hierarchy
                .level_3_transformers
                .iter()
                .map(|transformer| merge_transformer(transformer, statuses))
                .collect(),
            level_4_communication_towers: hierarchy
                .level_4_communication_towers
                .iter()
                .map(|tower| merge_tower(tower, statuses))
                .collect(),
        },
        hierarchical_power_cables: propagate_cable_status(
            &topology.hierarchical_power_cables,
            statuses,
        ),
    };
    debug!(
        target: "grid.merge",
        devices = merged.infrastructure_hierarchy.device_count(),
        cables = merged.hierarchical_power_cables.len(),
        anomalies = statuses.len(),
        "topology_merged"
    );
    merged
}
