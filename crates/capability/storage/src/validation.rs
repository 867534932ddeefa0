//! 拓扑一致性诊断
//!
//! 加载后对拓扑做只读检查，结果仅用于诊断日志，不阻断加载：
//! - 设备 ID 重复（坐标解析以层级顺序中的第一个为准）
//! - 电缆端点不存在
//! - 电缆声明的端点层级与设备实际层级不一致

use domain::{HierarchyLevel, Topology};
use std::collections::HashMap;
use std::fmt;

/// 拓扑诊断项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyIssue {
    DuplicateId {
        device_id: String,
        first: HierarchyLevel,
        second: HierarchyLevel,
    },
    UnknownEndpoint {
        cable_id: String,
        device_id: String,
    },
    LevelMismatch {
        cable_id: String,
        device_id: String,
        declared: HierarchyLevel,
        actual: HierarchyLevel,
    },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyIssue::DuplicateId {
                device_id,
                first,
                second,
            } => write!(
                f,
                "duplicate device id {} (level {} and level {})",
                device_id,
                first.number(),
                second.number()
            ),
            TopologyIssue::UnknownEndpoint {
                cable_id,
                device_id,
            } => write!(f, "cable {} references unknown device {}", cable_id, device_id),
            TopologyIssue::LevelMismatch {
                cable_id,
                device_id,
                declared,
                actual,
            } => write!(
                f,
                "cable {} declares {} at level {} but it is level {}",
                cable_id,
                device_id,
                declared.number(),
                actual.number()
            ),
        }
    }
}

/// 校验拓扑，返回全部诊断项（按发现顺序）。
pub fn validate_topology(topology: &Topology) -> Vec<TopologyIssue> {
    let mut issues = Vec::new();
    let mut levels: HashMap<&str, HierarchyLevel> = HashMap::new();
    for device in topology.infrastructure_hierarchy.devices() {
        if let Some(first) = levels.get(device.id()) {
            issues.push(TopologyIssue::DuplicateId {
                device_id: device.id().to_string(),
                first: *first,
                second: device.level(),
            });
            continue;
        }
        levels.insert(device.id(), device.level());
    }

    for cable in &topology.hierarchical_power_cables {
        let endpoints = [(&cable.from, cable.from_level), (&cable.to, cable.to_level)];
        for (device_id, declared) in endpoints {
            match (levels.get(device_id.as_str()), declared) {
                (None, _) => issues.push(TopologyIssue::UnknownEndpoint {
                    cable_id: cable.cable_id.clone(),
                    device_id: device_id.clone(),
                }),
                (Some(actual), Some(declared)) if *actual != declared => {
                    issues.push(TopologyIssue::LevelMismatch {
                        cable_id: cable.cable_id.clone(),
                        device_id: device_id.clone(),
                        declared,
                        actual: *actual,
                    })
                }
                _ => {}
            }
        }
    }
    issues
}
