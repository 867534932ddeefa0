//! 四级电力基础设施拓扑
//!
//! 层级：发电厂（L1）→ 变电站（L2）→ 变压器（L3）→ 通信塔（L4），
//! 以及连接它们的分层电缆。
//!
//! 未建模的 JSON 字段通过 `extra` 原样保留，合并前后文档形状一致。

use crate::status::{DeviceStatus, risk_from_value};
use serde::{Deserialize, Deserializer, Serialize};

/// `[经度, 纬度]`（度）。
pub type Coordinates = [f64; 2];

/// 未建模的附加属性。
pub type Attributes = serde_json::Map<String, serde_json::Value>;

fn default_risk() -> i64 {
    1
}

/// 静态风险字段：无法识别的取值按默认值 1 处理。
fn lenient_risk<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(risk_from_value)
        .unwrap_or_else(default_risk))
}

/// 额定值：数据中可能是数值，也可能是带单位的文本（如 "500MW"）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(f64),
    Text(String),
}

/// 层级（1–4）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HierarchyLevel {
    PowerPlant,
    Substation,
    Transformer,
    CommunicationTower,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 4] = [
        HierarchyLevel::PowerPlant,
        HierarchyLevel::Substation,
        HierarchyLevel::Transformer,
        HierarchyLevel::CommunicationTower,
    ];

    pub fn number(&self) -> u8 {
        match self {
            HierarchyLevel::PowerPlant => 1,
            HierarchyLevel::Substation => 2,
            HierarchyLevel::Transformer => 3,
            HierarchyLevel::CommunicationTower => 4,
        }
    }

    /// 拓扑文档中该层级集合的键名。
    pub fn collection_key(&self) -> &'static str {
        match self {
            HierarchyLevel::PowerPlant => "level_1_power_plants",
            HierarchyLevel::Substation => "level_2_substations",
            HierarchyLevel::Transformer => "level_3_transformers",
            HierarchyLevel::CommunicationTower => "level_4_communication_towers",
        }
    }

    /// 风险字段名。L4 沿用数据源中的 `risk`，其余层级为 `risk_level`。
    pub fn risk_field(&self) -> &'static str {
        match self {
            HierarchyLevel::CommunicationTower => "risk",
            _ => "risk_level",
        }
    }
}

impl TryFrom<u8> for HierarchyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HierarchyLevel::PowerPlant),
            2 => Ok(HierarchyLevel::Substation),
            3 => Ok(HierarchyLevel::Transformer),
            4 => Ok(HierarchyLevel::CommunicationTower),
            other => Err(format!("invalid hierarchy level: {}", other)),
        }
    }
}

impl From<HierarchyLevel> for u8 {
    fn from(level: HierarchyLevel) -> Self {
        level.number()
    }
}

/// L1 发电厂。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPlant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_output: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default = "default_risk", deserialize_with = "lenient_risk")]
    pub risk_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// L2 变电站。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub substation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_input: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_output: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Rating>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default = "default_risk", deserialize_with = "lenient_risk")]
    pub risk_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// L3 变压器。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transformer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_input: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_output: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Rating>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default = "default_risk", deserialize_with = "lenient_risk")]
    pub risk_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// L4 通信塔。风险字段名为 `risk`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationTower {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structures: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default = "default_risk", deserialize_with = "lenient_risk")]
    pub risk: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// 电缆类型。未知类型归入 `Other`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CableType {
    Transmission,
    Distribution,
    Service,
    #[serde(other)]
    Other,
}

/// 分层电缆：以两端设备 ID 描述。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    pub cable_id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_level: Option<HierarchyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_level: Option<HierarchyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_type: Option<CableType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Rating>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// 四级设备集合。四个集合均为必填，缺失即为结构错误。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureHierarchy {
    pub level_1_power_plants: Vec<PowerPlant>,
    pub level_2_substations: Vec<Substation>,
    pub level_3_transformers: Vec<Transformer>,
    pub level_4_communication_towers: Vec<CommunicationTower>,
}

impl InfrastructureHierarchy {
    /// 按层级顺序（L1 → L4）遍历所有设备。
    pub fn devices(&self) -> impl Iterator<Item = DeviceRef<'_>> {
        self.level_1_power_plants
            .iter()
            .map(DeviceRef::PowerPlant)
            .chain(self.level_2_substations.iter().map(DeviceRef::Substation))
            .chain(self.level_3_transformers.iter().map(DeviceRef::Transformer))
            .chain(
                self.level_4_communication_towers
                    .iter()
                    .map(DeviceRef::CommunicationTower),
            )
    }

    pub fn device_count(&self) -> usize {
        self.level_1_power_plants.len()
            + self.level_2_substations.len()
            + self.level_3_transformers.len()
            + self.level_4_communication_towers.len()
    }
}

/// 拓扑文档（静态元数据）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub infrastructure_hierarchy: InfrastructureHierarchy,
    pub hierarchical_power_cables: Vec<Cable>,
}

/// 按层级区分的设备只读视图。
#[derive(Debug, Clone, Copy)]
pub enum DeviceRef<'a> {
    PowerPlant(&'a PowerPlant),
    Substation(&'a Substation),
    Transformer(&'a Transformer),
    CommunicationTower(&'a CommunicationTower),
}

impl<'a> DeviceRef<'a> {
    pub fn level(&self) -> HierarchyLevel {
        match self {
            DeviceRef::PowerPlant(_) => HierarchyLevel::PowerPlant,
            DeviceRef::Substation(_) => HierarchyLevel::Substation,
            DeviceRef::Transformer(_) => HierarchyLevel::Transformer,
            DeviceRef::CommunicationTower(_) => HierarchyLevel::CommunicationTower,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            DeviceRef::PowerPlant(d) => &d.id,
            DeviceRef::Substation(d) => &d.id,
            DeviceRef::Transformer(d) => &d.id,
            DeviceRef::CommunicationTower(d) => &d.id,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        match self {
            DeviceRef::PowerPlant(d) => d.coordinates,
            DeviceRef::Substation(d) => d.coordinates,
            DeviceRef::Transformer(d) => d.coordinates,
            DeviceRef::CommunicationTower(d) => d.coordinates,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        match self {
            DeviceRef::PowerPlant(d) => d.status,
            DeviceRef::Substation(d) => d.status,
            DeviceRef::Transformer(d) => d.status,
            DeviceRef::CommunicationTower(d) => d.status,
        }
    }

    /// 风险等级（L4 读取 `risk` 字段）。
    pub fn risk(&self) -> i64 {
        match self {
            DeviceRef::PowerPlant(d) => d.risk_level,
            DeviceRef::Substation(d) => d.risk_level,
            DeviceRef::Transformer(d) => d.risk_level,
            DeviceRef::CommunicationTower(d) => d.risk,
        }
    }

    pub fn info(&self) -> Option<&'a str> {
        match self {
            DeviceRef::PowerPlant(d) => d.info.as_deref(),
            DeviceRef::Substation(d) => d.info.as_deref(),
            DeviceRef::Transformer(d) => d.info.as_deref(),
            DeviceRef::CommunicationTower(d) => d.info.as_deref(),
        }
    }
}
