//! 数据集模型
//!
//! - PrecipitationPoint：降水点（坐标 + 降水量）
//! - Dataset：一次会话加载的全部静态输入

use domain::{Attributes, Coordinates, StatusDocument, Topology};
use serde::{Deserialize, Serialize};

/// 降水点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationPoint {
    pub coordinates: Coordinates,
    pub precipitation: f64,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// 静态输入集合。
///
/// 各文档独立加载，任一缺失不影响其它文档；拓扑缺失时快照合并为空操作。
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub topology: Option<Topology>,
    pub status: Option<StatusDocument>,
    pub precipitation: Vec<PrecipitationPoint>,
}
