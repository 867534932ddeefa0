//! # Grid Storage 模块
//!
//! 静态数据集（拓扑、异常状态、降水）的加载与结构校验。
//!
//! ## 模块说明
//!
//! - [`models`]：降水点与数据集模型
//! - [`traits`]：`DatasetStore` 加载接口
//! - [`error`]：加载错误类型
//! - [`validation`]：拓扑一致性诊断（重复 ID、层级不一致）
//! - [`file`]：本地 JSON 文件实现
//! - [`in_memory`]：内存实现（测试与演示）
//!
//! 拓扑缺少任一层级集合属于结构错误，直接返回 `StorageError::Structure`，
//! 不做部分加载；[`load_dataset`] 将其作为致命错误上抛。

pub mod error;
pub mod file;
pub mod in_memory;
pub mod models;
pub mod traits;
pub mod validation;

pub use error::StorageError;
pub use file::FileDatasetStore;
pub use in_memory::InMemoryDatasetStore;
pub use models::{Dataset, PrecipitationPoint};
pub use traits::DatasetStore;
pub use validation::{TopologyIssue, validate_topology};

use domain::{StatusDocument, Topology};
use tracing::{error, info, warn};

/// 解析拓扑文档。
pub fn parse_topology(payload: &str) -> Result<Topology, StorageError> {
    serde_json::from_str(payload).map_err(|err| StorageError::structure("topology", err))
}

/// 解析异常状态文档。
pub fn parse_status(payload: &str) -> Result<StatusDocument, StorageError> {
    serde_json::from_str(payload).map_err(|err| StorageError::structure("status", err))
}

/// 解析降水点并过滤掉降水量不大于 0 的点。
pub fn parse_precipitation(payload: &str) -> Result<Vec<PrecipitationPoint>, StorageError> {
    let points: Vec<PrecipitationPoint> = serde_json::from_str(payload)
        .map_err(|err| StorageError::structure("precipitation", err))?;
    Ok(points
        .into_iter()
        .filter(|point| point.precipitation > 0.0)
        .collect())
}

/// 加载全部数据集。
///
/// 各文档独立加载，读取失败或未提供时记录告警并置空；
/// 拓扑结构错误直接返回，不以空拓扑继续运行。
pub async fn load_dataset(store: &dyn DatasetStore) -> Result<Dataset, StorageError> {
    let topology = match store.load_topology().await {
        Ok(topology) => {
            for issue in validate_topology(&topology) {
                warn!(target: "grid.storage", issue = %issue, "topology_issue");
            }
            info!(
                target: "grid.storage",
                devices = topology.infrastructure_hierarchy.device_count(),
                cables = topology.hierarchical_power_cables.len(),
                "topology_loaded"
            );
            Some(topology)
        }
        Err(err @ StorageError::Structure { .. }) => {
            error!(target: "grid.storage", error = %err, "topology_malformed");
            return Err(err);
        }
        Err(err) => {
            warn!(target: "grid.storage", error = %err, "topology_load_failed");
            None
        }
    };
    let status = match store.load_status().await {
        Ok(status) => {
            info!(
                target: "grid.storage",
                devices = status.infra_status.len(),
                "status_loaded"
            );
            Some(status)
        }
        Err(err) => {
            warn!(target: "grid.storage", error = %err, "status_load_failed");
            None
        }
    };
    let precipitation = match store.load_precipitation().await {
        Ok(points) => points,
        Err(err) => {
            warn!(target: "grid.storage", error = %err, "precipitation_load_failed");
            Vec::new()
        }
    };
    Ok(Dataset {
        topology,
        status,
        precipitation,
    })
}
