//! 数据集存储接口
//!
//! 拓扑、状态与降水文档的只读加载。实现：
//! - FileDatasetStore：从本地 JSON 文件读取
//! - InMemoryDatasetStore：内存（测试与演示）

use crate::error::StorageError;
use crate::models::PrecipitationPoint;
use async_trait::async_trait;
use domain::{StatusDocument, Topology};

/// 数据集存储接口
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// 加载静态拓扑（四级设备 + 电缆）
    async fn load_topology(&self) -> Result<Topology, StorageError>;

    /// 加载异常状态文档
    async fn load_status(&self) -> Result<StatusDocument, StorageError>;

    /// 加载降水点（已过滤掉降水量为 0 的点）
    async fn load_precipitation(&self) -> Result<Vec<PrecipitationPoint>, StorageError>;
}
