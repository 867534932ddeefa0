//! 数据集内存实现
//!
//! 仅用于本地测试和演示。

use crate::error::StorageError;
use crate::models::PrecipitationPoint;
use crate::traits::DatasetStore;
use async_trait::async_trait;
use domain::{StatusDocument, Topology};
use std::sync::RwLock;

/// 数据集内存存储
#[derive(Default)]
pub struct InMemoryDatasetStore {
    topology: RwLock<Option<Topology>>,
    status: RwLock<Option<StatusDocument>>,
    precipitation: RwLock<Vec<PrecipitationPoint>>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topology(self, topology: Topology) -> Self {
        self.set_topology(topology);
        self
    }

    pub fn with_status(self, status: StatusDocument) -> Self {
        self.set_status(status);
        self
    }

    /// 替换拓扑
    pub fn set_topology(&self, topology: Topology) {
        if let Ok(mut slot) = self.topology.write() {
            *slot = Some(topology);
        }
    }

    /// 替换状态文档
    pub fn set_status(&self, status: StatusDocument) {
        if let Ok(mut slot) = self.status.write() {
            *slot = Some(status);
        }
    }

    /// 替换降水点（写入时即过滤降水量为 0 的点）
    pub fn set_precipitation(&self, points: Vec<PrecipitationPoint>) {
        if let Ok(mut slot) = self.precipitation.write() {
            *slot = points
                .into_iter()
                .filter(|point| point.precipitation > 0.0)
                .collect();
        }
    }
}

#[async_trait]
impl DatasetStore for InMemoryDatasetStore {
    async fn load_topology(&self) -> Result<Topology, StorageError> {
        let slot = self
            .topology
            .read()
            .map_err(|_| StorageError::NotAvailable("topology"))?;
        slot.clone().ok_or(StorageError::NotAvailable("topology"))
    }

    async fn load_status(&self) -> Result<StatusDocument, StorageError> {
        let slot = self
            .status
            .read()
            .map_err(|_| StorageError::NotAvailable("status"))?;
        slot.clone().ok_or(StorageError::NotAvailable("status"))
    }

    async fn load_precipitation(&self) -> Result<Vec<PrecipitationPoint>, StorageError> {
        let slot = self
            .precipitation
            .read()
            .map_err(|_| StorageError::NotAvailable("precipitation"))?;
        Ok(slot.clone())
    }
}
