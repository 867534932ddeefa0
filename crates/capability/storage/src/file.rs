//! 本地 JSON 文件实现

use crate::error::StorageError;
use crate::models::PrecipitationPoint;
use crate::traits::DatasetStore;
use crate::{parse_precipitation, parse_status, parse_topology};
use async_trait::async_trait;
use domain::{StatusDocument, Topology};
use std::path::{Path, PathBuf};

/// 从本地文件读取的数据集存储。
#[derive(Debug, Clone)]
pub struct FileDatasetStore {
    topology_path: PathBuf,
    status_path: PathBuf,
    precipitation_path: PathBuf,
}

impl FileDatasetStore {
    pub fn new(
        topology_path: impl Into<PathBuf>,
        status_path: impl Into<PathBuf>,
        precipitation_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            topology_path: topology_path.into(),
            status_path: status_path.into(),
            precipitation_path: precipitation_path.into(),
        }
    }
}

async fn read_to_string(path: &Path) -> Result<String, StorageError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[async_trait]
impl DatasetStore for FileDatasetStore {
    async fn load_topology(&self) -> Result<Topology, StorageError> {
        let payload = read_to_string(&self.topology_path).await?;
        parse_topology(&payload)
    }

    async fn load_status(&self) -> Result<StatusDocument, StorageError> {
        let payload = read_to_string(&self.status_path).await?;
        parse_status(&payload)
    }

    async fn load_precipitation(&self) -> Result<Vec<PrecipitationPoint>, StorageError> {
        let payload = read_to_string(&self.precipitation_path).await?;
        parse_precipitation(&payload)
    }
}
