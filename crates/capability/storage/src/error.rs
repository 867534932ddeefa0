//! 数据集加载错误类型
//!
//! - 读取错误：文件不存在、权限不足等
//! - 结构错误：JSON 不合法或缺少必需的层级集合（致命，不做部分加载）

/// 数据集加载错误。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 读取失败
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 结构错误
    #[error("malformed {document}: {message}")]
    Structure {
        document: &'static str,
        message: String,
    },

    /// 数据集未提供
    #[error("{0} not available")]
    NotAvailable(&'static str),
}

impl StorageError {
    pub fn structure(document: &'static str, err: serde_json::Error) -> Self {
        Self::Structure {
            document,
            message: err.to_string(),
        }
    }
}
