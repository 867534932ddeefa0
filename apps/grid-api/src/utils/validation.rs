//! 输入验证辅助函数
//!
//! - normalize_optional：验证可选参数，如果提供则去除空格并检查非空

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证可选参数，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(bad_request_error(format!("{field} required")));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}
