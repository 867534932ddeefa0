use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 设备/电缆运行状态。
///
/// 输入数据中的 `normal` 与 `high_load` 作为别名分别映射到
/// `Operational` 与 `Warning`；无法识别的取值一律视为 `Operational`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    Operational,
    Warning,
    Down,
}

impl DeviceStatus {
    /// 宽松解析：只识别 warning/high_load 与 down。
    pub fn parse(value: &str) -> Self {
        match value {
            "warning" | "high_load" => DeviceStatus::Warning,
            "down" => DeviceStatus::Down,
            _ => DeviceStatus::Operational,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Operational => "operational",
            DeviceStatus::Warning => "warning",
            DeviceStatus::Down => "down",
        }
    }

    /// 严重程度：operational < warning < down。
    pub fn severity(&self) -> u8 {
        match self {
            DeviceStatus::Operational => 0,
            DeviceStatus::Warning => 1,
            DeviceStatus::Down => 2,
        }
    }

    /// 渲染层使用的 RGB 颜色。
    pub fn color(&self) -> [u8; 3] {
        match self {
            DeviceStatus::Down => [255, 0, 0],
            DeviceStatus::Warning => [255, 255, 0],
            DeviceStatus::Operational => [0, 255, 0],
        }
    }

    /// `rgb(r, g, b)` 形式的颜色字符串。
    pub fn color_string(&self) -> String {
        let [r, g, b] = self.color();
        format!("rgb({}, {}, {})", r, g, b)
    }
}

impl<'de> Deserialize<'de> for DeviceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(DeviceStatus::parse).unwrap_or_default())
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 风险值：整数、整数值浮点数（`3.0`）或整数字符串（`"3"`），其余返回 `None`。
pub fn risk_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_optional_risk<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(risk_from_value))
}

/// 单个设备的异常时间段。
///
/// 时间格式为 `YYYYMMDD_HHMMSS`，定宽字符串可直接按字典序比较。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyInterval {
    pub time_start: String,
    pub time_end: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_risk",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl AnomalyInterval {
    /// 闭区间包含判断（字典序）。
    pub fn contains(&self, time: &str) -> bool {
        self.time_start.as_str() <= time && time <= self.time_end.as_str()
    }
}

/// 状态文档：设备 ID -> 异常时间段列表。
///
/// 每个设备的时间段保持声明顺序；设备之间按 ID 排序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub infra_status: BTreeMap<String, Vec<AnomalyInterval>>,
}

/// 某一时刻解析出的设备状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStatus {
    pub status: DeviceStatus,
    pub risk_level: i64,
    pub info: String,
}

impl ResolvedStatus {
    /// 无异常时的默认状态。
    pub fn operational() -> Self {
        Self {
            status: DeviceStatus::Operational,
            risk_level: 1,
            info: String::new(),
        }
    }
}

/// 设备 ID -> 解析状态。未出现的设备一律视为 operational。
pub type StatusMap = BTreeMap<String, ResolvedStatus>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_aliases_are_accepted() {
        let parsed: Vec<DeviceStatus> =
            serde_json::from_str(r#"["normal","high_load","down","warning","operational"]"#)
                .expect("parse");
        assert_eq!(
            parsed,
            vec![
                DeviceStatus::Operational,
                DeviceStatus::Warning,
                DeviceStatus::Down,
                DeviceStatus::Warning,
                DeviceStatus::Operational,
            ]
        );
    }

    #[test]
    fn unknown_status_falls_back_to_operational() {
        let parsed: Vec<DeviceStatus> =
            serde_json::from_str(r#"["maintenance","DOWN",3,null]"#).expect("parse");
        assert_eq!(parsed, vec![DeviceStatus::Operational; 4]);
        assert_eq!(
            serde_json::to_string(&DeviceStatus::Warning).expect("serialize"),
            r#""warning""#
        );
    }

    #[test]
    fn interval_risk_accepts_integral_values_only() {
        let doc: StatusDocument = serde_json::from_str(
            r#"{"infra_status": {"S1": [
                {"time_start": "20221024_000000", "time_end": "20221024_010000", "risk_level": 3.0},
                {"time_start": "20221024_000000", "time_end": "20221024_010000", "risk_level": "4"},
                {"time_start": "20221024_000000", "time_end": "20221024_010000", "risk_level": 2.5},
                {"time_start": "20221024_000000", "time_end": "20221024_010000", "risk_level": "high"},
                {"time_start": "20221024_000000", "time_end": "20221024_010000", "risk_level": null}
            ]}}"#,
        )
        .expect("parse");
        let risks: Vec<Option<i64>> = doc.infra_status["S1"]
            .iter()
            .map(|interval| interval.risk_level)
            .collect();
        assert_eq!(risks, vec![Some(3), Some(4), None, None, None]);
    }

    #[test]
    fn status_colors() {
        assert_eq!(DeviceStatus::Down.color(), [255, 0, 0]);
        assert_eq!(DeviceStatus::Warning.color_string(), "rgb(255, 255, 0)");
        assert_eq!(DeviceStatus::Operational.color(), [0, 255, 0]);
    }

    #[test]
    fn interval_bounds_are_inclusive() {
        let interval = AnomalyInterval {
            time_start: "20221024_000000".to_string(),
            time_end: "20221024_060000".to_string(),
            risk_level: Some(3),
            info: None,
        };
        assert!(interval.contains("20221024_000000"));
        assert!(interval.contains("20221024_060000"));
        assert!(!interval.contains("20221024_060001"));
    }

    #[test]
    fn missing_infra_status_is_empty() {
        let doc: StatusDocument = serde_json::from_str("{}").expect("parse");
        assert!(doc.infra_status.is_empty());
    }
}
