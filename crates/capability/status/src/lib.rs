//! 风险分级与时间状态解析。
//!
//! - `classify_risk`：风险等级 -> 运行状态
//! - `resolve_status_at`：给定时间步与异常时间段集合，解析每个设备当前生效的异常
//! - `StatusSummary`：解析结果按状态计数
//!
//! 时间比较使用 `YYYYMMDD_HHMMSS` 的字典序，与真实时间单调一致。

use chrono::NaiveDateTime;
use domain::{AnomalyInterval, DeviceStatus, ResolvedStatus, StatusDocument, StatusMap, Timestep};
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, warn};

/// 时间步格式（去掉 `waterdepth_` 前缀后）。
pub const TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 风险等级 -> 状态。1 正常，2 告警，3–5 故障，其余（含缺失）按正常处理。
pub fn classify_risk(risk_level: Option<i64>) -> DeviceStatus {
    match risk_level {
        Some(1) => DeviceStatus::Operational,
        Some(2) => DeviceStatus::Warning,
        Some(3..=5) => DeviceStatus::Down,
        _ => DeviceStatus::Operational,
    }
}

/// 同一设备时间段重叠时的取舍策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// 按声明顺序取第一个命中的时间段。
    #[default]
    FirstMatch,
    /// 取命中时间段中最严重的一个；同级保持声明顺序。
    HighestSeverity,
}

impl OverlapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapPolicy::FirstMatch => "first_match",
            OverlapPolicy::HighestSeverity => "highest_severity",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first_match" | "first" => Ok(OverlapPolicy::FirstMatch),
            "highest_severity" | "severity" => Ok(OverlapPolicy::HighestSeverity),
            other => Err(format!("unknown overlap policy: {}", other)),
        }
    }
}

/// 判断时间字符串是否为合法的 `YYYYMMDD_HHMMSS`。
pub fn is_well_formed_time(time: &str) -> bool {
    NaiveDateTime::parse_from_str(time, TIME_FORMAT).is_ok()
}

/// 以默认策略（首个命中）解析时间步上的设备状态。
pub fn resolve_status_at(
    timestep: Option<&Timestep>,
    document: Option<&StatusDocument>,
) -> StatusMap {
    resolve_status_with_policy(timestep, document, OverlapPolicy::FirstMatch)
}

/// 解析时间步上的设备状态。
///
/// 任一输入缺失时返回空表（所有设备隐式正常）。状态文档中出现的设备都会有一条记录；
/// 未出现的设备不在结果中，由调用方按正常处理。
pub fn resolve_status_with_policy(
    timestep: Option<&Timestep>,
    document: Option<&StatusDocument>,
    policy: OverlapPolicy,
) -> StatusMap {
    let (timestep, document) = match (timestep, document) {
        (Some(timestep), Some(document)) => (timestep, document),
        _ => return StatusMap::new(),
    };

    let time = timestep.normalized_time();
    if !is_well_formed_time(time) {
        warn!(target: "grid.status", time = %timestep.time, "timestep_malformed");
    }

    let mut statuses = StatusMap::new();
    for (device_id, intervals) in &document.infra_status {
        let resolved = match active_interval(intervals, time, policy) {
            Some(interval) => {
                debug!(
                    target: "grid.status",
                    device_id = %device_id,
                    time_start = %interval.time_start,
                    time_end = %interval.time_end,
                    risk_level = ?interval.risk_level,
                    "anomaly_active"
                );
                ResolvedStatus {
                    status: classify_risk(interval.risk_level),
                    risk_level: interval.risk_level.unwrap_or(1),
                    info: interval.info.clone().unwrap_or_default(),
                }
            }
            None => ResolvedStatus::operational(),
        };
        statuses.insert(device_id.clone(), resolved);
    }
    statuses
}

fn active_interval<'a>(
    intervals: &'a [AnomalyInterval],
    time: &str,
    policy: OverlapPolicy,
) -> Option<&'a AnomalyInterval> {
    let mut matching = intervals.iter().filter(|interval| interval.contains(time));
    match policy {
        OverlapPolicy::FirstMatch => matching.next(),
        OverlapPolicy::HighestSeverity => {
            let mut best: Option<&AnomalyInterval> = None;
            for interval in matching {
                let replace = match best {
                    Some(current) => severity_key(interval) > severity_key(current),
                    None => true,
                };
                if replace {
                    best = Some(interval);
                }
            }
            best
        }
    }
}

fn severity_key(interval: &AnomalyInterval) -> (u8, i64) {
    (
        classify_risk(interval.risk_level).severity(),
        interval.risk_level.unwrap_or(0),
    )
}

/// 解析结果按状态计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub operational: u64,
    pub warning: u64,
    pub down: u64,
}

impl StatusSummary {
    pub fn from_map(statuses: &StatusMap) -> Self {
        let mut summary = Self::default();
        for resolved in statuses.values() {
            match resolved.status {
                DeviceStatus::Operational => summary.operational += 1,
                DeviceStatus::Warning => summary.warning += 1,
                DeviceStatus::Down => summary.down += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> u64 {
        self.operational + self.warning + self.down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn interval(start: &str, end: &str, risk: Option<i64>, info: Option<&str>) -> AnomalyInterval {
        AnomalyInterval {
            time_start: start.to_string(),
            time_end: end.to_string(),
            risk_level: risk,
            info: info.map(str::to_string),
        }
    }

    fn document(entries: Vec<(&str, Vec<AnomalyInterval>)>) -> StatusDocument {
        let mut infra_status = BTreeMap::new();
        for (id, intervals) in entries {
            infra_status.insert(id.to_string(), intervals);
        }
        StatusDocument { infra_status }
    }

    #[test]
    fn risk_mapping() {
        assert_eq!(classify_risk(Some(1)), DeviceStatus::Operational);
        assert_eq!(classify_risk(Some(2)), DeviceStatus::Warning);
        assert_eq!(classify_risk(Some(3)), DeviceStatus::Down);
        assert_eq!(classify_risk(Some(4)), DeviceStatus::Down);
        assert_eq!(classify_risk(Some(5)), DeviceStatus::Down);
        assert_eq!(classify_risk(None), DeviceStatus::Operational);
        assert_eq!(classify_risk(Some(0)), DeviceStatus::Operational);
        assert_eq!(classify_risk(Some(9)), DeviceStatus::Operational);
        assert_eq!(classify_risk(Some(-3)), DeviceStatus::Operational);
    }

    #[test]
    fn interval_matching_inside_and_outside() {
        let doc = document(vec![(
            "D1",
            vec![interval("20221024_000000", "20221024_060000", Some(3), Some("flooded"))],
        )]);
        let inside = Timestep::new("waterdepth_20221024_030000", "2022-10-24 03:00");
        let statuses = resolve_status_at(Some(&inside), Some(&doc));
        let resolved = statuses.get("D1").expect("resolved");
        assert_eq!(resolved.status, DeviceStatus::Down);
        assert_eq!(resolved.risk_level, 3);
        assert_eq!(resolved.info, "flooded");

        let outside = Timestep::new("20221024_070000", "07:00");
        let statuses = resolve_status_at(Some(&outside), Some(&doc));
        assert_eq!(statuses.get("D1"), Some(&ResolvedStatus::operational()));
    }

    #[test]
    fn missing_inputs_yield_empty_map() {
        let doc = document(vec![(
            "D1",
            vec![interval("20221024_000000", "20221024_060000", Some(3), None)],
        )]);
        let step = Timestep::new("20221024_030000", "03:00");
        assert!(resolve_status_at(None, Some(&doc)).is_empty());
        assert!(resolve_status_at(Some(&step), None).is_empty());
        assert!(resolve_status_at(None, None).is_empty());
    }

    #[test]
    fn overlapping_intervals_first_match_wins() {
        let doc = document(vec![(
            "D1",
            vec![
                interval("20221024_000000", "20221024_060000", Some(2), Some("first")),
                interval("20221024_020000", "20221024_040000", Some(5), Some("second")),
            ],
        )]);
        let step = Timestep::new("20221024_030000", "03:00");
        let statuses = resolve_status_at(Some(&step), Some(&doc));
        let resolved = statuses.get("D1").expect("resolved");
        assert_eq!(resolved.status, DeviceStatus::Warning);
        assert_eq!(resolved.info, "first");

        let statuses =
            resolve_status_with_policy(Some(&step), Some(&doc), OverlapPolicy::HighestSeverity);
        let resolved = statuses.get("D1").expect("resolved");
        assert_eq!(resolved.status, DeviceStatus::Down);
        assert_eq!(resolved.risk_level, 5);
        assert_eq!(resolved.info, "second");
    }

    #[test]
    fn missing_risk_level_defaults_to_operational() {
        let doc = document(vec![(
            "D1",
            vec![interval("20221024_000000", "20221024_060000", None, None)],
        )]);
        let step = Timestep::new("20221024_010000", "01:00");
        let statuses = resolve_status_at(Some(&step), Some(&doc));
        let resolved = statuses.get("D1").expect("resolved");
        assert_eq!(resolved.status, DeviceStatus::Operational);
        assert_eq!(resolved.info, "");
    }

    #[test]
    fn malformed_time_does_not_panic() {
        let doc = document(vec![(
            "D1",
            vec![interval("20221024_000000", "20221024_060000", Some(3), None)],
        )]);
        let step = Timestep::new("yesterday", "?");
        assert!(!is_well_formed_time(step.normalized_time()));
        let statuses = resolve_status_at(Some(&step), Some(&doc));
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn policy_parse_and_summary() {
        assert_eq!(
            "highest_severity".parse::<OverlapPolicy>(),
            Ok(OverlapPolicy::HighestSeverity)
        );
        assert_eq!("FIRST_MATCH".parse::<OverlapPolicy>(), Ok(OverlapPolicy::FirstMatch));
        assert!("worst".parse::<OverlapPolicy>().is_err());
        assert!(is_well_formed_time("20221024_030000"));

        let doc = document(vec![
            ("A", vec![interval("20221024_000000", "20221024_060000", Some(3), None)]),
            ("B", vec![interval("20221024_000000", "20221024_060000", Some(2), None)]),
            ("C", vec![interval("20221025_000000", "20221025_060000", Some(4), None)]),
        ]);
        let step = Timestep::new("20221024_030000", "03:00");
        let summary = StatusSummary::from_map(&resolve_status_at(Some(&step), Some(&doc)));
        assert_eq!(
            summary,
            StatusSummary {
                operational: 1,
                warning: 1,
                down: 1
            }
        );
        assert_eq!(summary.total(), 3);
    }
}
