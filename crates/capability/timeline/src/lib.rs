//! 洪水时间轴：由洪水瓦片目录名生成可选时间步。
//!
//! 目录名格式 `waterdepth_YYYYMMDD_HHMMSS`，显示为 `YYYY-MM-DD HH:MM`。

use chrono::NaiveDateTime;
use domain::{Timestep, WATERDEPTH_PREFIX};
use grid_status::TIME_FORMAT;
use std::path::Path;
use tracing::{info, warn};

/// 目录不可读时使用的单个时间步。
pub const FALLBACK_TIME: &str = "waterdepth_20221024_000000";
const FALLBACK_DISPLAY: &str = "2022-10-24 00:00";

/// 没有任何可用时间步时默认时间轴所在日期。
pub const DEFAULT_TIMELINE_DATE: &str = "20221008";

/// 时间轴加载错误。
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// 解析目录名；不含 `waterdepth_YYYYMMDD_HHMMSS` 的名称返回 `None`。
pub fn parse_folder_name(name: &str) -> Option<Timestep> {
    let start = name.find(WATERDEPTH_PREFIX)? + WATERDEPTH_PREFIX.len();
    let stamp = name.get(start..start + 15)?;
    if !stamp.is_ascii() {
        return None;
    }
    let (date, rest) = stamp.split_at(8);
    let clock = rest.strip_prefix('_')?;
    if !all_digits(date) || !all_digits(clock) {
        return None;
    }
    let display = format!(
        "{}-{}-{} {}:{}",
        &date[0..4],
        &date[4..6],
        &date[6..8],
        &clock[0..2],
        &clock[2..4]
    );
    Some(Timestep::new(name, display))
}

/// 目录名集合 -> 按时间排序的时间步，忽略不匹配的名称。
pub fn timesteps_from_folders<I, S>(names: I) -> Vec<Timestep>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut timesteps: Vec<Timestep> = names
        .into_iter()
        .filter_map(|name| parse_folder_name(name.as_ref()))
        .collect();
    timesteps.sort_by(|a, b| a.time.cmp(&b.time));
    timesteps
}

pub fn fallback_timeline() -> Vec<Timestep> {
    vec![Timestep::new(FALLBACK_TIME, FALLBACK_DISPLAY)]
}

/// 默认时间轴：`DEFAULT_TIMELINE_DATE` 当天每 30 分钟一个时间步，显示 `HH:MM`。
pub fn default_timeline() -> Vec<Timestep> {
    let mut timesteps = Vec::with_capacity(48);
    for hour in 0..24 {
        for minute in [0, 30] {
            timesteps.push(Timestep::new(
                format!("{}_{:02}{:02}00", DEFAULT_TIMELINE_DATE, hour, minute),
                format!("{:02}:{:02}", hour, minute),
            ));
        }
    }
    timesteps
}

/// 由查询参数中的时间构造时间步；可解析时生成标准显示文本，否则原样显示。
pub fn timestep_for_time(time: &str) -> Timestep {
    if let Some(step) = parse_folder_name(time) {
        return step;
    }
    let normalized = time.strip_prefix(WATERDEPTH_PREFIX).unwrap_or(time);
    let display = NaiveDateTime::parse_from_str(normalized, TIME_FORMAT)
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| time.to_string());
    Timestep::new(time, display)
}

/// 列出洪水瓦片目录下的子目录名（跳过隐藏目录），按名称排序。
pub async fn list_flood_folders(dir: &Path) -> Result<Vec<String>, TimelineError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut folders = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        folders.push(name);
    }
    folders.sort();
    Ok(folders)
}

/// 加载时间轴；目录不可读时退回 `fallback_timeline`。
pub async fn load_timeline(dir: &Path) -> Vec<Timestep> {
    match list_flood_folders(dir).await {
        Ok(folders) => {
            let timesteps = timesteps_from_folders(&folders);
            info!(
                target: "grid.timeline",
                dir = %dir.display(),
                folders = folders.len(),
                timesteps = timesteps.len(),
                "timeline_loaded"
            );
            timesteps
        }
        Err(err) => {
            warn!(
                target: "grid.timeline",
                dir = %dir.display(),
                error = %err,
                "timeline_fallback"
            );
            fallback_timeline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("grid-timeline-{}-{}-{}", name, std::process::id(), nanos))
    }

    #[test]
    fn folder_names_parse_and_sort() {
        let timesteps = timesteps_from_folders([
            "waterdepth_20221024_060000",
            "notes",
            "waterdepth_20221024_000000",
            "waterdepth_2022102_000000",
            "waterdepth_20221024_0300ab",
        ]);
        assert_eq!(
            timesteps,
            vec![
                Timestep::new("waterdepth_20221024_000000", "2022-10-24 00:00"),
                Timestep::new("waterdepth_20221024_060000", "2022-10-24 06:00"),
            ]
        );
    }

    #[test]
    fn default_timeline_is_half_hourly() {
        let timeline = default_timeline();
        assert_eq!(timeline.len(), 48);
        assert_eq!(timeline[0], Timestep::new("20221008_000000", "00:00"));
        assert_eq!(timeline[47], Timestep::new("20221008_233000", "23:30"));
        assert_eq!(fallback_timeline()[0].time, FALLBACK_TIME);
    }

    #[test]
    fn query_time_builds_display() {
        assert_eq!(
            timestep_for_time("20221024_031500").display,
            "2022-10-24 03:15"
        );
        assert_eq!(
            timestep_for_time("waterdepth_20221024_031500").display,
            "2022-10-24 03:15"
        );
        assert_eq!(timestep_for_time("garbage").display, "garbage");
    }

    #[tokio::test]
    async fn folders_are_listed_without_hidden_entries() {
        let dir = scratch_dir("list");
        std::fs::create_dir_all(dir.join("waterdepth_20221024_030000")).expect("mkdir");
        std::fs::create_dir_all(dir.join("waterdepth_20221024_000000")).expect("mkdir");
        std::fs::create_dir_all(dir.join(".cache")).expect("mkdir");
        std::fs::write(dir.join("readme.txt"), "x").expect("write");

        let folders = list_flood_folders(&dir).await.expect("list");
        assert_eq!(
            folders,
            vec![
                "waterdepth_20221024_000000".to_string(),
                "waterdepth_20221024_030000".to_string()
            ]
        );
        let timeline = load_timeline(&dir).await;
        assert_eq!(timeline.len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_dir_falls_back() {
        let dir = scratch_dir("missing");
        assert!(list_flood_folders(&dir).await.is_err());
        assert_eq!(load_timeline(&dir).await, fallback_timeline());
    }
}
