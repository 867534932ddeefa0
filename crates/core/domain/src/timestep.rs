use serde::{Deserialize, Serialize};

/// 洪水瓦片目录名前缀。
pub const WATERDEPTH_PREFIX: &str = "waterdepth_";

/// 时间轴上可选的时间点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestep {
    pub time: String,
    pub display: String,
}

impl Timestep {
    pub fn new(time: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            display: display.into(),
        }
    }

    /// 去掉 `waterdepth_` 前缀后的 `YYYYMMDD_HHMMSS`。
    pub fn normalized_time(&self) -> &str {
        self.time
            .strip_prefix(WATERDEPTH_PREFIX)
            .unwrap_or(&self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_stripped_once() {
        let step = Timestep::new("waterdepth_20221024_030000", "2022-10-24 03:00");
        assert_eq!(step.normalized_time(), "20221024_030000");
        let bare = Timestep::new("20221024_030000", "03:00");
        assert_eq!(bare.normalized_time(), "20221024_030000");
    }
}
