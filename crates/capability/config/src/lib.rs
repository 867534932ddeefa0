//! 应用运行配置加载。

use grid_status::OverlapPolicy;
use std::env;
use std::path::PathBuf;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http_addr: String,
    pub infra_meta_path: PathBuf,
    pub infra_status_path: PathBuf,
    pub precipitation_path: PathBuf,
    pub flood_tiles_dir: PathBuf,
    pub overlap_policy: OverlapPolicy,
    pub particles_per_segment: usize,
    pub cable_base_altitude: f64,
    pub cable_sag_factor: f64,
    pub cable_max_sag: f64,
    pub power_layer_visible: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置；缺省项取默认值。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source(lookup);
        let http_addr = source.string_with_default("GRID_HTTP_ADDR", "127.0.0.1:8080");
        let infra_meta_path =
            PathBuf::from(source.string_with_default("GRID_INFRA_META", "data/infra_meta.json"));
        let infra_status_path = PathBuf::from(
            source.string_with_default("GRID_INFRA_STATUS", "data/infra_status.json"),
        );
        let precipitation_path = PathBuf::from(
            source.string_with_default("GRID_PRECIPITATION", "data/precipitation.json"),
        );
        let flood_tiles_dir =
            PathBuf::from(source.string_with_default("GRID_FLOOD_TILES_DIR", "data/flood_tiles"));
        let overlap_policy = match source.optional("GRID_OVERLAP_POLICY") {
            Some(value) => value
                .parse::<OverlapPolicy>()
                .map_err(|_| ConfigError::Invalid("GRID_OVERLAP_POLICY".to_string(), value))?,
            None => OverlapPolicy::default(),
        };
        let particles_per_segment = source.usize_with_default("GRID_PARTICLES_PER_SEGMENT", 2)?;
        if particles_per_segment == 0 {
            return Err(ConfigError::Invalid(
                "GRID_PARTICLES_PER_SEGMENT".to_string(),
                "0".to_string(),
            ));
        }
        let cable_base_altitude = source.f64_with_default("GRID_CABLE_BASE_ALTITUDE", 30.0)?;
        let cable_sag_factor = source.f64_with_default("GRID_CABLE_SAG_FACTOR", 0.05)?;
        let cable_max_sag = source.f64_with_default("GRID_CABLE_MAX_SAG", 10.0)?;
        let power_layer_visible = source.bool_with_default("GRID_POWER_LAYER_VISIBLE", true);

        Ok(Self {
            http_addr,
            infra_meta_path,
            infra_status_path,
            precipitation_path,
            flood_tiles_dir,
            overlap_policy,
            particles_per_segment,
            cable_base_altitude,
            cable_sag_factor,
            cable_max_sag,
            power_layer_visible,
        })
    }
}

struct Source<F>(F);

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        match (self.0)(key) {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }

    fn string_with_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn usize_with_default(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        let value = match self.optional(key) {
            Some(value) => value,
            None => return Ok(default),
        };
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn f64_with_default(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        let value = match self.optional(key) {
            Some(value) => value,
            None => return Ok(default),
        };
        match value.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(parsed),
            _ => Err(ConfigError::Invalid(key.to_string(), value)),
        }
    }

    fn bool_with_default(&self, key: &str, default: bool) -> bool {
        match self.optional(key) {
            Some(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on"
            ),
            None => default,
        }
    }
}
