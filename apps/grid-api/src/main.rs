//! 电网洪水韧性状态引擎 HTTP API。
//!
//! 启动时一次性加载数据集（拓扑、异常状态、降水），之后每个请求按 `time`
//! 参数整体重算快照。

mod handlers;
mod middleware;
mod routes;
mod utils;

use grid_config::AppConfig;
use grid_geometry::ArcConfig;
use grid_pipeline::{EngineConfig, SnapshotEngine};
use grid_storage::{Dataset, FileDatasetStore, load_dataset};
use grid_telemetry::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub engine: Arc<SnapshotEngine>,
    pub flood_tiles_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(dataset: Dataset, engine: SnapshotEngine, flood_tiles_dir: PathBuf) -> Self {
        Self {
            dataset: Arc::new(dataset),
            engine: Arc::new(engine),
            flood_tiles_dir: Arc::new(flood_tiles_dir),
        }
    }
}

/// 运行配置 -> 快照引擎参数。
fn engine_config(config: &AppConfig) -> EngineConfig {
    EngineConfig {
        overlap_policy: config.overlap_policy,
        arc: ArcConfig {
            base_altitude: config.cable_base_altitude,
            sag_factor: config.cable_sag_factor,
            max_sag: config.cable_max_sag,
        },
        particles_per_segment: config.particles_per_segment,
        power_visible: config.power_layer_visible,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 数据集各文档独立加载，缺失时降级为空；拓扑结构错误终止启动
    let store = FileDatasetStore::new(
        config.infra_meta_path.clone(),
        config.infra_status_path.clone(),
        config.precipitation_path.clone(),
    );
    let dataset = load_dataset(&store).await?;
    let engine = SnapshotEngine::new(engine_config(&config));
    info!(
        target: "grid.api",
        overlap_policy = config.overlap_policy.as_str(),
        particles_per_segment = config.particles_per_segment,
        power_visible = config.power_layer_visible,
        "engine_configured"
    );
    let state = AppState::new(dataset, engine, config.flood_tiles_dir.clone());
    let app = routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "grid.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AppState;
    use axum::response::Response;
    use domain::{StatusDocument, Topology};
    use grid_pipeline::SnapshotEngine;
    use grid_storage::{Dataset, PrecipitationPoint};
    use serde_json::Value;
    use std::path::PathBuf;

    pub fn topology() -> Topology {
        serde_json::from_value(serde_json::json!({
            "infrastructure_hierarchy": {
                "level_1_power_plants": [{"id": "P1", "coordinates": [147.0, -35.0]}],
                "level_2_substations": [
                    {"id": "S1", "coordinates": [147.1, -35.1]},
                    {"id": "S2", "coordinates": [147.2, -35.0]}
                ],
                "level_3_transformers": [],
                "level_4_communication_towers": []
            },
            "hierarchical_power_cables": [
                {"cable_id": "C1", "from": "P1", "to": "S1"},
                {"cable_id": "C2", "from": "P1", "to": "S2"}
            ]
        }))
        .expect("topology")
    }

    pub fn status() -> StatusDocument {
        serde_json::from_value(serde_json::json!({
            "infra_status": {
                "S2": [{"time_start": "20221024_000000", "time_end": "20221024_060000", "risk_level": 3, "info": "flooded"}]
            }
        }))
        .expect("status")
    }

    pub fn state() -> AppState {
        state_with(Some(topology()), std::env::temp_dir().join("grid-api-missing-tiles"))
    }

    pub fn state_with(topology: Option<Topology>, flood_tiles_dir: PathBuf) -> AppState {
        AppState::new(
            Dataset {
                topology,
                status: Some(status()),
                precipitation: vec![PrecipitationPoint {
                    coordinates: [147.0, -35.0],
                    precipitation: 4.2,
                    extra: Default::default(),
                }],
            },
            SnapshotEngine::default(),
            flood_tiles_dir,
        )
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }
}
