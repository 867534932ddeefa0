//! 快照引擎：时间步 -> 状态解析 -> 拓扑合并 -> 电缆几何 -> 粒子种子。
//!
//! 每次切换时间步都整体重算；拓扑未加载时合并为空操作（返回 `None`）。
//! 粒子种子经 [`ParticleCache`] 复用。

mod cache;

pub use cache::{CacheLookup, ParticleCache};

use api_contract::{FeatureCollection, JunctionArcDto, ParticleFrameDto};
use domain::{StatusDocument, StatusMap, Timestep, Topology};
use grid_geometry::{
    ArcConfig, CableLayout, DeviceIndex, feature_collection, junction_arcs, layout_cables,
};
use grid_merge::merge_topology;
use grid_particles::{AnimationClock, PARTICLES_PER_SEGMENT, Particle, render_frames};
use grid_status::{OverlapPolicy, StatusSummary, resolve_status_with_policy};
use grid_telemetry::{
    record_anomalies_active, record_cables_dropped, record_merge, record_merge_skipped,
    record_particle_regeneration, record_snapshot_latency_us,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// 引擎参数。
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub overlap_policy: OverlapPolicy,
    pub arc: ArcConfig,
    pub particles_per_segment: usize,
    pub power_visible: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::default(),
            arc: ArcConfig::default(),
            particles_per_segment: PARTICLES_PER_SEGMENT,
            power_visible: true,
        }
    }
}

impl EngineConfig {
    fn sanitized(mut self) -> Self {
        if self.particles_per_segment == 0 {
            self.particles_per_segment = 1;
        }
        self
    }
}

/// 某一时间步的完整派生视图。
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestep: Option<Timestep>,
    pub statuses: StatusMap,
    pub summary: StatusSummary,
    pub merged: Topology,
    pub cables: FeatureCollection,
    pub junctions: Vec<JunctionArcDto>,
    pub particles: Arc<Vec<Particle>>,
    /// 端点无法解析而被丢弃的电缆 ID。
    pub dropped: Vec<String>,
}

impl Snapshot {
    /// 按动画时钟采样全部粒子。
    pub fn particle_frames(&self, clock: AnimationClock) -> Vec<ParticleFrameDto> {
        render_frames(&self.particles, clock)
    }
}

/// 快照引擎。
pub struct SnapshotEngine {
    config: EngineConfig,
    power_visible: AtomicBool,
    particles: ParticleCache,
}

impl Default for SnapshotEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SnapshotEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        Self {
            power_visible: AtomicBool::new(config.power_visible),
            config,
            particles: ParticleCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn power_visible(&self) -> bool {
        self.power_visible.load(Ordering::Relaxed)
    }

    /// 切换电力图层显隐；隐藏时粒子种子为空。
    pub fn set_power_visible(&self, visible: bool) {
        self.power_visible.store(visible, Ordering::Relaxed);
    }

    /// 只解析状态，不依赖拓扑。
    pub fn statuses(
        &self,
        status: Option<&StatusDocument>,
        timestep: Option<&Timestep>,
    ) -> StatusMap {
        resolve_status_with_policy(timestep, status, self.config.overlap_policy)
    }

    /// 计算快照。拓扑未加载时返回 `None`。
    pub fn snapshot(
        &self,
        topology: Option<&Topology>,
        status: Option<&StatusDocument>,
        timestep: Option<&Timestep>,
    ) -> Option<Snapshot> {
        let Some(topology) = topology else {
            debug!(target: "grid.pipeline", "merge_skipped_no_topology");
            record_merge_skipped();
            return None;
        };
        let started = Instant::now();

        let statuses = self.statuses(status, timestep);
        let summary = StatusSummary::from_map(&statuses);
        info!(
            target: "grid.pipeline",
            time = timestep.map(|step| step.time.as_str()).unwrap_or("-"),
            operational = summary.operational,
            warning = summary.warning,
            down = summary.down,
            "status_summary"
        );
        let merged = merge_topology(topology, &statuses);
        record_merge();
        record_anomalies_active(summary.warning + summary.down);

        let index = DeviceIndex::new(&merged.infrastructure_hierarchy);
        let CableLayout {
            geometries,
            dropped,
        } = layout_cables(&merged.hierarchical_power_cables, &index, &self.config.arc);
        let cables = feature_collection(&geometries);
        let junctions = junction_arcs(&geometries);
        let lookup = self.particles.particles_for(
            &geometries,
            self.power_visible(),
            self.config.particles_per_segment,
        );
        if lookup.regenerated {
            record_particle_regeneration(lookup.particles.len() as u64);
        }
        record_cables_dropped(dropped.len() as u64);

        let elapsed = started.elapsed().as_micros();
        record_snapshot_latency_us(u64::try_from(elapsed).unwrap_or(u64::MAX));
        debug!(
            target: "grid.pipeline",
            cables = cables.features.len(),
            dropped = dropped.len(),
            junctions = junctions.len(),
            particles = lookup.particles.len(),
            regenerated = lookup.regenerated,
            "snapshot_built"
        );

        Some(Snapshot {
            timestep: timestep.cloned(),
            statuses,
            summary,
            merged,
            cables,
            junctions,
            particles: lookup.particles,
            dropped,
        })
    }
}
