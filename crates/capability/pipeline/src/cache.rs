//! 粒子种子缓存。
//!
//! 以"合格电缆集合"签名为键：只有签名变化（电缆增减、状态或路径变化、图层显隐）时才重建种子。

use domain::DeviceStatus;
use grid_geometry::CableGeometry;
use grid_particles::{Particle, generate_particles};
use std::sync::{Arc, Mutex};

/// 路径点的位模式，f64 按位比较。
type PathBits = Vec<[u64; 3]>;

/// 合格电缆签名：可见性 + 每条非故障电缆的 (下标, id, 状态, 路径)。
#[derive(Debug, Clone, PartialEq, Eq)]
struct CableSignature {
    visible: bool,
    cables: Vec<(usize, String, DeviceStatus, PathBits)>,
}

impl CableSignature {
    fn from_geometries(geometries: &[CableGeometry<'_>], visible: bool) -> Self {
        let cables = if visible {
            geometries
                .iter()
                .filter(|geometry| geometry.cable.status != DeviceStatus::Down)
                .map(|geometry| {
                    (
                        geometry.index,
                        geometry.cable.cable_id.clone(),
                        geometry.cable.status,
                        geometry
                            .path
                            .iter()
                            .map(|point| point.map(f64::to_bits))
                            .collect(),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };
        Self { visible, cables }
    }
}

struct CacheState {
    signature: CableSignature,
    particles: Arc<Vec<Particle>>,
}

/// 重建结果。
pub struct CacheLookup {
    pub particles: Arc<Vec<Particle>>,
    pub regenerated: bool,
}

/// 粒子种子缓存（跨快照共享）。
#[derive(Default)]
pub struct ParticleCache {
    state: Mutex<Option<CacheState>>,
}

impl ParticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回当前种子；签名变化时重建。隐藏时种子为空。
    pub fn particles_for(
        &self,
        geometries: &[CableGeometry<'_>],
        visible: bool,
        per_segment: usize,
    ) -> CacheLookup {
        let signature = CableSignature::from_geometries(geometries, visible);
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = state.as_ref() {
            if existing.signature == signature {
                return CacheLookup {
                    particles: Arc::clone(&existing.particles),
                    regenerated: false,
                };
            }
        }
        let particles = if visible {
            Arc::new(generate_particles(geometries, per_segment))
        } else {
            Arc::new(Vec::new())
        };
        *state = Some(CacheState {
            signature,
            particles: Arc::clone(&particles),
        });
        CacheLookup {
            particles,
            regenerated: true,
        }
    }

    /// 清空缓存，下一次查询必然重建。
    pub fn invalidate(&self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = None;
    }
}
