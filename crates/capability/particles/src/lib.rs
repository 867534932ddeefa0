//! 电力流动粒子：沿未故障电缆生成粒子种子，并按显式动画时钟采样位置。
//!
//! 种子只在合格电缆集合变化时重建；逐帧位置由 `sample` 纯函数计算，
//! 不读取墙钟时间。

use api_contract::{ParticleFrameDto, Point3};
use domain::DeviceStatus;
use grid_geometry::CableGeometry;
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// 每段路径默认粒子数。
pub const PARTICLES_PER_SEGMENT: usize = 2;

/// 动画时钟周期（帧）。
pub const CLOCK_CYCLE: u32 = 360;

const TIME_SCALE: f64 = 0.02;
const PULSE_SCALE: f64 = 0.1;
const BASE_RADIUS: f64 = 5.0;

/// 粒子种子。颜色在生成时按电缆状态固定。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub id: String,
    pub start_point: Point3,
    pub end_point: Point3,
    pub line_index: usize,
    pub segment_index: usize,
    pub particle_index: usize,
    pub phase: f64,
    pub color: [u8; 3],
}

/// 为每条非故障电缆的每段路径生成 `per_segment` 个相位均匀分布的粒子。
pub fn generate_particles(geometries: &[CableGeometry<'_>], per_segment: usize) -> Vec<Particle> {
    let mut particles = Vec::new();
    for geometry in geometries {
        let status = geometry.cable.status;
        if status == DeviceStatus::Down {
            continue;
        }
        let color = status.color();
        for (segment_index, segment) in geometry.path.windows(2).enumerate() {
            for particle_index in 0..per_segment {
                particles.push(Particle {
                    id: format!("{}-{}-{}", geometry.index, segment_index, particle_index),
                    start_point: segment[0],
                    end_point: segment[1],
                    line_index: geometry.index,
                    segment_index,
                    particle_index,
                    phase: particle_index as f64 / per_segment as f64 * TAU,
                    color,
                });
            }
        }
    }
    debug!(
        target: "grid.particles",
        cables = geometries.len(),
        particles = particles.len(),
        "particles_generated"
    );
    particles
}

/// 外部驱动的动画时钟。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationClock {
    frame: u32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(frame: u32) -> Self {
        Self {
            frame: frame % CLOCK_CYCLE,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// 前进一帧，`CLOCK_CYCLE` 处回绕。
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % CLOCK_CYCLE;
    }
}

/// 单个粒子在某一帧的采样。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    /// 周期内的归一化位置 [0, 1)。
    pub t: f64,
    pub position: Point3,
    /// `sin(t·π)·0.8 + 0.2` 的淡入淡出。
    pub alpha: f64,
}

fn lerp(start: Point3, end: Point3, t: f64) -> Point3 {
    [
        start[0] + (end[0] - start[0]) * t,
        start[1] + (end[1] - start[1]) * t,
        start[2] + (end[2] - start[2]) * t,
    ]
}

/// 粒子位置采样（纯函数）。
pub fn sample(particle: &Particle, clock: AnimationClock) -> ParticleSample {
    let time = f64::from(clock.frame()) * TIME_SCALE;
    let t = ((time + particle.phase) % TAU) / TAU;
    ParticleSample {
        t,
        position: lerp(particle.start_point, particle.end_point, t),
        alpha: (t * PI).sin() * 0.8 + 0.2,
    }
}

/// 渲染层使用的帧数据：位置、脉冲半径、按 alpha 缩放的填充色。
pub fn render_frame(particle: &Particle, clock: AnimationClock) -> ParticleFrameDto {
    let sampled = sample(particle, clock);
    let pulse = (f64::from(clock.frame()) * PULSE_SCALE + particle.particle_index as f64).sin()
        * 0.3
        + 0.7;
    let [r, g, b] = particle.color;
    let scale = |channel: u8| (f64::from(channel) * sampled.alpha).floor() as u8;
    ParticleFrameDto {
        id: particle.id.clone(),
        line_index: particle.line_index,
        segment_index: particle.segment_index,
        position: sampled.position,
        alpha: sampled.alpha,
        radius: BASE_RADIUS * pulse,
        color: particle.color,
        fill_color: [scale(r), scale(g), scale(b), (255.0 * sampled.alpha).floor() as u8],
    }
}

pub fn render_frames(particles: &[Particle], clock: AnimationClock) -> Vec<ParticleFrameDto> {
    particles
        .iter()
        .map(|particle| render_frame(particle, clock))
        .collect()
}
