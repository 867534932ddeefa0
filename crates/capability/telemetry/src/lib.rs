//! 追踪、请求 ID 生成与进程内计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub merges: u64,
    pub merges_skipped: u64,
    pub anomalies_active: u64,
    pub cables_dropped: u64,
    pub particles_generated: u64,
    pub particle_regenerations: u64,
    pub snapshot_requests: u64,
    pub snapshot_latency_us_total: u64,
    pub snapshot_latency_us_count: u64,
}

/// 进程内计数指标。
pub struct TelemetryMetrics {
    merges: AtomicU64,
    merges_skipped: AtomicU64,
    anomalies_active: AtomicU64,
    cables_dropped: AtomicU64,
    particles_generated: AtomicU64,
    particle_regenerations: AtomicU64,
    snapshot_requests: AtomicU64,
    snapshot_latency_us_total: AtomicU64,
    snapshot_latency_us_count: AtomicU64,
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            merges: AtomicU64::new(0),
            merges_skipped: AtomicU64::new(0),
            anomalies_active: AtomicU64::new(0),
            cables_dropped: AtomicU64::new(0),
            particles_generated: AtomicU64::new(0),
            particle_regenerations: AtomicU64::new(0),
            snapshot_requests: AtomicU64::new(0),
            snapshot_latency_us_total: AtomicU64::new(0),
            snapshot_latency_us_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            merges: self.merges.load(Ordering::Relaxed),
            merges_skipped: self.merges_skipped.load(Ordering::Relaxed),
            anomalies_active: self.anomalies_active.load(Ordering::Relaxed),
            cables_dropped: self.cables_dropped.load(Ordering::Relaxed),
            particles_generated: self.particles_generated.load(Ordering::Relaxed),
            particle_regenerations: self.particle_regenerations.load(Ordering::Relaxed),
            snapshot_requests: self.snapshot_requests.load(Ordering::Relaxed),
            snapshot_latency_us_total: self.snapshot_latency_us_total.load(Ordering::Relaxed),
            snapshot_latency_us_count: self.snapshot_latency_us_count.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次拓扑合并。
pub fn record_merge() {
    metrics().merges.fetch_add(1, Ordering::Relaxed);
}

/// 记录拓扑未加载导致的空合并。
pub fn record_merge_skipped() {
    metrics().merges_skipped.fetch_add(1, Ordering::Relaxed);
}

/// 记录命中的异常区间数。
pub fn record_anomalies_active(count: u64) {
    metrics().anomalies_active.fetch_add(count, Ordering::Relaxed);
}

/// 记录因端点无法解析而丢弃的电缆数。
pub fn record_cables_dropped(count: u64) {
    metrics().cables_dropped.fetch_add(count, Ordering::Relaxed);
}

/// 记录一次粒子种子重建及其粒子数。
pub fn record_particle_regeneration(particles: u64) {
    let metrics = metrics();
    metrics
        .particle_regenerations
        .fetch_add(1, Ordering::Relaxed);
    metrics
        .particles_generated
        .fetch_add(particles, Ordering::Relaxed);
}

/// 记录快照请求次数。
pub fn record_snapshot_request() {
    metrics().snapshot_requests.fetch_add(1, Ordering::Relaxed);
}

/// 记录快照计算耗时（微秒）。
pub fn record_snapshot_latency_us(latency_us: u64) {
    let metrics = metrics();
    metrics
        .snapshot_latency_us_total
        .fetch_add(latency_us, Ordering::Relaxed);
    metrics
        .snapshot_latency_us_count
        .fetch_add(1, Ordering::Relaxed);
}
