use grid_telemetry::{
    TelemetryMetrics, metrics, record_cables_dropped, record_merge, record_particle_regeneration,
    record_snapshot_latency_us,
};

#[test]
fn fresh_registry_is_zeroed() {
    let registry = TelemetryMetrics::new();
    assert_eq!(registry.snapshot(), Default::default());
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_merge();
    record_cables_dropped(2);
    record_particle_regeneration(8);
    record_snapshot_latency_us(150);
    let after = metrics().snapshot();

    // 全局实例在测试间共享，只断言增量下界
    assert!(after.merges >= before.merges + 1);
    assert!(after.cables_dropped >= before.cables_dropped + 2);
    assert!(after.particle_regenerations >= before.particle_regenerations + 1);
    assert!(after.particles_generated >= before.particles_generated + 8);
    assert!(after.snapshot_latency_us_total >= before.snapshot_latency_us_total + 150);
    assert!(after.snapshot_latency_us_count >= before.snapshot_latency_us_count + 1);
}
