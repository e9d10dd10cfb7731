use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fuelgauge_core::mocks::{ChannelScript, ScriptedProvider};
use fuelgauge_core::{FuelLevelAnalog, SensorCfg, TankCfg, TankMonitor, TankState};

fn bound_estimator(filter_cutoff_hz: f32) -> FuelLevelAnalog {
    let mut est = FuelLevelAnalog::builder()
        .with_sensor(SensorCfg {
            pin: 2,
            filter_cutoff_hz,
            ..SensorCfg::default()
        })
        .with_tank(TankCfg {
            capacity_ml: 10_000.0,
        })
        .try_build()
        .expect("build");
    est.bind(&mut ScriptedProvider::new(ChannelScript::new(1.5)))
        .expect("bind");
    est
}

fn bench_read_cycle(c: &mut Criterion) {
    let mut est = bound_estimator(0.3);
    let mut state = TankState::default();
    c.bench_function("read_cycle_filtered", |b| {
        b.iter(|| {
            est.read(black_box(&mut state));
        })
    });

    let mut est = bound_estimator(-1.0);
    let mut state = TankState::default();
    c.bench_function("read_cycle_filter_bypassed", |b| {
        b.iter(|| {
            est.read(black_box(&mut state));
        })
    });
}

fn bench_monitor_refresh(c: &mut Criterion) {
    let mut monitor = TankMonitor::new(bound_estimator(0.3));
    c.bench_function("monitor_refresh", |b| {
        b.iter(|| {
            monitor.refresh();
            black_box(monitor.consumed_ml());
        })
    });
}

criterion_group!(benches, bench_read_cycle, bench_monitor_refresh);
criterion_main!(benches);
