use criterion::{black_box, criterion_group, criterion_main, Criterion};
use thrust_control::gnc::{rate_limit, FixedBounds, ThrustController};
use thrust_control::sim::{simulate_landing, LandingFsm, LandingFsmSettings, Scenario};
use thrust_control::ThrustParams;

fn benchmark_control_cycle(c: &mut Criterion) {
    let mut ctl = ThrustController::new(FixedBounds::new(0.1, 0.9));
    ctl.configure(&ThrustParams::default()).unwrap();
    ctl.update_neutral_thrust(0.5);
    ctl.update_velocity_setpoint(1.5);
    ctl.activate();
    let mut v = 0.0;
    c.bench_function("thrust_cycle_fixed", |b| {
        b.iter(|| {
            v = (v + 0.01) % 2.0;
            ctl.update_velocity_state(black_box(v));
            ctl.get_thrust_command()
        })
    });
}

fn benchmark_fsm_cycle(c: &mut Criterion) {
    let mut ctl = ThrustController::new(LandingFsm::new(LandingFsmSettings::default()));
    ctl.configure(&ThrustParams::default()).unwrap();
    ctl.update_neutral_thrust(0.5);
    ctl.update_velocity_setpoint(1.5);
    ctl.activate();
    c.bench_function("thrust_cycle_fsm", |b| {
        b.iter(|| {
            ctl.bounds_mut().update(black_box(3.0));
            ctl.update_velocity_state(black_box(1.2));
            ctl.get_thrust_command()
        })
    });
}

fn benchmark_rate_limit(c: &mut Criterion) {
    let mut current = 0.0;
    c.bench_function("rate_limit", |b| {
        b.iter(|| rate_limit(black_box(1.0), &mut current, 2.0, 0.02))
    });
}

fn benchmark_landing(c: &mut Criterion) {
    let scenario = Scenario::default();
    c.bench_function("simulate_landing", |b| b.iter(|| simulate_landing(&scenario)));
}

criterion_group!(
    benches,
    benchmark_control_cycle,
    benchmark_fsm_cycle,
    benchmark_rate_limit,
    benchmark_landing
);
criterion_main!(benches);
