use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parry_core::combat::weakpoint::{default_targets, WeakpointExposure};
use parry_core::movement::{MovementController, NoWalls};
use parry_core::{Controls, Duel, SceneProbe, Tuning};

fn bench_duel(c: &mut Criterion) {
    let env = SceneProbe::default();
    let idle = Controls::default();

    c.bench_function("duel_tick", |b| {
        let mut duel = Duel::default();
        b.iter(|| {
            duel.tick(black_box(1.0 / 60.0), &idle, &env);
            duel.drain_events();
        })
    });

    c.bench_function("duel_ten_seconds", |b| {
        b.iter(|| {
            let mut duel = Duel::default();
            for _ in 0..600 {
                duel.tick(black_box(1.0 / 60.0), &idle, &env);
            }
            duel.drain_events()
        })
    });
}

fn bench_movement(c: &mut Criterion) {
    let controls = Controls {
        move_axes: Vec2::new(0.3, 1.0),
        ..Default::default()
    };

    c.bench_function("movement_tick", |b| {
        let mut mover = MovementController::default();
        b.iter(|| mover.tick(black_box(1.0 / 60.0), &controls, black_box(true), &NoWalls))
    });
}

fn bench_weakpoint(c: &mut Criterion) {
    c.bench_function("weakpoint_expose_tick", |b| {
        let mut weakpoint = WeakpointExposure::new(default_targets(), 3.0, 42);
        b.iter(|| {
            weakpoint.expose(black_box(1.0), true);
            weakpoint.tick(black_box(1.0 / 60.0))
        })
    });
}

fn bench_tuning(c: &mut Criterion) {
    let text = Tuning::default().to_ron_string().unwrap_or_default();

    c.bench_function("tuning_from_ron", |b| {
        b.iter(|| Tuning::from_ron_str(black_box(&text)))
    });
}

criterion_group!(benches, bench_duel, bench_movement, bench_weakpoint, bench_tuning);
criterion_main!(benches);
