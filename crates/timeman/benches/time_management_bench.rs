use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use timeman::{
    BudgetKind, Color, ComplexityModel, LimitsType, PositionSignals, TimeManagement, TimeOptions,
    budget_ratio,
};

fn bench_budget_ratio(c: &mut Criterion) {
    c.bench_function("budget_ratio_sudden_death", |b| {
        b.iter(|| {
            black_box(budget_ratio(
                black_box(BudgetKind::Maximum),
                black_box(24),
                black_box(0),
                black_box(1_000),
                black_box(60_000),
                black_box(0.9),
            ))
        })
    });

    c.bench_function("budget_ratio_moves_to_go", |b| {
        b.iter(|| {
            black_box(budget_ratio(
                black_box(BudgetKind::Optimum),
                black_box(24),
                black_box(16),
                black_box(0),
                black_box(60_000),
                black_box(0.9),
            ))
        })
    });
}

fn bench_init(c: &mut Criterion) {
    let mut limits = LimitsType::new();
    limits.time = [60_000; Color::NUM];
    limits.inc = [1_000; Color::NUM];
    limits.set_start_time();

    let material = TimeOptions::default();
    let evaluation = TimeOptions {
        complexity_model: ComplexityModel::evaluation(),
        ..TimeOptions::default()
    };
    let signals = PositionSignals::new(48).with_eval(120).with_material(9_000);

    let mut tm = TimeManagement::new();

    c.bench_function("init_material", |b| {
        b.iter(|| {
            let mut limits = limits.clone();
            black_box(tm.init(&mut limits, Color::White, black_box(&signals), &material))
        })
    });

    c.bench_function("init_evaluation", |b| {
        b.iter(|| {
            let mut limits = limits.clone();
            black_box(tm.init(&mut limits, Color::White, black_box(&signals), &evaluation))
        })
    });
}

criterion_group!(benches, bench_budget_ratio, bench_init);
criterion_main!(benches);
