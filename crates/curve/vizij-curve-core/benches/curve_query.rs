use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vizij_curve_core::{bake_curve, BakingConfig, Curve};

fn build_curve(keys: i32, spacing: i32) -> Curve {
    let mut curve = Curve::named("bench");
    for i in 0..keys {
        let value = f64::from(i).sin() * 100.0;
        curve.add_key_with_value(i * spacing, value);
    }
    for i in 1..(keys as usize).saturating_sub(1) {
        curve.smooth(i).unwrap();
    }
    curve
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolated_value_sequential");
    for &keys in &[8, 64, 512] {
        let curve = build_curve(keys, 24);
        let last = curve.last_frame();
        group.bench_with_input(BenchmarkId::from_parameter(keys), &curve, |b, curve| {
            b.iter(|| {
                let mut acc = 0.0;
                for frame in 0..=last {
                    acc += curve.interpolated_value(black_box(frame));
                }
                acc
            })
        });
    }
    group.finish();
}

fn bench_scattered(c: &mut Criterion) {
    let curve = build_curve(512, 24);
    let last = curve.last_frame();
    let frames: Vec<i32> = (0..4096).map(|i| (i * 7919) % (last + 1)).collect();
    c.bench_function("interpolated_value_scattered", |b| {
        b.iter(|| {
            frames
                .iter()
                .map(|f| curve.interpolated_value(black_box(*f)))
                .sum::<f64>()
        })
    });
}

fn bench_edit(c: &mut Criterion) {
    c.bench_function("add_remove_key", |b| {
        let mut curve = build_curve(64, 24);
        b.iter(|| {
            let idx = curve.add_key(black_box(301));
            curve.remove_key(idx).unwrap();
        })
    });
}

fn bench_bake(c: &mut Criterion) {
    let curve = build_curve(64, 24);
    let cfg = BakingConfig::default();
    c.bench_function("bake_curve", |b| b.iter(|| bake_curve(&curve, &cfg)));
}

criterion_group!(benches, bench_sequential, bench_scattered, bench_edit, bench_bake);
criterion_main!(benches);
