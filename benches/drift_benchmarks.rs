use criterion::{black_box, criterion_group, criterion_main, Criterion};
use perpetual_drift::data::{Column, Dataset};
use perpetual_drift::drift::{calculate_drift, ks_2samp, KsMethod};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample(rng: &mut StdRng, n: usize, shift: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen::<f64>() + shift).collect()
}

pub fn ks_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let x = sample(&mut rng, 500, 0.0);
    let y = sample(&mut rng, 500, 0.05);
    c.bench_function("ks_2samp exact 500x500", |b| {
        b.iter(|| ks_2samp(black_box(&x), black_box(&y), KsMethod::Exact))
    });
    c.bench_function("ks_2samp asymptotic 500x500", |b| {
        b.iter(|| ks_2samp(black_box(&x), black_box(&y), KsMethod::Asymptotic))
    });

    let x = sample(&mut rng, 100_000, 0.0);
    let y = sample(&mut rng, 100_000, 0.01);
    c.bench_function("ks_2samp auto 100k", |b| {
        b.iter(|| ks_2samp(black_box(&x), black_box(&y), KsMethod::Auto))
    });
}

pub fn drift_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let n_features = 40;
    let names: Vec<String> = (0..n_features).map(|i| format!("f{}", i)).collect();
    let reference = Dataset::new(
        names
            .iter()
            .map(|n| Column::numeric(n.as_str(), sample(&mut rng, 5_000, 0.0)))
            .collect(),
    )
    .unwrap();
    let current = Dataset::new(
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Column::numeric(n.as_str(), sample(&mut rng, 5_000, (i % 4) as f64 * 0.02)))
            .collect(),
    )
    .unwrap();

    let mut group = c.benchmark_group("calculate_drift");
    group.sample_size(20);
    group.bench_function("parallel", |b| {
        b.iter(|| calculate_drift(black_box(&reference), black_box(&current), &names, KsMethod::Auto, true))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| calculate_drift(black_box(&reference), black_box(&current), &names, KsMethod::Auto, false))
    });
    group.finish();
}

criterion_group!(benches, ks_benchmarks, drift_benchmarks);
criterion_main!(benches);
