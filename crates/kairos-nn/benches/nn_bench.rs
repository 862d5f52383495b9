//! Criterion benchmarks for kairos-nn: leave-one-out search and prediction.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kairos_dtw::DistanceMetric;
use kairos_nn::{CancelToken, Dataset, NearestNeighborConfig, WindowSearch, leave_one_out};

fn make_dataset(n: usize, len: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let rows = (0..n)
        .map(|i| {
            let class = i % 3;
            let shift = rng.gen_range(0.0..1.0);
            let values = (0..len)
                .map(|t| ((t as f64 * 0.2) + shift).sin() * (class + 1) as f64 + rng.gen_range(-0.1..0.1))
                .collect();
            (values, ["a", "b", "c"][class])
        })
        .collect();
    Dataset::new(rows).unwrap()
}

fn bench_leave_one_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("leave_one_out");
    group.sample_size(20);
    let ds = make_dataset(60, 128);
    for (label, metric) in [
        ("euclidean", DistanceMetric::Euclidean),
        ("dtw_r0.1", DistanceMetric::dtw(0.1).unwrap()),
        ("dtw_full", DistanceMetric::full_dtw()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &metric, |b, m| {
            b.iter(|| leave_one_out(&ds, *m).unwrap());
        });
    }
    group.finish();
}

fn bench_window_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_search");
    group.sample_size(10);
    let ds = make_dataset(40, 64);
    let search = WindowSearch::new(0.2, 1).unwrap();
    group.bench_function("n40_len64_max0.2", |b| {
        b.iter(|| search.run(&ds, &CancelToken::new()).unwrap());
    });
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let ds = make_dataset(200, 128);
    let model = NearestNeighborConfig::fixed(DistanceMetric::dtw(0.1).unwrap())
        .fit(&ds)
        .unwrap();
    let query: Vec<f64> = (0..128).map(|t| (t as f64 * 0.2).sin() * 2.0).collect();
    c.bench_function("predict_n200_len128_r0.1", |b| {
        b.iter(|| model.predict(&query).unwrap());
    });
}

criterion_group!(benches, bench_leave_one_out, bench_window_search, bench_predict);
criterion_main!(benches);
