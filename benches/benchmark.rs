use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use phylodist::{DistanceMatrix, Method, build_tree, to_newick};
use std::hint::black_box;

const REGRESSION_SIZES: &[usize] = &[16, 64, 128];
const REPORTING_SIZES: &[usize] = &[256, 512];

/// Distances between `n` pseudo-random points in the unit square.
fn random_matrix(n: usize) -> DistanceMatrix {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let points: Vec<(f64, f64)> = (0..n).map(|_| (next(), next())).collect();

    let rows = points
        .iter()
        .map(|&(x1, y1)| {
            points
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                .collect()
        })
        .collect();
    let labels = (0..n).map(|i| format!("taxon_{}", i)).collect::<Vec<_>>();
    DistanceMatrix::new(labels, rows).unwrap()
}

fn bench_methods(c: &mut Criterion, group_name: &str, sizes: &[usize]) {
    let mut group = c.benchmark_group(group_name);
    for &n in sizes {
        let matrix = random_matrix(n);
        for method in [Method::Upgma, Method::NeighborJoining] {
            group.bench_with_input(BenchmarkId::new(method.to_string(), n), &matrix, |b, matrix| {
                b.iter(|| to_newick(&build_tree(method, black_box(matrix)).unwrap()));
            });
        }
    }
    group.finish();
}

fn clustering(c: &mut Criterion) {
    bench_methods(c, "clustering", REGRESSION_SIZES);
}

fn clustering_reporting(c: &mut Criterion) {
    bench_methods(c, "clustering_large", REPORTING_SIZES);
}

criterion_group!(regression, clustering);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = clustering_reporting
}
criterion_main!(regression, reporting);
