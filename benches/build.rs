use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gentree::stress::generate_random_table;
use gentree::{KdTreeSplit, L2Metric, MetricTreeSplit, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SIZES: [usize; 2] = [10_000, 100_000];
const DIMS: usize = 8;
const LEAF_SIZE: usize = 20;

fn benchmark_index_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_data");
    group.sample_size(10);
    let metric = L2Metric::default();

    for &size in &SIZES {
        let mut rng = StdRng::seed_from_u64(42);
        let data: Table<MetricTreeSplit> =
            generate_random_table(&mut rng, DIMS, size, [0.1, 1.0], [1.0, 5.0]).unwrap();
        let rows = data.rows().iter().flatten().copied().collect::<Vec<f64>>();
        let weights = data.weights().to_vec();

        group.bench_with_input(BenchmarkId::new("metric_tree", size), &size, |b, _| {
            b.iter(|| {
                let mut table = Table::<MetricTreeSplit>::from_rows(DIMS, rows.clone(), Some(weights.clone())).unwrap();
                table.index_data(&metric, LEAF_SIZE).unwrap();
                black_box(table.tree().map(|root| root.node_count()))
            })
        });

        group.bench_with_input(BenchmarkId::new("kd_tree", size), &size, |b, _| {
            b.iter(|| {
                let mut table = Table::<KdTreeSplit>::from_rows(DIMS, rows.clone(), Some(weights.clone())).unwrap();
                table.index_data(&metric, LEAF_SIZE).unwrap();
                black_box(table.tree().map(|root| root.node_count()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_index_data);
criterion_main!(benches);
