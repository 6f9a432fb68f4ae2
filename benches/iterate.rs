use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gentree::stress::generate_random_table;
use gentree::{Bound, KdTreeTable, L2Metric};
use rand::rngs::StdRng;
use rand::SeedableRng;

const NUM_POINTS: usize = 100_000;

fn benchmark_leaf_iteration(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut table: KdTreeTable = generate_random_table(&mut rng, 5, NUM_POINTS, [0.1, 1.0], [1.0, 5.0]).unwrap();
    table.index_data(&L2Metric::default(), 20).unwrap();

    c.bench_function(&format!("sum_weights_over_leaves_{}_points", NUM_POINTS), |b| {
        b.iter(|| {
            let mut total = 0.0;
            table.tree().unwrap().visit(&mut |node| {
                if node.is_leaf() {
                    total += table.node_iterator(node).map(|e| e.weight).sum::<f64>();
                }
            });
            black_box(total)
        })
    });
}

fn benchmark_root_sampling(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(8);
    let mut table: KdTreeTable = generate_random_table(&mut rng, 5, 10_000, [0.1, 1.0], [1.0, 5.0]).unwrap();
    let metric = L2Metric::default();
    table.index_data(&metric, 20).unwrap();
    let bound = table.tree().unwrap().bound().clone();

    c.bench_function("random_point_inside_root", |b| {
        b.iter(|| black_box(bound.random_point_inside(&metric, &mut rng)))
    });
}

criterion_group!(benches, benchmark_leaf_iteration, benchmark_root_sampling);
criterion_main!(benches);
