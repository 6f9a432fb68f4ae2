use gentree::stress::checks;
use gentree::stress::generate_random_table;
use gentree::{Bound, KdTreeSplit, L2Metric, MetricTreeSplit, SplitPolicy, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

const DIMS: usize = 5;
const POINTS: usize = 200;
const LEAF_SIZE: usize = 20;

fn indexed_pair<P: SplitPolicy>(seed: u64) -> (Table<P>, Table<P>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let original: Table<P> = generate_random_table(&mut rng, DIMS, POINTS, [0.1, 1.0], [1.0, 5.0]).unwrap();
    let dir = tempdir().unwrap();
    let rows = dir.path().join("random.csv");
    let weights = dir.path().join("weights.csv");
    original.save(&rows, Some(weights.as_path())).unwrap();

    let mut indexed = Table::<P>::load(&rows, Some(weights.as_path())).unwrap();
    indexed.index_data(&L2Metric::default(), LEAF_SIZE).unwrap();
    (indexed, original)
}

fn check_all<P: SplitPolicy>(seed: u64) {
    let (indexed, original) = indexed_pair::<P>(seed);
    let metric = L2Metric::default();
    let mut rng = StdRng::seed_from_u64(seed + 1);

    checks::check_partition(&indexed).expect("partition");
    checks::check_containment(&indexed, &metric).expect("containment");
    checks::check_leaf_sizes(&indexed, LEAF_SIZE).expect("leaf size");
    checks::check_iterators(&indexed).expect("iterator fidelity");
    checks::check_bound_samples(&indexed, &metric, &mut rng, 1000).expect("sampler soundness");
    checks::check_row_conservation(&indexed, &original).expect("row conservation");
    checks::check_row_preservation(&indexed, &original).expect("row preservation");
}

#[test]
fn test_metric_tree_invariants() {
    for seed in 0..5 {
        check_all::<MetricTreeSplit>(seed);
    }
}

#[test]
fn test_kd_tree_invariants() {
    for seed in 0..5 {
        check_all::<KdTreeSplit>(seed);
    }
}

#[test]
fn test_indexing_moves_rows() {
    let (indexed, original) = indexed_pair::<KdTreeSplit>(17);
    let moved = (0..POINTS).filter(|&i| indexed.old_from_new()[i] != i).count();
    assert!(moved > 0, "Expected the kd-tree to reorder rows");

    // Positional comparison only holds through the permutation.
    for new in 0..POINTS {
        let old = indexed.old_from_new()[new];
        assert_eq!(indexed.new_from_old()[old], new);
        assert_eq!(indexed.get(new).unwrap(), original.get(old).unwrap());
    }
}

#[test]
fn test_every_bound_samples_inside_itself() {
    let (indexed, _) = indexed_pair::<MetricTreeSplit>(23);
    let metric = L2Metric::default();
    let mut rng = StdRng::seed_from_u64(29);
    indexed.tree().unwrap().visit(&mut |node| {
        for _ in 0..20 {
            let p = node.bound().random_point_inside(&metric, &mut rng);
            assert!(node.bound().contains(&metric, &p));
        }
    });
}

#[test]
fn test_iterator_visits_range_in_ascending_order() {
    let (indexed, _) = indexed_pair::<MetricTreeSplit>(31);
    indexed.tree().unwrap().visit(&mut |node| {
        let ids: Vec<usize> = indexed.node_iterator(node).map(|e| e.row_id).collect();
        let expected: Vec<usize> = (node.begin()..node.end()).collect();
        assert_eq!(ids, expected);
    });
}

#[test]
fn test_detects_tampered_tree() {
    let (mut indexed, original) = indexed_pair::<KdTreeSplit>(37);
    let metric = L2Metric::default();

    // Moving a row far away drops the tree, so checks report it as missing.
    indexed.row_mut(0).unwrap()[0] = 100.0;
    assert_eq!(
        checks::check_containment(&indexed, &metric),
        Err(checks::Violation::MissingTree)
    );
    assert!(checks::check_row_conservation(&indexed, &original).is_err());
}
