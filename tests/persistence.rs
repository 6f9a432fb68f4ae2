use gentree::stress::generate_random_table;
use gentree::{KdTreeTable, MetricTreeTable, TableError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

#[test]
fn test_save_load_round_trip_is_exact() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("random.csv");
    let weights = dir.path().join("weights.csv");

    let mut rng = StdRng::seed_from_u64(8);
    let table: MetricTreeTable = generate_random_table(&mut rng, 7, 500, [0.1, 1.0], [1.0, 5.0]).unwrap();
    table.save(&rows, Some(weights.as_path())).unwrap();

    let loaded = MetricTreeTable::load(&rows, Some(weights.as_path())).unwrap();
    assert_eq!(loaded.n_entries(), 500);
    assert_eq!(loaded.n_attributes(), 7);
    for i in 0..500 {
        let (p, w) = table.get(i).unwrap();
        let (q, v) = loaded.get(i).unwrap();
        assert!(p.iter().zip(q.iter()).all(|(a, b)| a.to_bits() == b.to_bits()), "Row {} differs", i);
        assert_eq!(w.to_bits(), v.to_bits(), "Weight {} differs", i);
    }
}

#[test]
fn test_indexed_table_saves_in_tree_order() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("indexed.csv");

    let mut rng = StdRng::seed_from_u64(9);
    let mut table: KdTreeTable = generate_random_table(&mut rng, 3, 100, [0.1, 1.0], [1.0, 5.0]).unwrap();
    table.index_data(&gentree::L2Metric::default(), 8).unwrap();
    table.save(&rows, None).unwrap();

    let loaded = KdTreeTable::load(&rows, None).unwrap();
    for i in 0..100 {
        assert_eq!(loaded.row(i).unwrap(), table.row(i).unwrap());
        assert_eq!(loaded.weight(i).unwrap(), 1.0);
    }
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("rows.csv");
    let weights = dir.path().join("weights.csv");
    std::fs::write(&rows, "0.1,0.2\n0.3,0.4\n0.5,0.6\n").unwrap();
    std::fs::write(&weights, "1,2\n").unwrap();

    match KdTreeTable::load(&rows, Some(weights.as_path())) {
        Err(TableError::WeightCountMismatch { expected, found }) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("Expected weight mismatch, got {:?}", other.map(|t| t.n_entries())),
    }

    let missing = dir.path().join("missing.csv");
    assert!(matches!(KdTreeTable::load(&missing, None), Err(TableError::Io { .. })));
    assert!(matches!(
        KdTreeTable::load(&rows, Some(missing.as_path())),
        Err(TableError::Io { .. })
    ));
}

#[test]
fn test_empty_table_does_not_reload() {
    let dir = tempdir().unwrap();
    let rows = dir.path().join("empty.csv");
    let weights = dir.path().join("empty_weights.csv");

    let table = KdTreeTable::new(3, 0).unwrap();
    table.save(&rows, Some(weights.as_path())).unwrap();
    assert_eq!(std::fs::read_to_string(&rows).unwrap(), "");
    assert!(matches!(
        KdTreeTable::load(&rows, Some(weights.as_path())),
        Err(TableError::EmptyDataset { .. })
    ));
}
