//! Invariant checks run against an indexed table.

use crate::bounds::Bound;
use crate::metric::Metric;
use crate::point::RowBlock;
use crate::table::Table;
use crate::tree::{SplitPolicy, TreeNode};
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

/// A broken invariant, identifying the check and the offending row or sample.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Violation {
    #[error("tables differ in shape: {left_rows}x{left_dim} vs {right_rows}x{right_dim}")]
    ShapeMismatch {
        left_rows: usize,
        left_dim: usize,
        right_rows: usize,
        right_dim: usize,
    },

    #[error("reordered points and original points do not match at row {row}")]
    RowMismatch { row: usize },

    #[error("reordered point weight and the original one do not match at row {row}")]
    WeightMismatch { row: usize },

    #[error("rows were duplicated or lost during indexing")]
    RowsNotConserved,

    #[error("table has not been indexed")]
    MissingTree,

    #[error("random point {sample} is not within the bound")]
    SampleOutsideBound { sample: usize },

    #[error("tree iterator is broken at row {row}")]
    IteratorMismatch { row: usize },

    #[error("children of node [{begin}, {end}) do not partition it")]
    PartitionBroken { begin: usize, end: usize },

    #[error("row {row} is outside the bound of node [{begin}, {end})")]
    RowOutsideBound { row: usize, begin: usize, end: usize },

    #[error("leaf [{begin}, {end}) exceeds leaf size {leaf_size}")]
    LeafTooLarge { begin: usize, end: usize, leaf_size: usize },
}

fn root<P: SplitPolicy>(table: &Table<P>) -> Result<&TreeNode<P::Bound>, Violation> {
    table.tree().ok_or(Violation::MissingTree)
}

fn check_shape<P: SplitPolicy, Q: SplitPolicy>(left: &Table<P>, right: &Table<Q>) -> Result<(), Violation> {
    if left.n_entries() != right.n_entries() || left.n_attributes() != right.n_attributes() {
        return Err(Violation::ShapeMismatch {
            left_rows: left.n_entries(),
            left_dim: left.n_attributes(),
            right_rows: right.n_entries(),
            right_dim: right.n_attributes(),
        });
    }
    Ok(())
}

/// Every row of `original`, looked up by its original position in `indexed`,
/// carries the same values and weight.
pub fn check_row_preservation<P: SplitPolicy, Q: SplitPolicy>(
    indexed: &Table<P>,
    original: &Table<Q>,
) -> Result<(), Violation> {
    check_shape(indexed, original)?;
    let mismatch = (0..original.n_entries()).into_par_iter().find_map_first(|i| {
        let new = indexed.new_from_old()[i];
        let (Ok(reordered), Ok(expected)) = (indexed.row(new), original.row(i)) else {
            return Some(Violation::RowMismatch { row: i });
        };
        if reordered != expected {
            return Some(Violation::RowMismatch { row: i });
        }
        if indexed.weights()[new] != original.weights()[i] {
            return Some(Violation::WeightMismatch { row: i });
        }
        None
    });
    mismatch.map_or(Ok(()), Err)
}

fn sorted_keys(rows: RowBlock<'_>, weights: &[f64]) -> Vec<Vec<u64>> {
    let mut keys: Vec<Vec<u64>> = rows
        .iter()
        .zip(weights)
        .map(|(row, w)| row.iter().chain(std::iter::once(w)).map(|v| v.to_bits()).collect())
        .collect();
    keys.par_sort_unstable();
    keys
}

/// The multiset of (row, weight) pairs is the same in both tables.
pub fn check_row_conservation<P: SplitPolicy, Q: SplitPolicy>(
    indexed: &Table<P>,
    original: &Table<Q>,
) -> Result<(), Violation> {
    check_shape(indexed, original)?;

    let mut seen = vec![false; indexed.n_entries()];
    for &old in indexed.old_from_new() {
        if old >= seen.len() || std::mem::replace(&mut seen[old], true) {
            return Err(Violation::RowsNotConserved);
        }
    }

    if sorted_keys(indexed.rows(), indexed.weights()) != sorted_keys(original.rows(), original.weights()) {
        return Err(Violation::RowsNotConserved);
    }
    Ok(())
}

/// Samples `samples` points inside the root bound and checks each is contained.
pub fn check_bound_samples<P, M, R>(table: &Table<P>, metric: &M, rng: &mut R, samples: usize) -> Result<(), Violation>
where
    P: SplitPolicy,
    M: Metric,
    R: Rng + ?Sized,
{
    let bound = root(table)?.bound();
    for sample in 0..samples {
        let point = bound.random_point_inside(metric, rng);
        if !bound.contains(metric, &point) {
            return Err(Violation::SampleOutsideBound { sample });
        }
    }
    Ok(())
}

/// For every node, each row yielded by its iterator equals `Table::get` on the same id.
pub fn check_iterators<P: SplitPolicy>(table: &Table<P>) -> Result<(), Violation> {
    let mut result = Ok(());
    root(table)?.visit(&mut |node| {
        if result.is_err() {
            return;
        }
        if node.end() > table.n_entries() {
            result = Err(Violation::IteratorMismatch { row: table.n_entries() });
            return;
        }
        for entry in table.node_iterator(node) {
            let matches = table
                .get(entry.row_id)
                .map(|(point, weight)| point.as_slice() == entry.point && weight == entry.weight)
                .unwrap_or(false);
            if !matches {
                result = Err(Violation::IteratorMismatch { row: entry.row_id });
                return;
            }
        }
    });
    result
}

/// Children of every internal node cover disjoint, non-empty ranges whose union is the parent's.
pub fn check_partition<P: SplitPolicy>(table: &Table<P>) -> Result<(), Violation> {
    let root = root(table)?;
    if root.begin() != 0 || root.end() != table.n_entries() {
        return Err(Violation::PartitionBroken {
            begin: root.begin(),
            end: root.end(),
        });
    }
    let mut result = Ok(());
    root.visit(&mut |node| {
        if let Some((left, right)) = node.children() {
            let ok = left.begin() == node.begin()
                && left.end() == right.begin()
                && right.end() == node.end()
                && left.count() > 0
                && right.count() > 0;
            if !ok && result.is_ok() {
                result = Err(Violation::PartitionBroken {
                    begin: node.begin(),
                    end: node.end(),
                });
            }
        }
    });
    result
}

/// Every row of every node lies inside that node's bound.
pub fn check_containment<P: SplitPolicy, M: Metric>(table: &Table<P>, metric: &M) -> Result<(), Violation> {
    let mut nodes = Vec::new();
    root(table)?.visit(&mut |node| nodes.push(node));
    let rows = table.rows();
    nodes
        .par_iter()
        .find_map_first(|node| {
            (node.begin()..node.end())
                .find(|&i| !node.bound().contains(metric, rows.row(i)))
                .map(|row| Violation::RowOutsideBound {
                    row,
                    begin: node.begin(),
                    end: node.end(),
                })
        })
        .map_or(Ok(()), Err)
}

/// Leaves hold at most `leaf_size` rows unless they were declared degenerate.
pub fn check_leaf_sizes<P: SplitPolicy>(table: &Table<P>, leaf_size: usize) -> Result<(), Violation> {
    let mut result = Ok(());
    root(table)?.visit(&mut |node| {
        if node.is_leaf() && node.count() > leaf_size && !node.is_degenerate() && result.is_ok() {
            result = Err(Violation::LeafTooLarge {
                begin: node.begin(),
                end: node.end(),
                leaf_size,
            });
        }
    });
    result
}
