use crate::error::{Result, TableError};
use crate::metric::Metric;
use crate::point::{DensePoint, RowBlock};
use crate::tree::{KdTreeSplit, MetricTreeSplit, SplitPolicy, TreeBuilder, TreeIterator, TreeNode};
use std::path::Path;
use tracing::debug;

mod io;

/// Table indexed by a metric tree (ball bounds).
pub type MetricTreeTable = Table<MetricTreeSplit>;

/// Table indexed by a kd-tree (box bounds).
pub type KdTreeTable = Table<KdTreeSplit>;

/// A dense table of `n` rows with `dim` attributes each, plus one weight per row.
///
/// Rows are stored row-major. [`Table::index_data`] reorders the rows so every
/// tree node owns a contiguous range; the permutation is kept so rows can
/// still be looked up by the position they had when the table was created.
pub struct Table<P: SplitPolicy> {
    dim: usize,
    data: Vec<f64>,
    weights: Vec<f64>,
    old_from_new: Vec<usize>,
    new_from_old: Vec<usize>,
    tree: Option<TreeNode<P::Bound>>,
}

impl<P: SplitPolicy> Table<P> {
    /// Allocates a zeroed table with `n` rows of `dim` attributes and unit weights.
    pub fn new(dim: usize, n: usize) -> Result<Self> {
        Self::from_rows(dim, vec![0.0; dim * n], None)
    }

    /// Wraps row-major `data`. Missing weights default to 1.0.
    pub fn from_rows(dim: usize, data: Vec<f64>, weights: Option<Vec<f64>>) -> Result<Self> {
        if dim == 0 {
            return Err(TableError::InvalidDimension(dim));
        }
        if data.len() % dim != 0 {
            return Err(TableError::RaggedData { len: data.len(), dim });
        }
        let n = data.len() / dim;
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(TableError::NonFiniteValue { row: i / dim });
        }
        let weights = match weights {
            Some(w) if w.len() != n => {
                return Err(TableError::WeightCountMismatch {
                    expected: n,
                    found: w.len(),
                });
            }
            Some(w) => {
                if let Some(row) = w.iter().position(|v| !v.is_finite()) {
                    return Err(TableError::NonFiniteValue { row });
                }
                w
            }
            None => vec![1.0; n],
        };
        Ok(Self {
            dim,
            data,
            weights,
            old_from_new: (0..n).collect(),
            new_from_old: (0..n).collect(),
            tree: None,
        })
    }

    /// Loads a table from a delimited text file, with an optional weights file.
    pub fn load(path: impl AsRef<Path>, weights_path: Option<&Path>) -> Result<Self> {
        let path = path.as_ref();
        let (dim, data) = io::read_matrix(path)?;
        let weights = weights_path.map(io::read_weights).transpose()?;
        let table = Self::from_rows(dim, data, weights)?;
        debug!(path = %path.display(), rows = table.n_entries(), dim, "loaded table");
        Ok(table)
    }

    /// Writes the rows (in current order) and, if requested, the weights.
    ///
    /// A table without rows writes an empty file. Its dimension is not
    /// recorded, so loading that file fails with [`TableError::EmptyDataset`].
    pub fn save(&self, path: impl AsRef<Path>, weights_path: Option<&Path>) -> Result<()> {
        let path = path.as_ref();
        io::write_matrix(path, self.dim, &self.data)?;
        if let Some(weights_path) = weights_path {
            io::write_weights(weights_path, &self.weights)?;
        }
        debug!(path = %path.display(), rows = self.n_entries(), "saved table");
        Ok(())
    }

    pub fn n_entries(&self) -> usize {
        self.weights.len()
    }

    pub fn n_attributes(&self) -> usize {
        self.dim
    }

    fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.n_entries() {
            return Err(TableError::RowOutOfRange {
                index: i,
                len: self.n_entries(),
            });
        }
        Ok(())
    }

    /// Copies row `i` and its weight.
    pub fn get(&self, i: usize) -> Result<(DensePoint, f64)> {
        Ok((self.row(i)?.into(), self.weights[i]))
    }

    pub fn row(&self, i: usize) -> Result<&[f64]> {
        self.check_row(i)?;
        Ok(&self.data[i * self.dim..(i + 1) * self.dim])
    }

    pub fn weight(&self, i: usize) -> Result<f64> {
        self.check_row(i)?;
        Ok(self.weights[i])
    }

    /// Mutable access to row `i`. Drops the tree, whose bounds may no longer hold.
    pub fn row_mut(&mut self, i: usize) -> Result<&mut [f64]> {
        self.check_row(i)?;
        self.tree = None;
        Ok(&mut self.data[i * self.dim..(i + 1) * self.dim])
    }

    pub fn set_weight(&mut self, i: usize, weight: f64) -> Result<()> {
        self.check_row(i)?;
        self.weights[i] = weight;
        Ok(())
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// All rows in current order.
    pub fn rows(&self) -> RowBlock<'_> {
        RowBlock::new(&self.data, self.dim)
    }

    /// Copies the row that sat at position `original` before any indexing.
    pub fn get_original(&self, original: usize) -> Result<(DensePoint, f64)> {
        self.check_row(original)?;
        self.get(self.new_from_old[original])
    }

    /// Maps a current row index to the row's position before indexing.
    pub fn old_from_new(&self) -> &[usize] {
        &self.old_from_new
    }

    /// Maps a pre-indexing row position to its current row index.
    pub fn new_from_old(&self) -> &[usize] {
        &self.new_from_old
    }

    pub fn is_indexed(&self) -> bool {
        self.tree.is_some()
    }

    /// Builds the tree, reordering rows so that each node owns a contiguous range.
    ///
    /// Calling this again rebuilds from the current order; the permutation maps
    /// keep referring to the order the table was created with.
    pub fn index_data<M: Metric>(&mut self, metric: &M, leaf_size: usize) -> Result<()> {
        let builder = TreeBuilder::new(P::default(), metric, leaf_size)?;
        self.index_with(&builder);
        Ok(())
    }

    /// Builds the tree with a configured builder, for policies that carry state.
    pub fn index_with<M: Metric>(&mut self, builder: &TreeBuilder<'_, P, M>) {
        let mut rows = RowsMut {
            data: &mut self.data,
            weights: &mut self.weights,
            old_from_new: &mut self.old_from_new,
            dim: self.dim,
        };
        self.tree = builder.build(&mut rows);

        for (new, &old) in self.old_from_new.iter().enumerate() {
            self.new_from_old[old] = new;
        }

        if let Some(root) = &self.tree {
            let mut degenerate = 0;
            root.visit(&mut |node| {
                if node.is_degenerate() {
                    degenerate += 1;
                }
            });
            debug!(
                rows = self.n_entries(),
                leaf_size = builder.leaf_size(),
                nodes = root.node_count(),
                depth = root.depth(),
                degenerate,
                "indexed table"
            );
        }
    }

    /// Root of the tree, if the table has been indexed and is not empty.
    pub fn tree(&self) -> Option<&TreeNode<P::Bound>> {
        self.tree.as_ref()
    }

    /// Iterator over the rows of `node`'s subtree, limited to the rows of this table.
    pub fn node_iterator(&self, node: &TreeNode<P::Bound>) -> TreeIterator<'_> {
        let end = node.end().min(self.n_entries());
        TreeIterator::new(&self.data, &self.weights, self.dim, node.begin().min(end), end)
    }

    #[cfg(test)]
    pub(crate) fn set_tree(&mut self, tree: Option<TreeNode<P::Bound>>) {
        self.tree = tree;
    }
}

/// Mutable view over the row storage used while partitioning.
pub(crate) struct RowsMut<'a> {
    data: &'a mut [f64],
    weights: &'a mut [f64],
    old_from_new: &'a mut [usize],
    dim: usize,
}

impl RowsMut<'_> {
    pub(crate) fn len(&self) -> usize {
        self.weights.len()
    }

    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub(crate) fn block(&self, begin: usize, end: usize) -> RowBlock<'_> {
        RowBlock::new(&self.data[begin * self.dim..end * self.dim], self.dim)
    }

    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.data.split_at_mut(hi * self.dim);
        head[lo * self.dim..(lo + 1) * self.dim].swap_with_slice(&mut tail[..self.dim]);
        self.weights.swap(i, j);
        self.old_from_new.swap(i, j);
    }
}
