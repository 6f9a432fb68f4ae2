//! Recursive construction of a spatial tree over the rows of a table.

use crate::error::{Result, TableError};
use crate::metric::Metric;
use crate::table::RowsMut;
use crate::tree::{SplitPolicy, TreeNode};
use tracing::trace;

/// Builds a tree by recursively splitting row ranges with a [`SplitPolicy`].
///
/// Rows are partitioned in place: after a build, the rows of every node occupy
/// a contiguous range of the table.
pub struct TreeBuilder<'m, P, M> {
    policy: P,
    metric: &'m M,
    leaf_size: usize,
}

impl<'m, P: SplitPolicy, M: Metric> TreeBuilder<'m, P, M> {
    /// Creates a builder. Fails if `leaf_size` is zero.
    pub fn new(policy: P, metric: &'m M, leaf_size: usize) -> Result<Self> {
        if leaf_size == 0 {
            return Err(TableError::InvalidLeafSize(leaf_size));
        }
        Ok(Self {
            policy,
            metric,
            leaf_size,
        })
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Builds the tree over every row of `rows`, or returns `None` when there are no rows.
    pub(crate) fn build(&self, rows: &mut RowsMut<'_>) -> Option<TreeNode<P::Bound>> {
        let n = rows.len();
        if n == 0 {
            return None;
        }
        Some(self.build_recursive(rows, 0, n))
    }

    fn build_recursive(&self, rows: &mut RowsMut<'_>, begin: usize, end: usize) -> TreeNode<P::Bound> {
        let count = end - begin;
        let block = rows.block(begin, end);
        let bound = self.policy.compute_bound(self.metric, block);

        // Leaf condition: small number of rows
        if count <= self.leaf_size {
            return TreeNode::leaf(bound, begin, count, false);
        }

        let Some(pivot) = self.policy.choose_pivot(self.metric, block, &bound) else {
            trace!(begin, end, "rows coincide, keeping oversized leaf");
            return TreeNode::leaf(bound, begin, count, true);
        };

        let mid = self.partition(rows, begin, end, &pivot);
        if mid == begin || mid == end {
            trace!(begin, end, "split left one side empty, keeping oversized leaf");
            return TreeNode::leaf(bound, begin, count, true);
        }

        let left = self.build_recursive(rows, begin, mid);
        let right = self.build_recursive(rows, mid, end);
        TreeNode::internal(bound, begin, count, left, right)
    }

    /// Moves rows going left to the front of `[begin, end)` and returns the first right row.
    fn partition(&self, rows: &mut RowsMut<'_>, begin: usize, end: usize, pivot: &P::Pivot) -> usize {
        let mut left = begin;
        let mut right = end;
        while left < right {
            if self.policy.goes_left(pivot, rows.row(left)) {
                left += 1;
            } else {
                right -= 1;
                rows.swap(left, right);
            }
        }
        left
    }
}
