use crate::bounds::Bound;
use crate::metric::Metric;
use crate::point::RowBlock;
use std::cmp::Ordering;

pub mod builder;
pub mod iterator;
pub mod kd_tree;
pub mod metric_tree;

pub use builder::TreeBuilder;
pub use iterator::{TreeEntry, TreeIterator};
pub use kd_tree::{AxisPivot, KdTreeSplit};
pub use metric_tree::{BallPivot, MetricTreeSplit};

/// Trait defining how a node's rows are bounded and split in two.
/// This allows swapping between ball (metric tree) and box (kd-tree) partitioning.
pub trait SplitPolicy: Clone + Default + Send + Sync {
    /// Region type stored on every node.
    type Bound: Bound;

    /// Splitting rule chosen for one node.
    type Pivot;

    /// Tight bound around `rows`.
    fn compute_bound<M: Metric>(&self, metric: &M, rows: RowBlock<'_>) -> Self::Bound;

    /// Chooses the splitting rule for `rows`, or `None` when the rows cannot be
    /// separated (they coincide along every candidate direction).
    fn choose_pivot<M: Metric>(
        &self,
        metric: &M,
        rows: RowBlock<'_>,
        bound: &Self::Bound,
    ) -> Option<Self::Pivot>;

    /// Whether `row` belongs to the left child. Ties with the split value go left.
    fn goes_left(&self, pivot: &Self::Pivot, row: &[f64]) -> bool;
}

/// A node of a spatial tree.
///
/// A node owns the contiguous row range `[begin, end)` of its table. Internal
/// nodes always have two children whose ranges split the parent's range.
#[derive(Clone, Debug)]
pub struct TreeNode<B> {
    bound: B,
    begin: usize,
    count: usize,
    degenerate: bool,
    children: Option<Box<[TreeNode<B>; 2]>>,
}

impl<B: Bound> TreeNode<B> {
    pub(crate) fn leaf(bound: B, begin: usize, count: usize, degenerate: bool) -> Self {
        Self {
            bound,
            begin,
            count,
            degenerate,
            children: None,
        }
    }

    pub(crate) fn internal(bound: B, begin: usize, count: usize, left: Self, right: Self) -> Self {
        Self {
            bound,
            begin,
            count,
            degenerate: false,
            children: Some(Box::new([left, right])),
        }
    }

    pub fn bound(&self) -> &B {
        &self.bound
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.begin + self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// True for a leaf that exceeds the leaf size because no split could separate its rows.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn left(&self) -> Option<&TreeNode<B>> {
        self.children.as_ref().map(|c| &c[0])
    }

    pub fn right(&self) -> Option<&TreeNode<B>> {
        self.children.as_ref().map(|c| &c[1])
    }

    pub fn children(&self) -> Option<(&TreeNode<B>, &TreeNode<B>)> {
        self.children.as_ref().map(|c| (&c[0], &c[1]))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        match self.children() {
            Some((left, right)) => 1 + left.node_count() + right.node_count(),
            None => 1,
        }
    }

    /// Number of edges on the longest path from this node down to a leaf.
    pub fn depth(&self) -> usize {
        match self.children() {
            Some((left, right)) => 1 + left.depth().max(right.depth()),
            None => 0,
        }
    }

    /// Visits every node of this subtree in pre-order.
    pub fn visit<'a, F>(&'a self, visitor: &mut F)
    where
        F: FnMut(&'a TreeNode<B>),
    {
        visitor(self);
        if let Some((left, right)) = self.children() {
            left.visit(visitor);
            right.visit(visitor);
        }
    }
}

/// Lower median of `values`; reorders the slice.
pub(crate) fn lower_median(values: &mut [f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let k = (values.len() - 1) / 2;
    let (_, median, _) = values.select_nth_unstable_by(k, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    *median
}

/// Split value for `values` under the ties-go-left rule: the lower median,
/// or the largest value below the maximum when the median is the maximum.
/// `None` when every value is equal. Reorders the slice.
pub(crate) fn split_value(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(max > min) {
        return None;
    }
    let median = lower_median(values);
    if median < max {
        return Some(median);
    }
    values.iter().copied().filter(|&v| v < max).reduce(f64::max)
}
