use crate::bounds::HRectBound;
use crate::metric::Metric;
use crate::point::RowBlock;
use crate::tree::{split_value, SplitPolicy};

/// Kd-tree splitting: boxes split on their widest axis at the median coordinate.
#[derive(Clone, Copy, Debug, Default)]
pub struct KdTreeSplit;

/// Axis-aligned split plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisPivot {
    pub axis: usize,
    pub split_val: f64,
}

impl SplitPolicy for KdTreeSplit {
    type Bound = HRectBound;
    type Pivot = AxisPivot;

    fn compute_bound<M: Metric>(&self, _metric: &M, rows: RowBlock<'_>) -> HRectBound {
        HRectBound::enclosing(rows)
    }

    fn choose_pivot<M: Metric>(&self, _metric: &M, rows: RowBlock<'_>, bound: &HRectBound) -> Option<AxisPivot> {
        let axis = bound.widest_axis();
        if !(bound.width(axis) > 0.0) {
            return None;
        }
        let mut values: Vec<f64> = rows.iter().map(|row| row[axis]).collect();
        let split_val = split_value(&mut values)?;
        Some(AxisPivot { axis, split_val })
    }

    fn goes_left(&self, pivot: &AxisPivot, row: &[f64]) -> bool {
        row[pivot.axis] <= pivot.split_val
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::L2Metric;

    #[test]
    fn test_pivot_on_widest_axis() {
        let data = [0.0, 0.0, 0.1, 3.0, 0.2, 1.0, 0.3, 2.0];
        let rows = RowBlock::new(&data, 2);
        let m = L2Metric::default();
        let bound = KdTreeSplit.compute_bound(&m, rows);
        let pivot = KdTreeSplit.choose_pivot(&m, rows, &bound).unwrap();
        assert_eq!(pivot, AxisPivot { axis: 1, split_val: 1.0 });
        assert!(KdTreeSplit.goes_left(&pivot, &[9.0, 1.0]));
        assert!(!KdTreeSplit.goes_left(&pivot, &[0.0, 1.5]));
    }

    #[test]
    fn test_duplicated_maximum_still_splits() {
        let data = [0.1, 2.0, 0.3, 2.0, 2.0, 2.0];
        let rows = RowBlock::new(&data, 1);
        let m = L2Metric::default();
        let bound = KdTreeSplit.compute_bound(&m, rows);
        let pivot = KdTreeSplit.choose_pivot(&m, rows, &bound).unwrap();
        assert_eq!(pivot.split_val, 0.3);
        assert!(!KdTreeSplit.goes_left(&pivot, &[2.0]));
    }

    #[test]
    fn test_no_pivot_for_identical_rows() {
        let data = [0.5; 12];
        let rows = RowBlock::new(&data, 3);
        let m = L2Metric::default();
        let bound = KdTreeSplit.compute_bound(&m, rows);
        assert!(KdTreeSplit.choose_pivot(&m, rows, &bound).is_none());
    }
}
