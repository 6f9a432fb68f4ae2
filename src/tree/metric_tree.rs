use crate::bounds::BallBound;
use crate::metric::Metric;
use crate::point::{DensePoint, RowBlock};
use crate::tree::{split_value, SplitPolicy};

/// Metric-tree splitting: balls split along their farthest-pair direction.
///
/// The pivot direction runs from `a`, the row farthest from the ball center,
/// to `b`, the row farthest from `a`. Rows are projected onto `b - a` and
/// split at the median projection.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricTreeSplit;

/// Split hyperplane orthogonal to a farthest-pair direction.
#[derive(Clone, Debug, PartialEq)]
pub struct BallPivot {
    pub origin: DensePoint,
    pub direction: DensePoint,
    pub split_val: f64,
}

impl BallPivot {
    pub fn project(&self, row: &[f64]) -> f64 {
        project(row, &self.origin, &self.direction)
    }
}

fn project(row: &[f64], origin: &[f64], direction: &[f64]) -> f64 {
    row.iter()
        .zip(origin)
        .zip(direction)
        .map(|((r, o), d)| (r - o) * d)
        .sum()
}

/// Index of the row farthest from `point`; the first one on ties.
fn farthest_from<M: Metric>(metric: &M, rows: RowBlock<'_>, point: &[f64]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::NEG_INFINITY;
    for (i, row) in rows.iter().enumerate() {
        let dist = metric.distance(point, row);
        if dist > best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

impl SplitPolicy for MetricTreeSplit {
    type Bound = BallBound;
    type Pivot = BallPivot;

    fn compute_bound<M: Metric>(&self, metric: &M, rows: RowBlock<'_>) -> BallBound {
        BallBound::enclosing(metric, rows)
    }

    fn choose_pivot<M: Metric>(&self, metric: &M, rows: RowBlock<'_>, bound: &BallBound) -> Option<BallPivot> {
        if rows.is_empty() {
            return None;
        }
        let a = rows.row(farthest_from(metric, rows, bound.center()));
        let b = rows.row(farthest_from(metric, rows, a));
        if !(metric.distance(a, b) > 0.0) {
            return None;
        }

        let direction: DensePoint = b.iter().zip(a).map(|(b, a)| b - a).collect::<Vec<f64>>().into();
        let mut projections: Vec<f64> = rows.iter().map(|row| project(row, a, &direction)).collect();
        let split_val = split_value(&mut projections)?;

        Some(BallPivot {
            origin: a.into(),
            direction,
            split_val,
        })
    }

    fn goes_left(&self, pivot: &BallPivot, row: &[f64]) -> bool {
        pivot.project(row) <= pivot.split_val
    }
}
