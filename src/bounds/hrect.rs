use crate::bounds::Bound;
use crate::metric::Metric;
use crate::point::{DensePoint, RowBlock};
use rand::Rng;

/// Axis-aligned box given by one closed interval `[lo, hi]` per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct HRectBound {
    lo: Vec<f64>,
    hi: Vec<f64>,
}

impl HRectBound {
    pub fn new(lo: Vec<f64>, hi: Vec<f64>) -> Self {
        debug_assert_eq!(lo.len(), hi.len());
        Self { lo, hi }
    }

    /// Tightest box around the rows of `rows`.
    pub fn enclosing(rows: RowBlock<'_>) -> Self {
        let dim = rows.dim();
        let mut lo = vec![f64::INFINITY; dim];
        let mut hi = vec![f64::NEG_INFINITY; dim];
        for row in rows.iter() {
            for i in 0..dim {
                let v = row[i];
                if v < lo[i] { lo[i] = v; }
                if v > hi[i] { hi[i] = v; }
            }
        }
        Self { lo, hi }
    }

    pub fn lo(&self) -> &[f64] {
        &self.lo
    }

    pub fn hi(&self) -> &[f64] {
        &self.hi
    }

    pub fn width(&self, axis: usize) -> f64 {
        self.hi[axis] - self.lo[axis]
    }

    /// Axis with the largest extent, the first one on ties.
    pub fn widest_axis(&self) -> usize {
        let mut axis = 0;
        for i in 1..self.lo.len() {
            if self.width(i) > self.width(axis) {
                axis = i;
            }
        }
        axis
    }
}

impl Bound for HRectBound {
    fn dim(&self) -> usize {
        self.lo.len()
    }

    fn contains<M: Metric>(&self, _metric: &M, point: &[f64]) -> bool {
        point.len() == self.lo.len()
            && point
                .iter()
                .zip(self.lo.iter().zip(&self.hi))
                .all(|(&p, (&lo, &hi))| lo <= p && p <= hi)
    }

    fn random_point_inside<M: Metric, R: Rng + ?Sized>(&self, _metric: &M, rng: &mut R) -> DensePoint {
        self.lo
            .iter()
            .zip(&self.hi)
            .map(|(&lo, &hi)| {
                if lo < hi {
                    // Interpolate instead of sampling `lo..=hi`, whose width may overflow.
                    let u: f64 = rng.gen_range(0.0..=1.0);
                    (lo * (1.0 - u) + hi * u).max(lo).min(hi)
                } else {
                    lo
                }
            })
            .collect::<Vec<f64>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::L2Metric;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_enclosing_box() {
        let data = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let b = HRectBound::enclosing(RowBlock::new(&data, 2));
        assert_eq!(b.lo(), &[0.0, 0.0]);
        assert_eq!(b.hi(), &[1.0, 1.0]);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = HRectBound::new(vec![0.0, -1.0], vec![1.0, 1.0]);
        let m = L2Metric::default();
        assert!(b.contains(&m, &[0.0, -1.0]));
        assert!(b.contains(&m, &[1.0, 1.0]));
        assert!(!b.contains(&m, &[1.0 + 1e-12, 0.0]));
        assert!(!b.contains(&m, &[0.5]));
    }

    #[test]
    fn test_widest_axis_ties_go_first() {
        let b = HRectBound::new(vec![0.0, 0.0, 0.0], vec![1.0, 2.0, 2.0]);
        assert_eq!(b.widest_axis(), 1);
    }

    #[test]
    fn test_samples_stay_inside_flat_box() {
        let b = HRectBound::new(vec![0.0, 0.5, 0.2], vec![1.0, 0.5, 0.3]);
        let m = L2Metric::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = b.random_point_inside(&m, &mut rng);
            assert!(b.contains(&m, &p), "sample {:?} escaped {:?}", p, b);
            assert_eq!(p[1], 0.5);
        }
    }

    #[test]
    fn test_samples_inside_huge_box() {
        let b = HRectBound::new(vec![-1e308, 0.0], vec![1e308, f64::MAX]);
        let m = L2Metric::default();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1000 {
            let p = b.random_point_inside(&m, &mut rng);
            assert!(p.iter().all(|v| v.is_finite()));
            assert!(b.contains(&m, &p));
        }
    }
}
