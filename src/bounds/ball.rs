use crate::bounds::Bound;
use crate::metric::Metric;
use crate::point::{DensePoint, RowBlock};
use rand::Rng;
use rand_distr::StandardNormal;

// Rejected draws before falling back to the center, which is always inside.
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Ball given by a center and a radius under some metric.
#[derive(Clone, Debug, PartialEq)]
pub struct BallBound {
    center: DensePoint,
    radius: f64,
}

impl BallBound {
    pub fn new(center: DensePoint, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Ball centered on the centroid of `rows`, with the radius of the farthest row.
    pub fn enclosing<M: Metric>(metric: &M, rows: RowBlock<'_>) -> Self {
        let center = rows.centroid();
        let radius = rows
            .iter()
            .map(|row| metric.distance(&center, row))
            .fold(0.0, f64::max);
        Self { center, radius }
    }

    pub fn center(&self) -> &DensePoint {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Bound for BallBound {
    fn dim(&self) -> usize {
        self.center.length()
    }

    fn contains<M: Metric>(&self, metric: &M, point: &[f64]) -> bool {
        point.len() == self.center.length() && metric.distance(&self.center, point) <= self.radius
    }

    /// Draws a uniform direction and a radius `R * u^(1/D)`, rejecting the few
    /// draws that rounding (or a metric whose ball is smaller than the
    /// Euclidean one) pushes outside.
    fn random_point_inside<M: Metric, R: Rng + ?Sized>(&self, metric: &M, rng: &mut R) -> DensePoint {
        let dim = self.center.length();
        if dim == 0 || !(self.radius > 0.0) {
            return self.center.clone();
        }

        let mut candidate = DensePoint::zeros(dim);
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let mut norm_sq = 0.0;
            for v in candidate.iter_mut() {
                let g: f64 = rng.sample(StandardNormal);
                *v = g;
                norm_sq += g * g;
            }
            let norm = norm_sq.sqrt();
            if !(norm > 0.0) || !norm.is_finite() {
                continue;
            }

            let u: f64 = rng.gen_range(0.0..=1.0);
            let r = self.radius * u.powf(1.0 / dim as f64);
            for (v, c) in candidate.iter_mut().zip(self.center.iter()) {
                *v = c + *v / norm * r;
            }
            if self.contains(metric, &candidate) {
                return candidate;
            }
        }
        self.center.clone()
    }
}
