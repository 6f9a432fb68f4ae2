use crate::metric::Metric;
use crate::point::DensePoint;
use rand::Rng;

pub mod ball;
pub mod hrect;

pub use ball::BallBound;
pub use hrect::HRectBound;

/// Trait defining a geometric region that encloses the rows of a tree node.
///
/// `contains` is inclusive on the boundary, so every point produced by
/// `random_point_inside` is accepted by `contains` under the same metric.
pub trait Bound: Clone + std::fmt::Debug + Send + Sync {
    /// Number of dimensions of the region.
    fn dim(&self) -> usize;

    /// Checks whether `point` lies inside the region (boundary included).
    fn contains<M: Metric>(&self, metric: &M, point: &[f64]) -> bool;

    /// Samples a point from the region.
    ///
    /// The sample has full support over the region and is always accepted by
    /// [`Bound::contains`] under `metric`.
    fn random_point_inside<M: Metric, R: Rng + ?Sized>(&self, metric: &M, rng: &mut R) -> DensePoint;
}
