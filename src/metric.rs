/// Trait defining a distance between dense vectors.
///
/// Implementations must be non-negative, symmetric and satisfy the triangle
/// inequality. Tree builders rely on nothing beyond this interface.
pub trait Metric: Send + Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Squared distance between `a` and `b`.
    fn distance_sq(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Minkowski metric of order `P`.
///
/// `LMetric<2>` is the Euclidean metric, `LMetric<1>` the Manhattan metric.
#[derive(Clone, Copy, Debug, Default)]
pub struct LMetric<const P: u32>;

/// The Euclidean metric.
pub type L2Metric = LMetric<2>;

impl<const P: u32> Metric for LMetric<P> {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match P {
            1 => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            2 => self.distance_sq(a, b).sqrt(),
            _ => {
                let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs().powi(P as i32)).sum();
                sum.powf(1.0 / P as f64)
            }
        }
    }

    fn distance_sq(&self, a: &[f64], b: &[f64]) -> f64 {
        match P {
            2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
            _ => self.distance(a, b).powi(2),
        }
    }
}
