use std::ops::{Deref, DerefMut};

/// An owned copy of one table row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DensePoint {
    values: Vec<f64>,
}

impl DensePoint {
    /// Creates a zeroed point of the given length.
    pub fn zeros(length: usize) -> Self {
        Self { values: vec![0.0; length] }
    }

    pub fn length(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for DensePoint {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl From<&[f64]> for DensePoint {
    fn from(values: &[f64]) -> Self {
        Self { values: values.to_vec() }
    }
}

impl Deref for DensePoint {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}

impl DerefMut for DensePoint {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

/// A borrowed block of contiguous row-major rows.
#[derive(Clone, Copy, Debug)]
pub struct RowBlock<'a> {
    data: &'a [f64],
    dim: usize,
}

impl<'a> RowBlock<'a> {
    pub fn new(data: &'a [f64], dim: usize) -> Self {
        debug_assert!(dim > 0 && data.len() % dim == 0);
        Self { data, dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> &'a [f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'a, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// Arithmetic mean of the rows, or the origin for an empty block.
    pub fn centroid(&self) -> DensePoint {
        let mut centroid = DensePoint::zeros(self.dim);
        if self.is_empty() {
            return centroid;
        }
        for row in self.iter() {
            for (c, v) in centroid.iter_mut().zip(row) {
                *c += v;
            }
        }
        let n = self.len() as f64;
        for c in centroid.iter_mut() {
            *c /= n;
        }
        centroid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_block_access() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let block = RowBlock::new(&data, 2);
        assert_eq!(block.len(), 3);
        assert_eq!(block.row(1), &[2.0, 3.0]);
        assert_eq!(block.iter().count(), 3);
    }

    #[test]
    fn test_centroid() {
        let data = [0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 2.0];
        let c = RowBlock::new(&data, 2).centroid();
        assert_eq!(c.as_slice(), &[1.0, 1.0]);
        assert!(RowBlock::new(&[], 3).centroid().iter().all(|&v| v == 0.0));
    }
}
