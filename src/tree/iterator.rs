use crate::point::DensePoint;

/// One row yielded by a [`TreeIterator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeEntry<'a> {
    pub point: &'a [f64],
    pub row_id: usize,
    pub weight: f64,
}

impl TreeEntry<'_> {
    pub fn to_point(&self) -> DensePoint {
        self.point.into()
    }
}

/// Iterates the rows of a node's subtree in ascending row order.
///
/// The emitted points and weights borrow the table storage, so they are
/// bit-identical to what `Table::get` returns for the same row id.
#[derive(Clone, Debug)]
pub struct TreeIterator<'a> {
    data: &'a [f64],
    weights: &'a [f64],
    dim: usize,
    begin: usize,
    current: usize,
    end: usize,
}

impl<'a> TreeIterator<'a> {
    pub(crate) fn new(data: &'a [f64], weights: &'a [f64], dim: usize, begin: usize, end: usize) -> Self {
        Self {
            data,
            weights,
            dim,
            begin,
            current: begin,
            end,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current < self.end
    }

    /// Rewinds the iterator to the first row of the node.
    pub fn reset(&mut self) {
        self.current = self.begin;
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = TreeEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let row_id = self.current;
        self.current += 1;
        Some(TreeEntry {
            point: &self.data[row_id * self.dim..(row_id + 1) * self.dim],
            row_id,
            weight: self.weights[row_id],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TreeIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterates_range_in_order() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let weights = [1.0, 2.0, 3.0, 4.0];
        let mut it = TreeIterator::new(&data, &weights, 2, 1, 3);
        assert_eq!(it.len(), 2);

        let first = it.next().unwrap();
        assert_eq!(first.row_id, 1);
        assert_eq!(first.point, &[2.0, 3.0]);
        assert_eq!(first.weight, 2.0);
        assert!(it.has_next());

        let second = it.next().unwrap();
        assert_eq!(second.row_id, 2);
        assert!(!it.has_next());
        assert!(it.next().is_none());

        it.reset();
        assert_eq!(it.count(), 2);
    }
}
