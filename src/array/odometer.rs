//! Coordinate iteration in row-major order.
use crate::array::util::Shape;

/// Advance `index` by one position within `sizes`, last dimension fastest.
///
/// Returns `false` once every dimension has wrapped back to zero, or without touching
/// `index` when it does not have one coordinate per extent.
#[inline]
pub fn advance(index: &mut [usize], sizes: &[usize]) -> bool {
    if index.len() != sizes.len() {
        return false;
    }
    for (i, &extent) in index.iter_mut().zip(sizes).rev() {
        *i += 1;
        if *i < extent {
            return true;
        }
        *i = 0;
    }
    false
}

/// Iterator over every coordinate of a shape.
///
/// A shape with a zero extent has no coordinates; the empty shape has exactly one.
#[derive(Debug, Clone)]
pub struct Odometer {
    sizes: Shape,
    next: Option<Shape>,
}

impl Odometer {
    pub fn new(sizes: &[usize]) -> Self {
        let next = if sizes.contains(&0) {
            None
        } else {
            Some(Shape::from_elem(0, sizes.len()))
        };
        Self {
            sizes: Shape::from_slice(sizes),
            next,
        }
    }
}

impl Iterator for Odometer {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        let current = self.next.take()?;
        let mut following = current.clone();
        if advance(&mut following, &self.sizes) {
            self.next = Some(following);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_dimension_fastest() {
        let got: Vec<Vec<usize>> = Odometer::new(&[2, 3]).map(|i| i.to_vec()).collect();
        assert_eq!(
            got,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn counts() {
        assert_eq!(Odometer::new(&[4, 1, 5]).count(), 20);
        assert_eq!(Odometer::new(&[4, 0, 5]).count(), 0);
        assert_eq!(Odometer::new(&[]).count(), 1);
    }

    #[test]
    fn advance_carries() {
        let sizes = [2, 2];
        let mut index = [0, 1];
        assert!(advance(&mut index, &sizes));
        assert_eq!(index, [1, 0]);
        assert!(advance(&mut index, &sizes));
        assert!(!advance(&mut index, &sizes));
        assert_eq!(index, [0, 0]);
    }

    #[test]
    fn advance_rejects_mismatched_lengths() {
        let mut index = [1, 0];
        assert!(!advance(&mut index, &[3]));
        assert_eq!(index, [1, 0]);
        assert!(!advance(&mut index, &[3, 3, 3]));
        assert_eq!(index, [1, 0]);
    }
}
