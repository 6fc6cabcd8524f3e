use crate::{
    array::{
        TypedMultiArray,
        error::{MultidimError, Result},
        odometer::Odometer,
        util::Shape,
    },
    consts::MAX_RANK,
};

impl TypedMultiArray {
    /// Copy into a new array whose dimension `i` is this array's dimension `axes[i]`.
    ///
    /// Output dimension `i` runs backwards when `flips[i]` is set. The element type is kept.
    ///
    /// # Errors
    /// [`MultidimError::NotAllocated`], [`MultidimError::RankMismatch`] when `axes` or `flips`
    /// is not one entry per dimension, [`MultidimError::InvalidAxes`] unless `axes` is a
    /// permutation of `0..rank`.
    pub fn reordered(&self, axes: &[usize], flips: &[bool]) -> Result<TypedMultiArray> {
        let storage = self.storage()?;
        let rank = self.rank();
        for len in [axes.len(), flips.len()] {
            if len != rank {
                return Err(MultidimError::RankMismatch {
                    expected: rank,
                    actual: len,
                });
            }
        }
        let mut seen = [false; MAX_RANK];
        for &axis in axes {
            if axis >= rank || seen[axis] {
                return Err(MultidimError::InvalidAxes { rank });
            }
            seen[axis] = true;
        }

        let sizes: Shape = axes.iter().map(|&a| self.sizes()[a]).collect();
        let strides: Shape = axes.iter().map(|&a| self.strides()[a]).collect();
        let offsets: Vec<usize> = Odometer::new(&sizes)
            .map(|index| {
                index
                    .iter()
                    .zip(&sizes)
                    .zip(&strides)
                    .zip(flips)
                    .map(|(((&i, &n), &stride), &flip)| {
                        let source = if flip { n - 1 - i } else { i };
                        source * stride
                    })
                    .sum::<usize>()
            })
            .collect();

        Ok(TypedMultiArray::from_parts(sizes, storage.gather(&offsets), true))
    }

    /// All dimensions in reverse order.
    pub fn transposed(&self) -> Result<TypedMultiArray> {
        let axes: Shape = (0..self.rank()).rev().collect();
        let flips = [false; MAX_RANK];
        self.reordered(&axes, &flips[..self.rank()])
    }
}
