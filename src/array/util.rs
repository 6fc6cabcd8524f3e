use smallvec::SmallVec;

use crate::{
    array::error::{MultidimError, Result},
    consts::MAX_RANK,
};

pub type Shape = SmallVec<[usize; MAX_RANK]>;

/// Product of all extents, `1` for an empty shape, `None` on overflow.
///
/// A shape with a zero extent has no elements, whatever its other extents are.
pub fn num_elements(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Row-major strides for `shape`: the last dimension has stride 1.
///
/// Intermediate products saturate. That can only happen when another extent is zero, in which
/// case no coordinate of the shape is addressable.
pub fn row_major_strides(shape: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::from_elem(1, shape.len());
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1].saturating_mul(shape[d + 1]);
    }
    strides
}

/// Linear row-major offset of `index` within `sizes`.
///
/// # Errors
/// [`MultidimError::RankMismatch`] unless there is one coordinate per extent,
/// [`MultidimError::IndexOutOfRange`] for a coordinate at or past its extent.
pub fn index_to_offset(sizes: &[usize], index: &[usize]) -> Result<usize> {
    if index.len() != sizes.len() {
        return Err(MultidimError::RankMismatch {
            expected: sizes.len(),
            actual: index.len(),
        });
    }
    index
        .iter()
        .zip(sizes)
        .enumerate()
        .try_fold(0usize, |offset, (dim, (&i, &extent))| {
            if i >= extent {
                return Err(MultidimError::IndexOutOfRange {
                    dim,
                    index: i,
                    extent,
                });
            }
            Ok(offset.saturating_mul(extent).saturating_add(i))
        })
}

/// Inverse of [`index_to_offset`]: writes the coordinates of `offset` into `index`.
///
/// # Errors
/// [`MultidimError::RankMismatch`] unless `index.len() == sizes.len()`,
/// [`MultidimError::OffsetOutOfRange`] when `offset` is not below the element count.
pub fn offset_to_index(sizes: &[usize], mut offset: usize, index: &mut [usize]) -> Result<()> {
    if index.len() != sizes.len() {
        return Err(MultidimError::RankMismatch {
            expected: sizes.len(),
            actual: index.len(),
        });
    }
    let len = num_elements(sizes).unwrap_or(usize::MAX);
    if offset >= len {
        return Err(MultidimError::OffsetOutOfRange { offset, len });
    }
    // every extent is non-zero past the check above
    for (slot, &extent) in index.iter_mut().zip(sizes).rev() {
        *slot = offset % extent;
        offset /= extent;
    }
    Ok(())
}

/// Validate extents read from signed header fields.
pub fn extents_from_signed(extents: &[i64]) -> Result<Shape> {
    extents
        .iter()
        .enumerate()
        .map(|(dim, &extent)| {
            usize::try_from(extent).map_err(|_| MultidimError::InvalidExtent { dim, extent })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_counts() {
        assert_eq!(num_elements(&[]), Some(1));
        assert_eq!(num_elements(&[2, 3, 4]), Some(24));
        assert_eq!(num_elements(&[5, 0, 7]), Some(0));
        assert_eq!(num_elements(&[usize::MAX, 2]), None);
        assert_eq!(num_elements(&[usize::MAX, 2, 0]), Some(0));
    }

    #[test]
    fn strides_are_row_major() {
        assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(row_major_strides(&[7]).as_slice(), &[1]);
        assert!(row_major_strides(&[]).is_empty());
        assert_eq!(row_major_strides(&[0, usize::MAX, 4])[0], usize::MAX);
    }

    #[test]
    fn offsets_agree_with_strides() {
        let sizes = [3, 5, 2, 4];
        let strides = row_major_strides(&sizes);
        let mut index = [0usize; 4];
        for offset in 0..num_elements(&sizes).unwrap() {
            offset_to_index(&sizes, offset, &mut index).unwrap();
            let by_stride: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
            assert_eq!(by_stride, offset);
            assert_eq!(index_to_offset(&sizes, &index).unwrap(), offset);
        }
    }

    #[test]
    fn scalar_offset_is_zero() {
        assert_eq!(index_to_offset(&[], &[]).unwrap(), 0);
        let mut index: [usize; 0] = [];
        offset_to_index(&[], 0, &mut index).unwrap();
        assert_eq!(
            offset_to_index(&[], 1, &mut index).unwrap_err(),
            MultidimError::OffsetOutOfRange { offset: 1, len: 1 }
        );
    }

    #[test]
    fn zero_extent_has_no_offsets() {
        let mut index = [0usize; 2];
        assert_eq!(
            offset_to_index(&[3, 0], 0, &mut index).unwrap_err(),
            MultidimError::OffsetOutOfRange { offset: 0, len: 0 }
        );
        assert!(offset_to_index(&[usize::MAX, 2, 0], 0, &mut [0; 3]).is_err());
        assert_eq!(
            index_to_offset(&[3, 0], &[1, 0]).unwrap_err(),
            MultidimError::IndexOutOfRange {
                dim: 1,
                index: 0,
                extent: 0
            }
        );
    }

    #[test]
    fn coordinate_count_must_match() {
        assert_eq!(
            index_to_offset(&[], &[1]).unwrap_err(),
            MultidimError::RankMismatch {
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(
            index_to_offset(&[3], &[1, 2]).unwrap_err(),
            MultidimError::RankMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert!(matches!(
            offset_to_index(&[3, 4], 5, &mut [0; 3]),
            Err(MultidimError::RankMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn out_of_range_offsets() {
        let mut index = [0usize; 2];
        assert_eq!(
            offset_to_index(&[3, 4], 12, &mut index).unwrap_err(),
            MultidimError::OffsetOutOfRange { offset: 12, len: 12 }
        );
        offset_to_index(&[3, 4], 11, &mut index).unwrap();
        assert_eq!(index, [2, 3]);
        assert!(matches!(
            index_to_offset(&[3, 4], &[3, 0]),
            Err(MultidimError::IndexOutOfRange { dim: 0, .. })
        ));
    }

    #[test]
    fn signed_extents() {
        assert_eq!(extents_from_signed(&[4, 0, 9]).unwrap().as_slice(), &[4, 0, 9]);
        assert_eq!(
            extents_from_signed(&[4, -1]).unwrap_err(),
            MultidimError::InvalidExtent { dim: 1, extent: -1 }
        );
    }
}
