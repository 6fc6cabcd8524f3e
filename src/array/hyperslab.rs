//! Rectangular block access.
//!
//! A hyperslab is the block of coordinates `start[d]..start[d] + counts[d]` in every dimension.
//! Blocks are copied to and from flat caller buffers in row-major order, one contiguous run
//! along the last dimension at a time.
use crate::array::{
    TypedMultiArray,
    error::{MultidimError, Result},
    odometer,
    util::Shape,
    value::Scalar,
};

/// Call `visit` with the storage offset of every coordinate of the block, in row-major order.
fn visit_block(
    strides: &[usize],
    start: &[usize],
    counts: &[usize],
    mut visit: impl FnMut(usize),
) {
    if counts.contains(&0) {
        return;
    }
    let Some((&row_len, outer_counts)) = counts.split_last() else {
        visit(0);
        return;
    };
    let row_offset = start[counts.len() - 1];
    let mut index = Shape::from_elem(0, outer_counts.len());
    loop {
        let base: usize = index
            .iter()
            .zip(start)
            .zip(strides)
            .map(|((&i, &s), &stride)| (i + s) * stride)
            .sum::<usize>()
            + row_offset;
        for k in 0..row_len {
            visit(base + k);
        }
        if !odometer::advance(&mut index, outer_counts) {
            break;
        }
    }
}

impl TypedMultiArray {
    /// Validate a block against the shape and return its element count.
    fn check_block(&self, start: &[usize], counts: &[usize]) -> Result<usize> {
        let rank = self.rank();
        for len in [start.len(), counts.len()] {
            if len != rank {
                return Err(MultidimError::RankMismatch {
                    expected: rank,
                    actual: len,
                });
            }
        }
        let blocks = start.iter().zip(counts).zip(self.sizes());
        for (dim, ((&s, &n), &extent)) in blocks.enumerate() {
            match s.checked_add(n) {
                Some(end) if end <= extent => {}
                _ => {
                    return Err(MultidimError::IndexOutOfRange {
                        dim,
                        index: s.saturating_add(n.saturating_sub(1)),
                        extent,
                    });
                }
            }
        }
        Ok(counts.iter().product())
    }

    /// Copy the block at `start` of size `counts` into `out`, converted to `V`.
    ///
    /// # Errors
    /// [`MultidimError::NotAllocated`], [`MultidimError::RankMismatch`],
    /// [`MultidimError::IndexOutOfRange`] when the block leaves the array, or
    /// [`MultidimError::BufferLength`] unless `out.len()` is the product of `counts`.
    pub fn read_hyperslab<V: Scalar>(
        &self,
        start: &[usize],
        counts: &[usize],
        out: &mut [V],
    ) -> Result<()> {
        let storage = self.storage()?;
        let expected = self.check_block(start, counts)?;
        if out.len() != expected {
            return Err(MultidimError::BufferLength {
                expected,
                actual: out.len(),
            });
        }

        let mut slots = out.iter_mut();
        visit_block(self.strides(), start, counts, |offset| {
            if let (Some(slot), Some(value)) = (slots.next(), storage.read(offset)) {
                *slot = V::from_value(value);
            }
        });
        Ok(())
    }

    /// Like [`Self::read_hyperslab`], into a new vector.
    pub fn read_hyperslab_vec<V: Scalar>(
        &self,
        start: &[usize],
        counts: &[usize],
    ) -> Result<Vec<V>> {
        self.storage()?;
        let len = self.check_block(start, counts)?;
        let mut out = vec![V::from_value(0u8.into_value()); len];
        self.read_hyperslab(start, counts, &mut out)?;
        Ok(out)
    }

    /// Store `values` into the block at `start` of size `counts`.
    ///
    /// Same errors as [`Self::read_hyperslab`].
    pub fn write_hyperslab<V: Scalar>(
        &mut self,
        start: &[usize],
        counts: &[usize],
        values: &[V],
    ) -> Result<()> {
        self.storage()?;
        let expected = self.check_block(start, counts)?;
        if values.len() != expected {
            return Err(MultidimError::BufferLength {
                expected,
                actual: values.len(),
            });
        }

        let strides = Shape::from_slice(self.strides());
        let storage = self.storage_mut()?;
        let mut values = values.iter();
        visit_block(&strides, start, counts, |offset| {
            if let Some(&value) = values.next() {
                storage.write(offset, value.into_value());
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::dtype::ElementType;

    use super::*;

    fn ramp(sizes: &[usize], element_type: ElementType) -> TypedMultiArray {
        let mut array =
            TypedMultiArray::create_with_shape(sizes.len(), sizes, element_type).unwrap();
        for offset in 0..array.len().unwrap() {
            array.set_linear(offset, offset).unwrap();
        }
        array
    }

    #[test]
    fn reads_interior_block() {
        let array = ramp(&[3, 4, 5], ElementType::SignedInt);
        let got: Vec<i32> = array.read_hyperslab_vec(&[1, 1, 2], &[2, 2, 3]).unwrap();
        assert_eq!(got, vec![27, 28, 29, 32, 33, 34, 47, 48, 49, 52, 53, 54]);
    }

    #[test]
    fn full_block_matches_linear_order() {
        let array = ramp(&[2, 3, 2], ElementType::Double);
        let got: Vec<f64> = array.read_hyperslab_vec(&[0, 0, 0], &[2, 3, 2]).unwrap();
        assert_eq!(got, array.to_vec::<f64>().unwrap());
    }

    #[test]
    fn write_then_read_block() {
        let mut array = ramp(&[4, 4], ElementType::UnsignedShort);
        array.write_hyperslab(&[2, 1], &[2, 2], &[100u16, 101, 102, 103]).unwrap();
        assert_eq!(array.get::<u16>(&[2, 1]).unwrap(), 100);
        assert_eq!(array.get::<u16>(&[2, 2]).unwrap(), 101);
        assert_eq!(array.get::<u16>(&[3, 1]).unwrap(), 102);
        assert_eq!(array.get::<u16>(&[3, 2]).unwrap(), 103);
        assert_eq!(array.get::<u16>(&[3, 3]).unwrap(), 15);
    }

    #[test]
    fn scalar_and_empty_blocks() {
        let mut scalar = TypedMultiArray::create_with_shape(0, &[], ElementType::Float).unwrap();
        scalar.write_hyperslab(&[], &[], &[1.5f32]).unwrap();
        assert_eq!(scalar.read_hyperslab_vec::<f32>(&[], &[]).unwrap(), vec![1.5]);

        let array = ramp(&[3, 3], ElementType::UnsignedByte);
        assert!(array.read_hyperslab_vec::<u8>(&[1, 3], &[2, 0]).unwrap().is_empty());
    }

    #[test]
    fn rejects_blocks_outside_the_array() {
        let array = ramp(&[3, 3], ElementType::UnsignedByte);
        assert_eq!(
            array.read_hyperslab_vec::<u8>(&[1, 2], &[2, 2]).unwrap_err(),
            MultidimError::IndexOutOfRange {
                dim: 1,
                index: 3,
                extent: 3
            }
        );
        let mut out = [0u8; 3];
        assert_eq!(
            array.read_hyperslab(&[0, 0], &[2, 2], &mut out).unwrap_err(),
            MultidimError::BufferLength {
                expected: 4,
                actual: 3
            }
        );
        assert!(matches!(
            array.read_hyperslab_vec::<u8>(&[0], &[1]),
            Err(MultidimError::RankMismatch { .. })
        ));
    }

    #[test]
    fn requires_allocation() {
        let mut array = TypedMultiArray::create_empty(1, ElementType::UnsignedByte).unwrap();
        array.set_sizes(&[2]).unwrap();
        assert_eq!(
            array.write_hyperslab(&[0], &[2], &[1u8, 2]).unwrap_err(),
            MultidimError::NotAllocated
        );
    }
}
