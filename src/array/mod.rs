//! Rank-flexible, element-type-flexible dense arrays.
//!
//! [`TypedMultiArray`] is a row-major container whose rank (`0..=MAX_RANK`) and element type
//! ([`ElementType`]) are chosen at runtime. Construction is two-phase: describe the shape,
//! then [`TypedMultiArray::allocate`]. Elements are read and written through any caller
//! numeric type implementing [`Scalar`], converted to and from the native element type.
//!
//! ## Lifecycle
//! The array is a small state machine (see [`ArrayState`]):
//! - `Unconfigured`: rank and element type known, extents not yet supplied (they read as 0)
//! - `Configured`: extents supplied with [`TypedMultiArray::set_sizes`]
//! - `Allocated`: storage present; rank, element type and extents are frozen
//!
//! [`TypedMultiArray::deallocate`] returns an allocated array to the state it was allocated
//! from, so the same handle can be reshaped and allocated again.
//!
//! ## Typing model
//! Storage is a closed tagged variant ([`Storage`]) with one typed buffer per element type.
//! Each access converts through [`value::Value`] exactly once per direction, selected by the
//! storage variant, so call sites never branch on the element type themselves.
//!
//! ## Examples
//! ```rust
//! use multidim::{ElementType, TypedMultiArray};
//!
//! let mut array = TypedMultiArray::create_empty(3, ElementType::UnsignedByte).unwrap();
//! array.set_sizes(&[1, 1, 1]).unwrap();
//! array.allocate().unwrap();
//! array.set(&[0, 0, 0], 10).unwrap();
//! assert_eq!(array.get::<i32>(&[0, 0, 0]).unwrap(), 10);
//! ```
use ndarray::{ArrayBase, ArrayViewD, ArrayViewMutD, Data, Dimension, IxDyn};

use crate::{
    array::{
        datatype::Element,
        error::{MultidimError, Result},
        storage::Storage,
        util::Shape,
        value::Scalar,
    },
    consts::{MAX_RANK, UNUSED_EXTENT},
    dtype::ElementType,
};

pub mod datatype;
pub mod error;
pub mod hyperslab;
pub mod odometer;
pub mod reorder;
pub mod storage;
pub mod util;
pub mod value;

/// Observable lifecycle state of a [`TypedMultiArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayState {
    Unconfigured,
    Configured,
    Allocated,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Unconfigured,
    Configured,
    Allocated {
        storage: Storage,
        strides: Shape,
        /// Phase to return to on deallocation.
        configured: bool,
    },
}

/// A dense, row-major array with runtime rank and element type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMultiArray {
    element_type: ElementType,
    sizes: Shape,
    phase: Phase,
}

impl Default for TypedMultiArray {
    /// An unallocated rank-0 unsigned byte array.
    fn default() -> Self {
        Self {
            element_type: ElementType::UnsignedByte,
            sizes: Shape::new(),
            phase: Phase::Unconfigured,
        }
    }
}

fn check_rank(rank: usize) -> Result<()> {
    if rank > MAX_RANK {
        return Err(MultidimError::InvalidRank {
            rank,
            max: MAX_RANK,
        });
    }
    Ok(())
}

impl TypedMultiArray {
    /// Create an unallocated array with every extent set to 0.
    ///
    /// # Errors
    /// [`MultidimError::InvalidRank`] if `rank > MAX_RANK`.
    pub fn create_empty(rank: usize, element_type: ElementType) -> Result<Self> {
        check_rank(rank)?;
        Ok(Self {
            element_type,
            sizes: Shape::from_elem(0, rank),
            phase: Phase::Unconfigured,
        })
    }

    /// Create, shape and allocate an array in one step.
    ///
    /// Nothing is returned unless every step succeeds.
    ///
    /// # Errors
    /// [`MultidimError::InvalidRank`], [`MultidimError::RankMismatch`] when
    /// `extents.len() != rank`, or [`MultidimError::AllocationFailed`].
    pub fn create_with_shape(
        rank: usize,
        extents: &[usize],
        element_type: ElementType,
    ) -> Result<Self> {
        let mut array = Self::create_empty(rank, element_type)?;
        array.set_sizes(extents)?;
        array.allocate()?;
        Ok(array)
    }

    /// Like [`Self::create_with_shape`] for extents taken from signed header fields.
    ///
    /// # Errors
    /// [`MultidimError::InvalidExtent`] for a negative extent, plus the errors of
    /// [`Self::create_with_shape`].
    pub fn create_with_signed_shape(extents: &[i64], element_type: ElementType) -> Result<Self> {
        check_rank(extents.len())?;
        let extents = util::extents_from_signed(extents)?;
        Self::create_with_shape(extents.len(), &extents, element_type)
    }

    /// Build an allocated array holding a copy of `array`, in logical (row-major) order.
    ///
    /// Any memory layout is accepted; the elements are copied.
    pub fn from_ndarray<T, S, D>(array: &ArrayBase<S, D>) -> Result<Self>
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        check_rank(array.ndim())?;
        let data: Vec<T> = array.iter().copied().collect();
        let sizes = Shape::from_slice(array.shape());
        Ok(Self::from_parts(sizes, T::into_storage(data), true))
    }

    /// Assemble an allocated array from a shape and a buffer of matching length.
    pub(crate) fn from_parts(sizes: Shape, storage: Storage, configured: bool) -> Self {
        debug_assert_eq!(util::num_elements(&sizes), Some(storage.len()));
        let strides = util::row_major_strides(&sizes);
        Self {
            element_type: storage.element_type(),
            sizes,
            phase: Phase::Allocated {
                storage,
                strides,
                configured,
            },
        }
    }

    fn require_unallocated(&self) -> Result<()> {
        match self.phase {
            Phase::Allocated { .. } => Err(MultidimError::AlreadyAllocated),
            _ => Ok(()),
        }
    }

    /// Change the rank. Extents reset to 0.
    pub fn set_rank(&mut self, rank: usize) -> Result<()> {
        self.require_unallocated()?;
        check_rank(rank)?;
        self.sizes = Shape::from_elem(0, rank);
        self.phase = Phase::Unconfigured;
        Ok(())
    }

    pub fn set_element_type(&mut self, element_type: ElementType) -> Result<()> {
        self.require_unallocated()?;
        self.element_type = element_type;
        Ok(())
    }

    /// Assign all extents at once.
    ///
    /// # Errors
    /// [`MultidimError::AlreadyAllocated`] if storage exists, [`MultidimError::RankMismatch`]
    /// if `extents.len()` differs from the rank.
    pub fn set_sizes(&mut self, extents: &[usize]) -> Result<()> {
        self.require_unallocated()?;
        if extents.len() != self.sizes.len() {
            return Err(MultidimError::RankMismatch {
                expected: self.sizes.len(),
                actual: extents.len(),
            });
        }
        self.sizes.copy_from_slice(extents);
        self.phase = Phase::Configured;
        Ok(())
    }

    /// Allocate zero-filled storage for the current shape.
    ///
    /// A rank-0 array needs no extents and may be allocated straight after creation; any
    /// other rank must go through [`Self::set_sizes`] first. On failure the array stays
    /// unallocated.
    ///
    /// # Errors
    /// [`MultidimError::AlreadyAllocated`], [`MultidimError::NotConfigured`] for a rank > 0
    /// array without extents, or [`MultidimError::AllocationFailed`] when the element count
    /// or byte size overflows or the allocator refuses the request.
    pub fn allocate(&mut self) -> Result<()> {
        self.require_unallocated()?;
        if matches!(self.phase, Phase::Unconfigured) && !self.sizes.is_empty() {
            return Err(MultidimError::NotConfigured {
                rank: self.sizes.len(),
            });
        }
        let failed = |elements| MultidimError::AllocationFailed {
            elements,
            element_type: self.element_type,
        };

        let elements = util::num_elements(&self.sizes).ok_or_else(|| failed(None))?;
        let byte_len = elements
            .checked_mul(self.element_type.byte_width())
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or_else(|| failed(Some(elements)))?;
        let storage = match Storage::try_zeroed(self.element_type, elements) {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(
                    elements,
                    byte_len,
                    element_type = %self.element_type,
                    error = %e,
                    "multidim allocation failed"
                );
                return Err(failed(Some(elements)));
            }
        };

        tracing::debug!(
            rank = self.sizes.len(),
            sizes = ?self.sizes.as_slice(),
            element_type = %self.element_type,
            byte_len,
            "allocated multidim array"
        );
        let configured = matches!(self.phase, Phase::Configured);
        self.phase = Phase::Allocated {
            storage,
            strides: util::row_major_strides(&self.sizes),
            configured,
        };
        Ok(())
    }

    /// Release storage. Does nothing on an unallocated array.
    pub fn deallocate(&mut self) {
        if let Phase::Allocated { configured, .. } = self.phase {
            tracing::debug!(
                sizes = ?self.sizes.as_slice(),
                element_type = %self.element_type,
                "released multidim array"
            );
            self.phase = if configured {
                Phase::Configured
            } else {
                Phase::Unconfigured
            };
        }
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self.phase, Phase::Allocated { .. })
    }

    pub fn state(&self) -> ArrayState {
        match self.phase {
            Phase::Unconfigured => ArrayState::Unconfigured,
            Phase::Configured => ArrayState::Configured,
            Phase::Allocated { .. } => ArrayState::Allocated,
        }
    }

    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Active extents; the slice length equals the rank.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Extent of `dim`, or `None` when `dim` is not in use.
    pub fn extent(&self, dim: usize) -> Option<usize> {
        self.sizes.get(dim).copied()
    }

    /// Extents padded to [`MAX_RANK`] with [`UNUSED_EXTENT`].
    pub fn padded_sizes(&self) -> [usize; MAX_RANK] {
        let mut out = [UNUSED_EXTENT; MAX_RANK];
        out[..self.sizes.len()].copy_from_slice(&self.sizes);
        out
    }

    /// Row-major strides, in elements. Empty while unallocated.
    pub fn strides(&self) -> &[usize] {
        match &self.phase {
            Phase::Allocated { strides, .. } => strides,
            _ => &[],
        }
    }

    /// Element count of the current shape, `None` if it overflows.
    pub fn len(&self) -> Option<usize> {
        util::num_elements(&self.sizes)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Size of the storage in bytes, `0` while unallocated.
    pub fn byte_len(&self) -> usize {
        match &self.phase {
            Phase::Allocated { storage, .. } => storage.len() * self.element_type.byte_width(),
            _ => 0,
        }
    }

    pub(crate) fn storage(&self) -> Result<&Storage> {
        match &self.phase {
            Phase::Allocated { storage, .. } => Ok(storage),
            _ => Err(MultidimError::NotAllocated),
        }
    }

    pub(crate) fn storage_mut(&mut self) -> Result<&mut Storage> {
        match &mut self.phase {
            Phase::Allocated { storage, .. } => Ok(storage),
            _ => Err(MultidimError::NotAllocated),
        }
    }

    /// Check `indices` against the shape and return their linear offset.
    ///
    /// # Errors
    /// [`MultidimError::NotAllocated`], [`MultidimError::RankMismatch`] or
    /// [`MultidimError::IndexOutOfRange`].
    #[inline]
    pub fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        if !self.is_allocated() {
            return Err(MultidimError::NotAllocated);
        }
        util::index_to_offset(&self.sizes, indices)
    }

    /// Read the element at `indices`, converted to `V`.
    #[inline]
    pub fn get<V: Scalar>(&self, indices: &[usize]) -> Result<V> {
        let offset = self.offset_of(indices)?;
        self.get_linear(offset)
    }

    /// Store `value`, converted to the native element type, at `indices`.
    #[inline]
    pub fn set<V: Scalar>(&mut self, indices: &[usize], value: V) -> Result<()> {
        let offset = self.offset_of(indices)?;
        self.set_linear(offset, value)
    }

    /// Read by linear row-major offset.
    ///
    /// # Errors
    /// [`MultidimError::NotAllocated`], or [`MultidimError::OffsetOutOfRange`] when `offset`
    /// is not below the element count.
    #[inline]
    pub fn get_linear<V: Scalar>(&self, offset: usize) -> Result<V> {
        let storage = self.storage()?;
        storage
            .read(offset)
            .map(V::from_value)
            .ok_or(MultidimError::OffsetOutOfRange {
                offset,
                len: storage.len(),
            })
    }

    /// Store by linear row-major offset. Same errors as [`Self::get_linear`].
    #[inline]
    pub fn set_linear<V: Scalar>(&mut self, offset: usize, value: V) -> Result<()> {
        let storage = self.storage_mut()?;
        if storage.write(offset, value.into_value()) {
            Ok(())
        } else {
            Err(MultidimError::OffsetOutOfRange {
                offset,
                len: storage.len(),
            })
        }
    }

    /// Set every element to `value`.
    pub fn fill<V: Scalar>(&mut self, value: V) -> Result<()> {
        self.storage_mut()?.fill(value.into_value());
        Ok(())
    }

    /// All elements in row-major order, converted to `V`.
    pub fn to_vec<V: Scalar>(&self) -> Result<Vec<V>> {
        let storage = self.storage()?;
        Ok((0..storage.len())
            .filter_map(|offset| storage.read(offset))
            .map(V::from_value)
            .collect())
    }

    /// The raw element bytes in row-major order, native endian.
    pub fn to_ne_bytes(&self) -> Result<bytes::Bytes> {
        Ok(self.storage()?.to_ne_bytes())
    }

    /// Overwrite every element from native-endian bytes in row-major order.
    ///
    /// # Errors
    /// [`MultidimError::NotAllocated`], or [`MultidimError::BufferLength`] unless
    /// `bytes.len() == self.byte_len()`.
    pub fn load_ne_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.storage_mut()?
            .load_ne_bytes(bytes)
            .map_err(|expected| MultidimError::BufferLength {
                expected,
                actual: bytes.len(),
            })
    }

    /// Zero-copy `ndarray` view. `T` must be the native element type.
    pub fn as_ndarray<T: Element>(&self) -> Result<ArrayViewD<'_, T>> {
        let slice = T::slice(self.storage()?).ok_or(MultidimError::TypeMismatch {
            expected: T::TYPE,
            actual: self.element_type,
        })?;
        let len = slice.len();
        ArrayViewD::from_shape(IxDyn(&self.sizes), slice).map_err(|_| {
            MultidimError::BufferLength {
                expected: self.len().unwrap_or(usize::MAX),
                actual: len,
            }
        })
    }

    pub fn as_ndarray_mut<T: Element>(&mut self) -> Result<ArrayViewMutD<'_, T>> {
        let element_type = self.element_type;
        let Phase::Allocated { storage, .. } = &mut self.phase else {
            return Err(MultidimError::NotAllocated);
        };
        let slice = T::slice_mut(storage).ok_or(MultidimError::TypeMismatch {
            expected: T::TYPE,
            actual: element_type,
        })?;
        let len = slice.len();
        ArrayViewMutD::from_shape(IxDyn(&self.sizes), slice).map_err(|_| {
            MultidimError::BufferLength {
                expected: util::num_elements(&self.sizes).unwrap_or(usize::MAX),
                actual: len,
            }
        })
    }
}
