/// Largest number of dimensions a [`crate::array::TypedMultiArray`] can carry.
pub const MAX_RANK: usize = 5;

/// Value reported by [`crate::array::TypedMultiArray::padded_sizes`] for dimensions
/// beyond the active rank.
///
/// Only the padded query uses it. [`crate::array::TypedMultiArray::extent`] reports an
/// unused dimension as `None`.
pub const UNUSED_EXTENT: usize = 5;
