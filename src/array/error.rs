use thiserror::Error;

use crate::dtype::ElementType;

/// Errors returned by [`crate::array::TypedMultiArray`] operations.
///
/// Every variant describes a request the caller has to correct; none is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultidimError {
    /// Requested rank is larger than [`crate::consts::MAX_RANK`].
    #[error("invalid rank {rank} (maximum is {max})")]
    InvalidRank { rank: usize, max: usize },
    /// A signed extent was negative.
    #[error("invalid extent {extent} for dimension {dim}")]
    InvalidExtent { dim: usize, extent: i64 },
    /// Shape or type mutation attempted while storage is allocated.
    #[error("array is already allocated")]
    AlreadyAllocated,
    /// Element access attempted before allocation.
    #[error("array is not allocated")]
    NotAllocated,
    /// Allocation requested before the extents of a rank > 0 array were supplied.
    #[error("extents of rank {rank} array have not been set")]
    NotConfigured { rank: usize },
    /// Number of extents or coordinates differs from the rank.
    #[error("rank mismatch: expected {expected} values, got {actual}")]
    RankMismatch { expected: usize, actual: usize },
    /// A coordinate lies outside its extent.
    #[error("index {index} out of range for dimension {dim} (extent {extent})")]
    IndexOutOfRange {
        dim: usize,
        index: usize,
        extent: usize,
    },
    /// A linear offset lies at or past the element count.
    #[error("offset {offset} out of range for {len} elements")]
    OffsetOutOfRange { offset: usize, len: usize },
    /// Storage could not be reserved, or its size overflowed.
    #[error("cannot allocate storage for {element_type} array")]
    AllocationFailed {
        /// `None` when the element count itself overflowed.
        elements: Option<usize>,
        element_type: ElementType,
    },
    /// A caller buffer has the wrong length.
    #[error("wrong buffer length: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },
    /// A typed view was requested with a type other than the array's element type.
    #[error("element type mismatch: array holds {actual}, requested {expected}")]
    TypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },
    /// Axis list is not a permutation of the array's dimensions.
    #[error("axes are not a permutation of 0..{rank}")]
    InvalidAxes { rank: usize },
}

pub type Result<T, E = MultidimError> = std::result::Result<T, E>;
