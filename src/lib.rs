//! Dense multidimensional arrays for medical-image volumes.
//!
//! A [`TypedMultiArray`] is shaped at runtime (up to [`consts::MAX_RANK`] dimensions), tagged
//! with an [`ElementType`], allocated once the shape is known, and accessed through any numeric
//! type. Format readers describe the shape after parsing a header, fill the array voxel by voxel
//! (or from a raw buffer), and downstream code reads it back by coordinate or by hyperslab.
pub mod array;
pub mod consts;
pub mod dtype;

pub use array::{
    ArrayState, TypedMultiArray,
    datatype::Element,
    error::{MultidimError, Result},
    odometer::Odometer,
    value::{Scalar, Value},
};
pub use dtype::ElementType;
