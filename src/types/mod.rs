//! Structural type descriptors.
//!
//! A descriptor is declarative metadata about a record's on-disk layout:
//! field names, primitive kinds, offsets and widths, plus a category path
//! that groups related types. Descriptors are plain values. Nothing is
//! registered anywhere until the caller hands one to a [`TypeCatalog`].

mod catalog;
mod category;
mod descriptor;

pub use catalog::*;
pub use category::*;
pub use descriptor::*;
