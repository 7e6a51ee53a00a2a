//! Dyld shared cache records.
//!
//! Each record type decodes itself from a [`StreamReader`](crate::reader::StreamReader)
//! positioned at its first byte and describes its own layout through
//! [`Describe`](crate::types::Describe). Locating the records inside a cache
//! file (header fields, accelerator info) is left to the caller.

mod image_info;
mod image_info_extra;
mod mapping_info;

pub use image_info::*;
pub use image_info_extra::*;
pub use mapping_info::*;
