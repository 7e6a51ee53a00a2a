//! dyldinfo - Decoders and layout descriptors for dyld shared cache records.
//!
//! This library decodes fixed-layout records from Apple's dyld shared cache
//! and describes their layout as structural type descriptors that can be
//! registered in a [`TypeCatalog`] to annotate cache memory.
//!
//! # Features
//!
//! - Endian-aware, bounds-checked readers over slices and `std::io::Read`
//! - `dyld_cache_image_info_extra`, `dyld_cache_image_info` and
//!   `dyld_cache_mapping_info` records
//! - Declarative struct descriptors with an explicitly owned catalog
//!
//! # Example
//!
//! ```
//! use dyldinfo::{BinaryReader, Describe, DyldCacheImageInfoExtra, TypeCatalog};
//!
//! fn main() -> dyldinfo::Result<()> {
//!     let data = [0u8; 32];
//!     let mut reader = BinaryReader::new(&data);
//!     let extra = DyldCacheImageInfoExtra::read(&mut reader)?;
//!     assert_eq!(extra.exports_trie_size(), 0);
//!
//!     let mut catalog = TypeCatalog::new();
//!     let desc = catalog.register(DyldCacheImageInfoExtra::describe())?;
//!     assert_eq!(desc.size(), 32);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dyld;
pub mod error;
pub mod macho;
pub mod reader;
pub mod types;

// Re-export main types
pub use dyld::{DyldCacheImageInfo, DyldCacheImageInfoExtra, DyldCacheMappingInfo};
pub use error::{Error, Result};
pub use reader::{BinaryReader, Endian, IoReader, StreamReader};
pub use types::{
    CategoryPath, Describe, FieldDescriptor, PrimitiveKind, StructDescriptor, TypeCatalog,
};

use tracing::debug;

/// Options for decoding a table of image info extra records.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Byte order of the cache
    pub endian: Endian,
    /// Offset of the first record from the start of the data
    pub offset: u64,
    /// Number of consecutive records to decode
    pub count: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            offset: 0,
            count: 1,
        }
    }
}

/// Decodes `options.count` image info extra records starting at `options.offset`.
///
/// # Returns
///
/// Returns every decoded record, or an error if `count` is zero, the offset is
/// out of range, or the data ends before the last record.
pub fn decode_image_info_extras(
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<DyldCacheImageInfoExtra>> {
    if options.count == 0 {
        return Err(Error::InvalidArgument(
            "record count must be at least 1".to_string(),
        ));
    }

    let mut reader = BinaryReader::with_endian(data, options.endian);
    reader.seek(options.offset)?;

    debug!(
        "decoding {} image info extra record(s) at {:#x}",
        options.count, options.offset
    );
    DyldCacheImageInfoExtra::read_array(&mut reader, options.count)
}

/// Builds a catalog containing the descriptors of every record type in this crate.
pub fn dyld_type_catalog() -> Result<TypeCatalog> {
    let mut catalog = TypeCatalog::new();
    catalog.register_type::<DyldCacheMappingInfo>()?;
    catalog.register_type::<DyldCacheImageInfo>()?;
    catalog.register_type::<DyldCacheImageInfoExtra>()?;
    Ok(catalog)
}
