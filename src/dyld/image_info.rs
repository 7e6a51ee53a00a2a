//! `dyld_cache_image_info` records.

use std::fmt;

use crate::error::Result;
use crate::macho::DATA_TYPE_CATEGORY;
use crate::reader::{Endian, StreamReader};
use crate::types::{Describe, PrimitiveKind, StructDescriptor};

/// Location and identity of one dylib in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DyldCacheImageInfo {
    address: u64,
    mod_time: u64,
    inode: u64,
    path_file_offset: u32,
    pad: u32,
}

impl DyldCacheImageInfo {
    /// Name of the structure in `dyld_cache_format.h`.
    pub const NAME: &'static str = "dyld_cache_image_info";

    /// On-disk size in bytes.
    pub const SIZE: usize = 32;

    /// Decodes a record from `reader`, which must be positioned at its first byte.
    pub fn read<R: StreamReader + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            address: reader.read_next_u64()?,
            mod_time: reader.read_next_u64()?,
            inode: reader.read_next_u64()?,
            path_file_offset: reader.read_next_u32()?,
            pad: reader.read_next_u32()?,
        })
    }

    /// Decodes `count` consecutive records.
    pub fn read_array<R: StreamReader + ?Sized>(reader: &mut R, count: usize) -> Result<Vec<Self>> {
        (0..count).map(|_| Self::read(reader)).collect()
    }

    /// Appends the on-disk encoding of this record to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>, endian: Endian) {
        endian.write_u64(out, self.address);
        endian.write_u64(out, self.mod_time);
        endian.write_u64(out, self.inode);
        endian.write_u32(out, self.path_file_offset);
        endian.write_u32(out, self.pad);
    }

    /// Unslid address of the image's Mach-O header.
    #[inline]
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Modification time of the original dylib.
    #[inline]
    pub fn mod_time(&self) -> u64 {
        self.mod_time
    }

    /// Inode of the original dylib.
    #[inline]
    pub fn inode(&self) -> u64 {
        self.inode
    }

    /// File offset of the image's install path string.
    #[inline]
    pub fn path_file_offset(&self) -> u32 {
        self.path_file_offset
    }

    /// Padding word, normally zero.
    #[inline]
    pub fn pad(&self) -> u32 {
        self.pad
    }
}

impl Describe for DyldCacheImageInfo {
    fn describe() -> StructDescriptor {
        StructDescriptor::new(Self::NAME)
            .add(PrimitiveKind::QWord, "address", "")
            .add(PrimitiveKind::QWord, "modTime", "")
            .add(PrimitiveKind::QWord, "inode", "")
            .add(PrimitiveKind::DWord, "pathFileOffset", "")
            .add(PrimitiveKind::DWord, "pad", "")
            .with_category(DATA_TYPE_CATEGORY)
    }
}

impl fmt::Display for DyldCacheImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image @ {:#x}, path offset {:#x}",
            self.address, self.path_file_offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::BinaryReader;

    #[test]
    fn test_decode() {
        let mut data = Vec::new();
        Endian::Little.write_u64(&mut data, 0x1_8000_0000);
        Endian::Little.write_u64(&mut data, 0x5F00_0000);
        Endian::Little.write_u64(&mut data, 42);
        Endian::Little.write_u32(&mut data, 0x1234);
        Endian::Little.write_u32(&mut data, 0);

        let mut reader = BinaryReader::new(&data);
        let info = DyldCacheImageInfo::read(&mut reader).unwrap();
        assert_eq!(info.address(), 0x1_8000_0000);
        assert_eq!(info.mod_time(), 0x5F00_0000);
        assert_eq!(info.inode(), 42);
        assert_eq!(info.path_file_offset(), 0x1234);
        assert_eq!(info.pad(), 0);
        assert_eq!(reader.position(), DyldCacheImageInfo::SIZE as u64);

        let mut out = Vec::new();
        info.write_to(&mut out, Endian::Little);
        assert_eq!(out, data);
    }

    #[test]
    fn test_describe_matches_size() {
        let desc = DyldCacheImageInfo::describe();
        assert_eq!(desc.size(), DyldCacheImageInfo::SIZE);
        assert_eq!(desc.field("pathFileOffset").unwrap().offset, 24);
    }
}
