//! `dyld_cache_mapping_info` records.

use std::fmt;

use crate::error::Result;
use crate::macho::DATA_TYPE_CATEGORY;
use crate::reader::{Endian, StreamReader};
use crate::types::{Describe, PrimitiveKind, StructDescriptor};

/// One region of the cache file and where it is mapped in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DyldCacheMappingInfo {
    address: u64,
    size: u64,
    file_offset: u64,
    max_prot: u32,
    init_prot: u32,
}

impl DyldCacheMappingInfo {
    /// Name of the structure in `dyld_cache_format.h`.
    pub const NAME: &'static str = "dyld_cache_mapping_info";

    /// On-disk size in bytes.
    pub const SIZE: usize = 32;

    /// Decodes a record from `reader`, which must be positioned at its first byte.
    pub fn read<R: StreamReader + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            address: reader.read_next_u64()?,
            size: reader.read_next_u64()?,
            file_offset: reader.read_next_u64()?,
            max_prot: reader.read_next_u32()?,
            init_prot: reader.read_next_u32()?,
        })
    }

    /// Decodes `count` consecutive records.
    pub fn read_array<R: StreamReader + ?Sized>(reader: &mut R, count: usize) -> Result<Vec<Self>> {
        (0..count).map(|_| Self::read(reader)).collect()
    }

    /// Appends the on-disk encoding of this record to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>, endian: Endian) {
        endian.write_u64(out, self.address);
        endian.write_u64(out, self.size);
        endian.write_u64(out, self.file_offset);
        endian.write_u32(out, self.max_prot);
        endian.write_u32(out, self.init_prot);
    }

    /// Virtual memory address of the mapping.
    #[inline]
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Size of the mapping in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// File offset of the mapping's data.
    #[inline]
    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    /// Maximum VM protection.
    #[inline]
    pub fn max_prot(&self) -> u32 {
        self.max_prot
    }

    /// Initial VM protection.
    #[inline]
    pub fn init_prot(&self) -> u32 {
        self.init_prot
    }

    /// Returns true if `addr` falls inside this mapping.
    #[inline]
    pub fn contains_addr(&self, addr: u64) -> bool {
        addr >= self.address && addr - self.address < self.size
    }
}

impl Describe for DyldCacheMappingInfo {
    fn describe() -> StructDescriptor {
        StructDescriptor::new(Self::NAME)
            .add(PrimitiveKind::QWord, "address", "")
            .add(PrimitiveKind::QWord, "size", "")
            .add(PrimitiveKind::QWord, "fileOffset", "")
            .add(PrimitiveKind::DWord, "maxProt", "")
            .add(PrimitiveKind::DWord, "initProt", "")
            .with_category(DATA_TYPE_CATEGORY)
    }
}

impl fmt::Display for DyldCacheMappingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}-{:#x} @ file {:#x} (prot {}/{})",
            self.address,
            self.address.wrapping_add(self.size),
            self.file_offset,
            self.init_prot,
            self.max_prot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::BinaryReader;

    #[test]
    fn test_decode_and_contains() {
        let mut data = Vec::new();
        Endian::Little.write_u64(&mut data, 0x1000);
        Endian::Little.write_u64(&mut data, 0x1000);
        Endian::Little.write_u64(&mut data, 0x0);
        Endian::Little.write_u32(&mut data, 7);
        Endian::Little.write_u32(&mut data, 5);

        let mapping = DyldCacheMappingInfo::read(&mut BinaryReader::new(&data)).unwrap();
        assert_eq!(mapping.max_prot(), 7);
        assert_eq!(mapping.init_prot(), 5);
        assert!(mapping.contains_addr(0x1000));
        assert!(mapping.contains_addr(0x1FFF));
        assert!(!mapping.contains_addr(0x2000));
        assert!(!mapping.contains_addr(0x0FFF));
    }

    #[test]
    fn test_describe_matches_size() {
        let desc = DyldCacheMappingInfo::describe();
        assert_eq!(desc.size(), DyldCacheMappingInfo::SIZE);
        assert_eq!(desc.field_at_offset(0x18).unwrap().name, "maxProt");
    }
}
