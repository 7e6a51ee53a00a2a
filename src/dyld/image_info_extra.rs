//! `dyld_cache_image_info_extra` records.
//!
//! One record per image, found in the table referenced by
//! `imagesExtrasOffset`/`imagesExtrasCount` of `dyld_cache_accelerator_info`.
//! Layout (32 bytes, packed):
//!
//! ```text
//! 0x00  u64  exportsTrieAddr
//! 0x08  u64  weakBindingsAddr
//! 0x10  u32  exportsTrieSize
//! 0x14  u32  weakBindingsSize
//! 0x18  u32  dependentsStartArrayIndex
//! 0x1C  u32  reExportsStartArrayIndex
//! ```

use std::fmt;

use tracing::trace;

use crate::error::Result;
use crate::macho::DATA_TYPE_CATEGORY;
use crate::reader::{Endian, StreamReader};
use crate::types::{Describe, PrimitiveKind, StructDescriptor};

/// Extra per-image information from the accelerator tables.
///
/// Values are taken verbatim from the cache. Addresses are not checked
/// against the mappings and sizes are not checked against anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DyldCacheImageInfoExtra {
    exports_trie_addr: u64,
    weak_bindings_addr: u64,
    exports_trie_size: u32,
    weak_bindings_size: u32,
    dependents_start_array_index: u32,
    re_exports_start_array_index: u32,
}

impl DyldCacheImageInfoExtra {
    /// Name of the structure in `dyld_cache_format.h`.
    pub const NAME: &'static str = "dyld_cache_image_info_extra";

    /// On-disk size in bytes.
    pub const SIZE: usize = 32;

    /// Decodes a record from `reader`, which must be positioned at its first byte.
    ///
    /// Consumes exactly [`Self::SIZE`] bytes on success. On failure the
    /// reader is left wherever the failing read left it.
    pub fn read<R: StreamReader + ?Sized>(reader: &mut R) -> Result<Self> {
        let start = reader.position();
        let exports_trie_addr = reader.read_next_u64()?;
        let weak_bindings_addr = reader.read_next_u64()?;
        let exports_trie_size = reader.read_next_u32()?;
        let weak_bindings_size = reader.read_next_u32()?;
        let dependents_start_array_index = reader.read_next_u32()?;
        let re_exports_start_array_index = reader.read_next_u32()?;
        trace!("decoded {} at {:#x}", Self::NAME, start);

        Ok(Self {
            exports_trie_addr,
            weak_bindings_addr,
            exports_trie_size,
            weak_bindings_size,
            dependents_start_array_index,
            re_exports_start_array_index,
        })
    }

    /// Decodes `count` consecutive records.
    ///
    /// Either every record decodes or the whole call fails.
    pub fn read_array<R: StreamReader + ?Sized>(reader: &mut R, count: usize) -> Result<Vec<Self>> {
        (0..count).map(|_| Self::read(reader)).collect()
    }

    /// Appends the on-disk encoding of this record to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>, endian: Endian) {
        endian.write_u64(out, self.exports_trie_addr);
        endian.write_u64(out, self.weak_bindings_addr);
        endian.write_u32(out, self.exports_trie_size);
        endian.write_u32(out, self.weak_bindings_size);
        endian.write_u32(out, self.dependents_start_array_index);
        endian.write_u32(out, self.re_exports_start_array_index);
    }

    /// Returns the on-disk encoding of this record.
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.write_to(&mut out, endian);
        out
    }

    /// Unslid address of the image's export trie.
    #[inline]
    pub fn exports_trie_addr(&self) -> u64 {
        self.exports_trie_addr
    }

    /// Unslid address of the image's weak binding info.
    #[inline]
    pub fn weak_bindings_addr(&self) -> u64 {
        self.weak_bindings_addr
    }

    /// Size of the export trie in bytes.
    #[inline]
    pub fn exports_trie_size(&self) -> u32 {
        self.exports_trie_size
    }

    /// Size of the weak binding info in bytes.
    #[inline]
    pub fn weak_bindings_size(&self) -> u32 {
        self.weak_bindings_size
    }

    /// Index of the image's first entry in the dependents array.
    #[inline]
    pub fn dependents_start_array_index(&self) -> u32 {
        self.dependents_start_array_index
    }

    /// Index of the image's first entry in the re-exports array.
    #[inline]
    pub fn re_exports_start_array_index(&self) -> u32 {
        self.re_exports_start_array_index
    }
}

impl Describe for DyldCacheImageInfoExtra {
    fn describe() -> StructDescriptor {
        StructDescriptor::new(Self::NAME)
            .add(PrimitiveKind::QWord, "exportsTrieAddr", "")
            .add(PrimitiveKind::QWord, "weakBindingsAddr", "")
            .add(PrimitiveKind::DWord, "exportsTrieSize", "")
            .add(PrimitiveKind::DWord, "weakBindingsSize", "")
            .add(PrimitiveKind::DWord, "dependentsStartArrayIndex", "")
            .add(PrimitiveKind::DWord, "reExportsStartArrayIndex", "")
            .with_category(DATA_TYPE_CATEGORY)
    }
}

impl fmt::Display for DyldCacheImageInfoExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exports trie {:#x} ({:#x} bytes), weak bindings {:#x} ({:#x} bytes), \
             dependents @{}, re-exports @{}",
            self.exports_trie_addr,
            self.exports_trie_size,
            self.weak_bindings_addr,
            self.weak_bindings_size,
            self.dependents_start_array_index,
            self.re_exports_start_array_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::reader::{BinaryReader, IoReader};

    static SAMPLE: [u8; 32] = [
        0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, // exportsTrieAddr
        0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, // weakBindingsAddr
        0x01, 0x00, 0x00, 0x00, // exportsTrieSize
        0x02, 0x00, 0x00, 0x00, // weakBindingsSize
        0x03, 0x00, 0x00, 0x00, // dependentsStartArrayIndex
        0x04, 0x00, 0x00, 0x00, // reExportsStartArrayIndex
    ];

    #[test]
    fn test_decode_sample() {
        let mut reader = BinaryReader::new(&SAMPLE);
        let extra = DyldCacheImageInfoExtra::read(&mut reader).unwrap();

        assert_eq!(extra.exports_trie_addr(), 0x1100FFEEDDCCBBAA);
        assert_eq!(extra.weak_bindings_addr(), 0x9988776655443322);
        assert_eq!(extra.exports_trie_size(), 1);
        assert_eq!(extra.weak_bindings_size(), 2);
        assert_eq!(extra.dependents_start_array_index(), 3);
        assert_eq!(extra.re_exports_start_array_index(), 4);
    }

    #[test]
    fn test_decode_big_endian() {
        let mut reader = BinaryReader::with_endian(&SAMPLE, Endian::Big);
        let extra = DyldCacheImageInfoExtra::read(&mut reader).unwrap();

        assert_eq!(extra.exports_trie_addr(), 0xAABBCCDDEEFF0011);
        assert_eq!(extra.exports_trie_size(), 0x01000000);
        assert_eq!(extra.to_bytes(Endian::Big), SAMPLE);
    }

    #[test]
    fn test_round_trip_bytes() {
        let mut buffers = vec![[0x00u8; 32], [0xFFu8; 32], SAMPLE];
        for seed in [5u8, 37, 101, 200] {
            let mut data = [0u8; 32];
            for (i, b) in data.iter_mut().enumerate() {
                *b = (i as u8).wrapping_mul(seed).wrapping_add(seed ^ 0x5A);
            }
            buffers.push(data);
        }

        for data in &buffers {
            for endian in [Endian::Little, Endian::Big] {
                let mut reader = BinaryReader::with_endian(data, endian);
                let extra = DyldCacheImageInfoExtra::read(&mut reader).unwrap();
                assert_eq!(extra.to_bytes(endian), data, "{:?} {:02x?}", endian, data);
            }
        }
    }

    #[test]
    fn test_consumes_exactly_32_bytes() {
        let mut data = vec![0xEEu8; 8];
        data.extend_from_slice(&SAMPLE);
        data.extend_from_slice(&[0x5A; 8]);

        let mut reader = BinaryReader::new(&data);
        reader.seek(8).unwrap();
        DyldCacheImageInfoExtra::read(&mut reader).unwrap();
        assert_eq!(reader.position(), 40);
        assert_eq!(reader.data(), &[0x5A; 8]);
    }

    #[test]
    fn test_truncated_input() {
        for len in [0, 7, 16, 31] {
            let mut reader = BinaryReader::new(&SAMPLE[..len]);
            let err = DyldCacheImageInfoExtra::read(&mut reader).unwrap_err();
            assert!(err.is_truncation(), "len {}: {}", len, err);
        }
    }

    #[test]
    fn test_truncated_io_stream() {
        let mut reader = IoReader::new(&SAMPLE[..31]);
        let err = DyldCacheImageInfoExtra::read(&mut reader).unwrap_err();
        assert!(matches!(err, Error::Truncated { offset: 28, .. }));
    }

    #[test]
    fn test_read_array() {
        let mut data = SAMPLE.to_vec();
        data.extend_from_slice(&[0u8; 32]);

        let extras = DyldCacheImageInfoExtra::read_array(&mut BinaryReader::new(&data), 2).unwrap();
        assert_eq!(extras.len(), 2);
        assert_eq!(extras[0].re_exports_start_array_index(), 4);
        assert_eq!(extras[1], DyldCacheImageInfoExtra::default());

        let err = DyldCacheImageInfoExtra::read_array(&mut BinaryReader::new(&data), 3);
        assert!(err.unwrap_err().is_truncation());
    }

    #[test]
    fn test_describe() {
        let desc = DyldCacheImageInfoExtra::describe();
        assert_eq!(desc.name(), "dyld_cache_image_info_extra");
        assert_eq!(desc.category().to_string(), "/MachO");
        assert_eq!(desc.size(), DyldCacheImageInfoExtra::SIZE);

        let layout: Vec<(&str, PrimitiveKind, usize)> = desc
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.kind, f.offset))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("exportsTrieAddr", PrimitiveKind::QWord, 0),
                ("weakBindingsAddr", PrimitiveKind::QWord, 8),
                ("exportsTrieSize", PrimitiveKind::DWord, 16),
                ("weakBindingsSize", PrimitiveKind::DWord, 20),
                ("dependentsStartArrayIndex", PrimitiveKind::DWord, 24),
                ("reExportsStartArrayIndex", PrimitiveKind::DWord, 28),
            ]
        );
    }

    #[test]
    fn test_describe_is_repeatable() {
        let a = DyldCacheImageInfoExtra::describe();
        let b = DyldCacheImageInfoExtra::describe();
        assert_eq!(a, b);
        assert!(a.same_shape(&b));
    }
}
