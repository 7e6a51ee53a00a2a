//! Endian-aware byte cursors.
//!
//! Record decoders never deal with byte order themselves. They pull scalars
//! through [`StreamReader`], and the reader applies the byte order it was
//! created with. Two readers are provided:
//!
//! - [`BinaryReader`] - bounds-checked cursor over a borrowed slice (a memory
//!   buffer or a memory-mapped cache file)
//! - [`IoReader`] - adapter over any [`std::io::Read`]

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Byte order used for scalar reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Least significant byte first (all shipping dyld caches)
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl Endian {
    #[inline]
    pub(crate) fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(buf),
            Endian::Big => BigEndian::read_u16(buf),
        }
    }

    #[inline]
    pub(crate) fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }

    #[inline]
    pub(crate) fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_u64(buf),
            Endian::Big => BigEndian::read_u64(buf),
        }
    }

    /// Appends `value` to `out` in this byte order.
    #[inline]
    pub fn write_u32(self, out: &mut Vec<u8>, value: u32) {
        let mut buf = [0u8; 4];
        match self {
            Endian::Little => LittleEndian::write_u32(&mut buf, value),
            Endian::Big => BigEndian::write_u32(&mut buf, value),
        }
        out.extend_from_slice(&buf);
    }

    /// Appends `value` to `out` in this byte order.
    #[inline]
    pub fn write_u64(self, out: &mut Vec<u8>, value: u64) {
        let mut buf = [0u8; 8];
        match self {
            Endian::Little => LittleEndian::write_u64(&mut buf, value),
            Endian::Big => BigEndian::write_u64(&mut buf, value),
        }
        out.extend_from_slice(&buf);
    }
}

// =============================================================================
// Stream Reader Trait
// =============================================================================

/// Sequential scalar reads that consume bytes and advance a cursor.
pub trait StreamReader {
    /// Byte order applied to multi-byte reads.
    fn endian(&self) -> Endian;

    /// Current cursor position, in bytes from the start of the stream.
    fn position(&self) -> u64;

    /// Reads the next byte.
    fn read_next_u8(&mut self) -> Result<u8>;

    /// Reads the next unsigned 16-bit value.
    fn read_next_u16(&mut self) -> Result<u16>;

    /// Reads the next unsigned 32-bit value.
    fn read_next_u32(&mut self) -> Result<u32>;

    /// Reads the next unsigned 64-bit value.
    fn read_next_u64(&mut self) -> Result<u64>;
}

impl<R: StreamReader + ?Sized> StreamReader for &mut R {
    fn endian(&self) -> Endian {
        (**self).endian()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn read_next_u8(&mut self) -> Result<u8> {
        (**self).read_next_u8()
    }

    fn read_next_u16(&mut self) -> Result<u16> {
        (**self).read_next_u16()
    }

    fn read_next_u32(&mut self) -> Result<u32> {
        (**self).read_next_u32()
    }

    fn read_next_u64(&mut self) -> Result<u64> {
        (**self).read_next_u64()
    }
}

// =============================================================================
// Slice Reader
// =============================================================================

/// Bounds-checked cursor over a byte slice.
///
/// A read that needs more bytes than remain fails with
/// [`Error::Truncated`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Creates a little-endian reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    /// Creates a reader with an explicit byte order.
    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    /// Total length of the underlying data.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying data is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread tail of the data.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Moves the cursor to an absolute offset. Seeking to the end is allowed.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        match usize::try_from(offset) {
            Ok(pos) if pos <= self.data.len() => {
                self.pos = pos;
                Ok(())
            }
            _ => Err(Error::SeekOutOfBounds {
                offset,
                len: self.data.len() as u64,
            }),
        }
    }

    /// Advances the cursor by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    /// Reads the next `count` bytes as a borrowed slice.
    pub fn read_next_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    #[inline]
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::truncated(self.pos as u64, count, available));
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }
}

impl StreamReader for BinaryReader<'_> {
    #[inline]
    fn endian(&self) -> Endian {
        self.endian
    }

    #[inline]
    fn position(&self) -> u64 {
        self.pos as u64
    }

    #[inline]
    fn read_next_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    fn read_next_u16(&mut self) -> Result<u16> {
        let endian = self.endian;
        self.take(2).map(|b| endian.read_u16(b))
    }

    #[inline]
    fn read_next_u32(&mut self) -> Result<u32> {
        let endian = self.endian;
        self.take(4).map(|b| endian.read_u32(b))
    }

    #[inline]
    fn read_next_u64(&mut self) -> Result<u64> {
        let endian = self.endian;
        self.take(8).map(|b| endian.read_u64(b))
    }
}

// =============================================================================
// std::io Adapter
// =============================================================================

/// Adapts any [`Read`] into a [`StreamReader`].
///
/// End of data is reported as [`Error::Truncated`] with the number of bytes
/// that did arrive. Bytes consumed by a failed read are not rolled back;
/// [`position`](StreamReader::position) counts them.
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    pos: u64,
    endian: Endian,
}

impl<R: Read> IoReader<R> {
    /// Creates a little-endian adapter. `pos` starts at zero.
    pub fn new(inner: R) -> Self {
        Self::with_endian(inner, Endian::Little)
    }

    /// Creates an adapter with an explicit byte order.
    pub fn with_endian(inner: R, endian: Endian) -> Self {
        Self {
            inner,
            pos: 0,
            endian,
        }
    }

    /// Consumes the adapter and returns the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fills `buf` from the inner reader, counting what actually arrived.
    ///
    /// `pos` advances by every byte consumed, including on failure.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let start = self.pos;
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.pos += filled as u64;
                    return Err(Error::Io(err));
                }
            }
        }
        self.pos += filled as u64;

        if filled < buf.len() {
            return Err(Error::truncated(start, buf.len(), filled));
        }
        Ok(())
    }
}

impl<R: Read> StreamReader for IoReader<R> {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn read_next_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn read_next_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(self.endian.read_u16(&buf))
    }

    fn read_next_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(self.endian.read_u32(&buf))
    }

    fn read_next_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(self.endian.read_u64(&buf))
    }
}
