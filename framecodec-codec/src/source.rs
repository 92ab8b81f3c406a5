//! The decoder's byte source abstraction.

use framecodec_format::Result;

/// Source of bytes to decode. A short read (fewer bytes than requested,
/// including zero) signals end-of-stream; it is never an error at this
/// layer — the entry walker interprets it as "stop iterating".
pub trait Source {
    /// `true` if at least one more byte is available to read.
    fn can_read(&mut self) -> bool;
    /// Read up to `n` bytes. Returns fewer than `n` (possibly zero) at
    /// end-of-stream.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>>;
}

/// An in-memory byte slice cursor, useful directly and as the reference
/// implementation `framecodec-io`'s backends are checked against.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap a byte slice for sequential reading from the start.
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceSource { bytes, pos: 0 }
    }
}

impl Source for SliceSource<'_> {
    fn can_read(&mut self) -> bool {
        self.pos < self.bytes.len()
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let end = (self.pos + n).min(self.bytes.len());
        let chunk = self.bytes[self.pos..end].to_vec();
        self.pos = end;
        Ok(chunk)
    }
}
