//! The encoder's byte sink abstraction.

use framecodec_format::Result;

/// Destination for encoded bytes. Implementations live in `framecodec-io`
/// (in-memory buffer, OS file); this crate only depends on the trait so
/// the entry-walking logic stays I/O-backend agnostic.
pub trait Sink {
    /// Write `bytes` in full, or fail.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

impl Sink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}
