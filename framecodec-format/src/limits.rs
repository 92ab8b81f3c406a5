//! Resource bounds enforced by schema construction and stream decoding.

use crate::error::{FrameCodecError, Result};

/// Caller-configurable resource bounds.
///
/// These are an ambient safety concern, not part of the wire format itself:
/// the bytes on the wire don't carry a `Limits`, but a decoder reading
/// untrusted input should be built with one that matches the trust level of
/// the source.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum number of blocks a single `Schema` may declare.
    pub max_blocks_per_schema: usize,
    /// Maximum byte length of any single variable-length (`Bytes`/`String`)
    /// field value before it is decoded.
    pub max_variable_length_payload: usize,
    /// Maximum byte length of a schema's `CustomHeader`.
    pub max_custom_header_len: usize,
    /// Maximum number of entries a `Decoder` will produce from one stream
    /// before forcing termination, guarding against an unbounded or
    /// adversarial input never producing a short read.
    pub max_entries_per_stream: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_blocks_per_schema: 4_096,
            max_variable_length_payload: 16 * 1024 * 1024,
            max_custom_header_len: 1024 * 1024,
            max_entries_per_stream: 10_000_000,
        }
    }
}

impl Limits {
    /// Permissive bounds for trusted, locally generated input — used by
    /// test tooling and examples.
    pub fn unbounded() -> Self {
        Self {
            max_blocks_per_schema: usize::MAX,
            max_variable_length_payload: usize::MAX,
            max_custom_header_len: usize::MAX,
            max_entries_per_stream: usize::MAX,
        }
    }

    /// Check a schema's block count against [`Self::max_blocks_per_schema`].
    pub fn check_block_count(&self, count: usize) -> Result<()> {
        if count > self.max_blocks_per_schema {
            return Err(FrameCodecError::LimitExceeded(format!(
                "schema declares {count} blocks, exceeding max_blocks_per_schema={}",
                self.max_blocks_per_schema
            )));
        }
        Ok(())
    }

    /// Check a variable-length payload's size against
    /// [`Self::max_variable_length_payload`].
    pub fn check_variable_length(&self, len: usize) -> Result<()> {
        if len > self.max_variable_length_payload {
            return Err(FrameCodecError::LimitExceeded(format!(
                "variable-length payload of {len} bytes exceeds max_variable_length_payload={}",
                self.max_variable_length_payload
            )));
        }
        Ok(())
    }

    /// Check a custom header's size against [`Self::max_custom_header_len`].
    pub fn check_custom_header_len(&self, len: usize) -> Result<()> {
        if len > self.max_custom_header_len {
            return Err(FrameCodecError::LimitExceeded(format!(
                "custom header of {len} bytes exceeds max_custom_header_len={}",
                self.max_custom_header_len
            )));
        }
        Ok(())
    }

    /// Check an entry count against [`Self::max_entries_per_stream`].
    pub fn check_entry_count(&self, count: usize) -> Result<()> {
        if count > self.max_entries_per_stream {
            return Err(FrameCodecError::LimitExceeded(format!(
                "stream produced {count} entries, exceeding max_entries_per_stream={}",
                self.max_entries_per_stream
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_reject_oversized_payload() {
        let limits = Limits::default();
        assert!(limits.check_variable_length(limits.max_variable_length_payload + 1).is_err());
        assert!(limits.check_variable_length(limits.max_variable_length_payload).is_ok());
    }

    #[test]
    fn unbounded_accepts_everything() {
        let limits = Limits::unbounded();
        assert!(limits.check_block_count(1_000_000).is_ok());
        assert!(limits.check_variable_length(usize::MAX).is_ok());
    }
}
