//! The [`Schema`] type: an ordered list of blocks plus stream-wide metadata.

use crate::binding::RecordBinding;
use crate::block::Block;
use crate::entry::Entry;
use crate::error::{FrameCodecError, Result};
use crate::limits::Limits;
use std::collections::HashSet;

/// Stream-wide I-frame/P-frame cadence. Absence means every entry is an
/// I-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCompression {
    /// Number of entries between I-frames, inclusive of the I-frame itself.
    /// Must be at least 2 (a value of 1 would make every entry an I-frame,
    /// which is equivalent to omitting `StreamCompression` altogether).
    pub i_frame_interval: u32,
}

impl StreamCompression {
    /// Construct stream compression with the given cadence.
    pub fn new(i_frame_interval: u32) -> Result<Self> {
        if i_frame_interval < 2 {
            return Err(FrameCodecError::InvalidSchema(format!(
                "i_frame_interval must be >= 2, got {i_frame_interval}"
            )));
        }
        Ok(StreamCompression { i_frame_interval })
    }
}

/// A fixed-length block of caller-defined bytes written once, immediately
/// after the version byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomHeader {
    /// Declared byte length; `info` must have exactly this many bytes.
    pub byte_length: usize,
    /// The header bytes themselves.
    pub info: Vec<u8>,
}

impl CustomHeader {
    /// Construct a custom header, validating `info.len() == byte_length`.
    pub fn new(byte_length: usize, info: Vec<u8>) -> Result<Self> {
        if info.len() != byte_length {
            return Err(FrameCodecError::CustomInfoLengthMismatch {
                declared: byte_length,
                actual: info.len(),
            });
        }
        Ok(CustomHeader { byte_length, info })
    }
}

/// An ordered list of blocks, a version byte, and optional stream-wide
/// metadata. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    version: u8,
    blocks: Vec<Block>,
    stream_compression: Option<StreamCompression>,
    custom_header: Option<CustomHeader>,
}

impl Schema {
    /// Construct a schema from blocks in declaration order, validating the
    /// `index`/`property_name` uniqueness invariants.
    ///
    /// `blocks` need not be pre-sorted by `index`; declaration order only
    /// matters for tie-breaking when [`Self::from_record_metadata`] derives
    /// indices automatically. Here every `Block::index` is taken as
    /// authoritative and must already be unique.
    pub fn new(
        version: u8,
        blocks: Vec<Block>,
        stream_compression: Option<StreamCompression>,
        custom_header: Option<CustomHeader>,
    ) -> Result<Self> {
        Self::new_with_limits(
            version,
            blocks,
            stream_compression,
            custom_header,
            &Limits::default(),
        )
    }

    /// Same as [`Self::new`], checking block count against `limits` as well
    /// as the schema's own structural invariants.
    pub fn new_with_limits(
        version: u8,
        blocks: Vec<Block>,
        stream_compression: Option<StreamCompression>,
        custom_header: Option<CustomHeader>,
        limits: &Limits,
    ) -> Result<Self> {
        limits.check_block_count(blocks.len())?;
        if let Some(header) = &custom_header {
            limits.check_custom_header_len(header.byte_length)?;
        }

        let mut seen_indices = HashSet::with_capacity(blocks.len());
        let mut seen_names = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            if !seen_indices.insert(block.index) {
                return Err(FrameCodecError::InvalidSchema(format!(
                    "duplicate block index {}",
                    block.index
                )));
            }
            if block.property_name.is_empty() {
                return Err(FrameCodecError::InvalidSchema(
                    "block property_name must not be empty".to_string(),
                ));
            }
            if !seen_names.insert(block.property_name.clone()) {
                return Err(FrameCodecError::InvalidSchema(format!(
                    "duplicate property_name `{}`",
                    block.property_name
                )));
            }
        }

        let mut blocks = blocks;
        blocks.sort_by_key(|b| b.index);

        for (position, block) in blocks.iter().enumerate() {
            if block.index != position {
                return Err(FrameCodecError::InvalidSchema(format!(
                    "block indices must be dense, starting at 0: expected index {position}, found {}",
                    block.index
                )));
            }
        }

        Ok(Schema {
            version,
            blocks,
            stream_compression,
            custom_header,
        })
    }

    /// Build a schema from an ordered record-field descriptor list: ties in
    /// declaration order break by position, and that position becomes the
    /// authoritative `index`. Mirrors deriving a schema straight from a
    /// record's field declaration order instead of explicit indices.
    pub fn from_record_metadata(
        version: u8,
        fields_in_declaration_order: Vec<Block>,
        stream_compression: Option<StreamCompression>,
        custom_header: Option<CustomHeader>,
    ) -> Result<Self> {
        let reindexed = fields_in_declaration_order
            .into_iter()
            .enumerate()
            .map(|(i, mut block)| {
                block.index = i;
                block
            })
            .collect();
        Self::new(version, reindexed, stream_compression, custom_header)
    }

    /// The schema's version byte.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Blocks in ascending `index` order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Stream-wide I-frame cadence, if any.
    pub fn stream_compression(&self) -> Option<StreamCompression> {
        self.stream_compression
    }

    /// Custom header descriptor, if any.
    pub fn custom_header(&self) -> Option<&CustomHeader> {
        self.custom_header.as_ref()
    }

    /// Default version check: `v == self.version()`. Override points live in
    /// [`crate::multi_version::MultiVersionSchema`] for dispatch across
    /// several schemas.
    pub fn validate_version(&self, v: u8) -> bool {
        v == self.version
    }

    /// Read each block's `property_name` out of `record` via `binding`,
    /// producing an `Entry` in block-index order.
    pub fn cast_to_entry<T>(&self, record: &T, binding: &RecordBinding<T>) -> Result<Entry> {
        let values = self
            .blocks
            .iter()
            .map(|block| binding.get(&block.property_name, record))
            .collect::<Result<Vec<_>>>()?;
        Ok(Entry::new(values))
    }

    /// Inverse of [`Self::cast_to_entry`]: write `entry`'s values back into
    /// a fresh `record` via `binding`.
    pub fn cast_from_entry<T: Default>(&self, entry: &Entry, binding: &RecordBinding<T>) -> Result<T> {
        let mut record = T::default();
        for (block, value) in self.blocks.iter().zip(entry.values().iter().cloned()) {
            binding.set(&block.property_name, &mut record, value)?;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Primitive;

    #[test]
    fn rejects_duplicate_index() {
        let blocks = vec![
            Block::numeric(0, "x", Primitive::U8),
            Block::numeric(0, "y", Primitive::U8),
        ];
        assert!(Schema::new(1, blocks, None, None).is_err());
    }

    #[test]
    fn rejects_duplicate_property_name() {
        let blocks = vec![
            Block::numeric(0, "x", Primitive::U8),
            Block::numeric(1, "x", Primitive::U8),
        ];
        assert!(Schema::new(1, blocks, None, None).is_err());
    }

    #[test]
    fn sorts_blocks_by_index() {
        let blocks = vec![
            Block::numeric(2, "t", Primitive::U8),
            Block::numeric(0, "x", Primitive::U8),
            Block::numeric(1, "y", Primitive::U8),
        ];
        let schema = Schema::new(1, blocks, None, None).unwrap();
        let names: Vec<&str> = schema.blocks().iter().map(|b| b.property_name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "t"]);
    }

    #[test]
    fn from_record_metadata_assigns_indices_by_position() {
        let blocks = vec![
            Block::numeric(99, "x", Primitive::U8),
            Block::numeric(99, "y", Primitive::U8),
        ];
        let schema = Schema::from_record_metadata(1, blocks, None, None).unwrap();
        assert_eq!(schema.blocks()[0].index, 0);
        assert_eq!(schema.blocks()[1].index, 1);
    }

    #[test]
    fn stream_compression_rejects_interval_below_two() {
        assert!(StreamCompression::new(1).is_err());
        assert!(StreamCompression::new(0).is_err());
        assert!(StreamCompression::new(2).is_ok());
    }

    #[test]
    fn custom_header_validates_length() {
        assert!(CustomHeader::new(4, vec![1, 2, 3]).is_err());
        assert!(CustomHeader::new(4, vec![1, 2, 3, 4]).is_ok());
    }

    #[test]
    fn validate_version_default_is_exact_match() {
        let schema = Schema::new(5, vec![], None, None).unwrap();
        assert!(schema.validate_version(5));
        assert!(!schema.validate_version(6));
    }
}
