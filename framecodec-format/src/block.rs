//! Field descriptors: the `Block` type and its `BlockKind` wire shapes.

use crate::compression::Compression;
use crate::constants::TERMINATOR;
use crate::error::{FrameCodecError, Result};
use crate::value::{Primitive, StringEncoding, Value};

/// The wire shape of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// A fixed-width numeric primitive.
    Numeric(Primitive),
    /// A variable-length, terminator-framed raw byte string.
    Bytes,
    /// A variable-length, terminator-framed string in a declared encoding.
    String(StringEncoding),
    /// A caller-registered block kind, dispatched through the extension
    /// registry in `framecodec-codec`. `fixed_byte_length` is `Some(n)` for
    /// fixed-width custom kinds and `None` for variable-length, in which
    /// case the wire uses the same terminator framing as `Bytes`/`String`.
    Custom {
        /// The `"type"` name stored in schema JSON.
        name: String,
        /// Fixed width in bytes, if this custom kind is fixed-width.
        fixed_byte_length: Option<usize>,
    },
}

impl BlockKind {
    /// `true` if values of this kind are framed with a trailing
    /// [`TERMINATOR`] byte rather than a fixed byte count.
    pub fn is_variable_length(&self) -> bool {
        match self {
            BlockKind::Numeric(_) => false,
            BlockKind::Bytes | BlockKind::String(_) => true,
            BlockKind::Custom {
                fixed_byte_length, ..
            } => fixed_byte_length.is_none(),
        }
    }

    /// Fixed on-wire byte length, for fixed-width kinds only.
    pub fn fixed_byte_length(&self) -> Option<usize> {
        match self {
            BlockKind::Numeric(p) => Some(p.byte_length()),
            BlockKind::Bytes | BlockKind::String(_) => None,
            BlockKind::Custom {
                fixed_byte_length, ..
            } => *fixed_byte_length,
        }
    }
}

/// One field's descriptor: name, index, and wire shape.
///
/// `index` fixes the field's position within an entry's interleaved wire
/// layout; it is independent of `property_name`, which only matters for
/// [`crate::binding::RecordBinding`] lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Zero-based position within the entry, also the wire order.
    pub index: usize,
    /// The record property this field binds to.
    pub property_name: String,
    /// The wire shape.
    pub kind: BlockKind,
    /// If present, P-frame entries encode this field through the
    /// compressor instead of the block codec above.
    pub compression: Option<Compression>,
}

impl Block {
    /// A fixed-width numeric field.
    pub fn numeric(index: usize, property_name: impl Into<String>, primitive: Primitive) -> Self {
        Block {
            index,
            property_name: property_name.into(),
            kind: BlockKind::Numeric(primitive),
            compression: None,
        }
    }

    /// A variable-length raw byte field.
    pub fn bytes(index: usize, property_name: impl Into<String>) -> Self {
        Block {
            index,
            property_name: property_name.into(),
            kind: BlockKind::Bytes,
            compression: None,
        }
    }

    /// A variable-length string field in the given encoding.
    pub fn string(index: usize, property_name: impl Into<String>, encoding: StringEncoding) -> Self {
        Block {
            index,
            property_name: property_name.into(),
            kind: BlockKind::String(encoding),
            compression: None,
        }
    }

    /// Attach a compression descriptor, enabling P-frame delta encoding for
    /// this field.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Encode `value` as this block's I-frame wire bytes, including the
    /// trailing terminator for variable-length kinds. The caller supplies
    /// the encoded payload bytes separately for fixed-width kinds so that
    /// `byte_length()` can be checked before framing.
    pub fn encode_value(&self, value: &Value) -> Result<Vec<u8>> {
        match &self.kind {
            BlockKind::Numeric(prim) => prim.encode(value),
            BlockKind::Bytes => {
                let Value::Bytes(raw) = value else {
                    return Err(FrameCodecError::UnsupportedType(format!(
                        "block `{}` expects Bytes, got {value:?}",
                        self.property_name
                    )));
                };
                Ok(frame_variable_length(raw, &self.property_name)?)
            }
            BlockKind::String(encoding) => {
                let Value::String(text) = value else {
                    return Err(FrameCodecError::UnsupportedType(format!(
                        "block `{}` expects String, got {value:?}",
                        self.property_name
                    )));
                };
                let raw = encoding.encode(text)?;
                Ok(frame_variable_length(&raw, &self.property_name)?)
            }
            BlockKind::Custom { name, .. } => Err(FrameCodecError::UnsupportedType(format!(
                "custom block `{name}` must be dispatched through the extension registry"
            ))),
        }
    }

    /// Decode an I-frame value for this block starting at `bytes[0]`,
    /// returning the value and the number of bytes consumed (including the
    /// terminator for variable-length kinds).
    pub fn decode_value(&self, bytes: &[u8]) -> Result<(Value, usize)> {
        match &self.kind {
            BlockKind::Numeric(prim) => {
                let len = prim.byte_length();
                if bytes.len() < len {
                    return Err(FrameCodecError::LengthMismatch {
                        what: format!("block `{}`", self.property_name),
                        expected: len,
                        actual: bytes.len(),
                    });
                }
                Ok((prim.decode(&bytes[..len])?, len))
            }
            BlockKind::Bytes => {
                let (raw, consumed) = read_variable_length(bytes, &self.property_name)?;
                Ok((Value::Bytes(raw), consumed))
            }
            BlockKind::String(encoding) => {
                let (raw, consumed) = read_variable_length(bytes, &self.property_name)?;
                Ok((Value::String(encoding.decode(&raw)?), consumed))
            }
            BlockKind::Custom { name, .. } => Err(FrameCodecError::UnsupportedType(format!(
                "custom block `{name}` must be dispatched through the extension registry"
            ))),
        }
    }
}

fn frame_variable_length(raw: &[u8], property_name: &str) -> Result<Vec<u8>> {
    if raw.contains(&TERMINATOR) {
        return Err(FrameCodecError::UnsupportedType(format!(
            "block `{property_name}` payload contains the terminator byte 0x00"
        )));
    }
    let mut out = Vec::with_capacity(raw.len() + 1);
    out.extend_from_slice(raw);
    out.push(TERMINATOR);
    Ok(out)
}

fn read_variable_length(bytes: &[u8], property_name: &str) -> Result<(Vec<u8>, usize)> {
    match bytes.iter().position(|&b| b == TERMINATOR) {
        Some(pos) => Ok((bytes[..pos].to_vec(), pos + 1)),
        None => Err(FrameCodecError::LengthMismatch {
            what: format!("block `{property_name}` (unterminated variable-length field)"),
            expected: bytes.len() + 1,
            actual: bytes.len(),
        }),
    }
}
