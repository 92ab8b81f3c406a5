//! Runtime registry for user-defined (`Custom`) block and compression
//! kinds.
//!
//! `framecodec_format::BlockKind::Custom` and `CompressionKind::Custom`
//! carry only wire metadata (a name, and an optional fixed byte length);
//! the actual encode/decode or compress/decompress behavior is registered
//! here by name and looked up during entry encode/decode. A `Custom` kind
//! encountered with no matching registration is an `UnsupportedType` error.

use framecodec_format::{CompressionKind, FrameCodecError, Result, Value};
use std::collections::HashMap;

type BlockEncodeFn = Box<dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync>;
type BlockDecodeFn = Box<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;
type CompressFn = Box<dyn Fn(&Value, &Value) -> Result<Vec<u8>> + Send + Sync>;
type DecompressFn = Box<dyn Fn(&Value, &[u8]) -> Result<Value> + Send + Sync>;

struct CustomBlock {
    fixed_byte_length: Option<usize>,
    encode: BlockEncodeFn,
    decode: BlockDecodeFn,
}

struct CustomCompression {
    p_frame_byte_length: usize,
    compress: CompressFn,
    decompress: DecompressFn,
}

/// Holds encode/decode (and compress/decompress) behavior for every
/// `Custom` block/compression kind name a schema may reference.
#[derive(Default)]
pub struct ExtensionRegistry {
    blocks: HashMap<String, CustomBlock>,
    compressions: HashMap<String, CustomCompression>,
}

impl ExtensionRegistry {
    /// An empty registry; any `Custom` kind encountered will error.
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    /// Register a custom block kind's wire behavior.
    pub fn register_block(
        &mut self,
        name: impl Into<String>,
        fixed_byte_length: Option<usize>,
        encode: impl Fn(&Value) -> Result<Vec<u8>> + Send + Sync + 'static,
        decode: impl Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    ) {
        self.blocks.insert(
            name.into(),
            CustomBlock {
                fixed_byte_length,
                encode: Box::new(encode),
                decode: Box::new(decode),
            },
        );
    }

    /// Register a custom compression kind's wire behavior.
    pub fn register_compression(
        &mut self,
        name: impl Into<String>,
        p_frame_byte_length: usize,
        compress: impl Fn(&Value, &Value) -> Result<Vec<u8>> + Send + Sync + 'static,
        decompress: impl Fn(&Value, &[u8]) -> Result<Value> + Send + Sync + 'static,
    ) {
        self.compressions.insert(
            name.into(),
            CustomCompression {
                p_frame_byte_length,
                compress: Box::new(compress),
                decompress: Box::new(decompress),
            },
        );
    }

    pub(crate) fn encode_block(&self, name: &str, value: &Value) -> Result<Vec<u8>> {
        let entry = self
            .blocks
            .get(name)
            .ok_or_else(|| FrameCodecError::UnsupportedType(format!("no block extension registered for `{name}`")))?;
        let bytes = (entry.encode)(value)?;
        if let Some(expected) = entry.fixed_byte_length {
            if bytes.len() != expected {
                return Err(FrameCodecError::LengthMismatch {
                    what: format!("custom block `{name}`"),
                    expected,
                    actual: bytes.len(),
                });
            }
        }
        Ok(bytes)
    }

    pub(crate) fn decode_block(&self, name: &str, bytes: &[u8]) -> Result<Value> {
        let entry = self
            .blocks
            .get(name)
            .ok_or_else(|| FrameCodecError::UnsupportedType(format!("no block extension registered for `{name}`")))?;
        (entry.decode)(bytes)
    }

    pub(crate) fn block_fixed_byte_length(&self, name: &str) -> Option<Option<usize>> {
        self.blocks.get(name).map(|b| b.fixed_byte_length)
    }

    pub(crate) fn compression_p_frame_byte_length(&self, name: &str) -> Option<usize> {
        self.compressions.get(name).map(|c| c.p_frame_byte_length)
    }

    pub(crate) fn compress(&self, kind: &CompressionKind, prev: &Value, curr: &Value) -> Result<Vec<u8>> {
        let CompressionKind::Custom { name, .. } = kind else {
            unreachable!("dispatch_compress should only route Custom kinds here")
        };
        let entry = self.compressions.get(name).ok_or_else(|| {
            FrameCodecError::UnsupportedType(format!("no compression extension registered for `{name}`"))
        })?;
        let bytes = (entry.compress)(prev, curr)?;
        if bytes.len() != entry.p_frame_byte_length {
            return Err(FrameCodecError::LengthMismatch {
                what: format!("custom compression `{name}`"),
                expected: entry.p_frame_byte_length,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }

    pub(crate) fn decompress(&self, kind: &CompressionKind, prev: &Value, bytes: &[u8]) -> Result<Value> {
        let CompressionKind::Custom { name, .. } = kind else {
            unreachable!("dispatch_decompress should only route Custom kinds here")
        };
        let entry = self.compressions.get(name).ok_or_else(|| {
            FrameCodecError::UnsupportedType(format!("no compression extension registered for `{name}`"))
        })?;
        (entry.decompress)(prev, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_block_round_trips() {
        let mut registry = ExtensionRegistry::new();
        registry.register_block(
            "Widget",
            Some(2),
            |v| match v {
                Value::U16(n) => Ok(n.to_le_bytes().to_vec()),
                _ => Err(FrameCodecError::UnsupportedType("expected U16".to_string())),
            },
            |bytes| Ok(Value::U16(u16::from_le_bytes(bytes.try_into().unwrap()))),
        );
        let bytes = registry.encode_block("Widget", &Value::U16(7)).unwrap();
        assert_eq!(registry.decode_block("Widget", &bytes).unwrap(), Value::U16(7));
    }

    #[test]
    fn unregistered_block_errors() {
        let registry = ExtensionRegistry::new();
        assert!(registry.encode_block("Missing", &Value::U8(1)).is_err());
    }
}
