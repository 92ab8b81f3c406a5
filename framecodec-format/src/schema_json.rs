//! Reversible JSON form of a [`Schema`], with an extension hook for
//! user-defined block/compression kinds.

use crate::block::{Block, BlockKind};
use crate::compression::{Compression, CompressionKind};
use crate::constants::{
    COMPRESSION_IFRAME_ONLY, COMPRESSION_NONE, COMPRESSION_NUMERIC_DELTA, KIND_BYTES,
    KIND_NUMERIC, KIND_STRING,
};
use crate::error::{FrameCodecError, Result};
use crate::schema::{CustomHeader, Schema, StreamCompression};
use crate::value::{Primitive, StringEncoding};
use serde_json::{json, Value as Json};

/// Called while serializing a `Custom` block or compression kind; returns
/// the `custom`/`compression_custom` string array to embed, or `None` to
/// fall through to an error (no hook recognized the kind).
pub type BlockSerializeHook<'a> = &'a dyn Fn(&BlockKind) -> Option<Vec<String>>;
/// Called while serializing a `Custom` compression kind.
pub type CompressionSerializeHook<'a> = &'a dyn Fn(&CompressionKind) -> Option<Vec<String>>;
/// Called after built-in block kinds fail to match `kind_name`; returns the
/// reconstructed `Custom` kind, or `None` to fall through to `UnknownKind`.
pub type BlockDeserializeHook<'a> = &'a dyn Fn(&str, &[String]) -> Option<BlockKind>;
/// Called after built-in compression kinds fail to match `kind_name`.
pub type CompressionDeserializeHook<'a> = &'a dyn Fn(&str, &[String]) -> Option<CompressionKind>;

impl Schema {
    /// Serialize this schema to its JSON text form. `block_hook` and
    /// `compression_hook` are consulted only for `Custom` block/compression
    /// kinds; pass `None` if the schema has none.
    pub fn to_json(
        &self,
        block_hook: Option<BlockSerializeHook>,
        compression_hook: Option<CompressionSerializeHook>,
    ) -> Result<String> {
        let blocks: Vec<Json> = self
            .blocks()
            .iter()
            .map(|block| block_to_json(block, block_hook, compression_hook))
            .collect::<Result<_>>()?;

        let root = json!({
            "version": self.version(),
            "stream_compression": self.stream_compression().map(|sc| json!({
                "i_frame_interval": sc.i_frame_interval,
            })),
            "custom_header": self.custom_header().map(|h| json!({
                "byte_length": h.byte_length,
                "info": h.info,
            })),
            "blocks": blocks,
        });
        serde_json::to_string_pretty(&root)
            .map_err(|e| FrameCodecError::MalformedJson(e.to_string()))
    }

    /// Parse a schema back from its JSON text form. `block_hook` and
    /// `compression_hook` are consulted only after a block/compression
    /// `"type"` fails to match a built-in kind.
    pub fn from_json(
        text: &str,
        block_hook: Option<BlockDeserializeHook>,
        compression_hook: Option<CompressionDeserializeHook>,
    ) -> Result<Schema> {
        let root: Json =
            serde_json::from_str(text).map_err(|e| FrameCodecError::MalformedJson(e.to_string()))?;

        let version = root
            .get("version")
            .and_then(Json::as_u64)
            .ok_or_else(|| FrameCodecError::MalformedJson("missing `version`".to_string()))?
            as u8;

        let stream_compression = match root.get("stream_compression") {
            Some(Json::Null) | None => None,
            Some(v) => {
                let interval = v
                    .get("i_frame_interval")
                    .and_then(Json::as_u64)
                    .ok_or_else(|| {
                        FrameCodecError::MalformedJson("missing `i_frame_interval`".to_string())
                    })? as u32;
                Some(StreamCompression::new(interval)?)
            }
        };

        let custom_header = match root.get("custom_header") {
            Some(Json::Null) | None => None,
            Some(v) => {
                let byte_length = v
                    .get("byte_length")
                    .and_then(Json::as_u64)
                    .ok_or_else(|| {
                        FrameCodecError::MalformedJson("missing `byte_length`".to_string())
                    })? as usize;
                let info: Vec<u8> = v
                    .get("info")
                    .and_then(Json::as_array)
                    .ok_or_else(|| FrameCodecError::MalformedJson("missing `info`".to_string()))?
                    .iter()
                    .map(|b| b.as_u64().map(|n| n as u8))
                    .collect::<Option<Vec<u8>>>()
                    .ok_or_else(|| FrameCodecError::MalformedJson("`info` is not bytes".to_string()))?;
                Some(CustomHeader::new(byte_length, info)?)
            }
        };

        let blocks_json = root
            .get("blocks")
            .and_then(Json::as_array)
            .ok_or_else(|| FrameCodecError::MalformedJson("missing `blocks`".to_string()))?;

        let blocks = blocks_json
            .iter()
            .map(|b| block_from_json(b, block_hook, compression_hook))
            .collect::<Result<Vec<_>>>()?;

        Schema::new(version, blocks, stream_compression, custom_header)
    }
}

fn block_to_json(
    block: &Block,
    block_hook: Option<BlockSerializeHook>,
    compression_hook: Option<CompressionSerializeHook>,
) -> Result<Json> {
    let (type_name, custom) = match &block.kind {
        BlockKind::Numeric(prim) => (KIND_NUMERIC, vec![prim.wire_name().to_string()]),
        BlockKind::Bytes => (KIND_BYTES, vec![]),
        BlockKind::String(enc) => (KIND_STRING, vec![enc.wire_name().to_string()]),
        BlockKind::Custom { name, .. } => {
            let custom = block_hook
                .and_then(|hook| hook(&block.kind))
                .ok_or_else(|| {
                    FrameCodecError::UnknownKind(format!(
                        "no serialize hook claimed custom block `{name}`"
                    ))
                })?;
            (name.as_str(), custom)
        }
    };

    let (compression_name, compression_custom) = match &block.compression {
        None => (COMPRESSION_NONE, vec![]),
        Some(Compression {
            kind: CompressionKind::IFrameOnly,
        }) => (COMPRESSION_IFRAME_ONLY, vec![]),
        Some(Compression {
            kind: CompressionKind::NumericDelta { original, delta },
        }) => (
            COMPRESSION_NUMERIC_DELTA,
            vec![original.wire_name().to_string(), delta.wire_name().to_string()],
        ),
        Some(Compression {
            kind: CompressionKind::Custom { name, .. },
        }) => {
            let custom = compression_hook
                .and_then(|hook| hook(&block.compression.as_ref().unwrap().kind))
                .ok_or_else(|| {
                    FrameCodecError::UnknownKind(format!(
                        "no serialize hook claimed custom compression `{name}`"
                    ))
                })?;
            (name.as_str(), custom)
        }
    };

    Ok(json!({
        "type": type_name,
        "index": block.index,
        "property_name": block.property_name,
        "custom": custom,
        "compression": compression_name,
        "compression_custom": compression_custom,
    }))
}

fn block_from_json(
    value: &Json,
    block_hook: Option<BlockDeserializeHook>,
    compression_hook: Option<CompressionDeserializeHook>,
) -> Result<Block> {
    let type_name = str_field(value, "type")?;
    let index = value
        .get("index")
        .and_then(Json::as_u64)
        .ok_or_else(|| FrameCodecError::MalformedJson("block missing `index`".to_string()))?
        as usize;
    let property_name = str_field(value, "property_name")?.to_string();
    let custom = string_array_field(value, "custom")?;

    let kind = match type_name {
        KIND_NUMERIC => {
            let name = custom
                .first()
                .ok_or_else(|| FrameCodecError::MalformedJson("Numeric block missing `custom[0]`".to_string()))?;
            BlockKind::Numeric(Primitive::from_wire_name(name)?)
        }
        KIND_BYTES => BlockKind::Bytes,
        KIND_STRING => {
            let name = custom
                .first()
                .ok_or_else(|| FrameCodecError::MalformedJson("String block missing `custom[0]`".to_string()))?;
            BlockKind::String(StringEncoding::from_wire_name(name)?)
        }
        other => block_hook
            .and_then(|hook| hook(other, &custom))
            .ok_or_else(|| FrameCodecError::UnknownKind(other.to_string()))?,
    };

    let compression_name = str_field(value, "compression")?;
    let compression_custom = string_array_field(value, "compression_custom")?;
    let compression = match compression_name {
        COMPRESSION_NONE => None,
        COMPRESSION_IFRAME_ONLY => Some(Compression {
            kind: CompressionKind::IFrameOnly,
        }),
        COMPRESSION_NUMERIC_DELTA => {
            let original = compression_custom
                .first()
                .ok_or_else(|| FrameCodecError::MalformedJson("NumericDelta missing original".to_string()))?;
            let delta = compression_custom
                .get(1)
                .ok_or_else(|| FrameCodecError::MalformedJson("NumericDelta missing delta".to_string()))?;
            Some(Compression {
                kind: CompressionKind::NumericDelta {
                    original: Primitive::from_wire_name(original)?,
                    delta: Primitive::from_wire_name(delta)?,
                },
            })
        }
        other => {
            let kind = compression_hook
                .and_then(|hook| hook(other, &compression_custom))
                .ok_or_else(|| FrameCodecError::UnknownKind(other.to_string()))?;
            Some(Compression { kind })
        }
    };

    Ok(Block {
        index,
        property_name,
        kind,
        compression,
    })
}

fn str_field<'a>(value: &'a Json, field: &str) -> Result<&'a str> {
    value
        .get(field)
        .and_then(Json::as_str)
        .ok_or_else(|| FrameCodecError::MalformedJson(format!("missing `{field}`")))
}

fn string_array_field(value: &Json, field: &str) -> Result<Vec<String>> {
    value
        .get(field)
        .and_then(Json::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .ok_or_else(|| FrameCodecError::MalformedJson(format!("missing `{field}`")))
}
