//! Entry-level encode/decode: walks a schema's blocks in index order,
//! honoring I-frame/P-frame cadence and dispatching to block or
//! compression codecs per field.

use crate::extension::ExtensionRegistry;
use crate::sink::Sink;
use crate::source::Source;
use framecodec_format::block::BlockKind;
use framecodec_format::compression::CompressionKind;
use framecodec_format::constants::TERMINATOR;
use framecodec_format::{Entry, FrameCodecError, Limits, Result, Schema, Value};

/// Write one entry to `sink`, honoring I-frame (`is_i_frame == true`) or
/// P-frame framing for each block. `prev` is required (and used) only when
/// `is_i_frame` is `false` and at least one block carries compression.
pub fn encode_entry<S: Sink>(
    sink: &mut S,
    schema: &Schema,
    prev: Option<&Entry>,
    is_i_frame: bool,
    entry: &Entry,
    registry: &ExtensionRegistry,
) -> Result<()> {
    for block in schema.blocks() {
        let value = entry.get(block.index).ok_or_else(|| {
            FrameCodecError::InvalidSchema(format!(
                "entry has no value at index {} for block `{}`",
                block.index, block.property_name
            ))
        })?;

        let use_compression = !is_i_frame && block.compression.is_some();
        if use_compression {
            let compression = block.compression.as_ref().unwrap();
            let prev_value = prev
                .and_then(|p| p.get(block.index))
                .ok_or_else(|| {
                    FrameCodecError::InvalidSchema(format!(
                        "P-frame compression on `{}` requires a previous entry",
                        block.property_name
                    ))
                })?;
            let bytes = match &compression.kind {
                CompressionKind::Custom { .. } => registry.compress(&compression.kind, prev_value, value)?,
                _ => compression.compress(prev_value, value)?,
            };
            let expected = expected_p_frame_len(compression, registry)?;
            if bytes.len() != expected {
                return Err(FrameCodecError::LengthMismatch {
                    what: format!("P-frame compression on `{}`", block.property_name),
                    expected,
                    actual: bytes.len(),
                });
            }
            sink.write_bytes(&bytes)?;
        } else {
            let bytes = match &block.kind {
                BlockKind::Custom { name, .. } => registry.encode_block(name, value)?,
                _ => block.encode_value(value)?,
            };
            sink.write_bytes(&bytes)?;
            if block.kind.is_variable_length() {
                // encode_value already appended the terminator for the
                // built-in variable-length kinds; custom kinds that opt
                // into variable length get it here.
                if matches!(block.kind, BlockKind::Custom { .. }) {
                    sink.write_bytes(&[TERMINATOR])?;
                }
            }
        }
    }
    Ok(())
}

/// Read one entry from `source`. Returns `Ok(None)` when the source runs
/// short partway through (or at the very start of) the entry — per the
/// format's contract this is a clean end of iteration, never an error.
pub fn decode_entry<R: Source>(
    source: &mut R,
    schema: &Schema,
    prev: Option<&Entry>,
    is_i_frame: bool,
    limits: &Limits,
    registry: &ExtensionRegistry,
) -> Result<Option<Entry>> {
    let mut values = Vec::with_capacity(schema.blocks().len());

    for block in schema.blocks() {
        let use_compression = !is_i_frame && block.compression.is_some();

        if use_compression {
            let compression = block.compression.as_ref().unwrap();
            let expected = expected_p_frame_len(compression, registry)?;
            let bytes = source.read_bytes(expected)?;
            if bytes.len() != expected {
                return Ok(None);
            }
            let prev_value = prev.and_then(|p| p.get(block.index)).ok_or_else(|| {
                FrameCodecError::InvalidSchema(format!(
                    "P-frame compression on `{}` requires a previous entry",
                    block.property_name
                ))
            })?;
            let value = match &compression.kind {
                CompressionKind::Custom { .. } => registry.decompress(&compression.kind, prev_value, &bytes)?,
                _ => compression.decompress(prev_value, &bytes)?,
            };
            values.push(value);
        } else if block.kind.is_variable_length() {
            let (raw, ok) = read_until_terminator(source, limits)?;
            if !ok {
                return Ok(None);
            }
            let value = decode_variable_length_value(block, &raw, registry)?;
            values.push(value);
        } else {
            let len = fixed_byte_length(block, registry)?;
            let bytes = source.read_bytes(len)?;
            if bytes.len() != len {
                return Ok(None);
            }
            let value = match &block.kind {
                BlockKind::Custom { name, .. } => registry.decode_block(name, &bytes)?,
                _ => block.decode_value(&bytes)?.0,
            };
            values.push(value);
        }
    }

    Ok(Some(Entry::new(values)))
}

fn decode_variable_length_value(
    block: &framecodec_format::Block,
    raw: &[u8],
    registry: &ExtensionRegistry,
) -> Result<Value> {
    match &block.kind {
        BlockKind::Bytes => Ok(Value::Bytes(raw.to_vec())),
        BlockKind::String(encoding) => Ok(Value::String(encoding.decode(raw)?)),
        BlockKind::Custom { name, .. } => registry.decode_block(name, raw),
        BlockKind::Numeric(_) => unreachable!("numeric blocks are never variable-length"),
    }
}

/// Read bytes one at a time until a `0x00` terminator, honoring
/// `limits.max_variable_length_payload`. Returns `(payload, true)` on a
/// clean terminated read, or `(partial, false)` on short read / limit
/// overrun signaling the caller to end iteration (limit overrun is instead
/// surfaced as `LimitExceeded`, a real error — the bool only distinguishes
/// short-read-as-clean-end from success).
fn read_until_terminator<R: Source>(source: &mut R, limits: &Limits) -> Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    loop {
        let chunk = source.read_bytes(1)?;
        if chunk.is_empty() {
            return Ok((buf, false));
        }
        if chunk[0] == TERMINATOR {
            return Ok((buf, true));
        }
        buf.push(chunk[0]);
        limits.check_variable_length(buf.len())?;
    }
}

fn fixed_byte_length(block: &framecodec_format::Block, registry: &ExtensionRegistry) -> Result<usize> {
    match &block.kind {
        BlockKind::Custom { name, .. } => registry
            .block_fixed_byte_length(name)
            .flatten()
            .ok_or_else(|| FrameCodecError::UnsupportedType(format!("custom block `{name}` has no fixed byte length"))),
        other => other
            .fixed_byte_length()
            .ok_or_else(|| FrameCodecError::Internal("fixed_byte_length() called on a variable-length kind".to_string())),
    }
}

fn expected_p_frame_len(
    compression: &framecodec_format::Compression,
    registry: &ExtensionRegistry,
) -> Result<usize> {
    match &compression.kind {
        CompressionKind::Custom { name, .. } => registry
            .compression_p_frame_byte_length(name)
            .ok_or_else(|| FrameCodecError::UnsupportedType(format!("no compression extension registered for `{name}`"))),
        _ => Ok(compression.p_frame_byte_length()),
    }
}
