//! Per-block delta compression active only in P-frames.

use crate::error::{FrameCodecError, Result};
use crate::value::{Primitive, Value};

/// The delta strategy attached to a block.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressionKind {
    /// P-frames contribute zero bytes; the value is carried forward from
    /// the previous entry verbatim.
    IFrameOnly,
    /// P-frames encode `current - previous`, computed in `original`'s
    /// arithmetic and cast to `delta`, little-endian.
    NumericDelta {
        /// Primitive the block's own values are stored as.
        original: Primitive,
        /// Primitive the delta is encoded as on the wire.
        delta: Primitive,
    },
    /// A caller-registered compression kind, identified by name. The actual
    /// compress/decompress behavior lives in an extension registry (see
    /// `framecodec-codec`); this variant only carries the wire metadata.
    Custom {
        /// The `"compression"` name stored in schema JSON.
        name: String,
        /// Fixed P-frame byte length this kind advertises.
        p_frame_byte_length: usize,
    },
}

/// Descriptor of delta encoding for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Compression {
    /// The delta strategy.
    pub kind: CompressionKind,
}

impl Compression {
    /// Carry-forward-only compression.
    pub fn i_frame_only() -> Self {
        Compression {
            kind: CompressionKind::IFrameOnly,
        }
    }

    /// Numeric delta compression from `original` to `delta`.
    pub fn numeric_delta(original: Primitive, delta: Primitive) -> Self {
        Compression {
            kind: CompressionKind::NumericDelta { original, delta },
        }
    }

    /// Fixed number of bytes a P-frame contributes for this block.
    pub fn p_frame_byte_length(&self) -> usize {
        match &self.kind {
            CompressionKind::IFrameOnly => 0,
            CompressionKind::NumericDelta { delta, .. } => delta.byte_length(),
            CompressionKind::Custom {
                p_frame_byte_length,
                ..
            } => *p_frame_byte_length,
        }
    }

    /// Produce P-frame bytes for `curr` given the previous entry's value
    /// `prev`. Built-in kinds only; `Custom` is dispatched by the codec
    /// crate's extension registry.
    pub fn compress(&self, prev: &Value, curr: &Value) -> Result<Vec<u8>> {
        match &self.kind {
            CompressionKind::IFrameOnly => Ok(Vec::new()),
            CompressionKind::NumericDelta { original, delta } => {
                numeric_delta_compress(*original, *delta, prev, curr)
            }
            CompressionKind::Custom { name, .. } => Err(FrameCodecError::UnsupportedType(format!(
                "custom compression `{name}` must be dispatched through the extension registry"
            ))),
        }
    }

    /// Reconstruct the current value from the previous value and P-frame
    /// bytes. Built-in kinds only.
    pub fn decompress(&self, prev: &Value, bytes: &[u8]) -> Result<Value> {
        match &self.kind {
            CompressionKind::IFrameOnly => Ok(prev.clone()),
            CompressionKind::NumericDelta { original, delta } => {
                numeric_delta_decompress(*original, *delta, prev, bytes)
            }
            CompressionKind::Custom { name, .. } => Err(FrameCodecError::UnsupportedType(format!(
                "custom compression `{name}` must be dispatched through the extension registry"
            ))),
        }
    }
}

/// Raw bit pattern of an integer-ish primitive value, zero-extended into a
/// `u128` carrier. Subtraction modulo `2^width` only depends on bit
/// patterns, so signedness doesn't matter at this stage.
fn int_bits(prim: Primitive, value: &Value) -> Result<u128> {
    let raw: u128 = match (prim, value) {
        (Primitive::U8, Value::U8(v)) => *v as u128,
        (Primitive::I8, Value::I8(v)) => (*v as u8) as u128,
        (Primitive::Bool, Value::Bool(v)) => u8::from(*v) as u128,
        (Primitive::Char16, Value::Char16(v)) => *v as u128,
        (Primitive::I16, Value::I16(v)) => (*v as u16) as u128,
        (Primitive::U16, Value::U16(v)) => *v as u128,
        (Primitive::I32, Value::I32(v)) => (*v as u32) as u128,
        (Primitive::U32, Value::U32(v)) => *v as u128,
        (Primitive::I64, Value::I64(v)) => (*v as u64) as u128,
        (Primitive::U64, Value::U64(v)) => *v as u128,
        _ => {
            return Err(FrameCodecError::UnsupportedType(format!(
                "value {value:?} is not an integer-width primitive {prim:?}"
            )))
        }
    };
    Ok(raw)
}

/// Rebuild a `Value` of `prim` from a zero-extended bit pattern, masking to
/// the primitive's width first.
fn int_from_bits(prim: Primitive, bits: u128) -> Value {
    let width_bits = (prim.byte_length() * 8) as u32;
    let mask: u128 = if width_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << width_bits) - 1
    };
    let bits = bits & mask;
    match prim {
        Primitive::U8 => Value::U8(bits as u8),
        Primitive::I8 => Value::I8(bits as u8 as i8),
        Primitive::Bool => Value::Bool(bits != 0),
        Primitive::Char16 => Value::Char16(bits as u16),
        Primitive::I16 => Value::I16(bits as u16 as i16),
        Primitive::U16 => Value::U16(bits as u16),
        Primitive::I32 => Value::I32(bits as u32 as i32),
        Primitive::U32 => Value::U32(bits as u32),
        Primitive::I64 => Value::I64(bits as u64 as i64),
        Primitive::U64 => Value::U64(bits as u64),
        Primitive::F32 | Primitive::F64 => unreachable!("float primitives use float arithmetic"),
    }
}

/// Sign-extend a `width_bits`-wide two's-complement pattern (held in the low
/// bits of `bits`) out to a signed `i128` delta value.
fn sign_extend(bits: u128, width_bits: u32) -> i128 {
    if width_bits >= 128 {
        return bits as i128;
    }
    let shift = 128 - width_bits;
    ((bits << shift) as i128) >> shift
}

fn numeric_delta_compress(original: Primitive, delta: Primitive, prev: &Value, curr: &Value) -> Result<Vec<u8>> {
    if original.is_float() != delta.is_float() {
        return Err(FrameCodecError::UnsupportedType(format!(
            "NumericDelta cannot mix float original ({original:?}) with non-float delta ({delta:?})"
        )));
    }

    if original.is_float() {
        let prev_f = as_f64(prev)?;
        let curr_f = as_f64(curr)?;
        let diff = curr_f - prev_f;
        let value = match delta {
            Primitive::F32 => Value::F32(diff as f32),
            Primitive::F64 => Value::F64(diff),
            _ => unreachable!("delta.is_float() checked above"),
        };
        delta.encode(&value)
    } else {
        let prev_bits = int_bits(original, prev)?;
        let curr_bits = int_bits(original, curr)?;
        let orig_width = (original.byte_length() * 8) as u32;
        let diff_bits = curr_bits.wrapping_sub(prev_bits) & width_mask(orig_width);
        // Interpret the original-width difference as signed, then let it
        // wrap/truncate into the delta primitive's width on encode.
        let signed_diff = sign_extend(diff_bits, orig_width);
        let delta_width = (delta.byte_length() * 8) as u32;
        let delta_bits = (signed_diff as u128) & width_mask(delta_width);
        Ok(encode_bits_le(delta, delta_bits))
    }
}

fn numeric_delta_decompress(original: Primitive, delta: Primitive, prev: &Value, bytes: &[u8]) -> Result<Value> {
    if bytes.len() != delta.byte_length() {
        return Err(FrameCodecError::LengthMismatch {
            what: "NumericDelta decompress".to_string(),
            expected: delta.byte_length(),
            actual: bytes.len(),
        });
    }

    if original.is_float() != delta.is_float() {
        return Err(FrameCodecError::UnsupportedType(format!(
            "NumericDelta cannot mix float original ({original:?}) with non-float delta ({delta:?})"
        )));
    }

    if original.is_float() {
        let prev_f = as_f64(prev)?;
        // floats decode directly through their own representation instead
        // of the integer bit-pattern path.
        let diff_f = match delta {
            Primitive::F32 => f32::from_le_bytes(bytes.try_into().unwrap()) as f64,
            Primitive::F64 => f64::from_le_bytes(bytes.try_into().unwrap()),
            _ => unreachable!(),
        };
        let result = prev_f + diff_f;
        Ok(match original {
            Primitive::F32 => Value::F32(result as f32),
            Primitive::F64 => Value::F64(result),
            _ => unreachable!("original.is_float() checked above"),
        })
    } else {
        let prev_bits = int_bits(original, prev)?;
        let delta_bits = decode_bits_le(delta, bytes);
        let delta_width = (delta.byte_length() * 8) as u32;
        let signed_delta = sign_extend(delta_bits, delta_width);
        let orig_width = (original.byte_length() * 8) as u32;
        let result_bits = (prev_bits.wrapping_add(signed_delta as u128)) & width_mask(orig_width);
        Ok(int_from_bits(original, result_bits))
    }
}

fn width_mask(width_bits: u32) -> u128 {
    if width_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << width_bits) - 1
    }
}

fn encode_bits_le(prim: Primitive, bits: u128) -> Vec<u8> {
    let full = bits.to_le_bytes();
    full[..prim.byte_length()].to_vec()
}

fn decode_bits_le(prim: Primitive, bytes: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    buf[..bytes.len().min(16)].copy_from_slice(&bytes[..bytes.len().min(16)]);
    u128::from_le_bytes(buf) & width_mask((prim.byte_length() * 8) as u32)
}

fn as_f64(value: &Value) -> Result<f64> {
    match value {
        Value::F32(v) => Ok(*v as f64),
        Value::F64(v) => Ok(*v),
        _ => Err(FrameCodecError::UnsupportedType(format!(
            "value {value:?} is not a float"
        ))),
    }
}
