//! Primitive numeric types, the `Value` tagged union, and string encodings.

use crate::error::{FrameCodecError, Result};

/// The primitive numeric types a `Numeric` block or `NumericDelta`
/// compression can carry.
///
/// Order mirrors the data model listing: `{u8, i8, bool, char16, i16, u16,
/// i32, u32, i64, u64, f32, f64}`. `bool` occupies one byte (0 = false,
/// nonzero = true); `char16` is a bare UTF-16 code unit, not a validated
/// Unicode scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Boolean, one byte on the wire.
    Bool,
    /// Bare UTF-16 code unit.
    Char16,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// IEEE-754 single precision.
    F32,
    /// IEEE-754 double precision.
    F64,
}

impl Primitive {
    /// All primitives, in data-model order.
    pub const ALL: [Primitive; 12] = [
        Primitive::U8,
        Primitive::I8,
        Primitive::Bool,
        Primitive::Char16,
        Primitive::I16,
        Primitive::U16,
        Primitive::I32,
        Primitive::U32,
        Primitive::I64,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
    ];

    /// Fixed on-wire byte length of this primitive.
    pub fn byte_length(self) -> usize {
        match self {
            Primitive::U8 | Primitive::I8 | Primitive::Bool => 1,
            Primitive::Char16 | Primitive::I16 | Primitive::U16 => 2,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::I64 | Primitive::U64 | Primitive::F64 => 8,
        }
    }

    /// `true` for `F32`/`F64`.
    pub fn is_float(self) -> bool {
        matches!(self, Primitive::F32 | Primitive::F64)
    }

    /// `true` for the signed integer primitives.
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64
        )
    }

    /// The stable name stored as the sole `custom` entry for a `Numeric`
    /// block in schema JSON (see `schema_json`). Rust has no module path for
    /// primitives, so the bare type name doubles as the "fully qualified"
    /// name the wire format asks for.
    pub fn wire_name(self) -> &'static str {
        match self {
            Primitive::U8 => "u8",
            Primitive::I8 => "i8",
            Primitive::Bool => "bool",
            Primitive::Char16 => "char16",
            Primitive::I16 => "i16",
            Primitive::U16 => "u16",
            Primitive::I32 => "i32",
            Primitive::U32 => "u32",
            Primitive::I64 => "i64",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        }
    }

    /// Parse a `wire_name()` back into a `Primitive`.
    pub fn from_wire_name(name: &str) -> Result<Self> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.wire_name() == name)
            .ok_or_else(|| FrameCodecError::UnsupportedType(format!("unknown primitive `{name}`")))
    }

    /// Encode a `Value` holding this primitive to little-endian bytes.
    pub fn encode(self, value: &Value) -> Result<Vec<u8>> {
        let bytes = match (self, value) {
            (Primitive::U8, Value::U8(v)) => vec![*v],
            (Primitive::I8, Value::I8(v)) => vec![*v as u8],
            (Primitive::Bool, Value::Bool(v)) => vec![u8::from(*v)],
            (Primitive::Char16, Value::Char16(v)) => v.to_le_bytes().to_vec(),
            (Primitive::I16, Value::I16(v)) => v.to_le_bytes().to_vec(),
            (Primitive::U16, Value::U16(v)) => v.to_le_bytes().to_vec(),
            (Primitive::I32, Value::I32(v)) => v.to_le_bytes().to_vec(),
            (Primitive::U32, Value::U32(v)) => v.to_le_bytes().to_vec(),
            (Primitive::I64, Value::I64(v)) => v.to_le_bytes().to_vec(),
            (Primitive::U64, Value::U64(v)) => v.to_le_bytes().to_vec(),
            (Primitive::F32, Value::F32(v)) => v.to_le_bytes().to_vec(),
            (Primitive::F64, Value::F64(v)) => v.to_le_bytes().to_vec(),
            _ => {
                return Err(FrameCodecError::UnsupportedType(format!(
                    "value {value:?} does not match primitive {self:?}"
                )))
            }
        };
        debug_assert_eq!(bytes.len(), self.byte_length());
        Ok(bytes)
    }

    /// Decode a `Value` of this primitive from exactly `byte_length()` bytes.
    pub fn decode(self, bytes: &[u8]) -> Result<Value> {
        if bytes.len() != self.byte_length() {
            return Err(FrameCodecError::LengthMismatch {
                what: format!("{self:?} decode"),
                expected: self.byte_length(),
                actual: bytes.len(),
            });
        }
        Ok(match self {
            Primitive::U8 => Value::U8(bytes[0]),
            Primitive::I8 => Value::I8(bytes[0] as i8),
            Primitive::Bool => Value::Bool(bytes[0] != 0),
            Primitive::Char16 => Value::Char16(u16::from_le_bytes([bytes[0], bytes[1]])),
            Primitive::I16 => Value::I16(i16::from_le_bytes([bytes[0], bytes[1]])),
            Primitive::U16 => Value::U16(u16::from_le_bytes([bytes[0], bytes[1]])),
            Primitive::I32 => Value::I32(i32::from_le_bytes(bytes.try_into().unwrap())),
            Primitive::U32 => Value::U32(u32::from_le_bytes(bytes.try_into().unwrap())),
            Primitive::I64 => Value::I64(i64::from_le_bytes(bytes.try_into().unwrap())),
            Primitive::U64 => Value::U64(u64::from_le_bytes(bytes.try_into().unwrap())),
            Primitive::F32 => Value::F32(f32::from_le_bytes(bytes.try_into().unwrap())),
            Primitive::F64 => Value::F64(f64::from_le_bytes(bytes.try_into().unwrap())),
        })
    }
}

/// Text encodings a `String` block may use on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    /// 7-bit ASCII, one byte per character.
    Ascii,
    /// ISO-8859-1, one byte per character.
    Latin1,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// UTF-16, big-endian code units.
    Utf16Be,
    /// UTF-8 (native Rust `String` representation).
    Utf8,
    /// UTF-32, little-endian scalar values.
    Utf32Le,
}

impl StringEncoding {
    /// The name stored in schema JSON's `custom` array for a `String` block.
    pub fn wire_name(self) -> &'static str {
        match self {
            StringEncoding::Ascii => "ASCII",
            StringEncoding::Latin1 => "Latin1",
            StringEncoding::Utf16Le => "UTF-16LE",
            StringEncoding::Utf16Be => "UTF-16BE",
            StringEncoding::Utf8 => "UTF-8",
            StringEncoding::Utf32Le => "UTF-32LE",
        }
    }

    /// Parse a `wire_name()` back into a `StringEncoding`.
    pub fn from_wire_name(name: &str) -> Result<Self> {
        Ok(match name {
            "ASCII" => StringEncoding::Ascii,
            "Latin1" => StringEncoding::Latin1,
            "UTF-16LE" => StringEncoding::Utf16Le,
            "UTF-16BE" => StringEncoding::Utf16Be,
            "UTF-8" => StringEncoding::Utf8,
            "UTF-32LE" => StringEncoding::Utf32Le,
            other => {
                return Err(FrameCodecError::UnknownKind(format!(
                    "unknown string encoding `{other}`"
                )))
            }
        })
    }

    /// Encode `text` to bytes in this encoding.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            StringEncoding::Ascii => {
                if !text.is_ascii() {
                    return Err(FrameCodecError::UnsupportedType(format!(
                        "string `{text}` is not ASCII"
                    )));
                }
                Ok(text.as_bytes().to_vec())
            }
            StringEncoding::Latin1 => {
                let mut out = Vec::with_capacity(text.chars().count());
                for ch in text.chars() {
                    let code = ch as u32;
                    if code > 0xFF {
                        return Err(FrameCodecError::UnsupportedType(format!(
                            "character `{ch}` is not representable in Latin-1"
                        )));
                    }
                    out.push(code as u8);
                }
                Ok(out)
            }
            StringEncoding::Utf16Le => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                Ok(out)
            }
            StringEncoding::Utf16Be => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                Ok(out)
            }
            StringEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            StringEncoding::Utf32Le => {
                let mut out = Vec::with_capacity(text.chars().count() * 4);
                for ch in text.chars() {
                    out.extend_from_slice(&(ch as u32).to_le_bytes());
                }
                Ok(out)
            }
        }
    }

    /// Decode bytes in this encoding back to a `String`.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            StringEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(FrameCodecError::UnsupportedType(
                        "bytes are not valid ASCII".to_string(),
                    ));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            StringEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            StringEncoding::Utf16Le => {
                let units = le_u16_units(bytes)?;
                String::from_utf16(&units)
                    .map_err(|e| FrameCodecError::UnsupportedType(format!("invalid UTF-16: {e}")))
            }
            StringEncoding::Utf16Be => {
                let units = be_u16_units(bytes)?;
                String::from_utf16(&units)
                    .map_err(|e| FrameCodecError::UnsupportedType(format!("invalid UTF-16: {e}")))
            }
            StringEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| FrameCodecError::UnsupportedType(format!("invalid UTF-8: {e}"))),
            StringEncoding::Utf32Le => {
                if bytes.len() % 4 != 0 {
                    return Err(FrameCodecError::UnsupportedType(
                        "UTF-32 payload length is not a multiple of 4".to_string(),
                    ));
                }
                let mut out = String::with_capacity(bytes.len() / 4);
                for chunk in bytes.chunks_exact(4) {
                    let code = u32::from_le_bytes(chunk.try_into().unwrap());
                    let ch = char::from_u32(code).ok_or_else(|| {
                        FrameCodecError::UnsupportedType(format!(
                            "invalid UTF-32 scalar value {code:#x}"
                        ))
                    })?;
                    out.push(ch);
                }
                Ok(out)
            }
        }
    }
}

fn le_u16_units(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(FrameCodecError::UnsupportedType(
            "UTF-16 payload length is not a multiple of 2".to_string(),
        ));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect())
}

fn be_u16_units(bytes: &[u8]) -> Result<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(FrameCodecError::UnsupportedType(
            "UTF-16 payload length is not a multiple of 2".to_string(),
        ));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect())
}

/// A single field value: one of the numeric primitives, a raw byte string,
/// or decoded Unicode text.
///
/// The wire encoding used for `String` values is a property of the owning
/// `Block`, not of the value itself — the same conceptual text round-trips
/// through whichever `StringEncoding` the schema declares.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `u8` value.
    U8(u8),
    /// `i8` value.
    I8(i8),
    /// `bool` value.
    Bool(bool),
    /// Bare UTF-16 code unit.
    Char16(u16),
    /// `i16` value.
    I16(i16),
    /// `u16` value.
    U16(u16),
    /// `i32` value.
    I32(i32),
    /// `u32` value.
    U32(u32),
    /// `i64` value.
    I64(i64),
    /// `u64` value.
    U64(u64),
    /// `f32` value.
    F32(f32),
    /// `f64` value.
    F64(f64),
    /// Arbitrary byte sequence.
    Bytes(Vec<u8>),
    /// Unicode text.
    String(String),
}

impl Value {
    /// The `Primitive` this value matches, if it is a numeric value.
    pub fn primitive(&self) -> Option<Primitive> {
        Some(match self {
            Value::U8(_) => Primitive::U8,
            Value::I8(_) => Primitive::I8,
            Value::Bool(_) => Primitive::Bool,
            Value::Char16(_) => Primitive::Char16,
            Value::I16(_) => Primitive::I16,
            Value::U16(_) => Primitive::U16,
            Value::I32(_) => Primitive::I32,
            Value::U32(_) => Primitive::U32,
            Value::I64(_) => Primitive::I64,
            Value::U64(_) => Primitive::U64,
            Value::F32(_) => Primitive::F32,
            Value::F64(_) => Primitive::F64,
            Value::Bytes(_) | Value::String(_) => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_round_trip() {
        let cases = [
            (Primitive::U8, Value::U8(200)),
            (Primitive::I8, Value::I8(-5)),
            (Primitive::Bool, Value::Bool(true)),
            (Primitive::Char16, Value::Char16(0x1234)),
            (Primitive::I16, Value::I16(-1000)),
            (Primitive::U16, Value::U16(40000)),
            (Primitive::I32, Value::I32(-70000)),
            (Primitive::U32, Value::U32(4_000_000_000)),
            (Primitive::I64, Value::I64(i64::MIN)),
            (Primitive::U64, Value::U64(u64::MAX)),
            (Primitive::F32, Value::F32(1.5)),
            (Primitive::F64, Value::F64(-2.25)),
        ];
        for (prim, value) in cases {
            let bytes = prim.encode(&value).unwrap();
            assert_eq!(bytes.len(), prim.byte_length());
            let decoded = prim.decode(&bytes).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn wire_name_round_trip() {
        for prim in Primitive::ALL {
            assert_eq!(Primitive::from_wire_name(prim.wire_name()).unwrap(), prim);
        }
    }

    #[test]
    fn string_encodings_round_trip() {
        let samples = ["", "hi", "Hello, World!"];
        for encoding in [
            StringEncoding::Ascii,
            StringEncoding::Latin1,
            StringEncoding::Utf16Le,
            StringEncoding::Utf16Be,
            StringEncoding::Utf8,
            StringEncoding::Utf32Le,
        ] {
            for sample in samples {
                let bytes = encoding.encode(sample).unwrap();
                let decoded = encoding.decode(&bytes).unwrap();
                assert_eq!(decoded, sample);
            }
        }
    }

    #[test]
    fn utf8_handles_unicode_and_emoji() {
        let sample = "Hello, 世界! 🚀";
        let bytes = StringEncoding::Utf8.encode(sample).unwrap();
        assert_eq!(StringEncoding::Utf8.decode(&bytes).unwrap(), sample);
        let bytes16 = StringEncoding::Utf16Le.encode(sample).unwrap();
        assert_eq!(StringEncoding::Utf16Le.decode(&bytes16).unwrap(), sample);
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        assert!(StringEncoding::Ascii.encode("café").is_err());
    }
}
