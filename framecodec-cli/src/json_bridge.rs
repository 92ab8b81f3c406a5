//! Conversion between `serde_json::Value` records and the codec's own
//! `Entry`/`Value`, keyed by a schema's block list. This is the CLI's own
//! concern — neither `framecodec-format` nor `framecodec-codec` know about
//! JSON records, only about JSON schema *descriptions*.

use framecodec_format::{Block, BlockKind, Entry, Primitive, Schema, Value};
use serde_json::{Map, Value as Json};

/// Convert one JSON object into an `Entry`, reading each block's value out
/// of the object by `property_name`.
pub fn record_to_entry(schema: &Schema, record: &Map<String, Json>) -> Result<Entry, String> {
    let values = schema
        .blocks()
        .iter()
        .map(|block| {
            let json = record
                .get(&block.property_name)
                .ok_or_else(|| format!("record missing field `{}`", block.property_name))?;
            json_to_value(block, json)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Entry::new(values))
}

/// Inverse of [`record_to_entry`]: rebuild a JSON object from a decoded
/// entry's values, keyed by each block's `property_name`.
pub fn entry_to_record(schema: &Schema, entry: &Entry) -> Map<String, Json> {
    let mut record = Map::with_capacity(schema.blocks().len());
    for block in schema.blocks() {
        if let Some(value) = entry.get(block.index) {
            record.insert(block.property_name.clone(), value_to_json(value));
        }
    }
    record
}

fn json_to_value(block: &Block, json: &Json) -> Result<Value, String> {
    match &block.kind {
        BlockKind::Numeric(prim) => numeric_json_to_value(*prim, json, &block.property_name),
        BlockKind::Bytes => {
            let array = json
                .as_array()
                .ok_or_else(|| format!("field `{}` expects a byte array", block.property_name))?;
            let bytes = array
                .iter()
                .map(|b| {
                    b.as_u64()
                        .filter(|n| *n <= 255)
                        .map(|n| n as u8)
                        .ok_or_else(|| format!("field `{}` has a non-byte element", block.property_name))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Bytes(bytes))
        }
        BlockKind::String(_) => {
            let text = json
                .as_str()
                .ok_or_else(|| format!("field `{}` expects a string", block.property_name))?;
            Ok(Value::String(text.to_string()))
        }
        BlockKind::Custom { name, .. } => Err(format!(
            "custom block `{name}` on field `{}` has no CLI conversion",
            block.property_name
        )),
    }
}

fn numeric_json_to_value(prim: Primitive, json: &Json, field: &str) -> Result<Value, String> {
    let type_err = || format!("field `{field}` is not a valid {prim:?} value");
    Ok(match prim {
        Primitive::U8 => Value::U8(json.as_u64().and_then(|n| u8::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::I8 => Value::I8(json.as_i64().and_then(|n| i8::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::Bool => Value::Bool(json.as_bool().ok_or_else(type_err)?),
        Primitive::Char16 => Value::Char16(json.as_u64().and_then(|n| u16::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::I16 => Value::I16(json.as_i64().and_then(|n| i16::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::U16 => Value::U16(json.as_u64().and_then(|n| u16::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::I32 => Value::I32(json.as_i64().and_then(|n| i32::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::U32 => Value::U32(json.as_u64().and_then(|n| u32::try_from(n).ok()).ok_or_else(type_err)?),
        Primitive::I64 => Value::I64(json.as_i64().ok_or_else(type_err)?),
        Primitive::U64 => Value::U64(json.as_u64().ok_or_else(type_err)?),
        Primitive::F32 => Value::F32(json.as_f64().ok_or_else(type_err)? as f32),
        Primitive::F64 => Value::F64(json.as_f64().ok_or_else(type_err)?),
    })
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::U8(v) => Json::from(*v),
        Value::I8(v) => Json::from(*v),
        Value::Bool(v) => Json::from(*v),
        Value::Char16(v) => Json::from(*v),
        Value::I16(v) => Json::from(*v),
        Value::U16(v) => Json::from(*v),
        Value::I32(v) => Json::from(*v),
        Value::U32(v) => Json::from(*v),
        Value::I64(v) => Json::from(*v),
        Value::U64(v) => Json::from(*v),
        Value::F32(v) => Json::from(*v as f64),
        Value::F64(v) => Json::from(*v),
        Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        Value::String(s) => Json::from(s.clone()),
    }
}
