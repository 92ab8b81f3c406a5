//! Property-based tests for the wire-format primitives: block codec,
//! NumericDelta compression, and schema JSON persistence.

use framecodec_format::{Block, Compression, Primitive, Schema, StreamCompression, StringEncoding, Value};
use proptest::prelude::*;

fn arb_primitive() -> impl Strategy<Value = Primitive> {
    prop::sample::select(Primitive::ALL.to_vec())
}

fn arb_int_primitive() -> impl Strategy<Value = Primitive> {
    prop::sample::select(vec![
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
    ])
}

fn arb_value_for(primitive: Primitive) -> BoxedStrategy<Value> {
    match primitive {
        Primitive::U8 => any::<u8>().prop_map(Value::U8).boxed(),
        Primitive::I8 => any::<i8>().prop_map(Value::I8).boxed(),
        Primitive::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        Primitive::Char16 => any::<u16>().prop_map(Value::Char16).boxed(),
        Primitive::I16 => any::<i16>().prop_map(Value::I16).boxed(),
        Primitive::U16 => any::<u16>().prop_map(Value::U16).boxed(),
        Primitive::I32 => any::<i32>().prop_map(Value::I32).boxed(),
        Primitive::U32 => any::<u32>().prop_map(Value::U32).boxed(),
        Primitive::I64 => any::<i64>().prop_map(Value::I64).boxed(),
        Primitive::U64 => any::<u64>().prop_map(Value::U64).boxed(),
        Primitive::F32 => any::<f32>().prop_map(Value::F32).boxed(),
        Primitive::F64 => any::<f64>().prop_map(Value::F64).boxed(),
    }
}

proptest! {
    #[test]
    fn numeric_block_round_trips_for_any_primitive(
        (primitive, value) in arb_primitive().prop_flat_map(|p| (Just(p), arb_value_for(p))),
    ) {
        let block = Block::numeric(0, "field", primitive);
        let bytes = block.encode_value(&value).unwrap();
        prop_assert_eq!(bytes.len(), primitive.byte_length());
        let (decoded, consumed) = block.decode_value(&bytes).unwrap();
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn bytes_block_round_trips_any_payload_without_terminator(
        payload in prop::collection::vec(1u8..=255, 0..256),
    ) {
        let block = Block::bytes(0, "payload");
        let bytes = block.encode_value(&Value::Bytes(payload.clone())).unwrap();
        prop_assert_eq!(bytes.last().copied(), Some(0x00));
        let (decoded, consumed) = block.decode_value(&bytes).unwrap();
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(decoded, Value::Bytes(payload));
    }

    #[test]
    fn utf8_string_block_round_trips_any_non_null_string(
        text in "[^\\x00]{0,64}",
    ) {
        let block = Block::string(0, "name", StringEncoding::Utf8);
        let bytes = block.encode_value(&Value::String(text.clone())).unwrap();
        let (decoded, consumed) = block.decode_value(&bytes).unwrap();
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(decoded, Value::String(text));
    }

    #[test]
    fn numeric_delta_round_trips_with_wraparound(
        original in arb_int_primitive(),
        prev_bits in any::<u64>(),
        curr_bits in any::<u64>(),
    ) {
        let delta = original; // same-width delta keeps the math exact for this property
        let prev = int_value_from_bits(original, prev_bits);
        let curr = int_value_from_bits(original, curr_bits);

        let comp = Compression::numeric_delta(original, delta);
        let encoded = comp.compress(&prev, &curr).unwrap();
        prop_assert_eq!(encoded.len(), delta.byte_length());
        let restored = comp.decompress(&prev, &encoded).unwrap();
        prop_assert_eq!(restored, curr);
    }

    #[test]
    fn schema_json_round_trips_for_arbitrary_block_lists(
        blocks in prop::collection::vec(arb_int_primitive(), 1..8),
        version in any::<u8>(),
    ) {
        let blocks: Vec<Block> = blocks
            .into_iter()
            .enumerate()
            .map(|(i, prim)| Block::numeric(i, format!("f{i}"), prim))
            .collect();
        let schema = Schema::new(version, blocks, None, None).unwrap();
        let text = schema.to_json(None, None).unwrap();
        let back = Schema::from_json(&text, None, None).unwrap();
        prop_assert_eq!(schema, back);
    }

    #[test]
    fn schema_json_round_trips_with_cadence(
        interval in 2u32..50,
        version in any::<u8>(),
    ) {
        let schema = Schema::new(
            version,
            vec![Block::numeric(0, "x", Primitive::U32)],
            Some(StreamCompression::new(interval).unwrap()),
            None,
        )
        .unwrap();
        let text = schema.to_json(None, None).unwrap();
        let back = Schema::from_json(&text, None, None).unwrap();
        prop_assert_eq!(schema, back);
    }
}

fn int_value_from_bits(prim: Primitive, bits: u64) -> Value {
    match prim {
        Primitive::U8 => Value::U8(bits as u8),
        Primitive::I8 => Value::I8(bits as u8 as i8),
        Primitive::Bool => Value::Bool(bits & 1 != 0),
        Primitive::Char16 => Value::Char16(bits as u16),
        Primitive::I16 => Value::I16(bits as u16 as i16),
        Primitive::U16 => Value::U16(bits as u16),
        Primitive::I32 => Value::I32(bits as u32 as i32),
        Primitive::U32 => Value::U32(bits as u32),
        Primitive::I64 => Value::I64(bits as i64),
        Primitive::U64 => Value::U64(bits),
        Primitive::F32 | Primitive::F64 => unreachable!("arb_int_primitive excludes floats"),
    }
}
