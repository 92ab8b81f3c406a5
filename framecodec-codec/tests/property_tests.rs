//! Property tests for the entry-level codec, driven by
//! `framecodec-test-utils`'s schema builder and `proptest` strategies.

use framecodec_codec::{decode_entry, encode_entry, ExtensionRegistry, SliceSource};
use framecodec_format::{Entry, Limits, Primitive};
use framecodec_test_utils::{arb_entries_for_schema, assert_entries_equal, SchemaBuilder};
use proptest::prelude::*;

fn mixed_schema() -> framecodec_format::Schema {
    SchemaBuilder::new(1)
        .numeric("a", Primitive::U32)
        .numeric("b", Primitive::I16)
        .bytes("payload")
        .string("name", framecodec_format::StringEncoding::Utf8)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn entry_round_trips_for_arbitrary_mixed_schema(
        entries in arb_entries_for_schema(&mixed_schema(), 8, &Limits::default()),
    ) {
        let schema = mixed_schema();
        let registry = ExtensionRegistry::new();

        let mut bytes = Vec::new();
        for entry in &entries {
            encode_entry(&mut bytes, &schema, None, true, entry, &registry).unwrap();
        }

        let mut source = SliceSource::new(&bytes);
        let mut decoded = Vec::new();
        while let Some(entry) =
            decode_entry(&mut source, &schema, None, true, &Limits::default(), &registry).unwrap()
        {
            decoded.push(entry);
        }
        assert_entries_equal(&entries, &decoded);
    }
}

#[test]
fn scenario_s2_i_frame_only_with_cadence_two() {
    use framecodec_format::{Block, Compression, Schema, Value};

    let schema = Schema::new(
        1,
        vec![
            Block::numeric(0, "x", Primitive::U8),
            Block::numeric(1, "y", Primitive::U8),
            Block::numeric(2, "t", Primitive::U8).with_compression(Compression::i_frame_only()),
        ],
        None,
        None,
    )
    .unwrap();
    let registry = ExtensionRegistry::new();

    let entries = vec![
        Entry::new(vec![Value::U8(10), Value::U8(20), Value::U8(3)]),
        Entry::new(vec![Value::U8(11), Value::U8(22), Value::U8(3)]),
        Entry::new(vec![Value::U8(12), Value::U8(24), Value::U8(7)]),
        Entry::new(vec![Value::U8(13), Value::U8(26), Value::U8(7)]),
    ];
    // Cadence 2: entries at position 0 and 2 are I-frames.
    let is_i_frame = [true, false, true, false];

    let mut out = Vec::new();
    let mut prev: Option<&Entry> = None;
    for (entry, i_frame) in entries.iter().zip(is_i_frame) {
        encode_entry(&mut out, &schema, prev, i_frame, entry, &registry).unwrap();
        prev = Some(entry);
    }
    assert_eq!(
        out,
        vec![0x0A, 0x14, 0x03, 0x0B, 0x16, 0x0C, 0x18, 0x07, 0x0D, 0x1A]
    );

    let mut source = SliceSource::new(&out);
    let mut decoded = Vec::new();
    let mut prev: Option<Entry> = None;
    for i_frame in is_i_frame {
        let entry = decode_entry(&mut source, &schema, prev.as_ref(), i_frame, &Limits::default(), &registry)
            .unwrap()
            .unwrap();
        decoded.push(entry.clone());
        prev = Some(entry);
    }
    assert_eq!(decoded, entries);
}
