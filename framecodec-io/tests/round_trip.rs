use framecodec_format::{Block, Compression, CustomHeader, Entry, Limits, Primitive, Schema, StreamCompression, StringEncoding, Value};
use framecodec_io::backends::{FileSink, FileSource, MemorySource};
use framecodec_io::{Decoder, Encoder};

fn roster_schema() -> Schema {
    Schema::new(
        1,
        vec![
            Block::numeric(0, "hp", Primitive::U8).with_compression(Compression::numeric_delta(Primitive::U8, Primitive::I8)),
            Block::string(1, "name", StringEncoding::Utf8),
        ],
        Some(StreamCompression::new(3).unwrap()),
        None,
    )
    .unwrap()
}

fn roster_entries() -> Vec<Entry> {
    vec![
        Entry::new(vec![Value::U8(100), Value::String("alpha".to_string())]),
        Entry::new(vec![Value::U8(90), Value::String("bravo".to_string())]),
        Entry::new(vec![Value::U8(95), Value::String("charlie".to_string())]),
        Entry::new(vec![Value::U8(80), Value::String("delta".to_string())]),
    ]
}

#[test]
fn round_trips_through_in_memory_sink_and_source() {
    let schema = roster_schema();
    let entries = roster_entries();

    let mut encoder = Encoder::new(&schema, Vec::<u8>::new()).unwrap();
    encoder.write_entries(entries.clone()).unwrap();
    let finish = encoder.finish();
    assert_eq!(finish.metrics.entries_written, 4);

    let source = MemorySource::new(finish.sink);
    let decoder = Decoder::new(&schema, source, Limits::default()).unwrap();
    let decoded: Vec<Entry> = decoder.collect::<framecodec_format::Result<Vec<_>>>().unwrap();
    assert_eq!(decoded, entries);
}

#[test]
fn round_trips_through_file_backed_sink_and_source() {
    let schema = roster_schema();
    let entries = roster_entries();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stream.bin");

    let sink = FileSink::create(&path).unwrap();
    let mut encoder = Encoder::new(&schema, sink).unwrap();
    encoder.write_entries(entries.clone()).unwrap();
    encoder.finish().sink.finish().unwrap();

    let source = FileSource::open(&path).unwrap();
    let decoder = Decoder::new(&schema, source, Limits::default()).unwrap();
    let decoded: Vec<Entry> = decoder.collect::<framecodec_format::Result<Vec<_>>>().unwrap();
    assert_eq!(decoded, entries);
}

#[test]
fn i_frame_cadence_resets_on_decode_matching_encode() {
    let schema = roster_schema();
    let entries = roster_entries();
    assert_eq!(entries.len(), 4); // cadence 3 means entry index 3 is an I-frame again

    let mut encoder = Encoder::new(&schema, Vec::<u8>::new()).unwrap();
    encoder.write_entries(entries.clone()).unwrap();
    let bytes = encoder.finish().sink;

    let decoder = Decoder::new(&schema, MemorySource::new(bytes), Limits::default()).unwrap();
    let decoded: Vec<Entry> = decoder.collect::<framecodec_format::Result<Vec<_>>>().unwrap();
    assert_eq!(decoded, entries);
}

#[test]
fn custom_header_round_trips() {
    let schema = Schema::new(
        9,
        vec![Block::numeric(0, "x", Primitive::U8)],
        None,
        Some(CustomHeader::new(3, vec![0xAA, 0xBB, 0xCC]).unwrap()),
    )
    .unwrap();

    let mut encoder = Encoder::new(&schema, Vec::<u8>::new()).unwrap();
    encoder.write_entry(&Entry::new(vec![Value::U8(1)])).unwrap();
    let bytes = encoder.finish().sink;
    assert_eq!(&bytes[..4], &[9, 0xAA, 0xBB, 0xCC]);

    let decoder = Decoder::new(&schema, MemorySource::new(bytes), Limits::default()).unwrap();
    let decoded: Vec<Entry> = decoder.collect::<framecodec_format::Result<Vec<_>>>().unwrap();
    assert_eq!(decoded, vec![Entry::new(vec![Value::U8(1)])]);
}

#[test]
fn decoding_with_wrong_schema_version_fails() {
    let schema_v1 = Schema::new(1, vec![Block::numeric(0, "x", Primitive::U8)], None, None).unwrap();
    let schema_v2 = Schema::new(2, vec![Block::numeric(0, "x", Primitive::U8)], None, None).unwrap();

    let mut encoder = Encoder::new(&schema_v1, Vec::<u8>::new()).unwrap();
    encoder.write_entry(&Entry::new(vec![Value::U8(7)])).unwrap();
    let bytes = encoder.finish().sink;

    let result = Decoder::new(&schema_v2, MemorySource::new(bytes), Limits::default());
    assert!(result.is_err());
}
