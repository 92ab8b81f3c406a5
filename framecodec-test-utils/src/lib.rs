//! Test-only helpers shared across the framecodec crates: builders for ad
//! hoc schemas/entries and `proptest` strategies for generating arbitrary
//! ones. This crate has no I/O dependency and no runtime role outside tests.

use framecodec_format::{
    Block, Compression, CustomHeader, Entry, FrameCodecError, Limits, Primitive, Result, Schema,
    StreamCompression, StringEncoding, Value,
};
use proptest::prelude::*;

/// Fluent builder for constructing schemas in tests without hand-writing
/// `Block::index` bookkeeping.
#[derive(Default)]
pub struct SchemaBuilder {
    version: u8,
    blocks: Vec<Block>,
    i_frame_interval: Option<u32>,
    custom_header_info: Option<Vec<u8>>,
}

impl SchemaBuilder {
    /// Start a new builder with the given version byte.
    pub fn new(version: u8) -> Self {
        SchemaBuilder {
            version,
            ..Default::default()
        }
    }

    /// Append a fixed-width numeric block.
    pub fn numeric(mut self, property_name: &str, primitive: Primitive) -> Self {
        let index = self.blocks.len();
        self.blocks.push(Block::numeric(index, property_name, primitive));
        self
    }

    /// Append a numeric block with delta compression attached.
    pub fn numeric_compressed(mut self, property_name: &str, primitive: Primitive, compression: Compression) -> Self {
        let index = self.blocks.len();
        self.blocks
            .push(Block::numeric(index, property_name, primitive).with_compression(compression));
        self
    }

    /// Append a variable-length raw-bytes block.
    pub fn bytes(mut self, property_name: &str) -> Self {
        let index = self.blocks.len();
        self.blocks.push(Block::bytes(index, property_name));
        self
    }

    /// Append a variable-length string block in the given encoding.
    pub fn string(mut self, property_name: &str, encoding: StringEncoding) -> Self {
        let index = self.blocks.len();
        self.blocks.push(Block::string(index, property_name, encoding));
        self
    }

    /// Enable stream-wide I-frame/P-frame cadence.
    pub fn stream_compression(mut self, i_frame_interval: u32) -> Self {
        self.i_frame_interval = Some(i_frame_interval);
        self
    }

    /// Attach a fixed-length custom header.
    pub fn custom_header(mut self, info: Vec<u8>) -> Self {
        self.custom_header_info = Some(info);
        self
    }

    /// Build the schema, validating all invariants.
    pub fn build(self) -> Result<Schema> {
        let stream_compression = self
            .i_frame_interval
            .map(StreamCompression::new)
            .transpose()?;
        let custom_header = self
            .custom_header_info
            .map(|info| CustomHeader::new(info.len(), info))
            .transpose()?;
        Schema::new(self.version, self.blocks, stream_compression, custom_header)
    }
}

/// Compare two entry sequences, panicking with the first differing index and
/// its values if they disagree.
pub fn assert_entries_equal(expected: &[Entry], actual: &[Entry]) {
    if expected.len() != actual.len() {
        panic!(
            "entry count mismatch: expected {} entries, got {}",
            expected.len(),
            actual.len()
        );
    }
    for (i, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
        assert_eq!(e, a, "entry {i} did not round-trip");
    }
}

/// All primitives, as a `proptest` strategy.
pub fn arb_primitive() -> impl Strategy<Value = Primitive> {
    prop::sample::select(Primitive::ALL.to_vec())
}

/// An integer-ish (non-float) primitive, suitable as the `original`/`delta`
/// side of `NumericDelta`.
pub fn arb_int_primitive() -> impl Strategy<Value = Primitive> {
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

/// All string encodings, as a `proptest` strategy.
pub fn arb_string_encoding() -> impl Strategy<Value = StringEncoding> {
    prop::sample::select(vec![
        StringEncoding::Ascii,
        StringEncoding::Latin1,
        StringEncoding::Utf16Le,
        StringEncoding::Utf16Be,
        StringEncoding::Utf8,
        StringEncoding::Utf32Le,
    ])
}

/// A value matching `primitive`.
pub fn arb_value_for_primitive(primitive: Primitive) -> BoxedStrategy<Value> {
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

/// A `Bytes` payload with no embedded `0x00` terminator byte, honoring a
/// `Limits::max_variable_length_payload` bound.
pub fn arb_bytes_payload(limits: &Limits) -> BoxedStrategy<Vec<u8>> {
    let max_len = limits.max_variable_length_payload.min(64);
    prop::collection::vec(1u8..=255, 0..=max_len).boxed()
}

/// A `String` payload encodable by any of the built-in encodings (the
/// printable ASCII range only, to keep generation simple and
/// encoding-agnostic) honoring a length bound.
pub fn arb_string_payload(limits: &Limits) -> BoxedStrategy<String> {
    let max_len = limits.max_variable_length_payload.min(16);
    prop::collection::vec(1u32..=0x7Eu32, 0..=max_len)
        .prop_map(|codes| codes.into_iter().filter_map(char::from_u32).collect())
        .boxed()
}

/// Generate a value consistent with `block`'s kind, suitable for building an
/// `Entry`. Panics on `Custom` block kinds (the extension registry decides
/// their values; this helper only covers built-ins).
pub fn arb_value_for_block(block: &Block, limits: &Limits) -> BoxedStrategy<Value> {
    use framecodec_format::BlockKind;
    match &block.kind {
        BlockKind::Numeric(p) => arb_value_for_primitive(*p),
        BlockKind::Bytes => arb_bytes_payload(limits).prop_map(Value::Bytes).boxed(),
        BlockKind::String(_enc) => arb_string_payload(limits).prop_map(Value::String).boxed(),
        BlockKind::Custom { name, .. } => {
            panic!("arb_value_for_block has no generator for custom block `{name}`")
        }
    }
}

/// Generate a sequence of entries compatible with `schema`'s block list,
/// each value drawn from [`arb_value_for_block`].
pub fn arb_entries_for_schema(schema: &Schema, max_entries: usize, limits: &Limits) -> impl Strategy<Value = Vec<Entry>> {
    let per_entry = schema
        .blocks()
        .iter()
        .map(|b| arb_value_for_block(b, limits))
        .collect::<Vec<_>>();
    prop::collection::vec(per_entry, 0..=max_entries).prop_map(|rows| rows.into_iter().map(Entry::new).collect())
}

/// Validate that a property lookup failed with the expected error kind (a
/// small helper to keep assertion call sites terse).
pub fn assert_is_property_binding_failure(result: &Result<Value>) {
    match result {
        Err(FrameCodecError::PropertyBindingFailure(..)) => {}
        other => panic!("expected PropertyBindingFailure, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecodec_format::Primitive;

    #[test]
    fn schema_builder_assigns_sequential_indices() {
        let schema = SchemaBuilder::new(1)
            .numeric("x", Primitive::U8)
            .numeric("y", Primitive::U8)
            .bytes("payload")
            .build()
            .unwrap();
        let indices: Vec<usize> = schema.blocks().iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn schema_builder_applies_cadence_and_header() {
        let schema = SchemaBuilder::new(2)
            .numeric("x", Primitive::U8)
            .stream_compression(3)
            .custom_header(vec![0xDE, 0xAD])
            .build()
            .unwrap();
        assert_eq!(schema.stream_compression().unwrap().i_frame_interval, 3);
        assert_eq!(schema.custom_header().unwrap().info, vec![0xDE, 0xAD]);
    }
}
