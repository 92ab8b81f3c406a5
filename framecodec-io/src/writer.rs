//! Stream-level [`Encoder`]: writes the version byte and optional custom
//! header once, then walks entries honoring I-frame/P-frame cadence,
//! delegating each entry to `framecodec_codec::encode_entry`.

use framecodec_codec::{encode_entry, ExtensionRegistry, Sink};
use framecodec_format::{Entry, FrameCodecError, Result, Schema};

/// Byte/entry counters accumulated over an `Encoder`'s lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncoderMetrics {
    /// Number of entries written via [`Encoder::write_entry`].
    pub entries_written: u64,
    /// Total bytes written to the sink, including the header.
    pub bytes_written: u64,
}

/// The sink plus final metrics snapshot returned by [`Encoder::finish`].
pub struct EncoderFinish<S> {
    /// The sink, released back to the caller.
    pub sink: S,
    /// Final metrics.
    pub metrics: EncoderMetrics,
}

/// Writes a header (version byte, optional custom header bytes) once, then
/// one entry at a time, tracking I-frame cadence and the previous entry
/// needed to drive P-frame compression.
///
/// Borrows the schema for its lifetime and owns the sink exclusively, per
/// the concurrency/resource model: dropping the `Encoder` releases the sink.
/// The sink lives behind an `Option` so [`Encoder::finish`] can move it out
/// of a type that also implements `Drop`.
pub struct Encoder<'s, S: Sink> {
    schema: &'s Schema,
    sink: Option<S>,
    registry: ExtensionRegistry,
    prev: Option<Entry>,
    cadence_counter: u32,
    entries_written: u64,
    bytes_written: u64,
    finished: bool,
}

/// Adapter that counts bytes as they pass through to an inner `&mut S`,
/// so `write_entry` can track `bytes_written` without `encode_entry` itself
/// reporting a byte count.
struct CountingSink<'a, S: Sink> {
    inner: &'a mut S,
    count: u64,
}

impl<'a, S: Sink> Sink for CountingSink<'a, S> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_bytes(bytes)?;
        self.count += bytes.len() as u64;
        Ok(())
    }
}

impl<'s, S: Sink> Encoder<'s, S> {
    /// Construct an encoder, writing the version byte and any custom header
    /// bytes the schema declares.
    pub fn new(schema: &'s Schema, sink: S) -> Result<Self> {
        Self::with_registry(schema, sink, ExtensionRegistry::new())
    }

    /// Same as [`Self::new`], with a caller-supplied extension registry for
    /// `Custom` block/compression kinds.
    pub fn with_registry(schema: &'s Schema, mut sink: S, registry: ExtensionRegistry) -> Result<Self> {
        let mut bytes_written = 0u64;
        sink.write_bytes(&[schema.version()])?;
        bytes_written += 1;
        if let Some(header) = schema.custom_header() {
            sink.write_bytes(&header.info)?;
            bytes_written += header.info.len() as u64;
        }
        Ok(Encoder {
            schema,
            sink: Some(sink),
            registry,
            prev: None,
            cadence_counter: 0,
            entries_written: 0,
            bytes_written,
            finished: false,
        })
    }

    fn is_i_frame(&self) -> bool {
        match self.schema.stream_compression() {
            None => true,
            Some(_) => self.cadence_counter == 0,
        }
    }

    /// Write one entry, honoring I-frame/P-frame cadence.
    pub fn write_entry(&mut self, entry: &Entry) -> Result<()> {
        if entry.len() != self.schema.blocks().len() {
            return Err(FrameCodecError::InvalidSchema(format!(
                "entry has {} values but schema declares {} blocks",
                entry.len(),
                self.schema.blocks().len()
            )));
        }

        let is_i_frame = self.is_i_frame();
        let sink = self
            .sink
            .as_mut()
            .expect("sink only ever taken by finish(), which consumes self");
        let mut counting = CountingSink { inner: sink, count: 0 };
        encode_entry(
            &mut counting,
            self.schema,
            self.prev.as_ref(),
            is_i_frame,
            entry,
            &self.registry,
        )?;
        self.bytes_written += counting.count;

        self.entries_written += 1;
        self.prev = Some(entry.clone());
        if let Some(cadence) = self.schema.stream_compression() {
            self.cadence_counter += 1;
            if self.cadence_counter == cadence.i_frame_interval {
                self.cadence_counter = 0;
            }
        }
        Ok(())
    }

    /// Write a whole sequence of entries in order.
    pub fn write_entries<I: IntoIterator<Item = Entry>>(&mut self, entries: I) -> Result<()> {
        for entry in entries {
            self.write_entry(&entry)?;
        }
        Ok(())
    }

    /// Snapshot current metrics without consuming the encoder.
    pub fn metrics(&self) -> EncoderMetrics {
        EncoderMetrics {
            entries_written: self.entries_written,
            bytes_written: self.bytes_written,
        }
    }

    /// Release the sink and final metrics. No trailing terminator or footer
    /// is written — the wire format has none; the sink's own EOF/length
    /// stands in for the end of the stream.
    pub fn finish(mut self) -> EncoderFinish<S> {
        self.finished = true;
        let metrics = self.metrics();
        let sink = self.sink.take().expect("sink only ever taken once, here");
        EncoderFinish { sink, metrics }
    }
}

impl<'s, S: Sink> Drop for Encoder<'s, S> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        if !self.finished {
            eprintln!("Encoder dropped without calling finish() — sink may be incomplete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecodec_format::{Block, Primitive, Value};

    #[test]
    fn encodes_header_then_entries() {
        let schema = Schema::new(
            1,
            vec![
                Block::numeric(0, "x", Primitive::U8),
                Block::numeric(1, "y", Primitive::U8),
            ],
            None,
            None,
        )
        .unwrap();

        let mut encoder = Encoder::new(&schema, Vec::<u8>::new()).unwrap();
        encoder
            .write_entry(&Entry::new(vec![Value::U8(10), Value::U8(20)]))
            .unwrap();
        let finish = encoder.finish();
        assert_eq!(finish.sink, vec![0x01, 10, 20]);
        assert_eq!(finish.metrics.entries_written, 1);
        assert_eq!(finish.metrics.bytes_written, 3);
    }

    #[test]
    fn empty_entry_sequence_writes_header_only() {
        let schema = Schema::new(5, vec![Block::numeric(0, "x", Primitive::U8)], None, None).unwrap();
        let encoder = Encoder::new(&schema, Vec::<u8>::new()).unwrap();
        let finish = encoder.finish();
        assert_eq!(finish.sink, vec![0x05]);
    }
}
