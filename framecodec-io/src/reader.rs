//! Stream-level [`Decoder`]: reads the version byte and optional custom
//! header once, then lazily yields entries as an iterator, honoring
//! I-frame/P-frame cadence and delegating each entry to
//! `framecodec_codec::decode_entry`.

use framecodec_codec::{decode_entry, ExtensionRegistry, Source};
use framecodec_format::{Entry, FrameCodecError, Limits, Result, Schema};

/// Entry/byte counters accumulated as a [`Decoder`] is driven to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderMetrics {
    /// Number of entries yielded so far.
    pub entries_read: u64,
}

/// Reads a header (version byte, optional custom header bytes) once, then
/// lazily decodes one entry per [`Iterator::next`] call.
///
/// State comprises the I-frame counter, the last decoded entry (needed to
/// drive P-frame decompression), and the source cursor — nothing else
/// carries over between entries.
pub struct Decoder<'s, R: Source> {
    schema: &'s Schema,
    source: R,
    limits: Limits,
    registry: ExtensionRegistry,
    prev: Option<Entry>,
    cadence_counter: u32,
    entries_read: u64,
    done: bool,
}

impl<'s, R: Source> Decoder<'s, R> {
    /// Construct a decoder against a single known schema, reading the
    /// version byte and any declared custom header up front.
    ///
    /// Returns [`FrameCodecError::VersionMismatch`] if the stream's version
    /// byte does not match `schema.version()`, and
    /// [`FrameCodecError::LengthMismatch`] if the stream ends before the
    /// version byte (or custom header) can be read — both are header-parse
    /// failures, distinct from the decoder's entry-level contract where a
    /// short read mid-entry is a clean end of iteration, never an error.
    pub fn new(schema: &'s Schema, source: R, limits: Limits) -> Result<Self> {
        Self::new_with_registry(schema, source, limits, ExtensionRegistry::new())
    }

    /// Same as [`Self::new`], with a caller-supplied extension registry.
    pub fn new_with_registry(
        schema: &'s Schema,
        mut source: R,
        limits: Limits,
        registry: ExtensionRegistry,
    ) -> Result<Self> {
        let version = read_version(&mut source)?;
        if !schema.validate_version(version) {
            return Err(FrameCodecError::VersionMismatch(version));
        }
        read_custom_header(&mut source, schema)?;

        Ok(Decoder {
            schema,
            source,
            limits,
            registry,
            prev: None,
            cadence_counter: 0,
            entries_read: 0,
            done: false,
        })
    }

    /// Construct a decoder that dispatches across several schemas by
    /// version byte, selecting the first one whose `validate_version`
    /// accepts the stream's version and using it for every subsequent
    /// entry (the table itself is consulted only once, at construction).
    pub fn new_multi_version(
        table: &'s framecodec_format::MultiVersionSchema,
        mut source: R,
        limits: Limits,
    ) -> Result<Self> {
        let version = read_version(&mut source)?;
        let schema = table
            .validate_version(version)
            .ok_or(FrameCodecError::VersionMismatch(version))?;
        read_custom_header(&mut source, schema)?;

        Ok(Decoder {
            schema,
            source,
            limits,
            registry: ExtensionRegistry::new(),
            prev: None,
            cadence_counter: 0,
            entries_read: 0,
            done: false,
        })
    }

    /// The schema this decoder settled on after reading the version byte.
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Snapshot current metrics.
    pub fn metrics(&self) -> DecoderMetrics {
        DecoderMetrics {
            entries_read: self.entries_read,
        }
    }

    fn is_i_frame(&self) -> bool {
        match self.schema.stream_compression() {
            None => true,
            Some(_) => self.cadence_counter == 0,
        }
    }
}

fn read_version<R: Source>(source: &mut R) -> Result<u8> {
    let bytes = source.read_bytes(1)?;
    if bytes.len() != 1 {
        return Err(FrameCodecError::LengthMismatch {
            what: "stream version byte".to_string(),
            expected: 1,
            actual: bytes.len(),
        });
    }
    Ok(bytes[0])
}

fn read_custom_header<R: Source>(source: &mut R, schema: &Schema) -> Result<()> {
    let Some(header) = schema.custom_header() else {
        return Ok(());
    };
    let bytes = source.read_bytes(header.byte_length)?;
    if bytes.len() != header.byte_length {
        return Err(FrameCodecError::LengthMismatch {
            what: "custom header".to_string(),
            expected: header.byte_length,
            actual: bytes.len(),
        });
    }
    Ok(())
}

impl<'s, R: Source> Iterator for Decoder<'s, R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let is_i_frame = self.is_i_frame();
        let decoded = decode_entry(
            &mut self.source,
            self.schema,
            self.prev.as_ref(),
            is_i_frame,
            &self.limits,
            &self.registry,
        );

        match decoded {
            Ok(Some(entry)) => {
                self.entries_read += 1;
                if let Err(e) = self.limits.check_entry_count(self.entries_read as usize) {
                    self.done = true;
                    return Some(Err(e));
                }
                self.prev = Some(entry.clone());
                if let Some(cadence) = self.schema.stream_compression() {
                    self.cadence_counter += 1;
                    if self.cadence_counter == cadence.i_frame_interval {
                        self.cadence_counter = 0;
                    }
                }
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
