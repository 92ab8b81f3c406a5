//! Error types for the framecodec wire format

use thiserror::Error;

/// Errors raised by schema construction, block/compression codecs, and the
/// encoder/decoder state machine.
///
/// `ShortRead` is deliberately absent: per the decoder's contract, a short
/// read mid-entry ends iteration cleanly rather than surfacing as an error.
#[derive(Debug, Error)]
pub enum FrameCodecError {
    /// A block or compression codec was asked to handle a primitive it does
    /// not support.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// A block or compression codec produced a byte count that disagreed
    /// with its declared `byte_length` / `p_frame_byte_length`.
    #[error("length mismatch: {what} expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// What was being encoded (field/property name or kind).
        what: String,
        /// The declared length.
        expected: usize,
        /// The length actually produced.
        actual: usize,
    },
    /// The decoder's header parse found a version the active schema(s)
    /// rejected via `validate_version`.
    #[error("version mismatch: stream version {0} not accepted by schema")]
    VersionMismatch(u8),
    /// `cast_to_entry` / `cast_from_entry` failed to find or type-check a
    /// named property on a record.
    #[error("property binding failure on `{0}`: {1}")]
    PropertyBindingFailure(String, String),
    /// Schema JSON text failed to parse or did not match the expected shape.
    #[error("malformed schema JSON: {0}")]
    MalformedJson(String),
    /// A block or compression `"type"` in schema JSON matched no built-in
    /// kind and no extension hook claimed it.
    #[error("unknown block/compression kind: {0}")]
    UnknownKind(String),
    /// The caller supplied custom header bytes whose length did not match
    /// the schema's declared `CustomHeader.byte_length`.
    #[error("custom header length mismatch: declared {declared}, got {actual}")]
    CustomInfoLengthMismatch {
        /// Declared length from the schema.
        declared: usize,
        /// Length of the bytes actually supplied.
        actual: usize,
    },
    /// A configured `Limits` bound was exceeded while constructing a schema
    /// or decoding a stream.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// A schema invariant was violated (duplicate index/property name, bad
    /// cadence, etc.) at construction time.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Underlying sink/source I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Anything else that does not fit the taxonomy above.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias used throughout the framecodec crates.
pub type Result<T> = std::result::Result<T, FrameCodecError>;
