//! Wire-format constants

/// Field/entry terminator byte for variable-length blocks.
///
/// Variable-length payloads must not contain this byte; encoders do not
/// escape it and decoders do not unescape it (see `Schema`'s module docs).
pub const TERMINATOR: u8 = 0x00;

/// JSON `"type"` name for a numeric block.
pub const KIND_NUMERIC: &str = "Numeric";
/// JSON `"type"` name for a raw-bytes block.
pub const KIND_BYTES: &str = "Bytes";
/// JSON `"type"` name for a string block.
pub const KIND_STRING: &str = "String";

/// JSON `"compression"` name for carry-forward-only compression.
pub const COMPRESSION_IFRAME_ONLY: &str = "IFrameOnly";
/// JSON `"compression"` name for numeric delta compression.
pub const COMPRESSION_NUMERIC_DELTA: &str = "NumericDelta";
/// JSON `"compression"` value meaning "no compression on this block".
pub const COMPRESSION_NONE: &str = "";
