//! Wire-format primitives for the schema-driven entry codec: no I/O.
//!
//! This crate covers components 1–3 and 5 of the design (block codec,
//! compression codec, schema, and schema JSON persistence). The
//! entry-level encode/decode state machine that walks I-frame/P-frame
//! cadence lives in `framecodec-codec`; streaming over actual sinks and
//! sources lives in `framecodec-io`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod binding;
pub mod block;
pub mod compression;
pub mod constants;
pub mod entry;
pub mod error;
pub mod limits;
pub mod multi_version;
pub mod schema;
pub mod schema_json;
pub mod value;

pub use binding::{PropertyBinding, RecordBinding};
pub use block::{Block, BlockKind};
pub use compression::{Compression, CompressionKind};
pub use entry::Entry;
pub use error::{FrameCodecError, Result};
pub use limits::Limits;
pub use multi_version::MultiVersionSchema;
pub use schema::{CustomHeader, Schema, StreamCompression};
pub use value::{Primitive, StringEncoding, Value};
