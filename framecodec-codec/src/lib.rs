//! Entry-level encode/decode engine.
//!
//! This crate implements component 4 of the design: the state machine that
//! walks a schema's blocks in index order for one entry at a time,
//! honoring I-frame/P-frame cadence and dispatching each field to its
//! block codec or, for P-frames on compressed fields, its compression
//! codec (both defined in `framecodec-format`). It also hosts the registry
//! through which callers plug in behavior for `Custom` block/compression
//! kinds.
//!
//! Byte movement is abstracted behind the [`Sink`]/[`Source`] traits so
//! this crate has no file or network I/O of its own; `framecodec-io`
//! supplies concrete backends and the stream-level `Encoder`/`Decoder`
//! that own cadence state across many entries.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entry_codec;
pub mod extension;
pub mod sink;
pub mod source;

pub use entry_codec::{decode_entry, encode_entry};
pub use extension::ExtensionRegistry;
pub use sink::Sink;
pub use source::{SliceSource, Source};
