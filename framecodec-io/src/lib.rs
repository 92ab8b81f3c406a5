//! Stream-level I/O: the [`Encoder`]/[`Decoder`] pair that own cadence state
//! across many entries, plus the [`backends`] a caller plugs into them.
//!
//! `framecodec-codec` handles one entry at a time and knows nothing about
//! version bytes, custom headers, or I-frame cadence across a whole
//! stream; this crate adds exactly that, and supplies the concrete
//! `Sink`/`Source` implementations (in-memory, OS file) a caller needs to
//! actually move bytes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backends;
pub mod reader;
pub mod writer;

pub use backends::{FileSink, FileSource, MemorySource};
pub use reader::{Decoder, DecoderMetrics};
pub use writer::{Encoder, EncoderFinish, EncoderMetrics};
