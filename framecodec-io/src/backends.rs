//! Concrete `Sink`/`Source` backends: in-memory buffers and OS files.
//!
//! `framecodec-codec` already gives `Vec<u8>` a `Sink` impl and a borrowed
//! `SliceSource`; the types here round that surface out to the two backends
//! the spec calls for: an owned in-memory source with a start offset, and
//! OS-file-backed sink/source with `seek`/`position` and flush-on-drop.

use framecodec_codec::{Sink, Source};
use framecodec_format::{FrameCodecError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// An owned in-memory byte sequence, optionally starting mid-buffer.
///
/// Unlike `framecodec_codec::SliceSource`, which borrows, this type owns its
/// bytes so it can be built from a freshly-read file or a freshly-allocated
/// `Vec<u8>` without fighting a lifetime.
pub struct MemorySource {
    bytes: Vec<u8>,
    pos: usize,
}

impl MemorySource {
    /// Wrap `bytes` for sequential reading from the start.
    pub fn new(bytes: Vec<u8>) -> Self {
        MemorySource { bytes, pos: 0 }
    }

    /// Wrap `bytes` for sequential reading starting at `offset`.
    pub fn with_offset(bytes: Vec<u8>, offset: usize) -> Self {
        let pos = offset.min(bytes.len());
        MemorySource { bytes, pos }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Source for MemorySource {
    fn can_read(&mut self) -> bool {
        self.pos < self.bytes.len()
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let end = (self.pos + n).min(self.bytes.len());
        let chunk = self.bytes[self.pos..end].to_vec();
        self.pos = end;
        Ok(chunk)
    }
}

/// A `File`-backed sink, buffered, with `seek`/`position` access and a
/// flush-on-drop guarantee: if the caller never calls [`FileSink::finish`],
/// the destructor still flushes the underlying `BufWriter` best-effort so no
/// buffered bytes are silently lost on scope exit.
pub struct FileSink {
    writer: BufWriter<File>,
    finished: bool,
}

impl FileSink {
    /// Create (truncating) the file at `path` for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(FileSink {
            writer: BufWriter::new(file),
            finished: false,
        })
    }

    /// Wrap an already-open file.
    pub fn from_file(file: File) -> Self {
        FileSink {
            writer: BufWriter::new(file),
            finished: false,
        }
    }

    /// Seek the underlying file.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.writer.seek(pos)?)
    }

    /// Current write position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.writer.stream_position()?)
    }

    /// Flush and release the underlying file.
    pub fn finish(mut self) -> Result<File> {
        self.writer.flush()?;
        self.finished = true;
        self.writer
            .into_inner()
            .map_err(|e| FrameCodecError::Io(e.into_error()))
    }
}

impl Sink for FileSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.writer.flush();
        }
    }
}

/// A `File`-backed source, buffered, with `seek`/`position` access.
pub struct FileSource {
    reader: BufReader<File>,
}

impl FileSource {
    /// Open `path` for reading from the start.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(FileSource {
            reader: BufReader::new(file),
        })
    }

    /// Wrap an already-open file.
    pub fn from_file(file: File) -> Self {
        FileSource {
            reader: BufReader::new(file),
        }
    }

    /// Seek the underlying file.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.reader.seek(pos)?)
    }

    /// Current read position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }
}

impl Source for FileSource {
    fn can_read(&mut self) -> bool {
        matches!(self.reader.fill_buf(), Ok(buf) if !buf.is_empty())
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut total = 0;
        while total < n {
            let read = self.reader.read(&mut buf[total..])?;
            if read == 0 {
                break;
            }
            total += read;
        }
        buf.truncate(total);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_with_offset_skips_leading_bytes() {
        let mut source = MemorySource::with_offset(vec![1, 2, 3, 4], 2);
        assert_eq!(source.read_bytes(2).unwrap(), vec![3, 4]);
        assert!(!source.can_read());
    }

    #[test]
    fn file_sink_and_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.bin");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_bytes(&[1, 2, 3]).unwrap();
        sink.finish().unwrap();

        let mut source = FileSource::open(&path).unwrap();
        assert!(source.can_read());
        assert_eq!(source.read_bytes(3).unwrap(), vec![1, 2, 3]);
        assert!(!source.can_read());
        assert_eq!(source.read_bytes(1).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn file_sink_flushes_on_drop_without_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.bin");
        {
            let mut sink = FileSink::create(&path).unwrap();
            sink.write_bytes(&[9, 9, 9]).unwrap();
        }
        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.read_bytes(3).unwrap(), vec![9, 9, 9]);
    }
}
