//! Snapshot stream compression
//!
//! A decorator around the raw frame stream. The frame codec only sees a
//! `Write`/`Read`; whether the bytes on disk are gzip-compressed is decided
//! here. Checksums are always taken over the on-disk bytes.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// Byte-stream transform applied to snapshot files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Frames are written to disk as-is
    #[default]
    None,

    /// Frames are wrapped in a gzip stream (level 0..=9)
    Gzip { level: u32 },
}

impl Compression {
    /// Gzip at the flate2 default level
    pub fn gzip() -> Self {
        Compression::Gzip { level: 6 }
    }

    /// Wrap a sink so that bytes written go through this transform
    pub fn wrap_writer<W: Write>(self, inner: W) -> CompressedWriter<W> {
        match self {
            Compression::None => CompressedWriter::Plain(inner),
            Compression::Gzip { level } => {
                CompressedWriter::Gzip(GzEncoder::new(inner, flate2::Compression::new(level)))
            }
        }
    }

    /// Wrap a source so that bytes read are undone by this transform
    pub fn wrap_reader<R: Read>(self, inner: R) -> CompressedReader<R> {
        match self {
            Compression::None => CompressedReader::Plain(inner),
            Compression::Gzip { .. } => CompressedReader::Gzip(GzDecoder::new(inner)),
        }
    }
}

/// Write half of the transform
pub enum CompressedWriter<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Flush any buffered state (gzip trailer included) and hand back the
    /// underlying sink
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressedWriter::Plain(mut w) => {
                w.flush()?;
                Ok(w)
            }
            CompressedWriter::Gzip(encoder) => {
                let mut w = encoder.finish()?;
                w.flush()?;
                Ok(w)
            }
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::Plain(w) => w.write(buf),
            CompressedWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(w) => w.flush(),
            CompressedWriter::Gzip(w) => w.flush(),
        }
    }
}

/// Read half of the transform
pub enum CompressedReader<R: Read> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read> Read for CompressedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CompressedReader::Plain(r) => r.read(buf),
            CompressedReader::Gzip(r) => r.read(buf),
        }
    }
}
