//! Frame codec
//!
//! Packs a single key-value pair into a length-prefixed frame and reads
//! frames back off a byte stream.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────┬────────────┬─────────┬──────────────┬───────────┐
//! │FrameLen (4)  │ KeyLen (4) │   Key   │ ValueLen (4) │   Value   │
//! └──────────────┴────────────┴─────────┴──────────────┴───────────┘
//! ```
//!
//! `FrameLen` counts the key and value length fields plus their payloads,
//! but not itself: `FrameLen == 8 + KeyLen + ValueLen`.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, SnapKvError};

/// Size of each length field
pub const LEN_FIELD_SIZE: usize = 4;

/// Bytes of length fields carried by every frame (frame + key + value)
pub const FRAME_OVERHEAD: usize = 3 * LEN_FIELD_SIZE;

/// Portion of `FrameLen` taken by the key and value length fields
const INNER_LEN_FIELDS: u64 = 2 * LEN_FIELD_SIZE as u64;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a key-value pair into a new frame buffer
pub fn encode(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(FRAME_OVERHEAD + key.len() + value.len());
    encode_into(&mut buf, key, value)?;
    Ok(buf)
}

/// Encode a key-value pair straight into a writer
///
/// Returns the number of bytes written.
pub fn encode_into<W: Write>(writer: &mut W, key: &[u8], value: &[u8]) -> Result<usize> {
    let key_len = field_len(key.len())?;
    let value_len = field_len(value.len())?;

    let frame_len = INNER_LEN_FIELDS + key_len as u64 + value_len as u64;
    let frame_len =
        u32::try_from(frame_len).map_err(|_| SnapKvError::FrameTooLarge(frame_len as usize))?;

    writer.write_all(&frame_len.to_le_bytes())?;
    writer.write_all(&key_len.to_le_bytes())?;
    writer.write_all(key)?;
    writer.write_all(&value_len.to_le_bytes())?;
    writer.write_all(value)?;

    Ok(FRAME_OVERHEAD + key.len() + value.len())
}

fn field_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| SnapKvError::FrameTooLarge(len))
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the next frame from a stream
///
/// Returns:
/// - `Ok(Some((key, value)))`: a complete, consistent frame
/// - `Ok(None)`: clean end of stream (nothing left before the first field)
/// - `Err(ShortRead)`: the stream ended inside a frame
/// - `Err(SizeMismatch)`: declared frame length disagrees with its fields
pub fn decode_next<R: Read>(reader: &mut R) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
    let mut len_buf = [0u8; LEN_FIELD_SIZE];

    // Only a zero-byte read here is a clean end of stream.
    let n = read_full(reader, &mut len_buf)?;
    if n == 0 {
        return Ok(None);
    }
    check_read(LEN_FIELD_SIZE, n)?;
    let frame_len = u32::from_le_bytes(len_buf) as u64;

    let key_len = read_len(reader)?;
    // Reject before allocating: no value length can make this consistent.
    if INNER_LEN_FIELDS + key_len as u64 > frame_len {
        return Err(SnapKvError::SizeMismatch {
            declared: frame_len,
            actual: INNER_LEN_FIELDS + key_len as u64,
        });
    }
    let key = read_bytes(reader, key_len as usize)?;

    let value_len = read_len(reader)?;
    let actual = INNER_LEN_FIELDS + key_len as u64 + value_len as u64;
    if actual != frame_len {
        return Err(SnapKvError::SizeMismatch {
            declared: frame_len,
            actual,
        });
    }
    let value = read_bytes(reader, value_len as usize)?;

    Ok(Some((key, value)))
}

fn read_len<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; LEN_FIELD_SIZE];
    let n = read_full(reader, &mut buf)?;
    check_read(LEN_FIELD_SIZE, n)?;
    Ok(u32::from_le_bytes(buf))
}

/// Grows with the bytes that arrive, not with the declared length.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    check_read(len, buf.len())?;
    Ok(buf)
}

fn check_read(expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(SnapKvError::ShortRead { expected, actual });
    }
    Ok(())
}

/// Like `read_exact`, but reports how many bytes arrived before EOF
/// instead of discarding that count.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// =============================================================================
// Frame Iterator
// =============================================================================

/// Iterator over the frames of a stream
///
/// Yields `Ok((key, value))` per frame and stops at a clean end of stream.
/// After yielding an error it yields nothing further.
pub struct FrameReader<R> {
    reader: R,
    done: bool,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
            frames_read: 0,
        }
    }

    /// Number of frames successfully decoded so far
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match decode_next(&mut self.reader) {
            Ok(Some(entry)) => {
                self.frames_read += 1;
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

impl<R: Read> std::iter::FusedIterator for FrameReader<R> {}
