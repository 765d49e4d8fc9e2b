//! Bounded I/O helpers and the reusable frame buffer.

use crate::error::DgmError;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Outcome of a bounded read at a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadOutcome {
    /// The buffer was filled completely.
    Full,
    /// Zero bytes were available: clean end of stream.
    Eof,
}

/// Read exactly `buf.len()` bytes, retrying on interruption.
///
/// Distinguishes three outcomes: a full read, a clean EOF with zero bytes
/// read, and a short read.  A short read means the stream ended inside a
/// frame, which callers treat as a corrupt stream.
pub(crate) fn read_frame_bytes<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<ReadOutcome, DgmError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(ReadOutcome::Eof);
                }
                return Err(DgmError::bad_data(format!(
                    "unexpected end of file ({} of {} bytes read)",
                    filled,
                    buf.len()
                )));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DgmError::read(e)),
        }
    }
    Ok(ReadOutcome::Full)
}

/// Seek forward by `count` bytes relative to the current position.
///
/// Used to skip bulky datagram bodies when a record-type filter is
/// enabled; seeking past the body beats reading it on most storage.
pub(crate) fn skip_forward<R: Seek>(reader: &mut R, count: u64) -> Result<(), DgmError> {
    reader
        .seek(SeekFrom::Current(count as i64))
        .map_err(DgmError::seek)?;
    Ok(())
}

/// Reusable frame buffer with an at-least-N growth policy.
///
/// Grown to `ceil(1.5 * required)` whenever the requirement exceeds the
/// current capacity.  The old contents are discarded on growth; a frame
/// never outlives the `read` call that produced it, so there is nothing
/// to copy.  Capacity grows monotonically and is released on drop.
#[derive(Debug, Default)]
pub(crate) struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Make the buffer exactly `required` bytes long, growing the
    /// allocation if needed, and return it for filling.
    pub fn prepare(&mut self, required: usize) -> Result<&mut [u8], DgmError> {
        if required > self.buf.capacity() {
            let new_capacity = required + (required + 1) / 2;
            self.buf = Vec::new();
            self.buf
                .try_reserve_exact(new_capacity)
                .map_err(|e| DgmError::OutOfMemory {
                    message: format!("frame buffer of {} bytes: {}", new_capacity, e),
                })?;
        }
        self.buf.clear();
        self.buf.resize(required, 0);
        Ok(&mut self.buf)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_frame_bytes_full() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 4];
        let outcome = read_frame_bytes(&mut cursor, &mut buf).unwrap();
        assert_eq!(outcome, ReadOutcome::Full);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_read_frame_bytes_clean_eof() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let mut buf = [0u8; 4];
        let outcome = read_frame_bytes(&mut cursor, &mut buf).unwrap();
        assert_eq!(outcome, ReadOutcome::Eof);
    }

    #[test]
    fn test_read_frame_bytes_truncated() {
        let mut cursor = Cursor::new(vec![1u8, 2]);
        let mut buf = [0u8; 4];
        let result = read_frame_bytes(&mut cursor, &mut buf);
        assert!(matches!(result, Err(DgmError::BadData { .. })));
    }

    #[test]
    fn test_frame_buffer_growth_policy() {
        let mut fb = FrameBuffer::new();
        fb.prepare(100).unwrap();
        assert_eq!(fb.capacity(), 150);

        // No growth while the requirement fits.
        fb.prepare(80).unwrap();
        assert_eq!(fb.capacity(), 150);
        assert_eq!(fb.bytes().len(), 80);

        fb.prepare(200).unwrap();
        assert_eq!(fb.capacity(), 300);
    }

    #[test]
    fn test_frame_buffer_odd_growth_rounds_up() {
        let mut fb = FrameBuffer::new();
        fb.prepare(5).unwrap();
        // ceil(1.5 * 5) = 8
        assert_eq!(fb.capacity(), 8);
    }

    #[test]
    fn test_skip_forward() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        skip_forward(&mut cursor, 10).unwrap();
        assert_eq!(cursor.position(), 10);
    }
}
