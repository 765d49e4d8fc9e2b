//! Bounds-checked cursor over a frame body.
//!
//! All payload layout walks a `BodyCursor` instead of aliasing packed
//! structs onto the buffer: every field is decoded from bytes at its wire
//! offset with the stream's byte order, so no alignment or in-place
//! byte-swapping concerns exist.  Overrunning the body is reported as
//! `BadData`, which enforces the sum-of-sub-regions invariant directly.

use crate::byte_order::ByteOrder;
use crate::error::DgmError;

#[derive(Debug)]
pub(crate) struct BodyCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> BodyCursor<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    /// Reinterpret the remaining bytes under a different byte order.
    ///
    /// HISAS records are little-endian regardless of the order of the
    /// surrounding EMX stream.
    pub fn with_order(&self, order: ByteOrder) -> BodyCursor<'a> {
        BodyCursor {
            buf: self.buf,
            pos: self.pos,
            order,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `count` bytes, failing if they extend past the body.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8], DgmError> {
        if count > self.remaining() {
            return Err(DgmError::bad_data(format!(
                "field of {} bytes at offset {} extends past end of body ({} bytes)",
                count,
                self.pos,
                self.buf.len()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn skip(&mut self, count: usize) -> Result<(), DgmError> {
        self.take(count).map(|_| ())
    }

    /// Skip to an absolute offset, as dictated by a declared sub-header
    /// size that may exceed the fields known to this decoder.
    pub fn seek_to(&mut self, offset: usize) -> Result<(), DgmError> {
        if offset < self.pos || offset > self.buf.len() {
            return Err(DgmError::bad_data(format!(
                "declared block end {} outside body (position {}, length {})",
                offset,
                self.pos,
                self.buf.len()
            )));
        }
        self.pos = offset;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DgmError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, DgmError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DgmError> {
        let bytes = self.take(2)?;
        Ok(self.order.read_u16(bytes))
    }

    pub fn read_i16(&mut self) -> Result<i16, DgmError> {
        let bytes = self.take(2)?;
        Ok(self.order.read_i16(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32, DgmError> {
        let bytes = self.take(4)?;
        Ok(self.order.read_u32(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32, DgmError> {
        let bytes = self.take(4)?;
        Ok(self.order.read_i32(bytes))
    }

    pub fn read_f32(&mut self) -> Result<f32, DgmError> {
        let bytes = self.take(4)?;
        Ok(self.order.read_f32(bytes))
    }

    pub fn read_f64(&mut self) -> Result<f64, DgmError> {
        let bytes = self.take(8)?;
        Ok(self.order.read_f64(bytes))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, DgmError> {
        Ok(self.take(count)?.to_vec())
    }

    pub fn read_i8_array(&mut self, count: usize) -> Result<Vec<i8>, DgmError> {
        Ok(self.take(count)?.iter().map(|&b| b as i8).collect())
    }

    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>, DgmError> {
        let bytes = self.take(count * 2)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|chunk| self.order.read_u16(chunk))
            .collect())
    }

    pub fn read_i16_array(&mut self, count: usize) -> Result<Vec<i16>, DgmError> {
        let bytes = self.take(count * 2)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|chunk| self.order.read_i16(chunk))
            .collect())
    }

    pub fn read_f32_array(&mut self, count: usize) -> Result<Vec<f32>, DgmError> {
        let bytes = self.take(count * 4)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| self.order.read_f32(chunk))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_reads() {
        let buf = [0x02, 0x00, 0x01, 0x00, 0x00, 0x00];
        let mut cursor = BodyCursor::new(&buf, ByteOrder::LittleEndian);
        assert_eq!(cursor.read_u16().unwrap(), 2);
        assert_eq!(cursor.read_u32().unwrap(), 1);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_overrun_is_bad_data() {
        let buf = [0u8; 3];
        let mut cursor = BodyCursor::new(&buf, ByteOrder::LittleEndian);
        assert!(matches!(cursor.read_u32(), Err(DgmError::BadData { .. })));
    }

    #[test]
    fn test_seek_to_is_forward_only() {
        let buf = [0u8; 8];
        let mut cursor = BodyCursor::new(&buf, ByteOrder::LittleEndian);
        cursor.seek_to(4).unwrap();
        assert!(cursor.seek_to(2).is_err());
        assert!(cursor.seek_to(9).is_err());
    }

    #[test]
    fn test_order_switch_keeps_position() {
        let buf = [0x12, 0x34, 0x56, 0x78];
        let mut cursor = BodyCursor::new(&buf, ByteOrder::BigEndian);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        let mut le = cursor.with_order(ByteOrder::LittleEndian);
        assert_eq!(le.read_u16().unwrap(), 0x7856);
    }
}
