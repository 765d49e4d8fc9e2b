//! Byte-order primitives.
//!
//! The KMA format is fixed little-endian; the legacy EMX format carries no
//! in-band byte-order mark, so its order is inferred from the first header
//! and then threaded through every field read at run time.  Floats are
//! swapped by bit-for-bit reinterpretation of their IEEE-754
//! representation, never by arithmetic on the float value.

use byteorder::{BigEndian, ByteOrder as ByteOrderTrait, LittleEndian};
use serde::{Deserialize, Serialize};

/// Byte order (endianness) of binary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ByteOrder {
    /// Little-endian (KMA streams, HISAS records, most EMX data in the wild).
    #[default]
    LittleEndian,
    /// Big-endian (EMX streams written by big-endian processing units).
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the host this code was compiled for.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// The opposite byte order.
    pub const fn swapped(self) -> Self {
        match self {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        }
    }

    /// Read a `u16` from the first two bytes of `buf`.
    ///
    /// These slice accessors do not require natural alignment; the slice
    /// may start at any offset into a frame body.
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u16(buf),
            ByteOrder::BigEndian => BigEndian::read_u16(buf),
        }
    }

    pub fn read_i16(self, buf: &[u8]) -> i16 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_i16(buf),
            ByteOrder::BigEndian => BigEndian::read_i16(buf),
        }
    }

    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u32(buf),
            ByteOrder::BigEndian => BigEndian::read_u32(buf),
        }
    }

    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_i32(buf),
            ByteOrder::BigEndian => BigEndian::read_i32(buf),
        }
    }

    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u64(buf),
            ByteOrder::BigEndian => BigEndian::read_u64(buf),
        }
    }

    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_f32(buf),
            ByteOrder::BigEndian => BigEndian::read_f32(buf),
        }
    }

    pub fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_f64(buf),
            ByteOrder::BigEndian => BigEndian::read_f64(buf),
        }
    }
}

/// Reverse the byte order of a 32-bit float via its bit pattern.
pub fn swap_f32(value: f32) -> f32 {
    f32::from_bits(value.to_bits().swap_bytes())
}

/// Reverse the byte order of a 64-bit float via its bit pattern.
pub fn swap_f64(value: f64) -> f64 {
    f64::from_bits(value.to_bits().swap_bytes())
}
