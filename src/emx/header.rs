//! EMX datagram header parsing, validation, and byte-order inference.

use crate::byte_order::ByteOrder;
use crate::emx::{EmxDatagramType, EmxModel, EMX_START_BYTE};
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Size of the fixed datagram header on the wire.
pub(crate) const HEADER_SIZE: usize = 20;

/// Smallest legal `bytes_in_datagram` value.
pub(crate) const MIN_BYTES_IN_DATAGRAM: u32 = 16;

/// Sanity ceiling on `bytes_in_datagram`; generous, but bounds buffer growth.
pub(crate) const MAX_BYTES_IN_DATAGRAM: u32 = 1 << 27;

/// Dates whose decimal digits survive a 32-bit byte swap unchanged, which
/// makes them useless for byte-order inference.
const PALINDROMIC_DATES: [u32; 2] = [20001025, 20790529];

/// EMX datagram header (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmxHeader {
    /// Number of bytes in the datagram, not counting this field.
    pub bytes_in_datagram: u32,
    /// Start identifier, STX (0x02).
    pub start_identifier: u8,
    /// Datagram type code.
    pub datagram_type_code: u8,
    /// EM model number (example: EM 710 = 710).
    pub em_model_number: u16,
    /// Date = year*10000 + month*100 + day.
    pub date: u32,
    /// Time since midnight in milliseconds (0-86399999).
    pub time_ms: u32,
    /// Sequential counter, or byte-order flag in the PU output datagram.
    pub counter: u16,
    /// System serial number (100-).
    pub serial_number: u16,
}

impl EmxHeader {
    /// Decode the header from its 20 raw bytes with a known byte order.
    pub(crate) fn from_bytes(raw: &[u8; HEADER_SIZE], order: ByteOrder) -> Self {
        Self {
            bytes_in_datagram: order.read_u32(&raw[0..4]),
            start_identifier: raw[4],
            datagram_type_code: raw[5],
            em_model_number: order.read_u16(&raw[6..8]),
            date: order.read_u32(&raw[8..12]),
            time_ms: order.read_u32(&raw[12..16]),
            counter: order.read_u16(&raw[16..18]),
            serial_number: order.read_u16(&raw[18..20]),
        }
    }

    /// The parsed datagram type.
    pub fn datagram_type(&self) -> EmxDatagramType {
        EmxDatagramType::from_code(self.datagram_type_code)
    }

    /// Validate the header fields.
    ///
    /// The undocumented directory record (type 0x74) carries no valid
    /// date or timestamp, so those checks are skipped for it.
    pub(crate) fn validate(&self) -> Result<(), DgmError> {
        if self.start_identifier != EMX_START_BYTE {
            return Err(DgmError::bad_data(format!(
                "invalid start byte ({})",
                self.start_identifier
            )));
        }

        if self.bytes_in_datagram < MIN_BYTES_IN_DATAGRAM
            || self.bytes_in_datagram > MAX_BYTES_IN_DATAGRAM
        {
            return Err(DgmError::bad_data(format!(
                "invalid datagram size ({})",
                self.bytes_in_datagram
            )));
        }

        if self.datagram_type() != EmxDatagramType::Directory {
            if self.time_ms > 86_399_999 {
                return Err(DgmError::bad_data(format!(
                    "invalid millisecond field ({})",
                    self.time_ms
                )));
            }

            if self.date != 0 && !valid_date(self.date) {
                return Err(DgmError::bad_data(format!("invalid date ({})", self.date)));
            }
        }

        Ok(())
    }
}

/// Return true if `date` (year*10000 + month*100 + day) decodes to a real
/// Gregorian date in the year range 1970-2100.
pub(crate) fn valid_date(date: u32) -> bool {
    if !(19_700_000..=21_000_000).contains(&date) {
        return false;
    }

    let year = date / 10000;
    let month = (date / 100) % 100;
    let day = date % 100;

    if !(1..=12).contains(&month) || day == 0 {
        return false;
    }

    day <= days_in_month(year, month)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Infer the stream byte order from the raw bytes of the first header.
///
/// The date field is decoded both ways; whichever interpretation yields a
/// valid Gregorian date wins.  A zero or byte-swap-palindromic date makes
/// that test useless, in which case the model number field is checked
/// against the recognized EM models instead.
pub(crate) fn detect_byte_order(raw: &[u8; HEADER_SIZE]) -> Result<ByteOrder, DgmError> {
    let date_le = ByteOrder::LittleEndian.read_u32(&raw[8..12]);
    let date_be = ByteOrder::BigEndian.read_u32(&raw[8..12]);

    if date_le != 0 && !PALINDROMIC_DATES.contains(&date_le) {
        if valid_date(date_le) {
            return Ok(ByteOrder::LittleEndian);
        }
        if valid_date(date_be) {
            return Ok(ByteOrder::BigEndian);
        }
    } else {
        let model_le = ByteOrder::LittleEndian.read_u16(&raw[6..8]);
        let model_be = ByteOrder::BigEndian.read_u16(&raw[6..8]);

        if EmxModel::from_number(model_le).is_some() {
            return Ok(ByteOrder::LittleEndian);
        }
        if EmxModel::from_number(model_be).is_some() {
            return Ok(ByteOrder::BigEndian);
        }
    }

    Err(DgmError::bad_data(format!(
        "invalid date or model number ({}, {})",
        date_le,
        ByteOrder::LittleEndian.read_u16(&raw[6..8])
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_header(order: ByteOrder) -> [u8; HEADER_SIZE] {
        let mut raw = [0u8; HEADER_SIZE];
        let write_u32 = |buf: &mut [u8], value: u32| {
            let bytes = match order {
                ByteOrder::LittleEndian => value.to_le_bytes(),
                ByteOrder::BigEndian => value.to_be_bytes(),
            };
            buf.copy_from_slice(&bytes);
        };
        let write_u16 = |buf: &mut [u8], value: u16| {
            let bytes = match order {
                ByteOrder::LittleEndian => value.to_le_bytes(),
                ByteOrder::BigEndian => value.to_be_bytes(),
            };
            buf.copy_from_slice(&bytes);
        };

        write_u32(&mut raw[0..4], 32);
        raw[4] = EMX_START_BYTE;
        raw[5] = b'C';
        write_u16(&mut raw[6..8], 710);
        write_u32(&mut raw[8..12], 20200101);
        write_u32(&mut raw[12..16], 3_600_000);
        write_u16(&mut raw[16..18], 7);
        write_u16(&mut raw[18..20], 123);
        raw
    }

    #[test]
    fn test_valid_dates() {
        assert!(valid_date(20200101));
        assert!(valid_date(19700101));
        assert!(valid_date(20000229)); // leap year
        assert!(!valid_date(19000229)); // 1900 is out of range anyway
        assert!(!valid_date(20210229)); // not a leap year
        assert!(!valid_date(20201301)); // month 13
        assert!(!valid_date(20200132)); // day 32
        assert!(!valid_date(20200100)); // day 0
        assert!(!valid_date(100));
        assert!(!valid_date(21010101));
    }

    #[test]
    fn test_detect_little_endian_by_date() {
        let raw = raw_header(ByteOrder::LittleEndian);
        assert_eq!(detect_byte_order(&raw).unwrap(), ByteOrder::LittleEndian);
    }

    #[test]
    fn test_detect_big_endian_by_date() {
        let raw = raw_header(ByteOrder::BigEndian);
        assert_eq!(detect_byte_order(&raw).unwrap(), ByteOrder::BigEndian);
    }

    #[test]
    fn test_detect_falls_back_to_model_on_zero_date() {
        let mut raw = raw_header(ByteOrder::BigEndian);
        raw[8..12].copy_from_slice(&[0, 0, 0, 0]);
        assert_eq!(detect_byte_order(&raw).unwrap(), ByteOrder::BigEndian);
    }

    #[test]
    fn test_detect_rejects_garbage() {
        let mut raw = [0xABu8; HEADER_SIZE];
        raw[8..12].copy_from_slice(&[0xAB, 0xAB, 0xAB, 0xAB]);
        assert!(detect_byte_order(&raw).is_err());
    }

    #[test]
    fn test_header_parse_and_validate() {
        let raw = raw_header(ByteOrder::LittleEndian);
        let header = EmxHeader::from_bytes(&raw, ByteOrder::LittleEndian);
        assert_eq!(header.bytes_in_datagram, 32);
        assert_eq!(header.datagram_type(), EmxDatagramType::Clock);
        assert_eq!(header.em_model_number, 710);
        assert_eq!(header.date, 20200101);
        header.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_start_byte() {
        let mut raw = raw_header(ByteOrder::LittleEndian);
        raw[4] = 0x05;
        let header = EmxHeader::from_bytes(&raw, ByteOrder::LittleEndian);
        assert!(header.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let mut raw = raw_header(ByteOrder::LittleEndian);
        raw[0..4].copy_from_slice(&15u32.to_le_bytes());
        let header = EmxHeader::from_bytes(&raw, ByteOrder::LittleEndian);
        assert!(header.validate().is_err());

        raw[0..4].copy_from_slice(&((1u32 << 27) + 1).to_le_bytes());
        let header = EmxHeader::from_bytes(&raw, ByteOrder::LittleEndian);
        assert!(header.validate().is_err());
    }

    #[test]
    fn test_validate_skips_time_checks_for_directory_record() {
        let mut raw = raw_header(ByteOrder::LittleEndian);
        raw[5] = b't';
        raw[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        let header = EmxHeader::from_bytes(&raw, ByteOrder::LittleEndian);
        header.validate().unwrap();
    }
}
