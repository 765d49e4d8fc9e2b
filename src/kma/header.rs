//! KMA datagram header parsing and validation.

use crate::byte_order::ByteOrder;
use crate::error::DgmError;
use crate::kma::KmaDatagramType;
use serde::{Deserialize, Serialize};

/// Size of the fixed datagram header on the wire.
pub(crate) const HEADER_SIZE: usize = 20;

/// Smallest legal datagram: header plus the trailing length field.
pub(crate) const MIN_BYTES_DGM: u32 = (HEADER_SIZE + 4) as u32;

/// Sanity ceiling on `num_bytes_dgm`; generous, but bounds buffer growth.
pub(crate) const MAX_BYTES_DGM: u32 = 1 << 30;

/// KMA datagram header (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmaHeader {
    /// Datagram length in bytes, including the length fields at the
    /// beginning and end (4 bytes each).
    pub num_bytes_dgm: u32,
    /// Datagram type definition, e.g. '#MRZ'.
    pub dgm_type: [u8; 4],
    /// Datagram version.
    pub dgm_version: u8,
    /// System ID, for separating datagrams when more than one
    /// echosounder is connected to SIS/K-Controller.
    pub system_id: u8,
    /// Echo sounder identity, e.g. 122, 302, 710, 712, 2040, 2045, 850.
    pub echo_sounder_id: u16,
    /// UTC time in seconds from the UNIX epoch.
    pub time_sec: u32,
    /// Nano-second remainder of time_sec.
    pub time_nanosec: u32,
}

impl KmaHeader {
    /// Decode the header from its 20 raw bytes (always little-endian).
    pub(crate) fn from_bytes(raw: &[u8; HEADER_SIZE]) -> Self {
        let order = ByteOrder::LittleEndian;
        Self {
            num_bytes_dgm: order.read_u32(&raw[0..4]),
            dgm_type: [raw[4], raw[5], raw[6], raw[7]],
            dgm_version: raw[8],
            system_id: raw[9],
            echo_sounder_id: order.read_u16(&raw[10..12]),
            time_sec: order.read_u32(&raw[12..16]),
            time_nanosec: order.read_u32(&raw[16..20]),
        }
    }

    /// The parsed datagram type.
    pub fn datagram_type(&self) -> KmaDatagramType {
        KmaDatagramType::from_bytes(self.dgm_type)
    }

    /// Validate the header fields.
    ///
    /// The datagram type is not checked against the known set; new or
    /// undocumented types can always appear.
    pub(crate) fn validate(&self) -> Result<(), DgmError> {
        if self.num_bytes_dgm < MIN_BYTES_DGM || self.num_bytes_dgm > MAX_BYTES_DGM {
            return Err(DgmError::bad_data(format!(
                "invalid datagram size ({})",
                self.num_bytes_dgm
            )));
        }

        if self.dgm_type[0] != b'#' {
            return Err(DgmError::bad_data(format!(
                "invalid datagram magic byte ({})",
                self.dgm_type[0]
            )));
        }

        if self.time_nanosec >= 1_000_000_000 {
            return Err(DgmError::bad_data(format!(
                "invalid nanosecond field ({})",
                self.time_nanosec
            )));
        }

        Ok(())
    }
}
