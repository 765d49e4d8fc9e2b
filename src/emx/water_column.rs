//! Water column datagram.
//!
//! RX beams are variable length: a 10-byte beam info followed by
//! `num_samples` amplitude bytes.  The datagram can be split over
//! several frames (`num_datagrams`/`datagram_number`); each frame
//! carries `datagram_beams` of the ping's `num_beams`.

use crate::cursor::BodyCursor;
use crate::emx::EMX_MAX_TX_SECTORS;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Water column info (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcInfo {
    /// Number of datagrams the ping is split over = Nd.
    pub num_datagrams: u16,
    /// Datagram number (1-Nd).
    pub datagram_number: u16,
    /// Number of transmit sectors = Ntx (1-20).
    pub tx_sectors: u16,
    /// Number of receive beams for the whole ping.
    pub num_beams: u16,
    /// Number of beams in this datagram = Nrx.
    pub datagram_beams: u16,
    /// Sound speed in 0.1 m/s (14000-16000).
    pub sound_speed: u16,
    /// Sample rate in 0.01 Hz resolution (1000-4000000).
    pub sample_rate: u32,
    /// TX time heave at the transducer in cm (-1000 to 1000).
    pub tx_heave: i16,
    /// TVG function applied (X); X log R + 2 alpha R + OFS + C.
    pub tvg_function: u8,
    /// TVG offset in dB (C).
    pub tvg_offset: i8,
    /// Scanning info (EM2040 only).
    pub scanning_info: u8,
}

/// Water column TX sector entry (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcTxBeam {
    /// Tilt angle re TX array in 0.01 deg (-1100-1100).
    pub tx_tilt_angle: i16,
    /// Center frequency in 10 Hz (1000-50000).
    pub center_freq: u16,
    /// Transmit sector number (0-19).
    pub tx_sector: u8,
}

/// Water column RX beam info (10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WcRxBeamInfo {
    /// Beam pointing angle re vertical in 0.01 deg (-11000-11000).
    pub beam_angle: i16,
    /// Start range sample number (0-65534).
    pub start_range: u16,
    /// Number of samples (Ns).
    pub num_samples: u16,
    /// Detected range in samples (DR).
    pub detected_range: u16,
    /// Transmit sector number (0-19).
    pub tx_sector: u8,
    /// Beam index (0-254).
    pub beam_index: u8,
}

/// One water column RX beam: info plus its amplitude trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcRxBeam {
    pub info: WcRxBeamInfo,
    /// Ns sample amplitudes in 0.5 dB resolution.
    pub amplitude: Vec<i8>,
}

impl WcRxBeam {
    /// Decode one variable-length RX beam at the cursor, leaving the
    /// cursor at the start of the next beam.
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = WcRxBeamInfo {
            beam_angle: cursor.read_i16()?,
            start_range: cursor.read_u16()?,
            num_samples: cursor.read_u16()?,
            detected_range: cursor.read_u16()?,
            tx_sector: cursor.read_u8()?,
            beam_index: cursor.read_u8()?,
        };
        let amplitude = cursor.read_i8_array(info.num_samples as usize)?;
        Ok(Self { info, amplitude })
    }
}

/// Water column datagram (EM122, EM302, EM710, EM2040, EM3002, ME70 BO).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterColumn {
    pub info: WcInfo,
    pub tx_beams: Vec<WcTxBeam>,
    pub rx_beams: Vec<WcRxBeam>,
}

impl WaterColumn {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = WcInfo {
            num_datagrams: cursor.read_u16()?,
            datagram_number: cursor.read_u16()?,
            tx_sectors: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
            datagram_beams: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            sample_rate: cursor.read_u32()?,
            tx_heave: cursor.read_i16()?,
            tvg_function: cursor.read_u8()?,
            tvg_offset: cursor.read_i8()?,
            scanning_info: {
                let value = cursor.read_u8()?;
                cursor.skip(3)?; // spare
                value
            },
        };

        if info.tx_sectors as usize > EMX_MAX_TX_SECTORS {
            return Err(DgmError::bad_data(format!(
                "invalid number of TX sectors ({})",
                info.tx_sectors
            )));
        }

        let mut tx_beams = Vec::with_capacity(info.tx_sectors as usize);
        for _ in 0..info.tx_sectors {
            tx_beams.push(WcTxBeam {
                tx_tilt_angle: cursor.read_i16()?,
                center_freq: cursor.read_u16()?,
                tx_sector: {
                    let sector = cursor.read_u8()?;
                    cursor.skip(1)?; // spare
                    sector
                },
            });
        }

        let mut rx_beams = Vec::with_capacity(info.datagram_beams as usize);
        for _ in 0..info.datagram_beams {
            rx_beams.push(WcRxBeam::parse(cursor)?);
        }

        Ok(Self {
            info,
            tx_beams,
            rx_beams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;

    fn wc_body(tx_sectors: u16, beam_samples: &[u16]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&1u16.to_le_bytes()); // num_datagrams
        body.extend_from_slice(&1u16.to_le_bytes()); // datagram_number
        body.extend_from_slice(&tx_sectors.to_le_bytes());
        body.extend_from_slice(&(beam_samples.len() as u16).to_le_bytes()); // num_beams
        body.extend_from_slice(&(beam_samples.len() as u16).to_le_bytes()); // datagram_beams
        body.extend_from_slice(&15000u16.to_le_bytes()); // sound_speed
        body.extend_from_slice(&1_000_000u32.to_le_bytes()); // sample_rate
        body.extend_from_slice(&0i16.to_le_bytes()); // tx_heave
        body.push(30); // tvg_function
        body.push(0); // tvg_offset
        body.push(0); // scanning_info
        body.extend_from_slice(&[0, 0, 0]); // spare

        for sector in 0..tx_sectors {
            body.extend_from_slice(&0i16.to_le_bytes());
            body.extend_from_slice(&3000u16.to_le_bytes());
            body.push(sector as u8);
            body.push(0);
        }

        for (index, &num_samples) in beam_samples.iter().enumerate() {
            body.extend_from_slice(&0i16.to_le_bytes()); // beam_angle
            body.extend_from_slice(&0u16.to_le_bytes()); // start_range
            body.extend_from_slice(&num_samples.to_le_bytes());
            body.extend_from_slice(&0u16.to_le_bytes()); // detected_range
            body.push(0); // tx_sector
            body.push(index as u8); // beam_index
            body.extend(std::iter::repeat((-60i8) as u8).take(num_samples as usize));
        }
        body
    }

    #[test]
    fn test_water_column_parse() {
        let body = wc_body(2, &[3, 5]);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let wc = WaterColumn::parse(&mut cursor).unwrap();
        assert_eq!(wc.tx_beams.len(), 2);
        assert_eq!(wc.rx_beams.len(), 2);
        assert_eq!(wc.rx_beams[0].amplitude.len(), 3);
        assert_eq!(wc.rx_beams[1].amplitude.len(), 5);
        assert_eq!(wc.rx_beams[1].info.beam_index, 1);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_water_column_tx_sector_bound() {
        let body = wc_body(21, &[]);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        assert!(matches!(
            WaterColumn::parse(&mut cursor),
            Err(DgmError::BadData { .. })
        ));
    }

    #[test]
    fn test_water_column_truncated_samples() {
        let mut body = wc_body(1, &[4]);
        body.truncate(body.len() - 2); // cut into the last amplitude run
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        assert!(matches!(
            WaterColumn::parse(&mut cursor),
            Err(DgmError::BadData { .. })
        ));
    }
}
