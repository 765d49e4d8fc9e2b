//! Raw range and angle datagrams (types 70, 78, 101, and 102).
//!
//! These carry per-ping transmit sector tables followed by per-beam
//! detection results.  The TX sector count is bounded at
//! [`EMX_MAX_TX_SECTORS`](crate::emx::EMX_MAX_TX_SECTORS).

use crate::cursor::BodyCursor;
use crate::emx::EMX_MAX_TX_SECTORS;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

fn check_tx_sectors(tx_sectors: u16) -> Result<(), DgmError> {
    if tx_sectors as usize > EMX_MAX_TX_SECTORS {
        return Err(DgmError::bad_data(format!(
            "invalid number of TX sectors ({})",
            tx_sectors
        )));
    }
    Ok(())
}

/// Raw range and angle 70 info (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra70Info {
    /// Maximum number of beams possible (48-).
    pub max_beams: u8,
    /// Number of RX beams with valid detections = Nrx; zero has been
    /// seen in real data.
    pub num_beams: u8,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
}

/// Raw range and angle 70 beam entry (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra70Beam {
    /// Beam pointing angle in 0.01 deg, positive to port.
    pub beam_angle: i16,
    /// Transmit tilt angle in 0.01 deg, positive forwards for a normally
    /// mounted system looking down.
    pub tx_tilt_angle: u16,
    /// Two-way travel time in samples (0-65534).
    pub range: u16,
    /// Reflectivity (BS) in 0.5 dB resolution (-128-+126).
    pub backscatter: i8,
    /// Beam number; does not always start at 1.
    pub beam_number: u8,
}

/// Raw range and angle 70 datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rra70 {
    pub info: Rra70Info,
    pub beams: Vec<Rra70Beam>,
}

impl Rra70 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Rra70Info {
            max_beams: cursor.read_u8()?,
            num_beams: cursor.read_u8()?,
            sound_speed: cursor.read_u16()?,
        };
        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(Rra70Beam {
                beam_angle: cursor.read_i16()?,
                tx_tilt_angle: cursor.read_u16()?,
                range: cursor.read_u16()?,
                backscatter: cursor.read_i8()?,
                beam_number: cursor.read_u8()?,
            });
        }
        Ok(Self { info, beams })
    }
}

/// Raw range and angle 78 info (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra78Info {
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// Number of transmit sectors = Ntx (1-).
    pub tx_sectors: u16,
    /// Number of receive beams in datagram = Nrx (1-).
    pub num_beams: u16,
    /// Number of beams with a valid detection (1-).
    pub valid_beams: u16,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Scaling of the per-beam Doppler corrections applied in FM mode:
    /// T(uncorrected) = T(datagram) - D(corr)/D(scale).
    pub dscale: u32,
}

/// Raw range and angle 78 TX sector entry (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra78TxBeam {
    /// Tilt angle re TX array in 0.01 deg (-2900-2900).
    pub tx_tilt_angle: i16,
    /// Focus range in 0.1 m (0 = no focusing applied).
    pub focus_range: u16,
    /// Signal length in seconds.
    pub signal_length: f32,
    /// Sector transmit delay re first TX pulse in seconds.
    pub sector_tx_delay: f32,
    /// Center frequency in Hz.
    pub center_freq: f32,
    /// Mean absorption coefficient in 0.01 dB/km.
    pub mean_absorption: u16,
    /// Signal waveform: 0 - CW, 1 - FM up sweep, 2 - FM down sweep.
    pub signal_waveform_id: u8,
    /// Transmit sector number / TX array index.
    pub tx_sector: u8,
    /// Signal bandwidth in Hz.
    pub signal_bandwidth: f32,
}

/// Raw range and angle 78 RX beam entry (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra78RxBeam {
    /// Beam pointing angle re RX array in 0.01 deg.
    pub rx_beam_angle: i16,
    /// Transmit sector number.
    pub tx_sector_number: u8,
    /// Detection info; the top bit flags an invalid detection.
    pub detection_info: u8,
    /// Detection window length in samples.
    pub detect_window_length: u16,
    /// Quality factor, scaled std dev of the range detection.
    pub quality_factor: u8,
    /// Doppler correction applied in FM mode to the travel time (scaled
    /// by dscale).
    pub doppler_correction: i8,
    /// Two-way travel time in seconds.
    pub two_way_travel_time: f32,
    /// Reflectivity (BS) in 0.1 dB resolution.
    pub backscatter: i16,
    /// Real-time cleaning information.
    pub system_cleaning: i8,
}

/// Raw range and angle 78 datagram (EM122, EM302, EM710, ME70 BO,
/// EM2040, and EM2040C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rra78 {
    pub info: Rra78Info,
    pub tx_beams: Vec<Rra78TxBeam>,
    pub rx_beams: Vec<Rra78RxBeam>,
}

impl Rra78 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Rra78Info {
            sound_speed: cursor.read_u16()?,
            tx_sectors: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
            valid_beams: cursor.read_u16()?,
            sample_rate: cursor.read_f32()?,
            dscale: cursor.read_u32()?,
        };
        check_tx_sectors(info.tx_sectors)?;

        let mut tx_beams = Vec::with_capacity(info.tx_sectors as usize);
        for _ in 0..info.tx_sectors {
            tx_beams.push(Rra78TxBeam {
                tx_tilt_angle: cursor.read_i16()?,
                focus_range: cursor.read_u16()?,
                signal_length: cursor.read_f32()?,
                sector_tx_delay: cursor.read_f32()?,
                center_freq: cursor.read_f32()?,
                mean_absorption: cursor.read_u16()?,
                signal_waveform_id: cursor.read_u8()?,
                tx_sector: cursor.read_u8()?,
                signal_bandwidth: cursor.read_f32()?,
            });
        }

        let mut rx_beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            rx_beams.push(Rra78RxBeam {
                rx_beam_angle: cursor.read_i16()?,
                tx_sector_number: cursor.read_u8()?,
                detection_info: cursor.read_u8()?,
                detect_window_length: cursor.read_u16()?,
                quality_factor: cursor.read_u8()?,
                doppler_correction: cursor.read_i8()?,
                two_way_travel_time: cursor.read_f32()?,
                backscatter: cursor.read_i16()?,
                system_cleaning: {
                    let value = cursor.read_i8()?;
                    cursor.skip(1)?; // spare
                    value
                },
            });
        }

        Ok(Self {
            info,
            tx_beams,
            rx_beams,
        })
    }
}

/// Raw range and angle 101 info (30 bytes); an undocumented type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra101Info {
    /// Heading of vessel in 0.01 deg (0-35999).
    pub vessel_heading: u16,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// TX transducer depth re water level at time of ping in cm.
    pub transducer_depth: u16,
    /// Maximum number of beams possible (48-).
    pub max_beams: u8,
    /// Number of beams with valid detections = N.
    pub num_beams: u8,
    /// Depth (z) resolution in cm.
    pub depth_resolution: u8,
    /// Horizontal (x and y) resolution in cm.
    pub horizontal_resolution: u8,
    /// Sample rate in Hz (300-30000).
    pub sample_rate: u16,
    pub status: i32,
    /// Range to normal incidence in samples.
    pub range_norm: u16,
    /// Normal incidence BS in 0.1 dB (BSN).
    pub normal_incidence_bs: i8,
    /// Oblique BS in 0.1 dB (BSO).
    pub oblique_bs: i8,
    pub fixed_gain: u8,
    pub tx_power: i8,
    pub mode: u8,
    pub coverage: u8,
    pub yawstab_heading: u16,
    /// Number of transmit sectors = Ntx (1-).
    pub tx_sectors: u16,
}

/// Raw range and angle 101 TX sector entry (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra101TxBeam {
    pub last_beam: u16,
    /// Tilt angle re TX array in 0.01 deg (-2900-2900).
    pub tx_tilt_angle: i16,
    pub heading: u16,
    pub roll: i16,
    pub pitch: i16,
    pub heave: i16,
}

/// Raw range and angle 101 RX beam entry (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra101RxBeam {
    /// Two-way travel time in samples.
    pub range: u16,
    /// Quality factor, scaled std dev of the range detection.
    pub quality_factor: u8,
    /// Detection window length in samples (/4 if phase).
    pub detect_window_length: u8,
    /// Reflectivity (BS) in 0.5 dB resolution.
    pub backscatter: i8,
    /// Beam number, starting at 0.
    pub beam_number: u8,
    /// Beam pointing angle re RX array in 0.01 deg.
    pub rx_beam_angle: i16,
    pub rx_heading: u16,
    pub roll: i16,
    pub pitch: i16,
    pub heave: i16,
}

/// Raw range and angle 101 datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rra101 {
    pub info: Rra101Info,
    pub tx_beams: Vec<Rra101TxBeam>,
    pub rx_beams: Vec<Rra101RxBeam>,
}

impl Rra101 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Rra101Info {
            vessel_heading: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            transducer_depth: cursor.read_u16()?,
            max_beams: cursor.read_u8()?,
            num_beams: cursor.read_u8()?,
            depth_resolution: cursor.read_u8()?,
            horizontal_resolution: cursor.read_u8()?,
            sample_rate: cursor.read_u16()?,
            status: cursor.read_i32()?,
            range_norm: cursor.read_u16()?,
            normal_incidence_bs: cursor.read_i8()?,
            oblique_bs: cursor.read_i8()?,
            fixed_gain: cursor.read_u8()?,
            tx_power: cursor.read_i8()?,
            mode: cursor.read_u8()?,
            coverage: cursor.read_u8()?,
            yawstab_heading: cursor.read_u16()?,
            tx_sectors: {
                let tx_sectors = cursor.read_u16()?;
                cursor.skip(2)?; // spare
                tx_sectors
            },
        };
        check_tx_sectors(info.tx_sectors)?;

        let mut tx_beams = Vec::with_capacity(info.tx_sectors as usize);
        for _ in 0..info.tx_sectors {
            tx_beams.push(Rra101TxBeam {
                last_beam: cursor.read_u16()?,
                tx_tilt_angle: cursor.read_i16()?,
                heading: cursor.read_u16()?,
                roll: cursor.read_i16()?,
                pitch: cursor.read_i16()?,
                heave: cursor.read_i16()?,
            });
        }

        let mut rx_beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            rx_beams.push(Rra101RxBeam {
                range: cursor.read_u16()?,
                quality_factor: cursor.read_u8()?,
                detect_window_length: cursor.read_u8()?,
                backscatter: cursor.read_i8()?,
                beam_number: cursor.read_u8()?,
                rx_beam_angle: cursor.read_i16()?,
                rx_heading: cursor.read_u16()?,
                roll: cursor.read_i16()?,
                pitch: cursor.read_i16()?,
                heave: cursor.read_i16()?,
            });
        }

        Ok(Self {
            info,
            tx_beams,
            rx_beams,
        })
    }
}

/// Raw range and angle 102 info (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra102Info {
    /// Number of transmit sectors = Ntx (1-).
    pub tx_sectors: u16,
    /// Number of RX beams with valid detections = Nrx (1-1999).
    pub num_beams: u16,
    /// Sample rate in 0.01 Hz.
    pub sample_rate: u32,
    /// ROV depth in cm.
    pub rov_depth: i32,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// Maximum number of beams possible.
    pub max_beams: u16,
}

/// Raw range and angle 102 TX sector entry (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra102TxBeam {
    /// Tilt angle re TX array in 0.01 deg (-2900-2900).
    pub tx_tilt_angle: i16,
    /// Focus range in 0.1 m (0 = no focusing applied).
    pub focus_range: u16,
    /// Signal length in microseconds.
    pub signal_length: u32,
    /// Transmit time offset in microseconds.
    pub tx_offset: u32,
    /// Center frequency in Hz.
    pub center_freq: u32,
    /// Bandwidth in 10 Hz.
    pub signal_bandwidth: u16,
    /// Signal waveform identifier (0-99): 0 - CW, 1 - FM.
    pub signal_waveform_id: u8,
    /// Transmit sector number / TX array index.
    pub tx_sector: u8,
}

/// Raw range and angle 102 RX beam entry (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rra102RxBeam {
    /// Beam pointing angle re RX array in 0.01 deg.
    pub rx_beam_angle: i16,
    /// Range in 0.25 samples; two-way travel time = R / (4 F / 100).
    pub range: u16,
    /// Transmit sector number (0-19).
    pub tx_sector_number: u8,
    /// Reflectivity (BS) in 0.5 dB resolution.
    pub backscatter: i8,
    /// Quality factor, scaled std dev of the range detection.
    pub quality_factor: u8,
    /// Detection window length in samples (/4 if phase).
    pub detect_window_length: u8,
    /// Beam number, starting at 0 (-1999 to 1999).
    pub beam_number: i16,
}

/// Raw range and angle 102 datagram (EM120, EM300, EM1002, EM2000,
/// EM3000, and EM3002).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rra102 {
    pub info: Rra102Info,
    pub tx_beams: Vec<Rra102TxBeam>,
    pub rx_beams: Vec<Rra102RxBeam>,
}

impl Rra102 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Rra102Info {
            tx_sectors: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
            sample_rate: cursor.read_u32()?,
            rov_depth: cursor.read_i32()?,
            sound_speed: cursor.read_u16()?,
            max_beams: {
                let max_beams = cursor.read_u16()?;
                cursor.skip(4)?; // two spare words
                max_beams
            },
        };
        check_tx_sectors(info.tx_sectors)?;

        let mut tx_beams = Vec::with_capacity(info.tx_sectors as usize);
        for _ in 0..info.tx_sectors {
            tx_beams.push(Rra102TxBeam {
                tx_tilt_angle: cursor.read_i16()?,
                focus_range: cursor.read_u16()?,
                signal_length: cursor.read_u32()?,
                tx_offset: cursor.read_u32()?,
                center_freq: cursor.read_u32()?,
                signal_bandwidth: cursor.read_u16()?,
                signal_waveform_id: cursor.read_u8()?,
                tx_sector: cursor.read_u8()?,
            });
        }

        let mut rx_beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            rx_beams.push(Rra102RxBeam {
                rx_beam_angle: cursor.read_i16()?,
                range: cursor.read_u16()?,
                tx_sector_number: cursor.read_u8()?,
                backscatter: cursor.read_i8()?,
                quality_factor: cursor.read_u8()?,
                detect_window_length: cursor.read_u8()?,
                beam_number: {
                    let beam_number = cursor.read_i16()?;
                    cursor.skip(2)?; // spare
                    beam_number
                },
            });
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

    fn rra78_body(tx_sectors: u16) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&15000u16.to_le_bytes());
        body.extend_from_slice(&tx_sectors.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes()); // num_beams
        body.extend_from_slice(&0u16.to_le_bytes()); // valid_beams
        body.extend_from_slice(&12000.0f32.to_le_bytes());
        body.extend_from_slice(&1000u32.to_le_bytes()); // dscale
        for sector in 0..tx_sectors {
            body.extend_from_slice(&0i16.to_le_bytes());
            body.extend_from_slice(&0u16.to_le_bytes());
            body.extend_from_slice(&0.002f32.to_le_bytes());
            body.extend_from_slice(&0.0f32.to_le_bytes());
            body.extend_from_slice(&30000.0f32.to_le_bytes());
            body.extend_from_slice(&1500u16.to_le_bytes());
            body.push(0);
            body.push(sector as u8);
            body.extend_from_slice(&500.0f32.to_le_bytes());
        }
        body
    }

    #[test]
    fn test_rra78_parse() {
        let body = rra78_body(2);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let rra = Rra78::parse(&mut cursor).unwrap();
        assert_eq!(rra.info.tx_sectors, 2);
        assert_eq!(rra.tx_beams.len(), 2);
        assert_eq!(rra.tx_beams[1].tx_sector, 1);
        assert!(rra.rx_beams.is_empty());
    }

    #[test]
    fn test_rra78_rejects_too_many_tx_sectors() {
        let body = rra78_body(21);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        assert!(matches!(
            Rra78::parse(&mut cursor),
            Err(DgmError::BadData { .. })
        ));
    }

    #[test]
    fn test_rra70_parse_big_endian() {
        let mut body = Vec::new();
        body.push(128); // max_beams
        body.push(1); // num_beams
        body.extend_from_slice(&15000u16.to_be_bytes());
        body.extend_from_slice(&(-500i16).to_be_bytes());
        body.extend_from_slice(&100u16.to_be_bytes());
        body.extend_from_slice(&4000u16.to_be_bytes());
        body.push((-10i8) as u8);
        body.push(1);
        let mut cursor = BodyCursor::new(&body, ByteOrder::BigEndian);
        let rra = Rra70::parse(&mut cursor).unwrap();
        assert_eq!(rra.info.sound_speed, 15000);
        assert_eq!(rra.beams[0].beam_angle, -500);
        assert_eq!(rra.beams[0].range, 4000);
    }
}
