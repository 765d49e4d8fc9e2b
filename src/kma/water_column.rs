//! Water column datagram ('#MWC').

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use crate::kma::multibeam::{MCommon, MPartition};
use serde::{Deserialize, Serialize};

/// Phase flag values of the RX info: 0 - off, 1 - low resolution,
/// 2 - high resolution.
pub const PHASE_OFF: u8 = 0;
pub const PHASE_LOW: u8 = 1;
pub const PHASE_HIGH: u8 = 2;

/// MWC TX info (12 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MwcTxInfo {
    /// Number of bytes in the current struct.
    pub num_bytes_tx_info: u16,
    /// Number of transmitting sectors (Ntx).
    pub num_tx_sectors: u16,
    /// Number of bytes per TX sector entry.
    pub num_bytes_per_tx_sector: u16,
    /// Heave at the vessel reference point at time of ping, in meters.
    pub heave_m: f32,
}

impl MwcTxInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = Self {
            num_bytes_tx_info: cursor.read_u16()?,
            num_tx_sectors: cursor.read_u16()?,
            num_bytes_per_tx_sector: {
                let value = cursor.read_u16()?;
                cursor.skip(2)?; // padding
                value
            },
            heave_m: cursor.read_f32()?,
        };
        cursor.seek_to(start + info.num_bytes_tx_info as usize)?;
        Ok(info)
    }
}

/// MWC TX sector entry (16 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MwcTxSector {
    /// Along-ship steering angle of the TX beam re the transducer face,
    /// as used by the beamformer (includes stabilization), in degrees.
    pub tilt_angle_re_tx_deg: f32,
    /// Center frequency of the current sector in Hz.
    pub centre_freq_hz: f32,
    /// TX beamwidth along, corrected for frequency, sound velocity, and
    /// tilt angle, in degrees.
    pub tx_beam_width_along_deg: f32,
    /// Transmitting sector number.
    pub tx_sector_num: u16,
}

/// MWC RX info (16 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MwcRxInfo {
    /// Number of bytes in the current struct.
    pub num_bytes_rx_info: u16,
    /// Number of beams in this datagram (Nrx).
    pub num_beams: u16,
    /// Bytes in one RX beam entry, excluding the sample amplitudes.
    pub num_bytes_per_beam_entry: u8,
    /// Phase flag: 0 - off, 1 - low resolution, 2 - high resolution.
    pub phase_flag: u8,
    /// Time varying gain function applied (X).
    pub tvg_function_applied: u8,
    /// Time varying gain offset used (OFS) in dB.
    pub tvg_offset_db: i8,
    /// Sample rate, normally decimated to approximately the bandwidth of
    /// the transmitted pulse, in Hz.
    pub sample_freq_hz: f32,
    /// Sound speed at transducer in m/s.
    pub sound_velocity_m_per_sec: f32,
}

impl MwcRxInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = Self {
            num_bytes_rx_info: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
            num_bytes_per_beam_entry: cursor.read_u8()?,
            phase_flag: cursor.read_u8()?,
            tvg_function_applied: cursor.read_u8()?,
            tvg_offset_db: cursor.read_i8()?,
            sample_freq_hz: cursor.read_f32()?,
            sound_velocity_m_per_sec: cursor.read_f32()?,
        };
        cursor.seek_to(start + info.num_bytes_rx_info as usize)?;
        Ok(info)
    }
}

/// Per-sample phase data of one RX beam, per the RX info's phase flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MwcPhase {
    /// Phase recording off.
    Off,
    /// Phase in 180/128 degree resolution.
    Low(Vec<i8>),
    /// Phase in 0.01 degree resolution; -32767 appears as null.
    High(Vec<i16>),
}

/// One MWC RX beam: the beam entry, its amplitude trace, and optional
/// phase trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MwcRxBeam {
    /// Beam pointing angle re vertical in degrees.
    pub beam_point_ang_re_vertical_deg: f32,
    /// Start range sample number.
    pub start_range_sample_num: u16,
    /// Two-way bottom detection range in samples; zero when the beam has
    /// no bottom detection.
    pub detected_range_in_samples: u16,
    /// The transmit sector for this beam.
    pub beam_tx_sector_num: u16,
    /// Number of samples for this beam (Ns).
    pub num_samples: u16,
    /// detected_range_in_samples with higher resolution (version 1).
    pub detected_range_in_samples_high_resolution: f32,
    /// Water column amplitude in 0.5 dB; -128 appears as null.
    pub sample_amplitude_05db: Vec<i8>,
    /// Phase samples, when recorded.
    pub phase: MwcPhase,
}

impl MwcRxBeam {
    /// Base beam entry size without the Rev. G high-resolution range.
    const ENTRY_BASE_SIZE: usize = 12;

    /// Decode one variable-length RX beam at the cursor, leaving the
    /// cursor at the start of the next beam.
    pub(crate) fn parse(
        cursor: &mut BodyCursor<'_>,
        phase_flag: u8,
        num_bytes_per_beam_entry: u8,
    ) -> Result<Self, DgmError> {
        let entry_size = num_bytes_per_beam_entry as usize;
        if entry_size < Self::ENTRY_BASE_SIZE {
            return Err(DgmError::bad_data(format!(
                "invalid RX beam entry size ({})",
                num_bytes_per_beam_entry
            )));
        }

        let start = cursor.position();
        let beam_point_ang_re_vertical_deg = cursor.read_f32()?;
        let start_range_sample_num = cursor.read_u16()?;
        let detected_range_in_samples = cursor.read_u16()?;
        let beam_tx_sector_num = cursor.read_u16()?;
        let num_samples = cursor.read_u16()?;
        let detected_range_in_samples_high_resolution =
            if entry_size >= Self::ENTRY_BASE_SIZE + 4 {
                cursor.read_f32()?
            } else {
                0.0
            };
        cursor.seek_to(start + entry_size)?;

        let (sample_amplitude_05db, phase) = if num_samples > 0 {
            let amplitude = cursor.read_i8_array(num_samples as usize)?;
            let phase = match phase_flag {
                PHASE_LOW => MwcPhase::Low(cursor.read_i8_array(num_samples as usize)?),
                PHASE_HIGH => MwcPhase::High(cursor.read_i16_array(num_samples as usize)?),
                _ => MwcPhase::Off,
            };
            (amplitude, phase)
        } else {
            (Vec::new(), MwcPhase::Off)
        };

        Ok(Self {
            beam_point_ang_re_vertical_deg,
            start_range_sample_num,
            detected_range_in_samples,
            beam_tx_sector_num,
            num_samples,
            detected_range_in_samples_high_resolution,
            sample_amplitude_05db,
            phase,
        })
    }
}

/// Water column datagram ('#MWC').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mwc {
    pub partition: MPartition,
    pub common: MCommon,
    pub tx_info: MwcTxInfo,
    pub tx_sectors: Vec<MwcTxSector>,
    pub rx_info: MwcRxInfo,
    pub rx_beams: Vec<MwcRxBeam>,
}

impl Mwc {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let partition = MPartition::parse(cursor)?;
        partition.require_single()?;

        let common = MCommon::parse(cursor)?;
        let tx_info = MwcTxInfo::parse(cursor)?;

        let mut tx_sectors = Vec::with_capacity(tx_info.num_tx_sectors as usize);
        for _ in 0..tx_info.num_tx_sectors {
            let start = cursor.position();
            tx_sectors.push(MwcTxSector {
                tilt_angle_re_tx_deg: cursor.read_f32()?,
                centre_freq_hz: cursor.read_f32()?,
                tx_beam_width_along_deg: cursor.read_f32()?,
                tx_sector_num: cursor.read_u16()?,
            });
            cursor.seek_to(start + tx_info.num_bytes_per_tx_sector as usize)?;
        }

        let rx_info = MwcRxInfo::parse(cursor)?;
        if rx_info.num_bytes_per_beam_entry == 0 {
            return Err(DgmError::bad_data("invalid RX beam entry size (0)"));
        }

        let mut rx_beams = Vec::with_capacity(rx_info.num_beams as usize);
        for _ in 0..rx_info.num_beams {
            rx_beams.push(MwcRxBeam::parse(
                cursor,
                rx_info.phase_flag,
                rx_info.num_bytes_per_beam_entry,
            )?);
        }

        Ok(Self {
            partition,
            common,
            tx_info,
            tx_sectors,
            rx_info,
            rx_beams,
        })
    }
}
