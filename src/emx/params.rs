//! Parameter and processing-unit datagrams: installation, runtime, and
//! extra parameters, SSP output, PU output/status, and BIST results.

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

fn read_version_string(cursor: &mut BodyCursor<'_>, len: usize) -> Result<String, DgmError> {
    let bytes = cursor.take(len)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(len);
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

/// Installation parameters info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallParamsInfo {
    /// Secondary system serial number (100-).
    pub serial_number2: u16,
}

/// Installation parameters datagram (start, stop, and remote variants).
///
/// The text is a comma-separated list of `TOKEN=value;` settings and is
/// not guaranteed to be NUL-terminated on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallParams {
    pub info: InstallParamsInfo,
    pub text: Vec<u8>,
}

impl InstallParams {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = InstallParamsInfo {
            serial_number2: cursor.read_u16()?,
        };
        // All but a possible spare byte before ETX is text.
        let text = cursor.read_bytes(cursor.remaining().saturating_sub(1))?;
        Ok(Self { info, text })
    }
}

/// KM SSP output datagram: the raw input datagram from the sound speed
/// profile source, starting with the sentence formatter and ending with
/// the comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SspOutput {
    pub data: Vec<u8>,
}

impl SspOutput {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let data = cursor.read_bytes(cursor.remaining().saturating_sub(1))?;
        Ok(Self { data })
    }
}

/// Runtime parameters info (33 bytes).
///
/// Most fields are bit-coded with model-dependent meanings; see the
/// format document for the per-model tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuntimeParamsInfo {
    pub operator_station_status: u8,
    /// Processing unit status, bit-coded.
    pub pu_status: u8,
    /// BSP status.
    pub bsp_status: u8,
    /// Sonar head or transceiver status.
    pub head_or_tx_status: u8,
    /// Ping mode, bit-coded per model family.
    pub mode: u8,
    /// Filter identifier, bit-coded.
    pub filter_id: u8,
    /// Minimum depth in meters.
    pub min_depth: u16,
    /// Maximum depth in meters.
    pub max_depth: u16,
    /// Absorption coefficient in 0.01 dB/km (1-20000), valid at the
    /// model's nominal frequency.
    pub absorption: u16,
    /// Transmit pulse length in microseconds.
    pub tx_pulse_length: u16,
    /// Transmit beamwidth in 0.1 deg.
    pub tx_beamwidth: u16,
    /// Transmit power re maximum in dB.
    pub tx_power: i8,
    /// Receive beamwidth in 0.1 deg (5-80).
    pub rx_beamwidth: u8,
    /// Receive bandwidth in 50 Hz resolution (1-255).
    pub rx_bandwidth: u8,
    /// Mode 2 or receiver fixed gain setting in dB (0-50).
    pub rx_fixed_gain: u8,
    /// TVG law crossover angle in degrees (2-30).
    pub tvg_crossover: u8,
    /// Source of sound speed at transducer, bit-coded.
    pub sound_speed_source: u8,
    /// Maximum port swath width in meters (10-30000).
    pub max_port_swath: u16,
    /// Beam spacing (0-3); for EM3002 the high bit flags dual heads.
    pub beam_spacing: u8,
    /// Maximum port coverage in degrees (10-110).
    pub max_port_coverage: u8,
    /// Yaw and pitch stabilization mode, bit-coded.
    pub yaw_pitch_mode: u8,
    /// Maximum stbd coverage in degrees (10-110).
    pub max_stbd_coverage: u8,
    /// Maximum stbd swath width in meters (10-30000).
    pub max_stbd_swath: u16,
    /// Transmit along tilt in 0.1 deg on EM122/302/710/2040; Durotong
    /// speed in dm/s on older sonars.
    pub tx_along_tilt: i16,
    /// Second filter identifier on EM122/302/710/2040; HiLo frequency
    /// absorption coefficient ratio on older sonars.
    pub filter_id2: u8,
}

/// Runtime parameters datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuntimeParams {
    pub info: RuntimeParamsInfo,
}

impl RuntimeParams {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: RuntimeParamsInfo {
                operator_station_status: cursor.read_u8()?,
                pu_status: cursor.read_u8()?,
                bsp_status: cursor.read_u8()?,
                head_or_tx_status: cursor.read_u8()?,
                mode: cursor.read_u8()?,
                filter_id: cursor.read_u8()?,
                min_depth: cursor.read_u16()?,
                max_depth: cursor.read_u16()?,
                absorption: cursor.read_u16()?,
                tx_pulse_length: cursor.read_u16()?,
                tx_beamwidth: cursor.read_u16()?,
                tx_power: cursor.read_i8()?,
                rx_beamwidth: cursor.read_u8()?,
                rx_bandwidth: cursor.read_u8()?,
                rx_fixed_gain: cursor.read_u8()?,
                tvg_crossover: cursor.read_u8()?,
                sound_speed_source: cursor.read_u8()?,
                max_port_swath: cursor.read_u16()?,
                beam_spacing: cursor.read_u8()?,
                max_port_coverage: cursor.read_u8()?,
                yaw_pitch_mode: cursor.read_u8()?,
                max_stbd_coverage: cursor.read_u8()?,
                max_stbd_swath: cursor.read_u16()?,
                tx_along_tilt: cursor.read_i16()?,
                filter_id2: cursor.read_u8()?,
            },
        })
    }
}

/// Extra parameters info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraParamsInfo {
    /// Content identifier: 1 - calib.txt, 2 - log all heights, 3 - sound
    /// velocity at transducer, 4 - sound velocity profile, 5 - multicast
    /// RX status, 6 - bscorr.txt backscatter corrections.
    pub content: u16,
}

/// Decoded extra parameters content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtraParamsData {
    /// Content 6: the bscorr.txt backscatter correction text.
    BackscatterCorrection { num_chars: u16, text: Vec<u8> },
}

/// Extra parameters datagram.
///
/// Only content identifier 6 is decoded; other contents are left raw in
/// the body and logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraParams {
    pub info: ExtraParamsInfo,
    pub data: Option<ExtraParamsData>,
}

impl ExtraParams {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = ExtraParamsInfo {
            content: cursor.read_u16()?,
        };

        let data = match info.content {
            6 => {
                let num_chars = cursor.read_u16()?;
                let text = cursor.read_bytes(num_chars as usize)?;
                Some(ExtraParamsData::BackscatterCorrection { num_chars, text })
            }
            other => {
                log::debug!("extra parameters datagram with unknown content type ({other})");
                None
            }
        };

        Ok(Self { info, data })
    }
}

/// PU output info (88 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuOutputInfo {
    /// UDP port 1 (command datagrams).
    pub udp_port1: u16,
    /// UDP port 2 (sensor datagrams except motion sensor).
    pub udp_port2: u16,
    /// UDP port 3 (first motion sensor).
    pub udp_port3: u16,
    /// UDP port 4 (second motion sensor).
    pub udp_port4: u16,
    /// System descriptor (information for internal use).
    pub system_descriptor: u32,
    /// PU software version.
    pub pu_software_version: String,
    /// BSP software version.
    pub bsp_software_version: String,
    /// Sonar head/transceiver 1 software version.
    pub transceiver1_version: String,
    /// Sonar head/transceiver 2 software version.
    pub transceiver2_version: String,
    /// Host IP address.
    pub host_ip_address: u32,
    /// TX opening angle (0, 1, 2, or 4).
    pub tx_opening_angle: u8,
    /// RX opening angle (1, 2, or 4).
    pub rx_opening_angle: u8,
}

/// PU output datagram.  The header's counter field doubles as the byte
/// order flag for this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuOutput {
    pub info: PuOutputInfo,
}

impl PuOutput {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = PuOutputInfo {
            udp_port1: cursor.read_u16()?,
            udp_port2: cursor.read_u16()?,
            udp_port3: cursor.read_u16()?,
            udp_port4: cursor.read_u16()?,
            system_descriptor: cursor.read_u32()?,
            pu_software_version: read_version_string(cursor, 16)?,
            bsp_software_version: read_version_string(cursor, 16)?,
            transceiver1_version: read_version_string(cursor, 16)?,
            transceiver2_version: read_version_string(cursor, 16)?,
            host_ip_address: cursor.read_u32()?,
            tx_opening_angle: cursor.read_u8()?,
            rx_opening_angle: {
                let value = cursor.read_u8()?;
                cursor.skip(6)?; // future use
                value
            },
        };
        Ok(Self { info })
    }
}

/// PU status info (69 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuStatusInfo {
    /// Ping rate in 0.01 Hz.
    pub ping_rate: u16,
    /// Ping counter of latest ping.
    pub ping_counter: u16,
    /// Distance between swaths in 10%.
    pub swath_distance: u32,
    /// Sensor input status, UDP port 2.
    pub status_udp_port_2: u32,
    /// Sensor input status, serial port 1.
    pub status_serial_port_1: u32,
    /// Sensor input status, serial port 2.
    pub status_serial_port_2: u32,
    /// Sensor input status, serial port 3.
    pub status_serial_port_3: u32,
    /// Sensor input status, serial port 4.
    pub status_serial_port_4: u32,
    /// 0 or negative indicates bad quality, positive OK.
    pub pps_status: i8,
    pub position_status: i8,
    pub attitude_status: i8,
    pub clock_status: i8,
    pub heading_status: i8,
    /// 0 = off, 1 = active, 2 = simulator.
    pub pu_status: u8,
    /// Last received heading in 0.01 deg.
    pub heading: u16,
    /// Last received roll in 0.01 deg.
    pub roll: i16,
    /// Last received pitch in 0.01 deg.
    pub pitch: i16,
    /// Last received heave at sonar head in cm.
    pub heave: i16,
    /// Sound speed at transducer in dm/s.
    pub sound_speed: u16,
    /// Last received depth in cm.
    pub depth: u32,
    /// Along-ship velocity in 0.01 m/s.
    pub velocity: i16,
    /// Velocity sensor status.
    pub velocity_status: u8,
    /// Mammal protection ramp.
    pub ramp: u8,
    /// Backscatter at oblique angle in dB.
    pub bs_oblique: i8,
    /// Backscatter at normal incidence in dB.
    pub bs_normal: i8,
    /// Fixed gain in dB.
    pub gain: i8,
    /// Depth to normal incidence in meters.
    pub depth_normal: u8,
    /// Range to normal incidence in meters.
    pub range_normal: u16,
    /// Port coverage in degrees.
    pub port_coverage: u8,
    /// Stbd coverage in degrees.
    pub stbd_coverage: u8,
    /// Sound speed at transducer found from profile in dm/s.
    pub sound_speed_svp: u16,
    /// Yaw stabilization angle, or tilt used at 3D scanning, in dm/s.
    pub yaw_stabilization: i16,
    /// Port coverage in deg or across-ship velocity in 0.01 m/s.
    pub port_coverage2: i16,
    /// Stbd coverage in deg or downward velocity in 0.01 m/s.
    pub stbd_coverage2: i16,
    /// EM2040 CPU temperature in deg C (0 if not used).
    pub cpu_temp: i8,
}

/// PU status datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuStatus {
    pub info: PuStatusInfo,
}

impl PuStatus {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: PuStatusInfo {
                ping_rate: cursor.read_u16()?,
                ping_counter: cursor.read_u16()?,
                swath_distance: cursor.read_u32()?,
                status_udp_port_2: cursor.read_u32()?,
                status_serial_port_1: cursor.read_u32()?,
                status_serial_port_2: cursor.read_u32()?,
                status_serial_port_3: cursor.read_u32()?,
                status_serial_port_4: cursor.read_u32()?,
                pps_status: cursor.read_i8()?,
                position_status: cursor.read_i8()?,
                attitude_status: cursor.read_i8()?,
                clock_status: cursor.read_i8()?,
                heading_status: cursor.read_i8()?,
                pu_status: cursor.read_u8()?,
                heading: cursor.read_u16()?,
                roll: cursor.read_i16()?,
                pitch: cursor.read_i16()?,
                heave: cursor.read_i16()?,
                sound_speed: cursor.read_u16()?,
                depth: cursor.read_u32()?,
                velocity: cursor.read_i16()?,
                velocity_status: cursor.read_u8()?,
                ramp: cursor.read_u8()?,
                bs_oblique: cursor.read_i8()?,
                bs_normal: cursor.read_i8()?,
                gain: cursor.read_i8()?,
                depth_normal: cursor.read_u8()?,
                range_normal: cursor.read_u16()?,
                port_coverage: cursor.read_u8()?,
                stbd_coverage: cursor.read_u8()?,
                sound_speed_svp: cursor.read_u16()?,
                yaw_stabilization: cursor.read_i16()?,
                port_coverage2: cursor.read_i16()?,
                stbd_coverage2: cursor.read_i16()?,
                cpu_temp: cursor.read_i8()?,
            },
        })
    }
}

/// PU BIST result info (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PuBistResultInfo {
    /// Test number.
    pub test_number: u16,
    /// Test result status.
    pub test_result_status: i16,
}

/// PU BIST result datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuBistResult {
    pub info: PuBistResultInfo,
    /// BIST result text.
    pub text: Vec<u8>,
}

impl PuBistResult {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = PuBistResultInfo {
            test_number: cursor.read_u16()?,
            test_result_status: cursor.read_i16()?,
        };
        let text = cursor.read_bytes(cursor.remaining().saturating_sub(1))?;
        Ok(Self { info, text })
    }
}
