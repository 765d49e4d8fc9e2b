//! HISAS datagrams: PU status, navigation output, and sidescan.
//!
//! HISAS processing units emit these records little-endian regardless of
//! the byte order of the surrounding EMX stream, so every parser here
//! pins the cursor to little-endian before decoding.

use crate::byte_order::ByteOrder;
use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Number of sidescan channel slots in the status record.
pub(crate) const SIDESCAN_CHANNELS: usize = 6;

fn read_channel_name(cursor: &mut BodyCursor<'_>) -> Result<String, DgmError> {
    let bytes = cursor.take(16)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(15);
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

/// HISAS status info (100 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HisasStatusInfo {
    /// Version ID of the status output datagram: 0 - older, 1 - current.
    pub version_id: u16,
    /// Ping rate in Hz * 100.
    pub ping_rate: u16,
    /// Ping counter of latest ping.
    pub ping_counter: u32,
    /// PU idle count in %.
    pub pu_idle_count: u32,
    /// Sensor input status, UDP port 2.
    pub sensor_input_status: u32,
    pub pps_status: i8,
    pub clock_status: i8,
    pub attitude_status: i8,
    /// Trigger counter.
    pub trigger_status: u8,
    /// PU mode: 0 - off, 1 - active, 2 - simulator.
    pub pu_modes: u8,
    /// Logger status: 0 - off, 1 - active.
    pub logger_status: u8,
    /// Last received yaw in 0.01 deg.
    pub yaw: u16,
    /// Last received roll in 0.01 deg.
    pub roll: u16,
    /// Last received pitch in 0.01 deg.
    pub pitch: u16,
    /// Last received heave in cm.
    pub heave: u16,
    /// Sound speed at transducer in dm/s.
    pub sound_speed: u16,
    /// Current log file size for port side in bytes.
    pub log_file_size_port: u32,
    /// Current log file size for stbd side in bytes.
    pub log_file_size_stbd: u32,
    /// Free space on port side disk in Mbytes.
    pub free_space_port: u32,
    /// Free space on stbd side disk in Mbytes.
    pub free_space_stbd: u32,
    pub cbmf_1_status: u16,
    pub cbmf_2_status: u16,
    pub tru_board_status: u32,
    pub pu_status: u32,
    /// CPU temperature in degrees C.
    pub cpu_temp: i16,
    /// LPTX temperature in degrees C.
    pub lptx_temp: i16,
    /// LPRX temperature in degrees C.
    pub lprx_temp: i16,
    /// Hard disk container temperature in degrees C.
    pub hdd_temp: i16,
    pub last_nav_depth_input: i16,
    pub last_nav_altitude_input: i16,
    pub transmitters_passive: u8,
    pub external_trigger_enabled: u8,
    pub sidescan_bathy_enabled: u8,
    pub in_mission_sas_enabled: u8,
}

/// HISAS status datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HisasStatus {
    pub info: HisasStatusInfo,
}

impl HisasStatus {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let mut cursor = cursor.with_order(ByteOrder::LittleEndian);
        let info = HisasStatusInfo {
            version_id: cursor.read_u16()?,
            ping_rate: cursor.read_u16()?,
            ping_counter: cursor.read_u32()?,
            pu_idle_count: cursor.read_u32()?,
            sensor_input_status: cursor.read_u32()?,
            pps_status: cursor.read_i8()?,
            clock_status: cursor.read_i8()?,
            attitude_status: cursor.read_i8()?,
            trigger_status: cursor.read_u8()?,
            pu_modes: cursor.read_u8()?,
            logger_status: cursor.read_u8()?,
            yaw: cursor.read_u16()?,
            roll: cursor.read_u16()?,
            pitch: cursor.read_u16()?,
            heave: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            log_file_size_port: cursor.read_u32()?,
            log_file_size_stbd: cursor.read_u32()?,
            free_space_port: cursor.read_u32()?,
            free_space_stbd: cursor.read_u32()?,
            cbmf_1_status: cursor.read_u16()?,
            cbmf_2_status: cursor.read_u16()?,
            tru_board_status: cursor.read_u32()?,
            pu_status: cursor.read_u32()?,
            cpu_temp: cursor.read_i16()?,
            lptx_temp: cursor.read_i16()?,
            lprx_temp: cursor.read_i16()?,
            hdd_temp: cursor.read_i16()?,
            last_nav_depth_input: cursor.read_i16()?,
            last_nav_altitude_input: cursor.read_i16()?,
            transmitters_passive: cursor.read_u8()?,
            external_trigger_enabled: cursor.read_u8()?,
            sidescan_bathy_enabled: cursor.read_u8()?,
            in_mission_sas_enabled: {
                let value = cursor.read_u8()?;
                cursor.skip(24)?; // spare
                value
            },
        };
        Ok(Self { info })
    }
}

/// Sidescan channel description (128 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidescanChannel {
    /// Channel type: port = 1, stbd = 2.
    pub type_of_channel: u8,
    /// Index of this channel information structure.
    pub sub_channel_number: u8,
    /// Always 1.
    pub correction_flags: u16,
    /// Always 1.
    pub uni_polar: u16,
    /// Bytes per sample: 2 = 16-bit, 4 = float, 8 = float real/imaginary.
    pub bytes_per_sample: u16,
    /// Text describing the channel, e.g., "Port 500".
    pub channel_name: String,
    /// Center transmit frequency in Hz.
    pub frequency: f32,
    /// Horizontal beam width in degrees.
    pub horiz_beam_angle: f32,
    /// Sonar tilt angle from horizontal in degrees.
    pub tilt_angle: f32,
    /// Vertical 3-dB beam width in degrees.
    pub beam_width: f32,
    /// Positive X is to starboard.
    pub offset_x: f32,
    /// Positive Y is forward.
    pub offset_y: f32,
    /// Positive Z is down.
    pub offset_z: f32,
    /// Positive yaw is turn to right (-180-180).
    pub offset_yaw: f32,
    /// Positive pitch is nose up, in degrees.
    pub offset_pitch: f32,
    /// Positive roll is lean to stbd, in degrees.
    pub offset_roll: f32,
}

impl SidescanChannel {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            type_of_channel: cursor.read_u8()?,
            sub_channel_number: cursor.read_u8()?,
            correction_flags: cursor.read_u16()?,
            uni_polar: cursor.read_u16()?,
            bytes_per_sample: cursor.read_u16()?,
            channel_name: {
                cursor.skip(4)?; // spare
                let name = read_channel_name(cursor)?;
                cursor.skip(4)?; // spare
                name
            },
            frequency: cursor.read_f32()?,
            horiz_beam_angle: cursor.read_f32()?,
            tilt_angle: cursor.read_f32()?,
            beam_width: cursor.read_f32()?,
            offset_x: cursor.read_f32()?,
            offset_y: cursor.read_f32()?,
            offset_z: cursor.read_f32()?,
            offset_yaw: cursor.read_f32()?,
            offset_pitch: cursor.read_f32()?,
            offset_roll: {
                let value = cursor.read_f32()?;
                cursor.skip(56)?; // spare
                value
            },
        })
    }
}

/// Sidescan status info (1025 bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidescanStatusInfo {
    /// Set to 123 (0x7B).
    pub file_format: u8,
    /// Type of system used to record this data; set to 1.
    pub system_type: u8,
    /// Sonar type: 48 - Kongsberg SAS.
    pub sonar_type: u16,
    /// Always 3.
    pub nav_units: u16,
    /// Number of sidescan channels (0-6).
    pub num_channels: u16,
    /// All six channel description slots; only the first num_channels
    /// are active.
    pub channels: Vec<SidescanChannel>,
}

/// Sidescan status datagram.
///
/// The per-channel `bytes_per_sample` values are cached on the stream
/// handle; the sidescan data datagram cannot be decoded without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidescanStatus {
    pub info: SidescanStatusInfo,
}

impl SidescanStatus {
    pub(crate) fn parse(
        cursor: &mut BodyCursor<'_>,
        bytes_per_sample_cache: &mut [u16; SIDESCAN_CHANNELS],
    ) -> Result<Self, DgmError> {
        let mut cursor = cursor.with_order(ByteOrder::LittleEndian);
        let file_format = cursor.read_u8()?;
        let system_type = cursor.read_u8()?;
        cursor.skip(32)?; // spare
        let sonar_type = cursor.read_u16()?;
        cursor.skip(128)?; // spare
        let nav_units = cursor.read_u16()?;
        let num_channels = cursor.read_u16()?;
        cursor.skip(88)?; // spare

        if num_channels as usize > SIDESCAN_CHANNELS {
            return Err(DgmError::bad_data(format!(
                "invalid number of sonar channels ({})",
                num_channels
            )));
        }

        let mut channels = Vec::with_capacity(SIDESCAN_CHANNELS);
        for index in 0..SIDESCAN_CHANNELS {
            let channel = SidescanChannel::parse(&mut cursor)?;
            if index < num_channels as usize {
                if !matches!(channel.bytes_per_sample, 2 | 4 | 8) {
                    return Err(DgmError::bad_data(format!(
                        "invalid bytes per sample ({})",
                        channel.bytes_per_sample
                    )));
                }
                bytes_per_sample_cache[index] = channel.bytes_per_sample;
            }
            channels.push(channel);
        }

        Ok(Self {
            info: SidescanStatusInfo {
                file_format,
                system_type,
                sonar_type,
                nav_units,
                num_channels,
                channels,
            },
        })
    }
}

/// Sidescan data ping header (256 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidescanDataInfo {
    /// Must be set to 0xFACE.
    pub magic_number: u16,
    /// Always 0.
    pub header_type: u8,
    pub beam_number: u8,
    /// Number of channels in the record.
    pub num_channels: u16,
    /// Total byte count for this ping including this header.
    pub num_bytes_record: u16,
    /// Ping year.
    pub year: u16,
    /// Ping month (1-12).
    pub month: u8,
    /// Ping day (1-31).
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Hundredths of seconds (0-99).
    pub hseconds: u8,
    /// Counts consecutively from 0 and increments for each update.
    pub ping_number: u32,
    /// Two-way sound velocity in m/s.
    pub sound_velocity_two_way: f32,
    /// One-way sound velocity in m/s.
    pub sound_velocity: f32,
    /// Hour of the most recent nav update.
    pub fix_time_hour: u8,
    pub fix_time_minute: u8,
    pub fix_time_second: u8,
    pub fix_time_hsecond: u8,
    /// Speed of towfish in knots.
    pub sensor_speed: f32,
    /// Sensor latitude in degrees.
    pub sensor_lat: f64,
    /// Sensor longitude in degrees.
    pub sensor_lon: f64,
    /// Distance from sea surface to sensor in meters.
    pub sensor_depth: f32,
    /// Distance from towfish to the sea floor in meters.
    pub sensor_altitude: f32,
    /// Auxiliary altitude in meters.
    pub sensor_aux_altitude: f32,
    /// Pitch in degrees (positive = nose up).
    pub sensor_pitch: f32,
    /// Roll in degrees (positive = roll to stbd).
    pub sensor_roll: f32,
    /// Sensor heading in degrees.
    pub sensor_heading: f32,
}

/// Sidescan data per-channel header (64 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidescanDataChannelInfo {
    /// Channel number (index into the status record).
    pub channel_number: u16,
    /// Slant range of the data in meters.
    pub slant_range: f32,
    /// Amount of time in seconds recorded.
    pub time_duration: f32,
    /// Amount of time in seconds from ping to ping.
    pub seconds_per_ping: f32,
    /// Number of samples that follow this structure.
    pub num_samples: u16,
    /// Weighting factor.
    pub weight: i16,
}

/// Sidescan sample buffer, interpreted per the cached bytes-per-sample
/// of the corresponding status channel.  8-byte channels carry
/// real/imaginary float pairs, flattened here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SidescanSamples {
    U16(Vec<u16>),
    F32(Vec<f32>),
}

/// One sidescan data channel: header plus samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidescanDataChannel {
    pub info: SidescanDataChannelInfo,
    pub samples: SidescanSamples,
    /// Bytes per sample used to decode the buffer (from the preceding
    /// status record).
    pub bytes_per_sample: u16,
}

/// HISAS 1032 sidescan data datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidescanData {
    pub info: SidescanDataInfo,
    pub channels: Vec<SidescanDataChannel>,
}

impl SidescanData {
    pub(crate) fn parse(
        cursor: &mut BodyCursor<'_>,
        bytes_per_sample_cache: &[u16; SIDESCAN_CHANNELS],
    ) -> Result<Self, DgmError> {
        let mut cursor = cursor.with_order(ByteOrder::LittleEndian);
        let info = SidescanDataInfo {
            magic_number: cursor.read_u16()?,
            header_type: cursor.read_u8()?,
            beam_number: cursor.read_u8()?,
            num_channels: cursor.read_u16()?,
            num_bytes_record: {
                cursor.skip(4)?; // spare
                let value = cursor.read_u16()?;
                cursor.skip(2)?; // spare
                value
            },
            year: cursor.read_u16()?,
            month: cursor.read_u8()?,
            day: cursor.read_u8()?,
            hour: cursor.read_u8()?,
            minute: cursor.read_u8()?,
            second: cursor.read_u8()?,
            hseconds: cursor.read_u8()?,
            ping_number: {
                cursor.skip(6)?; // spare
                cursor.read_u32()?
            },
            sound_velocity_two_way: cursor.read_f32()?,
            sound_velocity: {
                cursor.skip(36)?; // spare
                let value = cursor.read_f32()?;
                cursor.skip(72)?; // spare
                value
            },
            fix_time_hour: cursor.read_u8()?,
            fix_time_minute: cursor.read_u8()?,
            fix_time_second: cursor.read_u8()?,
            fix_time_hsecond: cursor.read_u8()?,
            sensor_speed: cursor.read_f32()?,
            sensor_lat: {
                cursor.skip(4)?; // spare
                cursor.read_f64()?
            },
            sensor_lon: cursor.read_f64()?,
            sensor_depth: {
                cursor.skip(16)?; // spare
                cursor.read_f32()?
            },
            sensor_altitude: cursor.read_f32()?,
            sensor_aux_altitude: cursor.read_f32()?,
            sensor_pitch: cursor.read_f32()?,
            sensor_roll: cursor.read_f32()?,
            sensor_heading: {
                let value = cursor.read_f32()?;
                cursor.skip(40)?; // spare
                value
            },
        };

        if info.num_channels as usize > SIDESCAN_CHANNELS {
            return Err(DgmError::bad_data(format!(
                "invalid number of sonar channels ({})",
                info.num_channels
            )));
        }

        let mut channels = Vec::with_capacity(info.num_channels as usize);
        for index in 0..info.num_channels as usize {
            let bytes_per_sample = bytes_per_sample_cache[index];
            if bytes_per_sample == 0 {
                return Err(DgmError::bad_data(
                    "sidescan data without a preceding sidescan status datagram",
                ));
            }

            let channel_info = SidescanDataChannelInfo {
                channel_number: cursor.read_u16()?,
                slant_range: {
                    cursor.skip(2)?; // spare
                    let value = cursor.read_f32()?;
                    cursor.skip(8)?; // spare
                    value
                },
                time_duration: cursor.read_f32()?,
                seconds_per_ping: cursor.read_f32()?,
                num_samples: {
                    cursor.skip(18)?; // spare
                    cursor.read_u16()?
                },
                weight: {
                    cursor.skip(14)?; // spare
                    let value = cursor.read_i16()?;
                    cursor.skip(4)?; // spare
                    value
                },
            };

            let num_samples = channel_info.num_samples as usize;
            let samples = match bytes_per_sample {
                2 => SidescanSamples::U16(cursor.read_u16_array(num_samples)?),
                4 => SidescanSamples::F32(cursor.read_f32_array(num_samples)?),
                // Real/imaginary pairs.
                8 => SidescanSamples::F32(cursor.read_f32_array(num_samples * 2)?),
                other => {
                    return Err(DgmError::bad_data(format!(
                        "invalid bytes per sample ({})",
                        other
                    )))
                }
            };

            channels.push(SidescanDataChannel {
                info: channel_info,
                samples,
                bytes_per_sample,
            });
        }

        Ok(Self { info, channels })
    }
}

/// Navigation output info (112 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationOutputInfo {
    /// Always 0xF00D.
    pub data_type: u16,
    /// Always 64.
    pub bytes_per_element: u16,
    /// Number of elements; usually 1 (for future expansion).
    pub num_elements: u32,
    /// Date from received telemetry data.
    pub date: u32,
    /// Time since midnight from received telemetry data.
    pub time_ms: u32,
    /// Time offset in ms to add to the datagram time tag.
    pub time_offset: u32,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Depth below surface in meters.
    pub depth: f32,
    /// Heading in degrees.
    pub heading: f32,
    /// Pitch angle in degrees.
    pub pitch: f32,
    /// Roll angle in degrees.
    pub roll: f32,
    /// Velocity in forward direction in m/s.
    pub velocity_forward: f32,
    /// Velocity in starboard direction in m/s.
    pub velocity_stbd: f32,
    /// Velocity in down direction in m/s.
    pub velocity_down: f32,
    /// Standard deviation of horizontal position in meters.
    pub horizontal_uncertainty: f32,
    /// Altitude above the sea floor in meters.
    pub altitude: f32,
    /// Speed of sound in m/s.
    pub sound_speed: f32,
    /// Data validity flags, one bit per field group; 1 = valid.
    pub data_validity: u16,
}

/// HISAS navigation output datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationOutput {
    pub info: NavigationOutputInfo,
}

impl NavigationOutput {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let mut cursor = cursor.with_order(ByteOrder::LittleEndian);
        let info = NavigationOutputInfo {
            data_type: cursor.read_u16()?,
            bytes_per_element: cursor.read_u16()?,
            num_elements: cursor.read_u32()?,
            date: cursor.read_u32()?,
            time_ms: {
                let value = cursor.read_u32()?;
                cursor.skip(32)?; // spare
                value
            },
            time_offset: cursor.read_u32()?,
            latitude: cursor.read_f64()?,
            longitude: cursor.read_f64()?,
            depth: cursor.read_f32()?,
            heading: cursor.read_f32()?,
            pitch: cursor.read_f32()?,
            roll: cursor.read_f32()?,
            velocity_forward: cursor.read_f32()?,
            velocity_stbd: cursor.read_f32()?,
            velocity_down: cursor.read_f32()?,
            horizontal_uncertainty: cursor.read_f32()?,
            altitude: cursor.read_f32()?,
            sound_speed: cursor.read_f32()?,
            data_validity: {
                cursor.skip(2)?; // spare
                cursor.read_u16()?
            },
        };
        Ok(Self { info })
    }
}
