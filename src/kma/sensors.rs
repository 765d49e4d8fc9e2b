//! External sensor datagrams: position, attitude, sound velocity,
//! clock, depth, height, and the compatibility records.

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use crate::kma::multibeam::MCommon;
use serde::{Deserialize, Serialize};

/// Common part of the S-class sensor datagrams (8 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SCommon {
    /// Size in bytes of the current struct.
    pub num_bytes_cmn_part: u16,
    /// Sensor system number as set up in the K-Controller installation
    /// menu; for the clock datagram, bit-coded time synchronization
    /// sources.
    pub sensor_system: u16,
    /// Sensor status, bit-coded per sensor type; quality may be invalid
    /// even when the sensor is active.
    pub sensor_status: u16,
}

impl SCommon {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let common = Self {
            num_bytes_cmn_part: cursor.read_u16()?,
            sensor_system: cursor.read_u16()?,
            sensor_status: cursor.read_u16()?,
        };
        cursor.seek_to(start + common.num_bytes_cmn_part as usize)?;
        Ok(common)
    }
}

/// SPO sensor data (40 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoData {
    /// UTC time from the position sensor in seconds (epoch 1970-01-01).
    pub time_from_sensor_sec: u32,
    /// Nano-second remainder of the sensor time.
    pub time_from_sensor_nanosec: u32,
    /// Position fix quality in meters, as input from the sensor.
    pub pos_fix_quality_m: f32,
    /// Motion corrected latitude as used in depth calculations, in
    /// degrees; 200 when the sensor is inactive.
    pub corrected_lat_deg: f64,
    /// Motion corrected longitude as used in depth calculations, in
    /// degrees; 200 when the sensor is inactive.
    pub corrected_long_deg: f64,
    /// Speed over ground in m/s; -1 when unavailable.
    pub speed_over_ground_m_per_sec: f32,
    /// Course over ground in degrees; -4 when unavailable.
    pub course_over_ground_deg: f32,
    /// Height of the vessel reference point above the ellipsoid in
    /// meters; -999 when unavailable.
    pub ellipsoid_height_re_ref_point_m: f32,
}

impl SpoData {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            time_from_sensor_sec: cursor.read_u32()?,
            time_from_sensor_nanosec: cursor.read_u32()?,
            pos_fix_quality_m: cursor.read_f32()?,
            corrected_lat_deg: cursor.read_f64()?,
            corrected_long_deg: cursor.read_f64()?,
            speed_over_ground_m_per_sec: cursor.read_f32()?,
            course_over_ground_deg: cursor.read_f32()?,
            ellipsoid_height_re_ref_point_m: cursor.read_f32()?,
        })
    }
}

/// Position sensor datagram ('#SPO').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spo {
    pub common: SCommon,
    pub data: SpoData,
    /// Position data as received from the sensor, uncorrected for
    /// motion.
    pub data_from_sensor: Vec<u8>,
}

impl Spo {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let common = SCommon::parse(cursor)?;
        let data = SpoData::parse(cursor)?;
        let data_from_sensor = cursor.read_bytes(cursor.remaining())?;
        Ok(Self {
            common,
            data,
            data_from_sensor,
        })
    }
}

/// SKM info (12 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkmInfo {
    /// Size in bytes of the current struct.
    pub num_bytes_info_part: u16,
    /// Attitude system number as numbered in the installation
    /// parameters.
    pub sensor_system: u8,
    /// Summary of the per-sample status fields; only data available from
    /// the input sensor format is summarized.
    pub sensor_status: u8,
    /// Format of raw data from the input sensor (1 = KM binary, 2 =
    /// EM 3000, 3 = Sagem, 4-6 = Seapath binary 11/23/26, 7 = POS M/V).
    pub sensor_input_format: u16,
    /// Number of KM binary sensor samples in this datagram.
    pub num_samples: u16,
    /// Length in bytes of one whole KM binary sensor sample.
    pub num_bytes_per_sample: u16,
    /// Bit pattern of which information the input sensor provides.  The
    /// delayed-heave bit assignments changed between format revisions;
    /// interpretation is left to the caller.
    pub sensor_data_contents: u16,
}

/// One KM binary sensor sample (120 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkmBinary {
    /// Set to "#KMB"; not NUL-terminated.
    pub dgm_type: [u8; 4],
    /// Sample length in bytes.
    pub num_bytes_dgm: u16,
    /// Sample version.
    pub dgm_version: u16,
    /// UTC time from inside the KM sensor data in seconds (epoch
    /// 1970-01-01); reception time when the sensor carries no time.
    pub time_sec: u32,
    /// Nano-second remainder.
    pub time_nanosec: u32,
    /// Sensor data validity and reduced-performance bitmask.  Bits 0-6
    /// flag invalid data and bits 16-22 reduced performance; the
    /// delayed-heave bits changed meaning between revisions, so the raw
    /// word is exposed as-is.
    pub status: u32,
    /// Latitude position in degrees.
    pub latitude_deg: f64,
    /// Longitude position in degrees.
    pub longitude_deg: f64,
    /// Height of the sensor reference point above the ellipsoid in m.
    pub ellipsoid_height_m: f32,
    /// Roll in degrees.
    pub roll_deg: f32,
    /// Pitch in degrees.
    pub pitch_deg: f32,
    /// Heading in degrees.
    pub heading_deg: f32,
    /// Heave in meters, positive down.
    pub heave_m: f32,
    /// Roll rate in deg/s.
    pub roll_rate_deg_per_sec: f32,
    /// Pitch rate in deg/s.
    pub pitch_rate_deg_per_sec: f32,
    /// Yaw (heading) rate in deg/s.
    pub yaw_rate_deg_per_sec: f32,
    /// Velocity north (X) in m/s.
    pub vel_north_m_per_sec: f32,
    /// Velocity east (Y) in m/s.
    pub vel_east_m_per_sec: f32,
    /// Velocity down (Z) in m/s.
    pub vel_down_m_per_sec: f32,
    /// Latitude error in meters.
    pub latitude_error_m: f32,
    /// Longitude error in meters.
    pub longitude_error_m: f32,
    /// Ellipsoid height error in meters.
    pub ellipsoid_height_error_m: f32,
    /// Roll error in degrees.
    pub roll_error_deg: f32,
    /// Pitch error in degrees.
    pub pitch_error_deg: f32,
    /// Heading error in degrees.
    pub heading_error_deg: f32,
    /// Heave error in meters.
    pub heave_error_m: f32,
    /// Acceleration north in m/s^2.
    pub north_acceleration_m_per_sec_sec: f32,
    /// Acceleration east in m/s^2.
    pub east_acceleration_m_per_sec_sec: f32,
    /// Acceleration down in m/s^2.
    pub down_acceleration_m_per_sec_sec: f32,
}

impl SkmBinary {
    const SIZE: usize = 120;

    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let dgm_type_bytes = cursor.take(4)?;
        Ok(Self {
            dgm_type: [
                dgm_type_bytes[0],
                dgm_type_bytes[1],
                dgm_type_bytes[2],
                dgm_type_bytes[3],
            ],
            num_bytes_dgm: cursor.read_u16()?,
            dgm_version: cursor.read_u16()?,
            time_sec: cursor.read_u32()?,
            time_nanosec: cursor.read_u32()?,
            status: cursor.read_u32()?,
            latitude_deg: cursor.read_f64()?,
            longitude_deg: cursor.read_f64()?,
            ellipsoid_height_m: cursor.read_f32()?,
            roll_deg: cursor.read_f32()?,
            pitch_deg: cursor.read_f32()?,
            heading_deg: cursor.read_f32()?,
            heave_m: cursor.read_f32()?,
            roll_rate_deg_per_sec: cursor.read_f32()?,
            pitch_rate_deg_per_sec: cursor.read_f32()?,
            yaw_rate_deg_per_sec: cursor.read_f32()?,
            vel_north_m_per_sec: cursor.read_f32()?,
            vel_east_m_per_sec: cursor.read_f32()?,
            vel_down_m_per_sec: cursor.read_f32()?,
            latitude_error_m: cursor.read_f32()?,
            longitude_error_m: cursor.read_f32()?,
            ellipsoid_height_error_m: cursor.read_f32()?,
            roll_error_deg: cursor.read_f32()?,
            pitch_error_deg: cursor.read_f32()?,
            heading_error_deg: cursor.read_f32()?,
            heave_error_m: cursor.read_f32()?,
            north_acceleration_m_per_sec_sec: cursor.read_f32()?,
            east_acceleration_m_per_sec_sec: cursor.read_f32()?,
            down_acceleration_m_per_sec_sec: cursor.read_f32()?,
        })
    }
}

/// SKM delayed heave block (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SkmDelayedHeave {
    /// UTC time in seconds (epoch 1970-01-01).
    pub time_sec: u32,
    /// Nano-second remainder.
    pub time_nanosec: u32,
    /// Delayed heave in meters.
    pub delayed_heave_m: f32,
}

/// One SKM sample: the KM binary block plus delayed heave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkmSample {
    pub km_default: SkmBinary,
    pub delayed_heave: SkmDelayedHeave,
}

/// KM binary attitude sensor datagram ('#SKM').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skm {
    pub info: SkmInfo,
    pub samples: Vec<SkmSample>,
}

impl Skm {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = SkmInfo {
            num_bytes_info_part: cursor.read_u16()?,
            sensor_system: cursor.read_u8()?,
            sensor_status: cursor.read_u8()?,
            sensor_input_format: cursor.read_u16()?,
            num_samples: cursor.read_u16()?,
            num_bytes_per_sample: cursor.read_u16()?,
            sensor_data_contents: cursor.read_u16()?,
        };
        cursor.seek_to(start + info.num_bytes_info_part as usize)?;

        if (info.num_bytes_per_sample as usize) < SkmBinary::SIZE {
            return Err(DgmError::bad_data(format!(
                "invalid SKM sample size ({})",
                info.num_bytes_per_sample
            )));
        }

        let mut samples = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            let sample_start = cursor.position();
            let km_default = SkmBinary::parse(cursor)?;
            let sample_end = sample_start + info.num_bytes_per_sample as usize;
            let delayed_heave = if sample_end >= cursor.position() + 12 {
                SkmDelayedHeave {
                    time_sec: cursor.read_u32()?,
                    time_nanosec: cursor.read_u32()?,
                    delayed_heave_m: cursor.read_f32()?,
                }
            } else {
                SkmDelayedHeave::default()
            };
            cursor.seek_to(sample_end)?;
            samples.push(SkmSample {
                km_default,
                delayed_heave,
            });
        }

        Ok(Self { info, samples })
    }
}

/// SVP info (28 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvpInfo {
    /// Size in bytes of the current struct.
    pub num_bytes_info_part: u16,
    /// Number of sound velocity samples.
    pub num_samples: u16,
    /// Profile format: 'S00' - SVP, 'S01' - CTD profile.  Garbage has
    /// been observed in early data.
    pub sensor_format: [u8; 4],
    /// Time extracted from the SVP; zero if not found.
    pub time_sec: u32,
    /// Latitude in degrees from the SVP; 200 if not found.
    pub latitude_deg: f64,
    /// Longitude in degrees from the SVP; 200 if not found.
    pub longitude_deg: f64,
}

/// SVP sample (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvpSample {
    /// Depth at which the measurement was taken, in meters (0-12000).
    pub depth_m: f32,
    /// Sound velocity from the profile in m/s; calculated for CTD.
    pub sound_velocity_m_per_sec: f32,
    /// Water temperature at the given depth in Celsius; zero for SVP.
    pub temp_c: f32,
    /// Salinity at the given depth in PSU; zero for SVP and -99 as the
    /// null value.
    pub salinity: f32,
}

/// Sound velocity profile datagram ('#SVP').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svp {
    pub info: SvpInfo,
    pub samples: Vec<SvpSample>,
}

impl Svp {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = SvpInfo {
            num_bytes_info_part: cursor.read_u16()?,
            num_samples: cursor.read_u16()?,
            sensor_format: {
                let bytes = cursor.take(4)?;
                [bytes[0], bytes[1], bytes[2], bytes[3]]
            },
            time_sec: cursor.read_u32()?,
            latitude_deg: cursor.read_f64()?,
            longitude_deg: cursor.read_f64()?,
        };
        cursor.seek_to(start + info.num_bytes_info_part as usize)?;

        let mut samples = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            samples.push(SvpSample {
                depth_m: cursor.read_f32()?,
                sound_velocity_m_per_sec: {
                    let value = cursor.read_f32()?;
                    cursor.skip(4)?; // formerly absorption coefficient
                    value
                },
                temp_c: cursor.read_f32()?,
                salinity: cursor.read_f32()?,
            });
        }

        Ok(Self { info, samples })
    }
}

/// SVT info (20 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvtInfo {
    /// Size in bytes of the current struct.
    pub num_bytes_info_part: u16,
    /// Sensor status, bit-coded.
    pub sensor_status: u16,
    /// Format of raw data from the input sensor (1-10: AML/Micro/
    /// Valeport/KSSIS codes).
    pub sensor_input_format: u16,
    /// Number of sensor samples in this datagram.
    pub num_samples: u16,
    /// Length in bytes of one whole SVT sample.
    pub num_bytes_per_sample: u16,
    /// Bit pattern of which information the input sensor provides.
    pub sensor_data_contents: u16,
    /// Time parameter for the moving median filter in seconds.
    pub filter_time_sec: f32,
    /// Offset for the measured sound velocity set in K-Controller, m/s.
    pub sound_velocity_offset_m_per_sec: f32,
}

/// SVT sample (24 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvtSample {
    /// UTC time in seconds (epoch 1970-01-01).
    pub time_sec: u32,
    /// Nano-second remainder.
    pub time_nanosec: u32,
    /// Measured sound velocity from the probe in m/s.
    pub sound_velocity_m_per_sec: f32,
    /// Water temperature from the probe in Celsius.
    pub temp_c: f32,
    /// Pressure in Pascal.
    pub pressure_pa: f32,
    /// Salinity in g salt per kg sea water.
    pub salinity: f32,
}

/// Sound velocity at transducer datagram ('#SVT').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svt {
    pub info: SvtInfo,
    pub samples: Vec<SvtSample>,
}

impl Svt {
    const SAMPLE_SIZE: usize = 24;

    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = SvtInfo {
            num_bytes_info_part: cursor.read_u16()?,
            sensor_status: cursor.read_u16()?,
            sensor_input_format: cursor.read_u16()?,
            num_samples: cursor.read_u16()?,
            num_bytes_per_sample: cursor.read_u16()?,
            sensor_data_contents: cursor.read_u16()?,
            filter_time_sec: cursor.read_f32()?,
            sound_velocity_offset_m_per_sec: cursor.read_f32()?,
        };
        cursor.seek_to(start + info.num_bytes_info_part as usize)?;

        if (info.num_bytes_per_sample as usize) < Self::SAMPLE_SIZE {
            return Err(DgmError::bad_data(format!(
                "invalid SVT sample size ({})",
                info.num_bytes_per_sample
            )));
        }

        let mut samples = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            let sample_start = cursor.position();
            samples.push(SvtSample {
                time_sec: cursor.read_u32()?,
                time_nanosec: cursor.read_u32()?,
                sound_velocity_m_per_sec: cursor.read_f32()?,
                temp_c: cursor.read_f32()?,
                pressure_pa: cursor.read_f32()?,
                salinity: cursor.read_f32()?,
            });
            cursor.seek_to(sample_start + info.num_bytes_per_sample as usize)?;
        }

        Ok(Self { info, samples })
    }
}

/// SCL sensor data (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SclData {
    /// Offset in seconds from K-Controller operator input.
    pub offset_sec: f32,
    /// Clock deviation from the PU in nanoseconds; within +/- 1 second
    /// when 1PPS is active and sync is from ZDA.
    pub clock_dev_pu_nanosec: i32,
}

/// Clock sensor datagram ('#SCL').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scl {
    pub common: SCommon,
    pub data: SclData,
    /// Clock data as received from the sensor in text format,
    /// uncorrected for offsets.
    pub data_from_sensor: Vec<u8>,
}

impl Scl {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let common = SCommon::parse(cursor)?;
        let data = SclData {
            offset_sec: cursor.read_f32()?,
            clock_dev_pu_nanosec: cursor.read_i32()?,
        };
        let data_from_sensor = cursor.read_bytes(cursor.remaining())?;
        Ok(Self {
            common,
            data,
            data_from_sensor,
        })
    }
}

/// SDE sensor data, datagram version 0 (28 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdeDataV0 {
    /// Depth as used, corrected with installation parameters, in m.
    pub depth_used_m: f32,
    /// Offset used in measuring this sample.
    pub offset: f32,
    /// Scaling factor for depth.
    pub scale: f32,
    /// Latitude in degrees from the SVP; 200 if not available.
    pub latitude_deg: f64,
    /// Longitude in degrees from the SVP; 200 if not available.
    pub longitude_deg: f64,
}

/// SDE sensor data, datagram version 1 (32 bytes, Rev. I).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdeDataV1 {
    /// Depth as used, corrected with installation parameters, in m.
    pub depth_used_m: f32,
    /// Raw depth reading from the sensor, scaled and offset with the
    /// sensor parameters, in m.
    pub depth_raw_m: f32,
    /// Offset used in measuring this sample.
    pub offset: f32,
    /// Scaling factor for depth.
    pub scale: f32,
    /// Latitude in degrees from the SVP; 200 if not available.
    pub latitude_deg: f64,
    /// Longitude in degrees from the SVP; 200 if not available.
    pub longitude_deg: f64,
}

/// SDE data, selected by the header's datagram version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SdeData {
    V0(SdeDataV0),
    V1(SdeDataV1),
}

/// Depth sensor datagram ('#SDE').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sde {
    pub common: SCommon,
    pub data: SdeData,
    /// Data as received from the sensor.
    pub data_from_sensor: Vec<u8>,
}

impl Sde {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>, dgm_version: u8) -> Result<Self, DgmError> {
        let common = SCommon::parse(cursor)?;
        let data = if dgm_version == 0 {
            SdeData::V0(SdeDataV0 {
                depth_used_m: cursor.read_f32()?,
                offset: cursor.read_f32()?,
                scale: cursor.read_f32()?,
                latitude_deg: cursor.read_f64()?,
                longitude_deg: cursor.read_f64()?,
            })
        } else {
            SdeData::V1(SdeDataV1 {
                depth_used_m: cursor.read_f32()?,
                depth_raw_m: cursor.read_f32()?,
                offset: cursor.read_f32()?,
                scale: cursor.read_f32()?,
                latitude_deg: cursor.read_f64()?,
                longitude_deg: cursor.read_f64()?,
            })
        };
        let data_from_sensor = cursor.read_bytes(cursor.remaining())?;
        Ok(Self {
            common,
            data,
            data_from_sensor,
        })
    }
}

/// SHI sensor data (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiData {
    /// Sensor type; undocumented.
    pub sensor_type: u16,
    /// Height corrected using installation parameters, if any, in m.
    pub height_used_m: f32,
}

/// Height sensor datagram ('#SHI').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shi {
    pub common: SCommon,
    pub data: ShiData,
    /// Data as received from the sensor.
    pub data_from_sensor: Vec<u8>,
}

impl Shi {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let common = SCommon::parse(cursor)?;
        let data = ShiData {
            sensor_type: cursor.read_u16()?,
            height_used_m: cursor.read_f32()?,
        };
        let data_from_sensor = cursor.read_bytes(cursor.remaining())?;
        Ok(Self {
            common,
            data,
            data_from_sensor,
        })
    }
}

/// CPO sensor data (40 bytes); the compatibility variant of SPO with
/// positions referred to the antenna footprint at water level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpoData {
    /// UTC time from the position sensor in seconds (epoch 1970-01-01).
    pub time_from_sensor_sec: u32,
    /// Nano-second remainder of the sensor time.
    pub time_from_sensor_nanosec: u32,
    /// Position fix quality in meters.
    pub pos_fix_quality_m: f32,
    /// Motion corrected latitude in degrees; 200 when inactive.
    pub corrected_lat_deg: f64,
    /// Motion corrected longitude in degrees; 200 when inactive.
    pub corrected_long_deg: f64,
    /// Speed over ground in m/s; -1 when unavailable.
    pub speed_over_ground_m_per_sec: f32,
    /// Course over ground in degrees; -4 when unavailable.
    pub course_over_ground_deg: f32,
    /// Height of the antenna footprint above the ellipsoid in meters;
    /// -999 when unavailable.
    pub ellipsoid_height_re_ref_point_m: f32,
}

/// Compatibility position sensor datagram ('#CPO').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cpo {
    pub common: SCommon,
    pub data: CpoData,
    /// Position data as received from the sensor.
    pub data_from_sensor: Vec<u8>,
}

impl Cpo {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let common = SCommon::parse(cursor)?;
        let data = CpoData {
            time_from_sensor_sec: cursor.read_u32()?,
            time_from_sensor_nanosec: cursor.read_u32()?,
            pos_fix_quality_m: cursor.read_f32()?,
            corrected_lat_deg: cursor.read_f64()?,
            corrected_long_deg: cursor.read_f64()?,
            speed_over_ground_m_per_sec: cursor.read_f32()?,
            course_over_ground_deg: cursor.read_f32()?,
            ellipsoid_height_re_ref_point_m: cursor.read_f32()?,
        };
        let data_from_sensor = cursor.read_bytes(cursor.remaining())?;
        Ok(Self {
            common,
            data,
            data_from_sensor,
        })
    }
}

/// CHE data (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheData {
    /// Heave in meters, positive downwards.
    pub heave_m: f32,
}

/// Compatibility heave datagram ('#CHE').
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Che {
    pub common: MCommon,
    pub data: CheData,
}

impl Che {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let common = MCommon::parse(cursor)?;
        let data = CheData {
            heave_m: cursor.read_f32()?,
        };
        Ok(Self { common, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;

    fn s_common_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes()); // padding
        bytes
    }

    #[test]
    fn test_spo_parse() {
        let mut body = s_common_bytes();
        body.extend_from_slice(&1_600_000_000u32.to_le_bytes());
        body.extend_from_slice(&250_000_000u32.to_le_bytes());
        body.extend_from_slice(&1.5f32.to_le_bytes());
        body.extend_from_slice(&59.5f64.to_le_bytes());
        body.extend_from_slice(&10.25f64.to_le_bytes());
        body.extend_from_slice(&2.0f32.to_le_bytes());
        body.extend_from_slice(&180.0f32.to_le_bytes());
        body.extend_from_slice(&12.0f32.to_le_bytes());
        body.extend_from_slice(b"$GPGGA,...");

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let spo = Spo::parse(&mut cursor).unwrap();
        assert_eq!(spo.common.sensor_status, 1);
        assert_eq!(spo.data.corrected_lat_deg, 59.5);
        assert_eq!(spo.data_from_sensor, b"$GPGGA,...");
    }

    #[test]
    fn test_skm_sample_stride() {
        let mut body = Vec::new();
        body.extend_from_slice(&12u16.to_le_bytes()); // num_bytes_info_part
        body.push(0); // sensor_system
        body.push(1); // sensor_status
        body.extend_from_slice(&1u16.to_le_bytes()); // sensor_input_format
        body.extend_from_slice(&1u16.to_le_bytes()); // num_samples
        body.extend_from_slice(&132u16.to_le_bytes()); // num_bytes_per_sample
        body.extend_from_slice(&0x0Eu16.to_le_bytes()); // sensor_data_contents

        let mut sample = vec![0u8; 132];
        sample[0..4].copy_from_slice(b"#KMB");
        sample[4..6].copy_from_slice(&132u16.to_le_bytes());
        sample[20..28].copy_from_slice(&1.25f64.to_le_bytes()); // latitude
        sample[120..124].copy_from_slice(&7u32.to_le_bytes()); // delayed heave time
        sample[128..132].copy_from_slice(&0.5f32.to_le_bytes()); // delayed heave
        body.extend_from_slice(&sample);

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let skm = Skm::parse(&mut cursor).unwrap();
        assert_eq!(skm.samples.len(), 1);
        assert_eq!(&skm.samples[0].km_default.dgm_type, b"#KMB");
        assert_eq!(skm.samples[0].km_default.latitude_deg, 1.25);
        assert_eq!(skm.samples[0].delayed_heave.time_sec, 7);
        assert_eq!(skm.samples[0].delayed_heave.delayed_heave_m, 0.5);
    }

    #[test]
    fn test_svp_sample_skips_removed_field() {
        let mut body = Vec::new();
        body.extend_from_slice(&28u16.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(b"S01\0");
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&200.0f64.to_le_bytes());
        body.extend_from_slice(&200.0f64.to_le_bytes());

        body.extend_from_slice(&10.0f32.to_le_bytes()); // depth
        body.extend_from_slice(&1480.5f32.to_le_bytes()); // sound velocity
        body.extend_from_slice(&0u32.to_le_bytes()); // removed field
        body.extend_from_slice(&4.0f32.to_le_bytes()); // temp
        body.extend_from_slice(&35.0f32.to_le_bytes()); // salinity

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let svp = Svp::parse(&mut cursor).unwrap();
        assert_eq!(svp.samples.len(), 1);
        assert_eq!(svp.samples[0].sound_velocity_m_per_sec, 1480.5);
        assert_eq!(svp.samples[0].salinity, 35.0);
    }

    #[test]
    fn test_sde_version_select() {
        let mut body = s_common_bytes();
        body.extend_from_slice(&50.0f32.to_le_bytes()); // depth_used
        body.extend_from_slice(&49.5f32.to_le_bytes()); // depth_raw (v1)
        body.extend_from_slice(&0.0f32.to_le_bytes()); // offset
        body.extend_from_slice(&1.0f32.to_le_bytes()); // scale
        body.extend_from_slice(&200.0f64.to_le_bytes());
        body.extend_from_slice(&200.0f64.to_le_bytes());

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let sde = Sde::parse(&mut cursor, 1).unwrap();
        match sde.data {
            SdeData::V1(data) => {
                assert_eq!(data.depth_used_m, 50.0);
                assert_eq!(data.depth_raw_m, 49.5);
            }
            _ => panic!("expected version 1 data"),
        }
    }
}
