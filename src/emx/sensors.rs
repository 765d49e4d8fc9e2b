//! Sensor datagrams: attitude, heading, position, clock, height, tide,
//! single beam depth, sound speed, and transducer tilt.

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Attitude info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeInfo {
    /// Number of entries = N (1-).
    pub num_entries: u16,
}

/// Attitude entry (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeData {
    /// Time in milliseconds since record start.
    pub record_time: u16,
    /// Sensor status, copied from the input datagram's sync bytes when
    /// the sensor uses the EM format.
    pub status: u16,
    /// Sensor roll in 0.01 deg.
    pub roll: i16,
    /// Sensor pitch in 0.01 deg.
    pub pitch: i16,
    /// Sensor heave in cm.
    pub heave: i16,
    /// Sensor heading in 0.01 deg.
    pub heading: u16,
}

/// Attitude datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub info: AttitudeInfo,
    pub data: Vec<AttitudeData>,
    /// Bit-coded descriptor of the motion sensor and which of its data
    /// were used in real time.
    pub sensor_system_descriptor: i8,
}

impl Attitude {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = AttitudeInfo {
            num_entries: cursor.read_u16()?,
        };
        let mut data = Vec::with_capacity(info.num_entries as usize);
        for _ in 0..info.num_entries {
            data.push(AttitudeData {
                record_time: cursor.read_u16()?,
                status: cursor.read_u16()?,
                roll: cursor.read_i16()?,
                pitch: cursor.read_i16()?,
                heave: cursor.read_i16()?,
                heading: cursor.read_u16()?,
            });
        }
        let sensor_system_descriptor = cursor.read_i8()?;
        Ok(Self {
            info,
            data,
            sensor_system_descriptor,
        })
    }
}

/// Network attitude velocity info (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttitudeInfo {
    /// Number of entries = N (1-).
    pub num_entries: u16,
    /// Bit-coded descriptor of the attitude velocity sensor; -1 when the
    /// function is not used.
    pub sensor_system_descriptor: i8,
}

/// Network attitude velocity entry info (11 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttitudeEntryInfo {
    /// Time in milliseconds since record start.
    pub record_time: u16,
    /// Sensor roll in 0.01 deg.
    pub roll: i16,
    /// Sensor pitch in 0.01 deg.
    pub pitch: i16,
    /// Sensor heave in cm.
    pub heave: i16,
    /// Sensor heading in 0.01 deg.
    pub heading: u16,
    /// Number of bytes of input datagram (Nx) (1-254).
    pub num_bytes_input: u8,
}

/// One network attitude entry: fixed info plus the raw input message
/// (Seatex binary 11/23/26, POS-MV GRP 102/103, or Code Octopus MCOM;
/// identify by its header bytes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttitudeEntry {
    pub info: NetworkAttitudeEntryInfo,
    pub message: Vec<u8>,
}

impl NetworkAttitudeEntry {
    /// Decode one variable-length entry at the cursor, leaving the
    /// cursor at the start of the next entry.
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = NetworkAttitudeEntryInfo {
            record_time: cursor.read_u16()?,
            roll: cursor.read_i16()?,
            pitch: cursor.read_i16()?,
            heave: cursor.read_i16()?,
            heading: cursor.read_u16()?,
            num_bytes_input: cursor.read_u8()?,
        };
        let message = cursor.read_bytes(info.num_bytes_input as usize)?;
        Ok(Self { info, message })
    }
}

/// Network attitude velocity datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttitude {
    pub info: NetworkAttitudeInfo,
    pub entries: Vec<NetworkAttitudeEntry>,
}

impl NetworkAttitude {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = NetworkAttitudeInfo {
            num_entries: cursor.read_u16()?,
            sensor_system_descriptor: {
                let value = cursor.read_i8()?;
                cursor.skip(1)?; // spare
                value
            },
        };
        let mut entries = Vec::with_capacity(info.num_entries as usize);
        for _ in 0..info.num_entries {
            entries.push(NetworkAttitudeEntry::parse(cursor)?);
        }
        Ok(Self { info, entries })
    }
}

/// Clock info (9 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockInfo {
    /// Date from the external clock input = year*10000 + month*100 + day.
    pub date: u32,
    /// Time since midnight in milliseconds from the external clock input.
    pub time_ms: u32,
    /// 1 PPS use (0 = inactive); sync to 1PPS signal.
    pub pps: u8,
}

/// Clock datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    pub info: ClockInfo,
}

impl Clock {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: ClockInfo {
                date: cursor.read_u32()?,
                time_ms: cursor.read_u32()?,
                pps: cursor.read_u8()?,
            },
        })
    }
}

/// Depth (pressure) or height info (5 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightInfo {
    /// Height in cm.
    pub height: i32,
    /// Height type: 0 - from the active positioning system; 1-99 - as in
    /// the depth datagram; 100 - depth from the depth datagram; 200 -
    /// input from a depth sensor.
    pub height_type: u8,
}

/// Depth (pressure) or height datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Height {
    pub info: HeightInfo,
}

impl Height {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: HeightInfo {
                height: cursor.read_i32()?,
                height_type: cursor.read_u8()?,
            },
        })
    }
}

/// Heading info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingInfo {
    /// Number of entries = N (1-).
    pub num_entries: u16,
}

/// Heading entry (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingData {
    /// Time in milliseconds since record start.
    pub record_time: u16,
    /// Heading in 0.01 deg.
    pub heading: u16,
}

/// Heading datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub info: HeadingInfo,
    pub data: Vec<HeadingData>,
    /// Heading indicator (0 - not active).
    pub heading_indicator: u8,
}

impl Heading {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = HeadingInfo {
            num_entries: cursor.read_u16()?,
        };
        let mut data = Vec::with_capacity(info.num_entries as usize);
        for _ in 0..info.num_entries {
            data.push(HeadingData {
                record_time: cursor.read_u16()?,
                heading: cursor.read_u16()?,
            });
        }
        let heading_indicator = cursor.read_u8()?;
        Ok(Self {
            info,
            data,
            heading_indicator,
        })
    }
}

/// Position info (18 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Latitude in deg * 20000000, negative in the southern hemisphere.
    pub latitude: i32,
    /// Longitude in deg * 10000000, negative in the western hemisphere.
    pub longitude: i32,
    /// Measure of position fix quality in cm.  Only valid if available
    /// as input.
    pub position_fix_quality: u16,
    /// Speed of vessel over ground in cm/s.
    pub vessel_speed: u16,
    /// Course of vessel over ground in 0.01 deg.
    pub vessel_course: u16,
    /// Heading of vessel in 0.01 deg.
    pub vessel_heading: u16,
    /// Position system descriptor (1-254), bit-coded.
    pub position_system: u8,
    /// Number of bytes in the input datagram.
    pub bytes_in_input: u8,
}

/// Position datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub info: PositionInfo,
    /// Raw position input message; SIMRAD 90 format when flagged in
    /// position_system.
    pub message: Vec<u8>,
}

impl Position {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = PositionInfo {
            latitude: cursor.read_i32()?,
            longitude: cursor.read_i32()?,
            position_fix_quality: cursor.read_u16()?,
            vessel_speed: cursor.read_u16()?,
            vessel_course: cursor.read_u16()?,
            vessel_heading: cursor.read_u16()?,
            position_system: cursor.read_u8()?,
            bytes_in_input: cursor.read_u8()?,
        };
        let message = cursor.read_bytes(info.bytes_in_input as usize)?;
        Ok(Self { info, message })
    }
}

/// Single beam echo sounder depth info (13 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SingleBeamDepthInfo {
    /// Date from the input datagram.
    pub date: u32,
    /// Time since midnight from the input datagram if available.
    pub time_ms: u32,
    /// Echo sounder depth from waterline in cm.
    pub depth: u32,
    /// Source identifier (S, T, 1, 2, or 3).
    pub source: u8,
}

/// Single beam echo sounder depth datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SingleBeamDepth {
    pub info: SingleBeamDepthInfo,
}

impl SingleBeamDepth {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: SingleBeamDepthInfo {
                date: cursor.read_u32()?,
                time_ms: cursor.read_u32()?,
                depth: cursor.read_u32()?,
                source: cursor.read_u8()?,
            },
        })
    }
}

/// Tide info (11 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TideInfo {
    /// Date from the input datagram.
    pub date: u32,
    /// Time since midnight from the input datagram if available.
    pub time_ms: u32,
    /// Tide offset in cm.
    pub tide_offset: i16,
}

/// Tide datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tide {
    pub info: TideInfo,
}

impl Tide {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            info: TideInfo {
                date: cursor.read_u32()?,
                time_ms: cursor.read_u32()?,
                tide_offset: {
                    let value = cursor.read_i16()?;
                    cursor.skip(1)?; // spare
                    value
                },
            },
        })
    }
}

/// Surface sound speed info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SssvInfo {
    /// Number of entries = N (1-).
    pub num_samples: u16,
}

/// Surface sound speed entry (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SssvData {
    /// Time in seconds since record start.
    pub record_time: u16,
    /// Sound speed in dm/s (14000-15999).
    pub sound_speed: u16,
}

/// Surface sound speed datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sssv {
    pub info: SssvInfo,
    pub data: Vec<SssvData>,
}

impl Sssv {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = SssvInfo {
            num_samples: cursor.read_u16()?,
        };
        let mut data = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            data.push(SssvData {
                record_time: cursor.read_u16()?,
                sound_speed: cursor.read_u16()?,
            });
        }
        Ok(Self { info, data })
    }
}

/// Sound speed profile info (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvpInfo {
    /// Date the profile was made = year*10000 + month*100 + day.
    pub date: u32,
    /// Time the profile was made, since midnight in ms.
    pub time_ms: u32,
    /// Number of entries = N (1-).
    pub num_samples: u16,
    /// Depth resolution in cm (1-254).
    pub depth_resolution: u16,
}

impl SvpInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            date: cursor.read_u32()?,
            time_ms: cursor.read_u32()?,
            num_samples: cursor.read_u16()?,
            depth_resolution: cursor.read_u16()?,
        })
    }
}

/// Sound speed profile entry (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvpData {
    /// Depth in units of depth_resolution.
    pub depth: u32,
    /// Sound speed in dm/s (14000-17000).
    pub sound_speed: u32,
}

/// Sound speed profile datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSpeedProfile {
    pub info: SvpInfo,
    pub data: Vec<SvpData>,
}

impl SoundSpeedProfile {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = SvpInfo::parse(cursor)?;
        let mut data = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            data.push(SvpData {
                depth: cursor.read_u32()?,
                sound_speed: cursor.read_u32()?,
            });
        }
        Ok(Self { info, data })
    }
}

/// Deprecated EM3000 sound speed profile entry (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvpEm3000Data {
    /// Depth in units of depth_resolution.
    pub depth: u16,
    /// Sound speed in dm/s (14000-17000).
    pub sound_speed: u16,
}

/// Deprecated EM3000 sound speed profile datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSpeedProfileEm3000 {
    pub info: SvpInfo,
    pub data: Vec<SvpEm3000Data>,
}

impl SoundSpeedProfileEm3000 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = SvpInfo::parse(cursor)?;
        let mut data = Vec::with_capacity(info.num_samples as usize);
        for _ in 0..info.num_samples {
            data.push(SvpEm3000Data {
                depth: cursor.read_u16()?,
                sound_speed: cursor.read_u16()?,
            });
        }
        Ok(Self { info, data })
    }
}

/// Mechanical tilt info (2 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltInfo {
    /// Number of entries = N (1-).
    pub num_entries: u16,
}

/// Mechanical tilt entry (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltData {
    /// Time in milliseconds since record start.
    pub record_time: u16,
    /// Tilt in 0.01 deg.
    pub tilt: i16,
}

/// Mechanical transducer tilt datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    pub info: TiltInfo,
    pub data: Vec<TiltData>,
}

impl Tilt {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = TiltInfo {
            num_entries: cursor.read_u16()?,
        };
        let mut data = Vec::with_capacity(info.num_entries as usize);
        for _ in 0..info.num_entries {
            data.push(TiltData {
                record_time: cursor.read_u16()?,
                tilt: cursor.read_i16()?,
            });
        }
        Ok(Self { info, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;

    #[test]
    fn test_clock_parse() {
        let mut body = Vec::new();
        body.extend_from_slice(&20200101u32.to_le_bytes());
        body.extend_from_slice(&3_600_000u32.to_le_bytes());
        body.push(1);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let clock = Clock::parse(&mut cursor).unwrap();
        assert_eq!(clock.info.date, 20200101);
        assert_eq!(clock.info.time_ms, 3_600_000);
        assert_eq!(clock.info.pps, 1);
    }

    #[test]
    fn test_network_attitude_entries() {
        let mut body = Vec::new();
        body.extend_from_slice(&2u16.to_le_bytes()); // num_entries
        body.push(0x30); // sensor_system_descriptor
        body.push(0); // spare
        for (time, message) in [(0u16, b"ab".as_slice()), (100, b"xyz".as_slice())] {
            body.extend_from_slice(&time.to_le_bytes());
            body.extend_from_slice(&10i16.to_le_bytes()); // roll
            body.extend_from_slice(&(-20i16).to_le_bytes()); // pitch
            body.extend_from_slice(&5i16.to_le_bytes()); // heave
            body.extend_from_slice(&9000u16.to_le_bytes()); // heading
            body.push(message.len() as u8);
            body.extend_from_slice(message);
        }

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let attitude = NetworkAttitude::parse(&mut cursor).unwrap();
        assert_eq!(attitude.entries.len(), 2);
        assert_eq!(attitude.entries[0].message, b"ab");
        assert_eq!(attitude.entries[1].info.record_time, 100);
        assert_eq!(attitude.entries[1].message, b"xyz");
    }

    #[test]
    fn test_position_message_bounded() {
        let mut body = vec![0u8; 18];
        body[17] = 200; // bytes_in_input = 200, but no message bytes follow
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        assert!(matches!(
            Position::parse(&mut cursor),
            Err(DgmError::BadData { .. })
        ));
    }

    #[test]
    fn test_heading_trailing_indicator() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&18000u16.to_le_bytes());
        body.push(1);
        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let heading = Heading::parse(&mut cursor).unwrap();
        assert_eq!(heading.data[0].heading, 18000);
        assert_eq!(heading.heading_indicator, 1);
    }
}
