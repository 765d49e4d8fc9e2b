//! Decoder for the legacy Kongsberg EM Series datagram format.
//!
//! Implemented from "Kongsberg EM Series Multibeam Echo Sounder: EM
//! Datagram Formats", document 850-160692 Rev. O, plus the HISAS PU
//! output datagram formats (document 445635 Rev. B).
//!
//! Datagrams are not in strict time order.  No navigation data is in the
//! ping data; it must be extrapolated from the position datagrams.  Beam
//! depths are relative to the transmit transducer depth and horizontal
//! positions to the positioning system's reference point.

mod bathymetry;
mod header;
mod hisas;
mod params;
mod raw_range;
mod reader;
mod seabed;
mod sensors;
mod water_column;

pub use bathymetry::{
    CentralBeams, CentralBeamsBeam, CentralBeamsInfo, Depth, DepthBeam, DepthInfo, DepthNominal,
    DepthNominalBeam, DepthNominalInfo, ExtraDetect, ExtraDetectClass, ExtraDetectData,
    ExtraDetectInfo, QualityFactor, QualityFactorInfo, Xyz, XyzBeam, XyzInfo,
};
pub use header::EmxHeader;
pub use hisas::{
    HisasStatus, HisasStatusInfo, NavigationOutput, NavigationOutputInfo, SidescanChannel,
    SidescanData, SidescanDataChannel, SidescanDataChannelInfo, SidescanDataInfo, SidescanSamples,
    SidescanStatus, SidescanStatusInfo,
};
pub use params::{
    ExtraParams, ExtraParamsData, ExtraParamsInfo, InstallParams, InstallParamsInfo, PuBistResult,
    PuBistResultInfo, PuOutput, PuOutputInfo, PuStatus, PuStatusInfo, RuntimeParams,
    RuntimeParamsInfo, SspOutput,
};
pub use raw_range::{
    Rra101, Rra101Info, Rra101RxBeam, Rra101TxBeam, Rra102, Rra102Info, Rra102RxBeam, Rra102TxBeam,
    Rra70, Rra70Beam, Rra70Info, Rra78, Rra78Info, Rra78RxBeam, Rra78TxBeam,
};
pub use reader::{identify, EmxReader};
pub use seabed::{
    Seabed83, Seabed83Beam, Seabed83Info, Seabed89, Seabed89Beam, Seabed89Info,
};
pub use sensors::{
    Attitude, AttitudeData, AttitudeInfo, Clock, ClockInfo, Heading, HeadingData, HeadingInfo,
    Height, HeightInfo, NetworkAttitude, NetworkAttitudeEntry, NetworkAttitudeEntryInfo,
    NetworkAttitudeInfo, Position, PositionInfo, SingleBeamDepth, SingleBeamDepthInfo,
    SoundSpeedProfile, SoundSpeedProfileEm3000, Sssv, SssvData, SssvInfo, SvpData, SvpEm3000Data,
    SvpInfo, Tide, TideInfo, Tilt, TiltData, TiltInfo,
};
pub use water_column::{WaterColumn, WcInfo, WcRxBeam, WcRxBeamInfo, WcTxBeam};

use serde::{Deserialize, Serialize};

/// Datagram start and end sentinels.
pub const EMX_START_BYTE: u8 = 0x02;
pub const EMX_END_BYTE: u8 = 0x03;

/// Maximum number of transmit sectors in one ping.
pub const EMX_MAX_TX_SECTORS: usize = 20;

/// Invalid-detection flag bit of the `detection_info` fields.
pub const EMX_DETECT_INVALID: u8 = 0x80;

/// EMX null (not available) field values.
pub const EMX_NULL_UINT8: u8 = 0xFF;
pub const EMX_NULL_INT8: i8 = 0x7F;
pub const EMX_NULL_UINT16: u16 = 0xFFFF;
pub const EMX_NULL_INT16: i16 = 0x7FFF;
pub const EMX_NULL_UINT32: u32 = 0xFFFF_FFFF;
pub const EMX_NULL_INT32: i32 = 0x7FFF_FFFF;

/// EMX datagram type, discriminated by the header's one-byte type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmxDatagramType {
    /// Depth datagram, 'D' (EM2000/3000/3002/1002/300/120).
    Depth,
    /// Undocumented nominal depth datagram, 'Q'.
    DepthNominal,
    /// XYZ 88 datagram, 'X' (EM2040/710/122/302/ME70).
    Xyz,
    /// Extra detections datagram, 'l'.
    ExtraDetections,
    /// Central beams echogram, 'K' (EM120/300).
    CentralBeams,
    /// Raw range and angle 101, 'e' (undocumented).
    Rra101,
    /// Raw range and angle 70, 'F'.
    Rra70,
    /// Raw range and angle 102, 'f'.
    Rra102,
    /// Raw range and angle 78, 'N'.
    Rra78,
    /// Seabed image datagram, 'S'.
    SeabedImage83,
    /// Seabed image 89 datagram, 'Y'.
    SeabedImage89,
    /// Water column datagram, 'k'.
    WaterColumn,
    /// IFREMER quality factor datagram, 'O'.
    QualityFactor,
    /// Attitude datagram, 'A'.
    Attitude,
    /// Network attitude velocity datagram, 'n'.
    NetworkAttitude,
    /// Clock datagram, 'C'.
    Clock,
    /// Depth (pressure) or height datagram, 'h'.
    Height,
    /// Heading datagram, 'H'.
    Heading,
    /// Position datagram, 'P'.
    Position,
    /// Single beam echo sounder depth, 'E'.
    SingleBeamDepth,
    /// Tide datagram, 'T'.
    Tide,
    /// Surface sound speed datagram, 'G'.
    SurfaceSoundSpeed,
    /// Sound speed profile datagram, 'U'.
    SoundSpeedProfile,
    /// Deprecated EM3000 sound speed profile datagram, 'V'.
    SoundSpeedProfileEm3000,
    /// Kongsberg Maritime SSP output datagram, 'W'.
    SspOutput,
    /// Installation parameters, 'I'.
    InstallParams,
    /// Installation parameters (survey stop), 'i'.
    InstallParamsStop,
    /// Installation parameters (remote info), 'j'.
    InstallParamsRemote,
    /// Remote parameters info, 'r' (undocumented).
    RemoteParamsInfo,
    /// Runtime parameters, 'R'.
    RuntimeParams,
    /// Extra parameters, '3'.
    ExtraParams,
    /// PU output datagram, '0'.
    PuOutput,
    /// PU status output, '1'.
    PuStatus,
    /// PU BIST result output, 'B'.
    PuBistResult,
    /// Mechanical transducer tilt, 'J'.
    TransducerTilt,
    /// System status, 'o' (undocumented).
    SystemStatus,
    /// Stave datagram, 'm' (undocumented).
    Stave,
    /// Deprecated surface sound speed, 's' (undocumented).
    SurfaceSoundSpeedOld,
    /// Directory record, 't' (undocumented; carries no valid checksum
    /// or timestamp).
    Directory,
    /// Input sound speed profile, 'v' (undocumented).
    InputSoundSpeed,
    /// HISAS status datagram, '2'.
    HisasStatus,
    /// HISAS navigation output, '>'.
    NavigationOutput,
    /// Sidescan status datagram, '"'.
    SidescanStatus,
    /// HISAS 1032 sidescan data, '%'.
    SidescanData,
    /// Raw range and angle 123, '{' (undocumented HISAS type).
    Rra123,
    /// A type code this decoder does not recognize.
    Unknown(u8),
}

impl EmxDatagramType {
    /// Map a header type code to the datagram type.
    pub fn from_code(code: u8) -> Self {
        match code {
            b'D' => Self::Depth,
            b'Q' => Self::DepthNominal,
            b'X' => Self::Xyz,
            b'l' => Self::ExtraDetections,
            b'K' => Self::CentralBeams,
            b'e' => Self::Rra101,
            b'F' => Self::Rra70,
            b'f' => Self::Rra102,
            b'N' => Self::Rra78,
            b'S' => Self::SeabedImage83,
            b'Y' => Self::SeabedImage89,
            b'k' => Self::WaterColumn,
            b'O' => Self::QualityFactor,
            b'A' => Self::Attitude,
            b'n' => Self::NetworkAttitude,
            b'C' => Self::Clock,
            b'h' => Self::Height,
            b'H' => Self::Heading,
            b'P' => Self::Position,
            b'E' => Self::SingleBeamDepth,
            b'T' => Self::Tide,
            b'G' => Self::SurfaceSoundSpeed,
            b'U' => Self::SoundSpeedProfile,
            b'V' => Self::SoundSpeedProfileEm3000,
            b'W' => Self::SspOutput,
            b'I' => Self::InstallParams,
            b'i' => Self::InstallParamsStop,
            b'j' => Self::InstallParamsRemote,
            b'r' => Self::RemoteParamsInfo,
            b'R' => Self::RuntimeParams,
            b'3' => Self::ExtraParams,
            b'0' => Self::PuOutput,
            b'1' => Self::PuStatus,
            b'B' => Self::PuBistResult,
            b'J' => Self::TransducerTilt,
            b'o' => Self::SystemStatus,
            b'm' => Self::Stave,
            b's' => Self::SurfaceSoundSpeedOld,
            b't' => Self::Directory,
            b'v' => Self::InputSoundSpeed,
            b'2' => Self::HisasStatus,
            b'>' => Self::NavigationOutput,
            b'"' => Self::SidescanStatus,
            b'%' => Self::SidescanData,
            b'{' => Self::Rra123,
            other => Self::Unknown(other),
        }
    }

    /// The one-byte wire code of this datagram type.
    pub fn code(self) -> u8 {
        match self {
            Self::Depth => b'D',
            Self::DepthNominal => b'Q',
            Self::Xyz => b'X',
            Self::ExtraDetections => b'l',
            Self::CentralBeams => b'K',
            Self::Rra101 => b'e',
            Self::Rra70 => b'F',
            Self::Rra102 => b'f',
            Self::Rra78 => b'N',
            Self::SeabedImage83 => b'S',
            Self::SeabedImage89 => b'Y',
            Self::WaterColumn => b'k',
            Self::QualityFactor => b'O',
            Self::Attitude => b'A',
            Self::NetworkAttitude => b'n',
            Self::Clock => b'C',
            Self::Height => b'h',
            Self::Heading => b'H',
            Self::Position => b'P',
            Self::SingleBeamDepth => b'E',
            Self::Tide => b'T',
            Self::SurfaceSoundSpeed => b'G',
            Self::SoundSpeedProfile => b'U',
            Self::SoundSpeedProfileEm3000 => b'V',
            Self::SspOutput => b'W',
            Self::InstallParams => b'I',
            Self::InstallParamsStop => b'i',
            Self::InstallParamsRemote => b'j',
            Self::RemoteParamsInfo => b'r',
            Self::RuntimeParams => b'R',
            Self::ExtraParams => b'3',
            Self::PuOutput => b'0',
            Self::PuStatus => b'1',
            Self::PuBistResult => b'B',
            Self::TransducerTilt => b'J',
            Self::SystemStatus => b'o',
            Self::Stave => b'm',
            Self::SurfaceSoundSpeedOld => b's',
            Self::Directory => b't',
            Self::InputSoundSpeed => b'v',
            Self::HisasStatus => b'2',
            Self::NavigationOutput => b'>',
            Self::SidescanStatus => b'"',
            Self::SidescanData => b'%',
            Self::Rra123 => b'{',
            Self::Unknown(code) => code,
        }
    }

    /// A static display name for this datagram type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Depth => "DEPTH",
            Self::DepthNominal => "DEPTH_NOMINAL",
            Self::Xyz => "XYZ",
            Self::ExtraDetections => "EXTRA_DETECTIONS",
            Self::CentralBeams => "CENTRAL_BEAMS",
            Self::Rra101 => "RRA_101",
            Self::Rra70 => "RRA_70",
            Self::Rra102 => "RRA_102",
            Self::Rra78 => "RRA_78",
            Self::SeabedImage83 => "SEABED_IMAGE_83",
            Self::SeabedImage89 => "SEABED_IMAGE_89",
            Self::WaterColumn => "WATER_COLUMN",
            Self::QualityFactor => "QUALITY_FACTOR",
            Self::Attitude => "ATTITUDE",
            Self::NetworkAttitude => "ATTITUDE_NETWORK",
            Self::Clock => "CLOCK",
            Self::Height => "HEIGHT",
            Self::Heading => "HEADING",
            Self::Position => "POSITION",
            Self::SingleBeamDepth => "SINGLE_BEAM_DEPTH",
            Self::Tide => "TIDE",
            Self::SurfaceSoundSpeed => "SSSV",
            Self::SoundSpeedProfile => "SVP",
            Self::SoundSpeedProfileEm3000 => "SVP_EM3000",
            Self::SspOutput => "KM_SSP_OUTPUT",
            Self::InstallParams => "INSTALL_PARAMS",
            Self::InstallParamsStop => "INSTALL_PARAMS_STOP",
            Self::InstallParamsRemote => "INSTALL_PARAMS_REMOTE",
            Self::RemoteParamsInfo => "REMOTE_PARAMS_INFO",
            Self::RuntimeParams => "RUNTIME_PARAMS",
            Self::ExtraParams => "EXTRA_PARAMS",
            Self::PuOutput => "PU_OUTPUT",
            Self::PuStatus => "PU_STATUS",
            Self::PuBistResult => "PU_BIST_RESULT",
            Self::TransducerTilt => "TRANSDUCER_TILT",
            Self::SystemStatus => "SYSTEM_STATUS",
            Self::Stave => "STAVE",
            Self::SurfaceSoundSpeedOld => "SSSV_OLD",
            Self::Directory => "DIRECTORY",
            Self::InputSoundSpeed => "INPUT_SSP",
            Self::HisasStatus => "HISAS_STATUS",
            Self::NavigationOutput => "NAVIGATION_OUTPUT",
            Self::SidescanStatus => "SIDESCAN_STATUS",
            Self::SidescanData => "HISAS_1032_SIDESCAN",
            Self::Rra123 => "RRA_123",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

/// EM system models recognized by the byte-order fallback test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmxModel {
    Em120,
    Em121A,
    Em122,
    Em124,
    Em300,
    Em302,
    Em710,
    Em712,
    Me70Bo,
    Em1002,
    Em2000,
    Em2040,
    Em2040C,
    Em3000,
    Em3000D,
    Em3002,
    Hisas1032,
    Hisas1032D,
    Hisas2040,
}

impl EmxModel {
    /// Map the header's `em_model_number` to a known model.
    pub fn from_number(em_model_number: u16) -> Option<Self> {
        match em_model_number {
            120 => Some(Self::Em120),
            121 => Some(Self::Em121A),
            122 => Some(Self::Em122),
            124 => Some(Self::Em124),
            300 => Some(Self::Em300),
            302 => Some(Self::Em302),
            710 => Some(Self::Em710),
            712 => Some(Self::Em712),
            850 => Some(Self::Me70Bo),
            1002 => Some(Self::Em1002),
            2000 => Some(Self::Em2000),
            2040 => Some(Self::Em2040),
            2045 => Some(Self::Em2040C),
            3000 => Some(Self::Em3000),
            3002..=3008 => Some(Self::Em3000D),
            3020 => Some(Self::Em3002),
            11032 => Some(Self::Hisas1032),
            11034 => Some(Self::Hisas1032D),
            12040 => Some(Self::Hisas2040),
            _ => None,
        }
    }
}

/// Sample rate in Hertz of an EM3000D sonar head.
///
/// The dual-head EM3000D reports model numbers 3002 through 3008; each
/// maps to a fixed per-head sample rate.  `sonar_head` is 1 for port and
/// 2 for starboard.  Returns `None` for other models or head numbers.
pub fn em3000d_sample_rate(em_model_number: u16, sonar_head: u8) -> Option<u32> {
    //                      3002,  3003,  3004,  3005,  3006,  3007,  3008
    const HEAD_1: [u32; 7] = [13956, 13956, 14293, 13956, 14621, 14293, 14621];
    const HEAD_2: [u32; 7] = [14621, 14621, 14621, 14293, 14293, 13956, 13956];

    if !(3002..=3008).contains(&em_model_number) {
        return None;
    }
    let index = (em_model_number - 3002) as usize;
    match sonar_head {
        1 => Some(HEAD_1[index]),
        2 => Some(HEAD_2[index]),
        _ => None,
    }
}

/// One decoded EMX record: the frame header plus the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmxRecord {
    pub header: EmxHeader,
    pub datagram: EmxDatagram,
}

/// Decoded EMX payload, one variant per record type.
///
/// Undocumented types (and types whose format entries are incomplete)
/// carry their raw body bytes in the `Opaque` variant rather than a
/// guessed decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EmxDatagram {
    Depth(Depth),
    DepthNominal(DepthNominal),
    Xyz(Xyz),
    ExtraDetections(ExtraDetect),
    CentralBeams(CentralBeams),
    Rra70(Rra70),
    Rra78(Rra78),
    Rra101(Rra101),
    Rra102(Rra102),
    SeabedImage83(Seabed83),
    SeabedImage89(Seabed89),
    WaterColumn(WaterColumn),
    QualityFactor(QualityFactor),
    Attitude(Attitude),
    NetworkAttitude(NetworkAttitude),
    Clock(Clock),
    Height(Height),
    Heading(Heading),
    Position(Position),
    SingleBeamDepth(SingleBeamDepth),
    Tide(Tide),
    SurfaceSoundSpeed(Sssv),
    SoundSpeedProfile(SoundSpeedProfile),
    SoundSpeedProfileEm3000(SoundSpeedProfileEm3000),
    SspOutput(SspOutput),
    InstallParams(InstallParams),
    InstallParamsStop(InstallParams),
    InstallParamsRemote(InstallParams),
    RuntimeParams(RuntimeParams),
    ExtraParams(ExtraParams),
    PuOutput(PuOutput),
    PuStatus(PuStatus),
    PuBistResult(PuBistResult),
    TransducerTilt(Tilt),
    HisasStatus(HisasStatus),
    SidescanStatus(SidescanStatus),
    SidescanData(SidescanData),
    NavigationOutput(NavigationOutput),
    /// Raw body of an undocumented or unrecognized datagram type.
    Opaque(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_code_round_trip() {
        for code in 0u8..=255 {
            assert_eq!(EmxDatagramType::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_known_type_codes() {
        assert_eq!(EmxDatagramType::from_code(b'D'), EmxDatagramType::Depth);
        assert_eq!(EmxDatagramType::from_code(0x74), EmxDatagramType::Directory);
        assert_eq!(
            EmxDatagramType::from_code(0x7B),
            EmxDatagramType::Rra123
        );
        assert_eq!(
            EmxDatagramType::from_code(0x00),
            EmxDatagramType::Unknown(0x00)
        );
    }

    #[test]
    fn test_model_lookup() {
        assert_eq!(EmxModel::from_number(710), Some(EmxModel::Em710));
        assert_eq!(EmxModel::from_number(3005), Some(EmxModel::Em3000D));
        assert_eq!(EmxModel::from_number(11032), Some(EmxModel::Hisas1032));
        assert_eq!(EmxModel::from_number(9999), None);
        // Model 10120 is reserved but undocumented.
        assert_eq!(EmxModel::from_number(10120), None);
    }

    #[test]
    fn test_em3000d_sample_rates() {
        assert_eq!(em3000d_sample_rate(3002, 1), Some(13956));
        assert_eq!(em3000d_sample_rate(3002, 2), Some(14621));
        assert_eq!(em3000d_sample_rate(3008, 1), Some(14621));
        assert_eq!(em3000d_sample_rate(3008, 2), Some(13956));
        assert_eq!(em3000d_sample_rate(3000, 1), None);
        assert_eq!(em3000d_sample_rate(3002, 3), None);
    }
}
