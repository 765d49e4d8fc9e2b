//! Decoder for the Kongsberg KMALL datagram format.
//!
//! Implemented from "EM datagrams on *.kmall format", reg. no. 410224,
//! revisions F through I.  Files are little-endian; each datagram begins
//! and ends with a four-byte datagram size.  Timestamps may not be
//! strictly sequential.  The format document says datagrams are 4-byte
//! aligned, but that does not appear to be true in real files.
//!
//! Supported multibeam sounders: EM710/EM712, EM2040, and EM2040C.

mod header;
mod install;
mod multibeam;
mod reader;
mod sensors;
mod water_column;

pub use header::KmaHeader;
pub use install::{Bist, BistData, CalibrationFile, FCommon, Iip, IipData, Iop, IopData};
pub use multibeam::{
    MCommon, MPartition, Mrz, MrzExtraDetClassInfo, MrzPingInfo, MrzRxInfo, MrzSounding,
    MrzTxSectorV0, MrzTxSectorV1, MrzTxSectors,
};
pub use reader::{identify, KmaReader};
pub use sensors::{
    Che, CheData, Cpo, CpoData, SCommon, Scl, SclData, Sde, SdeData, SdeDataV0, SdeDataV1, Shi,
    ShiData, Skm, SkmBinary, SkmDelayedHeave, SkmInfo, SkmSample, Spo, SpoData, Svp, SvpInfo,
    SvpSample, Svt, SvtInfo, SvtSample,
};
pub use water_column::{
    Mwc, MwcPhase, MwcRxBeam, MwcRxInfo, MwcTxInfo, MwcTxSector, PHASE_HIGH, PHASE_LOW, PHASE_OFF,
};

use serde::{Deserialize, Serialize};

/// Null (not available) values used by KMA sensor fields.
pub const KMA_NULL_POSFIX: u16 = 0xFFFF;
pub const KMA_NULL_LATLON: f64 = 200.0;
pub const KMA_NULL_SPEED: f32 = -1.0;
pub const KMA_NULL_COURSE: f32 = -4.0;
pub const KMA_NULL_ELLIPSOIDAL_HEIGHT: f32 = -999.0;

/// Invalid water column amplitude sample.
pub const KMA_INVALID_AMP: i8 = -128;

/// Bottom detection type (`detection_type`).
pub const KMA_DETECT_TYPE_NORMAL: u8 = 0;
pub const KMA_DETECT_TYPE_EXTRA: u8 = 1;
pub const KMA_DETECT_TYPE_REJECTED: u8 = 2;

/// Bottom detection method (`detection_method`).
pub const KMA_DETECT_METHOD_NONE: u8 = 0;
pub const KMA_DETECT_METHOD_AMPLITUDE: u8 = 1;
pub const KMA_DETECT_METHOD_PHASE: u8 = 2;

/// KMA datagram type, discriminated by the 4-byte `dgm_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KmaDatagramType {
    /// '#IIP' - installation parameters.
    Iip,
    /// '#IOP' - runtime parameters.
    Iop,
    /// '#IBE' - BIST error report.
    Ibe,
    /// '#IBR' - BIST reply.
    Ibr,
    /// '#IBS' - BIST short reply.
    Ibs,
    /// '#MRZ' - multibeam raw range and depth.
    Mrz,
    /// '#MWC' - water column.
    Mwc,
    /// '#SPO' - position sensor.
    Spo,
    /// '#SKM' - KM binary attitude sensor.
    Skm,
    /// '#SVP' - sound velocity profile.
    Svp,
    /// '#SVT' - sound velocity at transducer.
    Svt,
    /// '#SCL' - clock sensor.
    Scl,
    /// '#SDE' - depth sensor.
    Sde,
    /// '#SHI' - height sensor.
    Shi,
    /// '#SHA' - heading sensor (removed in format Rev. C).
    Sha,
    /// '#CPO' - compatibility position sensor.
    Cpo,
    /// '#CHE' - compatibility heave.
    Che,
    /// '#FCF' - backscatter calibration file (added in Rev. G).
    Fcf,
    /// A type this decoder does not recognize.
    Unknown([u8; 4]),
}

impl KmaDatagramType {
    /// Map the raw 4-byte `dgm_type` field to the datagram type.
    pub fn from_bytes(dgm_type: [u8; 4]) -> Self {
        match &dgm_type {
            b"#IIP" => Self::Iip,
            b"#IOP" => Self::Iop,
            b"#IBE" => Self::Ibe,
            b"#IBR" => Self::Ibr,
            b"#IBS" => Self::Ibs,
            b"#MRZ" => Self::Mrz,
            b"#MWC" => Self::Mwc,
            b"#SPO" => Self::Spo,
            b"#SKM" => Self::Skm,
            b"#SVP" => Self::Svp,
            b"#SVT" => Self::Svt,
            b"#SCL" => Self::Scl,
            b"#SDE" => Self::Sde,
            b"#SHI" => Self::Shi,
            b"#SHA" => Self::Sha,
            b"#CPO" => Self::Cpo,
            b"#CHE" => Self::Che,
            b"#FCF" => Self::Fcf,
            _ => Self::Unknown(dgm_type),
        }
    }

    /// A static display name for this datagram type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Iip => "IIP",
            Self::Iop => "IOP",
            Self::Ibe => "IBE",
            Self::Ibr => "IBR",
            Self::Ibs => "IBS",
            Self::Mrz => "MRZ",
            Self::Mwc => "MWC",
            Self::Spo => "SPO",
            Self::Skm => "SKM",
            Self::Svp => "SVP",
            Self::Svt => "SVT",
            Self::Scl => "SCL",
            Self::Sde => "SDE",
            Self::Shi => "SHI",
            Self::Sha => "SHA",
            Self::Cpo => "CPO",
            Self::Che => "CHE",
            Self::Fcf => "FCF",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

/// One decoded KMA record: the frame header plus the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmaRecord {
    pub header: KmaHeader,
    pub datagram: KmaDatagram,
}

/// Decoded KMA payload, one variant per record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KmaDatagram {
    Iip(Iip),
    Iop(Iop),
    Ibe(Bist),
    Ibr(Bist),
    Ibs(Bist),
    Mrz(Mrz),
    Mwc(Mwc),
    Spo(Spo),
    Skm(Skm),
    Svp(Svp),
    Svt(Svt),
    Scl(Scl),
    Sde(Sde),
    Shi(Shi),
    Cpo(Cpo),
    Che(Che),
    Fcf(CalibrationFile),
    /// Raw body of a removed or unrecognized datagram type.
    Opaque(Vec<u8>),
}
