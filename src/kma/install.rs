//! Installation, runtime, BIST, and calibration-file datagrams.

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use crate::kma::multibeam::MPartition;
use serde::{Deserialize, Serialize};

fn check_common_size(declared: usize, payload_len: usize, name: &str) -> Result<(), DgmError> {
    if declared > payload_len {
        return Err(DgmError::bad_data(format!(
            "unexpected {} datagram size ({} > {})",
            name, declared, payload_len
        )));
    }
    Ok(())
}

/// IIP common part (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IipData {
    /// Size in bytes of the body part struct.
    pub num_bytes_cmn_part: u16,
    /// For future use.
    pub info: u16,
    /// For future use.
    pub status: u16,
}

/// Installation parameters datagram.
///
/// The text holds install settings with parameters separated by ';' and
/// lines by ',', and is not NUL-terminated on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iip {
    pub data: IipData,
    pub install_text: Vec<u8>,
}

impl Iip {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let payload_len = cursor.remaining();
        let data = IipData {
            num_bytes_cmn_part: cursor.read_u16()?,
            info: cursor.read_u16()?,
            status: cursor.read_u16()?,
        };
        check_common_size(data.num_bytes_cmn_part as usize, payload_len, "IIP")?;
        let install_text = cursor.read_bytes(cursor.remaining())?;
        Ok(Self { data, install_text })
    }
}

/// IOP common part (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IopData {
    /// Size in bytes of the body part struct.
    pub num_bytes_cmn_part: u16,
    /// For future use.
    pub info: u16,
    /// For future use.
    pub status: u16,
}

/// Runtime parameters datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iop {
    pub data: IopData,
    /// Runtime settings in text format; not NUL-terminated on the wire.
    pub runtime_text: Vec<u8>,
}

impl Iop {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let payload_len = cursor.remaining();
        let data = IopData {
            num_bytes_cmn_part: cursor.read_u16()?,
            info: cursor.read_u16()?,
            status: cursor.read_u16()?,
        };
        check_common_size(data.num_bytes_cmn_part as usize, payload_len, "IOP")?;
        let runtime_text = cursor.read_bytes(cursor.remaining())?;
        Ok(Self { data, runtime_text })
    }
}

/// BIST common part (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BistData {
    /// Size in bytes of the body part struct.
    pub num_bytes_cmn_part: u16,
    /// 0 - last subset of the message, 1 - more messages to come.
    pub bist_info: u8,
    /// 0 - plain text, 1 - use style sheet.
    pub bist_style: u8,
    /// BIST number executed.
    pub bist_number: u8,
    /// 0 - no errors, positive - warning, negative - error.
    pub bist_status: i8,
}

/// BIST datagram (error report, reply, and short reply variants).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bist {
    pub data: BistData,
    /// Result of the BIST: a synopsis followed by a detailed
    /// explanation.  Not NUL-terminated on the wire.
    pub bist_text: Vec<u8>,
}

impl Bist {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let payload_len = cursor.remaining();
        let data = BistData {
            num_bytes_cmn_part: cursor.read_u16()?,
            bist_info: cursor.read_u8()?,
            bist_style: cursor.read_u8()?,
            bist_number: cursor.read_u8()?,
            bist_status: cursor.read_i8()?,
        };
        check_common_size(data.num_bytes_cmn_part as usize, payload_len, "BIST")?;
        let bist_text = cursor.read_bytes(cursor.remaining())?;
        Ok(Self { data, bist_text })
    }
}

/// Common part of file datagrams (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FCommon {
    /// Size in bytes of the body part struct, including the file name.
    pub num_bytes_cmn_part: u16,
    /// File status: -1 = no file found, 0 = ok, 1 = file too large
    /// (cropped).
    pub file_status: i8,
    /// File size in bytes.
    pub num_bytes_file: u32,
}

/// Backscatter calibration file datagram ('#FCF', added in Rev. G).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationFile {
    pub partition: MPartition,
    pub common: FCommon,
    /// Name of the file.
    pub file_name: String,
    /// The measured backscatter offsets file contents.
    pub file_bytes: Vec<u8>,
}

impl CalibrationFile {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let payload_len = cursor.remaining();
        let partition = MPartition::parse(cursor)?;

        let start = cursor.position();
        let common = FCommon {
            num_bytes_cmn_part: cursor.read_u16()?,
            file_status: {
                let value = cursor.read_i8()?;
                cursor.skip(1)?; // padding
                value
            },
            num_bytes_file: cursor.read_u32()?,
        };
        check_common_size(
            common.num_bytes_cmn_part as usize + MPartition::SIZE,
            payload_len,
            "FCF",
        )?;

        // The file name fills the rest of the declared common part.
        let name_len = (common.num_bytes_cmn_part as usize).saturating_sub(8);
        let name_bytes = cursor.take(name_len)?;
        let end = name_bytes.iter().position(|&b| b == 0).unwrap_or(name_len);
        let file_name = String::from_utf8_lossy(&name_bytes[..end]).into_owned();
        cursor.seek_to(start + common.num_bytes_cmn_part as usize)?;

        let file_bytes = cursor.read_bytes(common.num_bytes_file as usize)?;

        Ok(Self {
            partition,
            common,
            file_name,
            file_bytes,
        })
    }
}
