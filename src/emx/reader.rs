//! EMX stream reader: framing, validation, checksum, and dispatch.

use crate::byte_order::ByteOrder;
use crate::cursor::BodyCursor;
use crate::emx::header::{detect_byte_order, EmxHeader, HEADER_SIZE};
use crate::emx::hisas::SIDESCAN_CHANNELS;
use crate::emx::{
    Attitude, CentralBeams, Clock, Depth, DepthNominal, EmxDatagram, EmxDatagramType, EmxRecord,
    ExtraDetect, ExtraParams, Heading, Height, HisasStatus, InstallParams, NavigationOutput,
    NetworkAttitude, Position, PuBistResult, PuOutput, PuStatus, QualityFactor, Rra101, Rra102,
    Rra70, Rra78, RuntimeParams, Seabed83, Seabed89, SidescanData, SidescanStatus, SingleBeamDepth,
    SoundSpeedProfile, SoundSpeedProfileEm3000, SspOutput, Sssv, Tide, Tilt, WaterColumn, Xyz,
    EMX_END_BYTE,
};
use crate::error::DgmError;
use crate::io::{read_frame_bytes, skip_forward, FrameBuffer, ReadOutcome};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Trailer bytes after the payload: ETX plus the 16-bit checksum.
const TRAILER_SIZE: usize = 3;

/// Streaming reader for EMX (`.all`) files.
///
/// Datagrams are read in file order by repeated calls to [`read`].  The
/// stream's byte order is inferred from the first header and retained
/// for the rest of the stream.  Checksum-failing datagrams are discarded
/// and reading continues with the next frame, unless the checksum test
/// is disabled.
///
/// [`read`]: EmxReader::read
#[derive(Debug)]
pub struct EmxReader<R = File> {
    reader: R,
    frame: FrameBuffer,
    byte_order: Option<ByteOrder>,
    ignore_water_column: bool,
    ignore_checksum: bool,
    /// Bytes per sample for each sidescan channel, filled in by the
    /// sidescan status datagram and consumed by the sidescan data
    /// datagram.
    sidescan_bytes_per_sample: [u16; SIDESCAN_CHANNELS],
}

impl EmxReader<File> {
    /// Open an EMX file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DgmError> {
        let file = File::open(path.as_ref()).map_err(DgmError::open)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read + Seek> EmxReader<R> {
    /// Wrap any seekable byte source positioned at a datagram boundary.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            frame: FrameBuffer::new(),
            byte_order: None,
            ignore_water_column: false,
            ignore_checksum: false,
            sidescan_bytes_per_sample: [0; SIDESCAN_CHANNELS],
        }
    }

    /// Skip water column datagrams instead of decoding them.
    ///
    /// Water column data is large, often the bulk of a file; when it is
    /// not wanted, seeking past the bodies beats reading them.
    pub fn set_ignore_water_column(&mut self, ignore: bool) {
        self.ignore_water_column = ignore;
    }

    /// Accept datagrams whose checksum does not verify.
    pub fn set_ignore_checksum(&mut self, ignore: bool) {
        self.ignore_checksum = ignore;
    }

    /// The stream byte order, once inferred from the first header.
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// Read the next datagram.
    ///
    /// Returns `Ok(None)` at clean end of stream.  Records are yielded
    /// in file order, exactly once each, except that water column
    /// datagrams are skipped when the filter is set and checksum-failing
    /// datagrams are silently discarded (unless the check is disabled).
    /// The decoded record owns its data; it stays valid after further
    /// reads.
    pub fn read(&mut self) -> Result<Option<EmxRecord>, DgmError> {
        loop {
            let mut raw_header = [0u8; HEADER_SIZE];
            match read_frame_bytes(&mut self.reader, &mut raw_header)? {
                ReadOutcome::Full => {}
                ReadOutcome::Eof => return Ok(None),
            }

            let order = match self.byte_order {
                Some(order) => order,
                None => {
                    let order = detect_byte_order(&raw_header)?;
                    log::debug!("byte order inferred as {:?}", order);
                    self.byte_order = Some(order);
                    order
                }
            };

            let header = EmxHeader::from_bytes(&raw_header, order);
            header.validate()?;

            log::trace!(
                "bytes_in_datagram={}, model={}, date={}, time_ms={}, counter={}, type={}",
                header.bytes_in_datagram,
                header.em_model_number,
                header.date,
                header.time_ms,
                header.counter,
                header.datagram_type().name()
            );

            // The body runs to the end of the datagram plus the four-byte
            // trailer region counted beyond bytes_in_datagram.
            let body_size = header.bytes_in_datagram as usize + 4 - HEADER_SIZE;
            let datagram_type = header.datagram_type();

            if self.ignore_water_column && datagram_type == EmxDatagramType::WaterColumn {
                skip_forward(&mut self.reader, body_size as u64)?;
                continue;
            }

            let body = self.frame.prepare(body_size)?;
            match read_frame_bytes(&mut self.reader, body)? {
                ReadOutcome::Full => {}
                ReadOutcome::Eof => {
                    return Err(DgmError::bad_data("unexpected end of file inside datagram"))
                }
            }

            // The undocumented directory record has no valid checksum.
            if datagram_type != EmxDatagramType::Directory
                && !checksum_is_valid(&raw_header, self.frame.bytes(), order)
                && !self.ignore_checksum
            {
                log::debug!(
                    "discarding datagram with bad checksum (counter={}, type={})",
                    header.counter,
                    header.datagram_type().name()
                );
                continue;
            }

            let datagram = self.decode_datagram(datagram_type, order)?;
            return Ok(Some(EmxRecord { header, datagram }));
        }
    }

    fn decode_datagram(
        &mut self,
        datagram_type: EmxDatagramType,
        order: ByteOrder,
    ) -> Result<EmxDatagram, DgmError> {
        let body = self.frame.bytes();
        // Everything before the ETX/checksum trailer is payload.
        let payload = &body[..body.len().saturating_sub(TRAILER_SIZE)];
        let mut cursor = BodyCursor::new(payload, order);

        let datagram = match datagram_type {
            EmxDatagramType::Depth => EmxDatagram::Depth(Depth::parse(&mut cursor)?),
            EmxDatagramType::DepthNominal => {
                EmxDatagram::DepthNominal(DepthNominal::parse(&mut cursor)?)
            }
            EmxDatagramType::Xyz => EmxDatagram::Xyz(Xyz::parse(&mut cursor)?),
            EmxDatagramType::ExtraDetections => {
                EmxDatagram::ExtraDetections(ExtraDetect::parse(&mut cursor)?)
            }
            EmxDatagramType::CentralBeams => {
                EmxDatagram::CentralBeams(CentralBeams::parse(&mut cursor)?)
            }
            EmxDatagramType::Rra70 => EmxDatagram::Rra70(Rra70::parse(&mut cursor)?),
            EmxDatagramType::Rra78 => EmxDatagram::Rra78(Rra78::parse(&mut cursor)?),
            EmxDatagramType::Rra101 => EmxDatagram::Rra101(Rra101::parse(&mut cursor)?),
            EmxDatagramType::Rra102 => EmxDatagram::Rra102(Rra102::parse(&mut cursor)?),
            EmxDatagramType::SeabedImage83 => {
                EmxDatagram::SeabedImage83(Seabed83::parse(&mut cursor)?)
            }
            EmxDatagramType::SeabedImage89 => {
                EmxDatagram::SeabedImage89(Seabed89::parse(&mut cursor)?)
            }
            EmxDatagramType::WaterColumn => {
                EmxDatagram::WaterColumn(WaterColumn::parse(&mut cursor)?)
            }
            EmxDatagramType::QualityFactor => {
                EmxDatagram::QualityFactor(QualityFactor::parse(&mut cursor)?)
            }
            EmxDatagramType::Attitude => EmxDatagram::Attitude(Attitude::parse(&mut cursor)?),
            EmxDatagramType::NetworkAttitude => {
                EmxDatagram::NetworkAttitude(NetworkAttitude::parse(&mut cursor)?)
            }
            EmxDatagramType::Clock => EmxDatagram::Clock(Clock::parse(&mut cursor)?),
            EmxDatagramType::Height => EmxDatagram::Height(Height::parse(&mut cursor)?),
            EmxDatagramType::Heading => EmxDatagram::Heading(Heading::parse(&mut cursor)?),
            EmxDatagramType::Position => EmxDatagram::Position(Position::parse(&mut cursor)?),
            EmxDatagramType::SingleBeamDepth => {
                EmxDatagram::SingleBeamDepth(SingleBeamDepth::parse(&mut cursor)?)
            }
            EmxDatagramType::Tide => EmxDatagram::Tide(Tide::parse(&mut cursor)?),
            EmxDatagramType::SurfaceSoundSpeed => {
                EmxDatagram::SurfaceSoundSpeed(Sssv::parse(&mut cursor)?)
            }
            EmxDatagramType::SoundSpeedProfile => {
                EmxDatagram::SoundSpeedProfile(SoundSpeedProfile::parse(&mut cursor)?)
            }
            EmxDatagramType::SoundSpeedProfileEm3000 => {
                EmxDatagram::SoundSpeedProfileEm3000(SoundSpeedProfileEm3000::parse(&mut cursor)?)
            }
            EmxDatagramType::SspOutput => EmxDatagram::SspOutput(SspOutput::parse(&mut cursor)?),
            EmxDatagramType::InstallParams => {
                EmxDatagram::InstallParams(InstallParams::parse(&mut cursor)?)
            }
            EmxDatagramType::InstallParamsStop => {
                EmxDatagram::InstallParamsStop(InstallParams::parse(&mut cursor)?)
            }
            EmxDatagramType::InstallParamsRemote => {
                EmxDatagram::InstallParamsRemote(InstallParams::parse(&mut cursor)?)
            }
            EmxDatagramType::RuntimeParams => {
                EmxDatagram::RuntimeParams(RuntimeParams::parse(&mut cursor)?)
            }
            EmxDatagramType::ExtraParams => {
                EmxDatagram::ExtraParams(ExtraParams::parse(&mut cursor)?)
            }
            EmxDatagramType::PuOutput => EmxDatagram::PuOutput(PuOutput::parse(&mut cursor)?),
            EmxDatagramType::PuStatus => EmxDatagram::PuStatus(PuStatus::parse(&mut cursor)?),
            EmxDatagramType::PuBistResult => {
                EmxDatagram::PuBistResult(PuBistResult::parse(&mut cursor)?)
            }
            EmxDatagramType::TransducerTilt => {
                EmxDatagram::TransducerTilt(Tilt::parse(&mut cursor)?)
            }
            EmxDatagramType::HisasStatus => {
                EmxDatagram::HisasStatus(HisasStatus::parse(&mut cursor)?)
            }
            EmxDatagramType::SidescanStatus => EmxDatagram::SidescanStatus(SidescanStatus::parse(
                &mut cursor,
                &mut self.sidescan_bytes_per_sample,
            )?),
            EmxDatagramType::SidescanData => EmxDatagram::SidescanData(SidescanData::parse(
                &mut cursor,
                &self.sidescan_bytes_per_sample,
            )?),
            EmxDatagramType::NavigationOutput => {
                EmxDatagram::NavigationOutput(NavigationOutput::parse(&mut cursor)?)
            }
            EmxDatagramType::RemoteParamsInfo
            | EmxDatagramType::SystemStatus
            | EmxDatagramType::Stave
            | EmxDatagramType::SurfaceSoundSpeedOld
            | EmxDatagramType::Directory
            | EmxDatagramType::InputSoundSpeed
            | EmxDatagramType::Rra123 => EmxDatagram::Opaque(body.to_vec()),
            EmxDatagramType::Unknown(code) => {
                log::debug!(
                    "unknown datagram type ({}) of {} bytes",
                    code,
                    body.len()
                );
                EmxDatagram::Opaque(body.to_vec())
            }
        };

        Ok(datagram)
    }
}

/// Verify the trailing ETX byte and checksum of a datagram body.
///
/// The checksum is the unsigned 16-bit sum of all bytes between the STX
/// and ETX bytes: the header from the type field onward, then the body
/// up to the ETX.  The ETX byte has been seen set to zero in legacy
/// data, and a stored checksum of zero means "missing" and is accepted.
fn checksum_is_valid(raw_header: &[u8; HEADER_SIZE], body: &[u8], order: ByteOrder) -> bool {
    let n = body.len();
    if n < TRAILER_SIZE {
        return false;
    }

    let end_byte = body[n - 3];
    if end_byte != EMX_END_BYTE && end_byte != 0 {
        log::debug!("missing ETX end byte ({})", end_byte);
        return false;
    }

    let stored = order.read_u16(&body[n - 2..]);

    let mut sum: u16 = 0;
    for &byte in &raw_header[5..HEADER_SIZE] {
        sum = sum.wrapping_add(byte as u16);
    }
    for &byte in &body[..n - 3] {
        sum = sum.wrapping_add(byte as u16);
    }

    if stored == 0 && sum != 0 {
        log::debug!("missing or zero checksum");
        return true;
    }

    sum == stored
}

/// Determine whether the file at `path` looks like an EMX stream.
///
/// Reads one datagram header and validates it; an empty file or an
/// invalid header yields `false`, and only I/O failures are errors.
pub fn identify(path: impl AsRef<Path>) -> Result<bool, DgmError> {
    let mut file = File::open(path.as_ref()).map_err(DgmError::open)?;

    let mut raw_header = [0u8; HEADER_SIZE];
    let mut filled = 0;
    while filled < raw_header.len() {
        match file.read(&mut raw_header[filled..]) {
            Ok(0) => return Ok(false),
            Ok(count) => filled += count,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(DgmError::read(e)),
        }
    }

    let order = match detect_byte_order(&raw_header) {
        Ok(order) => order,
        Err(_) => return Ok(false),
    };

    Ok(EmxHeader::from_bytes(&raw_header, order).validate().is_ok())
}
