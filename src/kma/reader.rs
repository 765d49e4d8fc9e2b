//! KMA stream reader: framing, validation, and dispatch.

use crate::byte_order::ByteOrder;
use crate::cursor::BodyCursor;
use crate::error::DgmError;
use crate::io::{read_frame_bytes, skip_forward, FrameBuffer, ReadOutcome};
use crate::kma::header::{KmaHeader, HEADER_SIZE};
use crate::kma::{
    Bist, CalibrationFile, Che, Cpo, Iip, Iop, KmaDatagram, KmaDatagramType, KmaRecord, Mrz, Mwc,
    Scl, Sde, Shi, Skm, Spo, Svp, Svt,
};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Streaming reader for KMA (`.kmall`) files.
///
/// Datagrams are read in file order by repeated calls to [`read`].  The
/// format is fixed little-endian and self-delimiting, so no byte-order
/// inference or checksum handling is needed.
///
/// [`read`]: KmaReader::read
#[derive(Debug)]
pub struct KmaReader<R = File> {
    reader: R,
    frame: FrameBuffer,
    ignore_water_column: bool,
    ignore_soundings: bool,
}

impl KmaReader<File> {
    /// Open a KMA file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DgmError> {
        let file = File::open(path.as_ref()).map_err(DgmError::open)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read + Seek> KmaReader<R> {
    /// Wrap any seekable byte source positioned at a datagram boundary.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            frame: FrameBuffer::new(),
            ignore_water_column: false,
            ignore_soundings: false,
        }
    }

    /// Skip water column ('#MWC') datagrams instead of decoding them.
    pub fn set_ignore_water_column(&mut self, ignore: bool) {
        self.ignore_water_column = ignore;
    }

    /// Skip multibeam sounding ('#MRZ') datagrams instead of decoding
    /// them.
    pub fn set_ignore_soundings(&mut self, ignore: bool) {
        self.ignore_soundings = ignore;
    }

    /// Read the next datagram.
    ///
    /// Returns `Ok(None)` at clean end of stream.  Records are yielded
    /// in file order, exactly once each, except for types skipped by the
    /// water-column and soundings filters.  The decoded record owns its
    /// data; it stays valid after further reads.
    pub fn read(&mut self) -> Result<Option<KmaRecord>, DgmError> {
        loop {
            let mut raw_header = [0u8; HEADER_SIZE];
            match read_frame_bytes(&mut self.reader, &mut raw_header)? {
                ReadOutcome::Full => {}
                ReadOutcome::Eof => return Ok(None),
            }

            let header = KmaHeader::from_bytes(&raw_header);
            header.validate()?;

            log::trace!(
                "num_bytes_dgm={}, system_id={}, echo_sounder_id={}, time={}:{}, type={}",
                header.num_bytes_dgm,
                header.system_id,
                header.echo_sounder_id,
                header.time_sec,
                header.time_nanosec,
                header.datagram_type().name()
            );

            let body_size = header.num_bytes_dgm as usize - HEADER_SIZE;
            let datagram_type = header.datagram_type();

            // Water column and sounding datagrams are large; seeking
            // past the bodies beats reading them when they are not
            // wanted.
            let skip = (self.ignore_water_column && datagram_type == KmaDatagramType::Mwc)
                || (self.ignore_soundings && datagram_type == KmaDatagramType::Mrz);
            if skip {
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

            let datagram = self.decode_datagram(&header)?;
            return Ok(Some(KmaRecord { header, datagram }));
        }
    }

    fn decode_datagram(&self, header: &KmaHeader) -> Result<KmaDatagram, DgmError> {
        let body = self.frame.bytes();
        // The body ends with a repeat of the 4-byte datagram length; it
        // is not re-verified, just excluded from the payload.
        let payload = &body[..body.len() - 4];
        let mut cursor = BodyCursor::new(payload, ByteOrder::LittleEndian);

        let datagram = match header.datagram_type() {
            KmaDatagramType::Iip => KmaDatagram::Iip(Iip::parse(&mut cursor)?),
            KmaDatagramType::Iop => KmaDatagram::Iop(Iop::parse(&mut cursor)?),
            KmaDatagramType::Ibe => KmaDatagram::Ibe(Bist::parse(&mut cursor)?),
            KmaDatagramType::Ibr => KmaDatagram::Ibr(Bist::parse(&mut cursor)?),
            KmaDatagramType::Ibs => KmaDatagram::Ibs(Bist::parse(&mut cursor)?),
            KmaDatagramType::Mrz => {
                KmaDatagram::Mrz(Mrz::parse(&mut cursor, header.dgm_version)?)
            }
            KmaDatagramType::Mwc => KmaDatagram::Mwc(Mwc::parse(&mut cursor)?),
            KmaDatagramType::Spo => KmaDatagram::Spo(Spo::parse(&mut cursor)?),
            KmaDatagramType::Skm => KmaDatagram::Skm(Skm::parse(&mut cursor)?),
            KmaDatagramType::Svp => KmaDatagram::Svp(Svp::parse(&mut cursor)?),
            KmaDatagramType::Svt => KmaDatagram::Svt(Svt::parse(&mut cursor)?),
            KmaDatagramType::Scl => KmaDatagram::Scl(Scl::parse(&mut cursor)?),
            KmaDatagramType::Sde => {
                KmaDatagram::Sde(Sde::parse(&mut cursor, header.dgm_version)?)
            }
            KmaDatagramType::Shi => KmaDatagram::Shi(Shi::parse(&mut cursor)?),
            KmaDatagramType::Cpo => KmaDatagram::Cpo(Cpo::parse(&mut cursor)?),
            KmaDatagramType::Che => KmaDatagram::Che(Che::parse(&mut cursor)?),
            KmaDatagramType::Fcf => KmaDatagram::Fcf(CalibrationFile::parse(&mut cursor)?),
            KmaDatagramType::Sha => KmaDatagram::Opaque(body.to_vec()),
            KmaDatagramType::Unknown(dgm_type) => {
                log::debug!(
                    "unknown datagram type ({}) of {} bytes",
                    String::from_utf8_lossy(&dgm_type),
                    header.num_bytes_dgm
                );
                KmaDatagram::Opaque(body.to_vec())
            }
        };

        Ok(datagram)
    }
}

/// Determine whether the file at `path` looks like a KMA stream.
///
/// Reads one datagram header and validates it; an empty or short file
/// or an invalid header yields `false`, and only I/O failures are
/// errors.
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

    Ok(KmaHeader::from_bytes(&raw_header).validate().is_ok())
}
