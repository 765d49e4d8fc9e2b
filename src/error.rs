//! Error types shared by the EMX and KMA decoders.

use thiserror::Error;

/// Decoder error kinds.
///
/// Every fallible operation in the crate returns `Result<_, DgmError>`.
/// A `read` call that returns `Ok(None)` signals clean end of stream;
/// any structural problem with the data surfaces as `BadData`.
#[derive(Error, Debug)]
pub enum DgmError {
    /// The file could not be opened for reading.
    #[error("open failed: {message}")]
    OpenFailed { message: String },

    /// An I/O-level failure occurred while reading from the stream.
    #[error("read failed: {message}")]
    ReadFailed { message: String },

    /// The forward seek used to skip a filtered datagram body failed.
    #[error("seek failed: {message}")]
    SeekFailed { message: String },

    /// The header or body violated a structural invariant of the format.
    #[error("bad data: {message}")]
    BadData { message: String },

    /// The datagram requested a feature this decoder does not implement.
    #[error("unsupported: {message}")]
    Unsupported { message: String },

    /// The frame buffer could not be grown to hold the datagram body.
    #[error("out of memory: {message}")]
    OutOfMemory { message: String },
}

impl DgmError {
    pub(crate) fn open(err: std::io::Error) -> Self {
        DgmError::OpenFailed {
            message: err.to_string(),
        }
    }

    pub(crate) fn read(err: std::io::Error) -> Self {
        DgmError::ReadFailed {
            message: err.to_string(),
        }
    }

    pub(crate) fn seek(err: std::io::Error) -> Self {
        DgmError::SeekFailed {
            message: err.to_string(),
        }
    }

    pub(crate) fn bad_data(message: impl Into<String>) -> Self {
        DgmError::BadData {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        DgmError::Unsupported {
            message: message.into(),
        }
    }
}
