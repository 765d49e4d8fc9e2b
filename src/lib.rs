//! Streaming decoders for Kongsberg multibeam echo sounder telemetry.
//!
//! This crate reads the two binary datagram streams produced by Kongsberg
//! EM series multibeam echo sounders:
//!
//! * [`emx`] — the legacy EM Series datagram format (`.all` files).
//!   Records are STX/ETX-delimited and checksummed, and the stream's
//!   endianness is not recorded in-band; it is inferred from the first
//!   header and applied to every subsequent field read.
//! * [`kma`] — the KMALL datagram format (`.kmall` files).  Records are
//!   little-endian and length-prefixed and -suffixed, with bodies built
//!   from sub-headers that declare their own sizes.
//!
//! Both decoders are pull-style: `open` a file (or wrap any
//! `Read + Seek` source), then call `read` until it returns `Ok(None)`.
//! Each call yields one fully-decoded record with all nested arrays
//! positioned and endian-normalized to host order.
//!
//! ```no_run
//! use swathstream::emx::EmxReader;
//!
//! let mut reader = EmxReader::open("survey.all")?;
//! while let Some(record) = reader.read()? {
//!     println!("{} at {} ms", record.header.datagram_type().name(), record.header.time_ms);
//! }
//! # Ok::<(), swathstream::DgmError>(())
//! ```
//!
//! The decoders are read-only and single-threaded per reader; distinct
//! readers are independent.  Diagnostics are emitted through the [`log`]
//! facade.

pub mod byte_order;
pub mod emx;
pub mod error;
pub mod kma;

mod cursor;
mod io;

pub use byte_order::ByteOrder;
pub use error::DgmError;
