//! Seabed image datagrams (83 and 89).

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Seabed image 83 info (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seabed83Info {
    /// Mean absorption coefficient in 0.01 dB/km (1-20000).
    pub mean_abs_coef: u16,
    /// Pulse length in us (50-).
    pub pulse_length: u16,
    /// Range to normal incidence used to correct sample amplitudes, in
    /// samples.
    pub range_norm: u16,
    /// Start range sample of TVG ramp if not enough dynamic range.
    pub start_range: u16,
    /// Stop range sample of TVG ramp if not enough dynamic range.
    pub stop_range: u16,
    /// Normal incidence BS in 0.1 dB (BSN).  May have been stored in dB
    /// in early data.
    pub normal_incidence_bs: i8,
    /// Oblique BS in 0.1 dB (BSO).
    pub oblique_bs: i8,
    /// TX beamwidth in 0.1 deg (1-300).
    pub tx_beamwidth: u16,
    /// TVG law crossover angle in 0.1 deg (20-300).
    pub tvg_cross_over: u8,
    /// Number of valid beams (N).
    pub num_beams: u8,
}

/// Seabed image 83 beam entry (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seabed83Beam {
    /// Beam index number (0-253).
    pub beam_index: u8,
    /// Sorting direction: the first sample in a beam has lowest range if
    /// 1, highest if -1.
    pub sorting_direction: i8,
    /// Number of samples per beam = Ns.
    pub num_samples: u16,
    /// Detection point (center sample number).  Nominally numbered from
    /// 1, but zeroes and values beyond num_samples occur in real data.
    pub detect_sample: u16,
}

/// Seabed image datagram (EM2000, EM3000, EM3002, EM1002, EM300, EM120).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seabed83 {
    pub info: Seabed83Info,
    pub beams: Vec<Seabed83Beam>,
    /// Sample amplitudes in 0.5 dB (-128-126).
    pub amplitude: Vec<i8>,
    /// Number of bytes in the amplitude region including a possible
    /// spare byte for even datagram length.  Not a wire field; it bounds
    /// the amplitude array.
    pub bytes_end: usize,
}

impl Seabed83 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Seabed83Info {
            mean_abs_coef: cursor.read_u16()?,
            pulse_length: cursor.read_u16()?,
            range_norm: cursor.read_u16()?,
            start_range: cursor.read_u16()?,
            stop_range: cursor.read_u16()?,
            normal_incidence_bs: cursor.read_i8()?,
            oblique_bs: cursor.read_i8()?,
            tx_beamwidth: cursor.read_u16()?,
            tvg_cross_over: cursor.read_u8()?,
            num_beams: cursor.read_u8()?,
        };

        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(Seabed83Beam {
                beam_index: cursor.read_u8()?,
                sorting_direction: cursor.read_i8()?,
                num_samples: cursor.read_u16()?,
                detect_sample: cursor.read_u16()?,
            });
        }

        let bytes_end = cursor.remaining();
        let num_samples: usize = beams.iter().map(|b| b.num_samples as usize).sum();
        if num_samples > bytes_end {
            return Err(DgmError::bad_data(format!(
                "seabed image sample count ({}) exceeds remaining body ({})",
                num_samples, bytes_end
            )));
        }
        let amplitude = cursor.read_i8_array(num_samples)?;

        Ok(Self {
            info,
            beams,
            amplitude,
            bytes_end,
        })
    }
}

/// Seabed image 89 info (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seabed89Info {
    /// Amplitude sample rate in Hz; not the sample rate of the depth or
    /// raw range datagrams.
    pub sample_rate: f32,
    /// Range to normal incidence used to correct sample amplitudes, in
    /// samples.
    pub range_norm: u16,
    /// Normal incidence BS in 0.1 dB (BSN).
    pub normal_incidence_bs: i16,
    /// Oblique BS in 0.1 dB (BSO).
    pub oblique_bs: i16,
    /// Tx beamwidth in 0.1 deg (1-300).
    pub tx_beamwidth: u16,
    /// TVG law cross over angle in 0.1 deg (20-300).
    pub tvg_cross_over: u16,
    /// Number of valid beams (N).
    pub num_beams: u16,
}

/// Seabed image 89 beam entry (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seabed89Beam {
    /// Sorting direction: the first sample in a beam has lowest range if
    /// 1, highest if -1.
    pub sorting_direction: i8,
    /// Detection info.
    pub detection_info: u8,
    /// Number of samples per beam = Ns.
    pub num_samples: u16,
    /// Detection point (center sample number).
    pub detect_sample: u16,
}

/// Seabed image 89 datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seabed89 {
    pub info: Seabed89Info,
    pub beams: Vec<Seabed89Beam>,
    /// Sample amplitudes in 0.1 dB.
    pub amplitude: Vec<i16>,
    /// Number of bytes in the amplitude region including a possible
    /// spare byte for even datagram length.  Not a wire field; it bounds
    /// the amplitude array.
    pub bytes_end: usize,
}

impl Seabed89 {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = Seabed89Info {
            sample_rate: cursor.read_f32()?,
            range_norm: cursor.read_u16()?,
            normal_incidence_bs: cursor.read_i16()?,
            oblique_bs: cursor.read_i16()?,
            tx_beamwidth: cursor.read_u16()?,
            tvg_cross_over: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
        };

        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(Seabed89Beam {
                sorting_direction: cursor.read_i8()?,
                detection_info: cursor.read_u8()?,
                num_samples: cursor.read_u16()?,
                detect_sample: cursor.read_u16()?,
            });
        }

        let bytes_end = cursor.remaining();
        let num_samples: usize = beams.iter().map(|b| b.num_samples as usize).sum();
        if num_samples * 2 > bytes_end {
            return Err(DgmError::bad_data(format!(
                "seabed image sample count ({}) exceeds remaining body ({})",
                num_samples, bytes_end
            )));
        }
        let amplitude = cursor.read_i16_array(num_samples)?;

        Ok(Self {
            info,
            beams,
            amplitude,
            bytes_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;

    #[test]
    fn test_seabed_89_parse() {
        let mut body = Vec::new();
        body.extend_from_slice(&8000.0f32.to_le_bytes());
        body.extend_from_slice(&120u16.to_le_bytes());
        body.extend_from_slice(&(-200i16).to_le_bytes());
        body.extend_from_slice(&(-300i16).to_le_bytes());
        body.extend_from_slice(&10u16.to_le_bytes());
        body.extend_from_slice(&60u16.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes()); // num_beams

        body.push(1u8); // sorting_direction
        body.push(0); // detection_info
        body.extend_from_slice(&2u16.to_le_bytes()); // num_samples
        body.extend_from_slice(&1u16.to_le_bytes()); // detect_sample

        body.extend_from_slice(&(-302i16).to_le_bytes());
        body.extend_from_slice(&(-290i16).to_le_bytes());
        body.push(0); // spare byte for even length

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        let seabed = Seabed89::parse(&mut cursor).unwrap();
        assert_eq!(seabed.info.num_beams, 1);
        assert_eq!(seabed.amplitude, vec![-302, -290]);
        assert_eq!(seabed.bytes_end, 5);
    }

    #[test]
    fn test_seabed_83_sample_overrun() {
        let mut body = vec![0u8; 16];
        body[15] = 1; // num_beams = 1
        body.extend_from_slice(&[0, 1]); // beam_index, sorting
        body.extend_from_slice(&100u16.to_le_bytes()); // num_samples = 100
        body.extend_from_slice(&0u16.to_le_bytes()); // detect_sample
        body.extend_from_slice(&[0; 4]); // only 4 amplitude bytes remain

        let mut cursor = BodyCursor::new(&body, ByteOrder::LittleEndian);
        assert!(matches!(
            Seabed83::parse(&mut cursor),
            Err(DgmError::BadData { .. })
        ));
    }
}
