//! Bathymetry datagrams: depth, XYZ, nominal depth, extra detections,
//! central beams echogram, and the IFREMER quality factor.

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Depth datagram info (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthInfo {
    /// Heading of vessel in 0.01 deg (0-35999).
    pub vessel_heading: u16,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// TX transducer depth re water level at time of ping in cm.
    /// If the offset multiplier is -1 the true depth is
    /// -655.36 + transducer_depth.
    pub transducer_depth: u16,
    /// Maximum number of beams possible (48-).
    pub max_beams: u8,
    /// Number of beams with valid detections = N.
    pub num_beams: u8,
    /// Depth (z) resolution in cm.
    pub depth_resolution: u8,
    /// Horizontal (x and y) resolution in cm.
    pub horizontal_resolution: u8,
    /// Sample rate in Hz (300-30000), or the depth difference between
    /// sonar heads on an EM 3000D.
    pub sample_rate: u16,
}

impl DepthInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            vessel_heading: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            transducer_depth: cursor.read_u16()?,
            max_beams: cursor.read_u8()?,
            num_beams: cursor.read_u8()?,
            depth_resolution: cursor.read_u8()?,
            horizontal_resolution: cursor.read_u8()?,
            sample_rate: cursor.read_u16()?,
        })
    }
}

/// Depth datagram beam entry (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthBeam {
    /// Depth (z) from transmit transducer (unsigned for EM120 and EM300).
    pub depth: i16,
    /// Across track distance (y) in units of horizontal_resolution.
    pub across_track: i16,
    /// Along track distance (x) in units of horizontal_resolution.
    pub along_track: i16,
    /// Beam depression angle in 0.01 deg, positive downwards.
    pub beam_depression_angle: i16,
    /// Beam azimuth angle in 0.01 deg.
    pub beam_azimuth_angle: u16,
    /// One-way travel time in samples.
    pub range: u16,
    /// Quality factor (0-254).  The upper bit signifies amplitude (0) or
    /// phase (1) detection.
    pub quality_factor: u8,
    /// Detection window length in samples/4 (1-254).
    pub detect_window_length: u8,
    /// Reflectivity (BS) in 0.5 dB resolution.
    pub backscatter: i8,
    /// Beam number (1-254).
    pub beam_number: u8,
}

impl DepthBeam {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            depth: cursor.read_i16()?,
            across_track: cursor.read_i16()?,
            along_track: cursor.read_i16()?,
            beam_depression_angle: cursor.read_i16()?,
            beam_azimuth_angle: cursor.read_u16()?,
            range: cursor.read_u16()?,
            quality_factor: cursor.read_u8()?,
            detect_window_length: cursor.read_u8()?,
            backscatter: cursor.read_i8()?,
            beam_number: cursor.read_u8()?,
        })
    }
}

/// Depth datagram (EM2000, EM3000, EM3002, EM1002, EM300, and EM120).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    pub info: DepthInfo,
    pub beams: Vec<DepthBeam>,
    /// Transducer depth offset multiplier (-1 to +17).
    pub depth_offset_multiplier: i8,
}

impl Depth {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = DepthInfo::parse(cursor)?;
        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(DepthBeam::parse(cursor)?);
        }
        let depth_offset_multiplier = cursor.read_i8()?;
        Ok(Self {
            info,
            beams,
            depth_offset_multiplier,
        })
    }
}

/// Nominal depth datagram info (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthNominalInfo {
    /// TX transducer depth re water level at time of ping in m.
    pub transducer_depth: f32,
    /// Maximum number of beams possible (48-).
    pub max_beams: u16,
    /// Number of beams with valid detections = N.
    pub num_beams: u16,
}

/// Nominal depth beam entry (14 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthNominalBeam {
    /// Depth (z) from transmit transducer in m.  NaN values have been
    /// seen in EM122 data.
    pub depth: f32,
    /// Across track distance (y) in meters.
    pub across_track: f32,
    /// Along track distance (x) in meters.
    pub along_track: f32,
    /// Detection info.
    pub detection_info: u8,
    /// Real-time cleaning information (negative = flagged).
    pub system_cleaning: i8,
}

/// Undocumented nominal depth datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthNominal {
    pub info: DepthNominalInfo,
    pub beams: Vec<DepthNominalBeam>,
}

impl DepthNominal {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = DepthNominalInfo {
            transducer_depth: cursor.read_f32()?,
            max_beams: cursor.read_u16()?,
            num_beams: cursor.read_u16()?,
        };
        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(DepthNominalBeam {
                depth: cursor.read_f32()?,
                across_track: cursor.read_f32()?,
                along_track: cursor.read_f32()?,
                detection_info: cursor.read_u8()?,
                system_cleaning: cursor.read_i8()?,
            });
        }
        Ok(Self { info, beams })
    }
}

/// XYZ 88 datagram info (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyzInfo {
    /// Heading of vessel at TX time in 0.01 deg (0-35999).
    pub vessel_heading: u16,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// TX transducer depth re water level at time of ping in m.  Add to
    /// beam depths for the total depth.
    pub transducer_depth: f32,
    /// Number of beams in datagram = N.
    pub num_beams: u16,
    /// Number of beams with valid detections.
    pub valid_beams: u16,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Scanning info (EM2040 only); 0 when scanning is not used.
    pub scanning_info: u8,
}

/// XYZ 88 beam entry (20 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyzBeam {
    /// Depth (z) from transmit transducer in meters; heave, roll, pitch,
    /// and sound speed have been applied.
    pub depth: f32,
    /// Across track distance (y) in meters.
    pub across_track: f32,
    /// Along track distance (x) in meters.
    pub along_track: f32,
    /// Detection window length in samples.
    pub detect_window_length: u16,
    /// Quality factor, scaled std dev of the range detection,
    /// Q = 250*sd/dr.
    pub quality_factor: u8,
    /// Incidence beam adjustment (IBA) in 0.1 deg.
    pub beam_adjustment: i8,
    /// Detection information; the top bit flags an invalid detection.
    pub detection_info: u8,
    /// Real-time cleaning information (negative = flagged).
    pub system_cleaning: i8,
    /// Reflectivity (BS) in 0.1 dB resolution; -100 dB appears to be the
    /// invalid value.
    pub backscatter: i16,
}

/// XYZ 88 datagram (EM2040, EM710, EM122, EM302, ME70).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub info: XyzInfo,
    pub beams: Vec<XyzBeam>,
}

impl Xyz {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = XyzInfo {
            vessel_heading: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            transducer_depth: cursor.read_f32()?,
            num_beams: cursor.read_u16()?,
            valid_beams: cursor.read_u16()?,
            sample_rate: cursor.read_f32()?,
            scanning_info: {
                let value = cursor.read_u8()?;
                cursor.skip(3)?; // spare
                value
            },
        };
        let mut beams = Vec::with_capacity(info.num_beams as usize);
        for _ in 0..info.num_beams {
            beams.push(XyzBeam {
                depth: cursor.read_f32()?,
                across_track: cursor.read_f32()?,
                along_track: cursor.read_f32()?,
                detect_window_length: cursor.read_u16()?,
                quality_factor: cursor.read_u8()?,
                beam_adjustment: cursor.read_i8()?,
                detection_info: cursor.read_u8()?,
                system_cleaning: cursor.read_i8()?,
                backscatter: cursor.read_i16()?,
            });
        }
        Ok(Self { info, beams })
    }
}

/// Extra detections info (36 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraDetectInfo {
    pub datagram_counter: u16,
    /// Datagram version ID; this decoder supports version 1.
    pub datagram_version: u16,
    pub swath_counter: u16,
    pub swath_index: u16,
    /// Heading of vessel in 0.01 deg (0-35999).
    pub vessel_heading: u16,
    /// Sound speed at transducer in dm/s (14000-16000).
    pub sound_speed: u16,
    /// Depth of reference point in meters.
    pub reference_depth: f32,
    /// Water column sample rate in Hz.
    pub wc_sample_rate: f32,
    /// Raw amplitude (seabed image) sample rate in Hz.
    pub raw_amplitude_sample_rate: f32,
    pub rx_transducer_index: u16,
    /// Number of extra detections.
    pub num_detects: u16,
    /// Number of detection classes.
    pub num_classes: u16,
    /// Number of bytes per class entry.
    pub nbytes_class: u16,
    /// Number of alarm flags.
    pub nalarm_flags: u16,
    /// Number of bytes per detection entry.
    pub nbytes_detect: u16,
}

/// Extra detections class entry (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraDetectClass {
    /// Start depth (% of depth) (0-300).
    pub start_depth: u16,
    /// Stop depth (% of depth) (1-300).
    pub stop_depth: u16,
    /// 100 * QF threshold (0.01-1).
    pub qf_threshold: u16,
    /// Backscatter threshold in dB.
    pub bs_threshold: i16,
    /// SNR threshold in dB.
    pub snr_threshold: u16,
    /// Number of extra detections required to raise an alarm.
    pub alarm_threshold: u16,
    /// Number of extra detections.
    pub num_detects: u16,
    /// Show class (0-1).
    pub show_class: u8,
    /// Alarm flag (0 or 1/16/17).
    pub alarm_flag: u8,
}

/// Extra detections data entry (68 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraDetectData {
    /// Depth in meters.
    pub depth: f32,
    /// Across-track distance in meters.
    pub across_track: f32,
    /// Along-track distance in meters.
    pub along_track: f32,
    pub latitude_delta: f32,
    pub longitud_delta: f32,
    /// Beam pointing angle in degrees re array.
    pub beam_angle: f32,
    /// Applied pointing angle correction.
    pub angle_correction: f32,
    /// Two-way travel time in seconds.
    pub travel_time: f32,
    /// Applied two-way travel time corrections in seconds.
    pub travel_time_correction: f32,
    /// Backscatter in 0.1 dB.
    pub backscatter: i16,
    /// Beam incidence angle adjustment (IBA) in 0.1 deg.
    pub beam_adjustment: i8,
    pub detection_info: i8,
    /// Tx sector number / TX array index.
    pub tx_sector: u16,
    pub detection_window_length: u16,
    /// Quality factor (old).
    pub quality_factor: u16,
    pub system_cleaning: u16,
    /// Range factor in %.
    pub range_factor: u16,
    /// Detection class number.
    pub class_number: u16,
    /// Confidence level.
    pub confidence: u16,
    /// QF * 10 (IFREMER quality factor).
    pub qf_ifremer: u16,
    /// Water column beam number.
    pub wc_beam_number: u16,
    /// Beam angle across re vertical in degrees.
    pub beam_angle_across: f32,
    /// Detected range in (WCsr) samples.
    pub detected_range: u16,
    /// Number of raw amplitude samples (Ns).
    pub raw_amplitude: u16,
}

/// Extra detections datagram (EM2040/EM2040C with Slim Processing Unit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraDetect {
    pub info: ExtraDetectInfo,
    pub classes: Vec<ExtraDetectClass>,
    pub data: Vec<ExtraDetectData>,
    /// Raw amplitude samples for all detections.
    pub raw_amplitude: Vec<i16>,
}

impl ExtraDetect {
    const CLASS_SIZE: u16 = 16;
    const DETECT_SIZE: u16 = 68;

    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = ExtraDetectInfo {
            datagram_counter: cursor.read_u16()?,
            datagram_version: cursor.read_u16()?,
            swath_counter: cursor.read_u16()?,
            swath_index: cursor.read_u16()?,
            vessel_heading: cursor.read_u16()?,
            sound_speed: cursor.read_u16()?,
            reference_depth: cursor.read_f32()?,
            wc_sample_rate: cursor.read_f32()?,
            raw_amplitude_sample_rate: cursor.read_f32()?,
            rx_transducer_index: cursor.read_u16()?,
            num_detects: cursor.read_u16()?,
            num_classes: cursor.read_u16()?,
            nbytes_class: cursor.read_u16()?,
            nalarm_flags: cursor.read_u16()?,
            nbytes_detect: cursor.read_u16()?,
        };

        if info.datagram_version != 1 {
            return Err(DgmError::bad_data(format!(
                "invalid extra detections datagram version ({})",
                info.datagram_version
            )));
        }
        if info.nbytes_class != Self::CLASS_SIZE {
            return Err(DgmError::bad_data(format!(
                "invalid extra detections class size ({})",
                info.nbytes_class
            )));
        }
        if info.nbytes_detect != Self::DETECT_SIZE {
            return Err(DgmError::bad_data(format!(
                "invalid extra detections data size ({})",
                info.nbytes_detect
            )));
        }

        let mut classes = Vec::with_capacity(info.num_classes as usize);
        for _ in 0..info.num_classes {
            classes.push(ExtraDetectClass {
                start_depth: cursor.read_u16()?,
                stop_depth: cursor.read_u16()?,
                qf_threshold: cursor.read_u16()?,
                bs_threshold: cursor.read_i16()?,
                snr_threshold: cursor.read_u16()?,
                alarm_threshold: cursor.read_u16()?,
                num_detects: cursor.read_u16()?,
                show_class: cursor.read_u8()?,
                alarm_flag: cursor.read_u8()?,
            });
        }

        let mut data = Vec::with_capacity(info.num_detects as usize);
        for _ in 0..info.num_detects {
            data.push(ExtraDetectData {
                depth: cursor.read_f32()?,
                across_track: cursor.read_f32()?,
                along_track: cursor.read_f32()?,
                latitude_delta: cursor.read_f32()?,
                longitud_delta: cursor.read_f32()?,
                beam_angle: cursor.read_f32()?,
                angle_correction: cursor.read_f32()?,
                travel_time: cursor.read_f32()?,
                travel_time_correction: cursor.read_f32()?,
                backscatter: cursor.read_i16()?,
                beam_adjustment: cursor.read_i8()?,
                detection_info: cursor.read_i8()?,
                tx_sector: {
                    cursor.skip(2)?; // spare
                    cursor.read_u16()?
                },
                detection_window_length: cursor.read_u16()?,
                quality_factor: cursor.read_u16()?,
                system_cleaning: cursor.read_u16()?,
                range_factor: cursor.read_u16()?,
                class_number: cursor.read_u16()?,
                confidence: cursor.read_u16()?,
                qf_ifremer: cursor.read_u16()?,
                wc_beam_number: cursor.read_u16()?,
                beam_angle_across: cursor.read_f32()?,
                detected_range: cursor.read_u16()?,
                raw_amplitude: cursor.read_u16()?,
            });
        }

        let num_samples: usize = data.iter().map(|d| d.raw_amplitude as usize).sum();
        let raw_amplitude = cursor.read_i16_array(num_samples)?;

        Ok(Self {
            info,
            classes,
            data,
            raw_amplitude,
        })
    }
}

/// Central beams echogram info (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralBeamsInfo {
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
    /// Normal incidence BS in dB (BSN) (-50-+10).
    pub normal_incidence_bs: i8,
    /// Oblique BS in dB (BSO) (-60-0).
    pub oblique_bs: i8,
    /// Tx beamwidth along in 0.1 deg (1-300).
    pub tx_beamwidth: u16,
    /// TVG law cross over angle in 0.1 deg (20-300).
    pub tvg_cross_over: u8,
    /// Number of beams (N).
    pub num_beams: u8,
}

/// Central beams echogram beam entry (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralBeamsBeam {
    /// Beam index number (0-253); beam number minus one.
    pub beam_index: u8,
    /// Number of samples per beam = Ns.
    pub num_samples: u16,
    /// Start range in samples, as a two-way range.  Data are provided
    /// whether or not a beam has a valid detection.
    pub start_range: u16,
}

/// Central beams echogram datagram (EM120 and EM300).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralBeams {
    pub info: CentralBeamsInfo,
    pub beams: Vec<CentralBeamsBeam>,
    /// Sample amplitudes in 0.5 dB, uncorrected for the ping's detection
    /// parameters.
    pub amplitude: Vec<i8>,
}

impl CentralBeams {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = CentralBeamsInfo {
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
            beams.push(CentralBeamsBeam {
                beam_index: cursor.read_u8()?,
                num_samples: {
                    cursor.skip(1)?; // spare byte for even length
                    cursor.read_u16()?
                },
                start_range: cursor.read_u16()?,
            });
        }
        let num_samples: usize = beams.iter().map(|b| b.num_samples as usize).sum();
        let amplitude = cursor.read_i8_array(num_samples)?;
        Ok(Self {
            info,
            beams,
            amplitude,
        })
    }
}

/// Quality factor info (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFactorInfo {
    /// Number of receive beams = Nrx (1-).
    pub num_beams: u16,
    /// Number of parameters per beam = Npar.  Only one parameter is
    /// currently defined; some early data may have npar = 0.
    pub npar: u8,
}

/// Quality factor datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFactor {
    pub info: QualityFactorInfo,
    /// IFREMER quality factor per beam (>= 0).
    pub data: Vec<f32>,
}

impl QualityFactor {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let info = QualityFactorInfo {
            num_beams: cursor.read_u16()?,
            npar: {
                let npar = cursor.read_u8()?;
                cursor.skip(1)?; // spare
                npar
            },
        };

        if info.npar > 1 {
            return Err(DgmError::unsupported(format!(
                "quality factor datagram with {} parameters per beam",
                info.npar
            )));
        }

        let data = cursor.read_f32_array(info.num_beams as usize)?;
        Ok(Self { info, data })
    }
}
