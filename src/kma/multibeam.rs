//! Multibeam raw range and depth datagram ('#MRZ') and the partition
//! and common sub-headers shared by the M-class datagrams.
//!
//! Sub-headers declare their own sizes; the cursor follows the declared
//! sizes so that revision-added tail fields are skipped (or defaulted
//! when the stream predates them).

use crate::cursor::BodyCursor;
use crate::error::DgmError;
use serde::{Deserialize, Serialize};

/// Partition of a multi-part datagram (4 bytes).
///
/// When a datagram exceeds the 64 kB UDP limit, the PU splits it and
/// K-Controller/SIS merges the parts before writing the file, so a
/// datagram on disk should always be 1 of 1; this decoder does not
/// reassemble multi-part datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MPartition {
    /// Number of datagram parts to rejoin to get one datagram.
    pub num_of_dgms: u16,
    /// Datagram part number, e.g. 2 (of 3).
    pub dgm_num: u16,
}

impl MPartition {
    pub(crate) const SIZE: usize = 4;

    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            num_of_dgms: cursor.read_u16()?,
            dgm_num: cursor.read_u16()?,
        })
    }

    pub(crate) fn require_single(&self) -> Result<(), DgmError> {
        if self.dgm_num != 1 || self.num_of_dgms != 1 {
            return Err(DgmError::bad_data(format!(
                "unexpected datagram partition ({} of {})",
                self.dgm_num, self.num_of_dgms
            )));
        }
        Ok(())
    }
}

/// Common part of the M-class datagrams (12 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MCommon {
    /// Size in bytes of the body part struct.
    pub num_bytes_cmn_part: u16,
    /// Ping counter, incremented at every set of TX pulses.
    pub ping_cnt: u16,
    /// Number of RX fans per ping.
    pub rx_fans_per_ping: u8,
    /// Index 0 is the aft swath, port side.
    pub rx_fan_index: u8,
    /// Number of swaths per ping.
    pub swaths_per_ping: u8,
    /// Alongship index for the location of the swath in multi-swath
    /// mode; index 0 is the aftmost swath.
    pub swath_along_position: u8,
    /// Transducer used in this RX fan: 0 - TRAI_TX1, 1 - TRAI_TX2, etc.
    pub tx_transducer_ind: u8,
    /// Transducer used in this RX fan: 0 - TRAI_RX1, 1 - TRAI_RX2, etc.
    pub rx_transducer_ind: u8,
    /// Total number of receiving units.
    pub num_rx_transducers: u8,
    /// For future use; 0 - current algorithm.
    pub algorithm_type: u8,
}

impl MCommon {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let common = Self {
            num_bytes_cmn_part: cursor.read_u16()?,
            ping_cnt: cursor.read_u16()?,
            rx_fans_per_ping: cursor.read_u8()?,
            rx_fan_index: cursor.read_u8()?,
            swaths_per_ping: cursor.read_u8()?,
            swath_along_position: cursor.read_u8()?,
            tx_transducer_ind: cursor.read_u8()?,
            rx_transducer_ind: cursor.read_u8()?,
            num_rx_transducers: cursor.read_u8()?,
            algorithm_type: cursor.read_u8()?,
        };
        cursor.seek_to(start + common.num_bytes_cmn_part as usize)?;
        Ok(common)
    }
}

/// MRZ ping info (152 bytes declared in revision G and later).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrzPingInfo {
    /// Size in bytes of the body part struct.
    pub num_bytes_info_data: u16,
    /// Ping rate in Hz, filtered/averaged.
    pub ping_rate_hz: f32,
    /// Beam spacing: 0 - equidistance, 1 - equiangle, 2 - high density.
    pub beam_spacing: u8,
    /// Depth mode; 100 is added when chosen manually.
    pub depth_mode: u8,
    /// Sub depth mode, for advanced manual use; 0 when depth mode is
    /// auto.
    pub sub_depth_mode: u8,
    /// Achieved distance between swaths in percent of the required
    /// distance; 0 when the function is not used.
    pub distance_btw_swath: u8,
    /// Bottom detection algorithm: 0 - normal, 1 - waterway, 2 -
    /// tracking, 3 - minimum depth; +100 in simulator mode.
    pub detection_mode: u8,
    /// Pulse forms used: 0 - CW, 1 - mix, 2 - FM.
    pub pulse_form: u8,
    /// Ping frequency in Hz; values below 100 are band codes.
    pub frequency_mode_hz: f32,
    /// Lowest center frequency of all sectors in this swath in Hz.
    pub freq_range_low_lim_hz: f32,
    /// Highest center frequency of all sectors in this swath in Hz.
    pub freq_range_high_lim_hz: f32,
    /// Total signal length of the sector with longest TX pulse in s.
    pub max_total_tx_pulse_length_sec: f32,
    /// Effective (-3 dB envelope) length of the longest effective pulse.
    pub max_eff_tx_pulse_length_sec: f32,
    /// Effective bandwidth of the sector with highest bandwidth in Hz.
    pub max_eff_tx_bandwidth_hz: f32,
    /// Average absorption coefficient in dB/km for the vertical beam.
    pub abs_coeff_db_per_km: f32,
    /// Port sector edge used by the beamformer, re z of SCS, in deg.
    pub port_sector_edge_deg: f32,
    /// Stbd sector edge used by the beamformer, re z of SCS, in deg.
    pub starb_sector_edge_deg: f32,
    /// Port coverage achieved, corrected for raybending, in deg.
    pub port_mean_cov_deg: f32,
    /// Stbd coverage achieved, corrected for raybending, in deg.
    pub starb_mean_cov_deg: f32,
    /// Port coverage achieved, corrected for raybending, in meters.
    pub port_mean_cov_m: i16,
    /// Stbd coverage achieved, corrected for raybending, in meters.
    pub starb_mean_cov_m: i16,
    /// Operator mode and stabilization settings, bit-coded.
    pub mode_and_stabilization: u8,
    /// Operator filter settings, one bit per filter.
    pub runtime_filter1: u8,
    /// Operator filter settings, four bits per filter.
    pub runtime_filter2: u16,
    /// Pipe tracking status.
    pub pipe_tracking_status: u32,
    /// Transmit array size used, along ship, in degrees.
    pub transmit_array_size_used_deg: f32,
    /// Receiver array size used, across ship, in degrees.
    pub receive_array_size_used_deg: f32,
    /// Operator selected TX power re maximum in dB.
    pub transmit_power_db: f32,
    /// Marine mammal protection: time remaining until max SL, in %.
    pub sl_ramp_up_time_remaining: u16,
    /// Yaw correction angle applied in degrees.
    pub yaw_angle_deg: f32,
    /// Number of TX sectors (Ntx).
    pub num_tx_sectors: u16,
    /// Number of bytes per TX sector entry.
    pub num_bytes_per_tx_sector: u16,
    /// Heading of vessel at time of midpoint of first TX pulse, in deg.
    pub heading_vessel_deg: f32,
    /// Sound speed used in the depth calculation, in m/s.
    pub sound_speed_at_tx_depth_m_per_sec: f32,
    /// TX transducer depth in meters below waterline.
    pub tx_transducer_depth_m: f32,
    /// Distance between water line and vessel reference point in m.
    pub z_water_level_re_ref_point_m: f32,
    /// X distance between the *.all and *.kmall reference points in m.
    pub x_kmall_to_all_m: f32,
    /// Y distance between the *.all and *.kmall reference points in m.
    pub y_kmall_to_all_m: f32,
    /// Method of position determination: 0 - last, 1 - interpolated,
    /// 2 - processed.
    pub lat_long_info: u8,
    /// Position sensor status: 0 - valid, 1 - invalid, 2 - reduced.
    pub pos_sensor_status: u8,
    /// Attitude sensor status: 0 - valid, 1 - invalid, 2 - reduced.
    pub attitude_sensor_status: u8,
    /// Latitude of the vessel reference point in degrees; 200 when not
    /// available.
    pub latitude_deg: f64,
    /// Longitude of the vessel reference point in degrees; 200 when not
    /// available.
    pub longitude_deg: f64,
    /// Height of the vessel reference point above the ellipsoid in m.
    pub ellipsoid_height_re_ref_point_m: f32,
    /// Backscatter offset set in the installation menu in dB (version 1).
    pub bs_correction_offset_db: f32,
    /// Beam intensity corrected as seabed image data (version 1).
    pub lamberts_law_applied: u8,
    /// Ice window installed (version 1).
    pub ice_window: u8,
    /// Active mode flags (added in Rev. H); bit 1 is EM multifrequency
    /// mode.
    pub active_modes: u16,
}

impl MrzPingInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let num_bytes_info_data = cursor.read_u16()?;
        cursor.skip(2)?; // padding
        let declared_end = start + num_bytes_info_data as usize;

        let mut info = Self {
            num_bytes_info_data,
            ping_rate_hz: cursor.read_f32()?,
            beam_spacing: cursor.read_u8()?,
            depth_mode: cursor.read_u8()?,
            sub_depth_mode: cursor.read_u8()?,
            distance_btw_swath: cursor.read_u8()?,
            detection_mode: cursor.read_u8()?,
            pulse_form: {
                let value = cursor.read_u8()?;
                cursor.skip(2)?; // padding
                value
            },
            frequency_mode_hz: cursor.read_f32()?,
            freq_range_low_lim_hz: cursor.read_f32()?,
            freq_range_high_lim_hz: cursor.read_f32()?,
            max_total_tx_pulse_length_sec: cursor.read_f32()?,
            max_eff_tx_pulse_length_sec: cursor.read_f32()?,
            max_eff_tx_bandwidth_hz: cursor.read_f32()?,
            abs_coeff_db_per_km: cursor.read_f32()?,
            port_sector_edge_deg: cursor.read_f32()?,
            starb_sector_edge_deg: cursor.read_f32()?,
            port_mean_cov_deg: cursor.read_f32()?,
            starb_mean_cov_deg: cursor.read_f32()?,
            port_mean_cov_m: cursor.read_i16()?,
            starb_mean_cov_m: cursor.read_i16()?,
            mode_and_stabilization: cursor.read_u8()?,
            runtime_filter1: cursor.read_u8()?,
            runtime_filter2: cursor.read_u16()?,
            pipe_tracking_status: cursor.read_u32()?,
            transmit_array_size_used_deg: cursor.read_f32()?,
            receive_array_size_used_deg: cursor.read_f32()?,
            transmit_power_db: cursor.read_f32()?,
            sl_ramp_up_time_remaining: {
                let value = cursor.read_u16()?;
                cursor.skip(2)?; // padding
                value
            },
            yaw_angle_deg: cursor.read_f32()?,
            num_tx_sectors: cursor.read_u16()?,
            num_bytes_per_tx_sector: cursor.read_u16()?,
            heading_vessel_deg: cursor.read_f32()?,
            sound_speed_at_tx_depth_m_per_sec: cursor.read_f32()?,
            tx_transducer_depth_m: cursor.read_f32()?,
            z_water_level_re_ref_point_m: cursor.read_f32()?,
            x_kmall_to_all_m: cursor.read_f32()?,
            y_kmall_to_all_m: cursor.read_f32()?,
            lat_long_info: cursor.read_u8()?,
            pos_sensor_status: cursor.read_u8()?,
            attitude_sensor_status: {
                let value = cursor.read_u8()?;
                cursor.skip(1)?; // padding
                value
            },
            latitude_deg: cursor.read_f64()?,
            longitude_deg: cursor.read_f64()?,
            ellipsoid_height_re_ref_point_m: cursor.read_f32()?,
            bs_correction_offset_db: 0.0,
            lamberts_law_applied: 0,
            ice_window: 0,
            active_modes: 0,
        };

        // Version 1 (Rev. G) tail, present when the declared size covers it.
        if declared_end >= cursor.position() + 8 {
            info.bs_correction_offset_db = cursor.read_f32()?;
            info.lamberts_law_applied = cursor.read_u8()?;
            info.ice_window = cursor.read_u8()?;
            info.active_modes = cursor.read_u16()?;
        }

        cursor.seek_to(declared_end)?;
        Ok(info)
    }
}

/// MRZ TX sector info, datagram version 0 (36 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrzTxSectorV0 {
    /// TX sector index number, used in the sounding section.
    pub tx_sector_num: u8,
    /// TX array number; 0 for a single TX.
    pub tx_arr_num: u8,
    /// EM2040 subarray: 0 - port, 1 - middle, 2 - starboard.
    pub tx_sub_array: u8,
    /// Transmit delay from the midpoint of the first transmitted pulse
    /// of the ping to the midpoint of this sector's transmission, in s.
    pub sector_transmit_delay_sec: f32,
    /// Along-ship steering angle of the TX beam re transducer ACS in
    /// degrees.
    pub tilt_angle_re_tx_deg: f32,
    /// Nominal source level in dB re 1 microPascal.
    pub tx_nominal_source_level_db: f32,
    /// Focus range in meters; 0 - no focusing applied.
    pub tx_focus_range_m: f32,
    /// Center frequency in Hz.
    pub centre_freq_hz: f32,
    /// Signal bandwidth in Hz.
    pub signal_band_width_hz: f32,
    /// Total signal (pulse) length in seconds.
    pub total_signal_length_sec: f32,
    /// Amplitude shading in percent of the cos^2 tapering function.
    pub pulse_shading: u8,
    /// Transmit wave form: 0 - CW, 1 - FM upsweep, 2 - FM downsweep.
    pub signal_wave_form: u8,
}

impl MrzTxSectorV0 {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            tx_sector_num: cursor.read_u8()?,
            tx_arr_num: cursor.read_u8()?,
            tx_sub_array: {
                let value = cursor.read_u8()?;
                cursor.skip(1)?; // padding
                value
            },
            sector_transmit_delay_sec: cursor.read_f32()?,
            tilt_angle_re_tx_deg: cursor.read_f32()?,
            tx_nominal_source_level_db: cursor.read_f32()?,
            tx_focus_range_m: cursor.read_f32()?,
            centre_freq_hz: cursor.read_f32()?,
            signal_band_width_hz: cursor.read_f32()?,
            total_signal_length_sec: cursor.read_f32()?,
            pulse_shading: cursor.read_u8()?,
            signal_wave_form: {
                let value = cursor.read_u8()?;
                cursor.skip(2)?; // padding
                value
            },
        })
    }
}

/// MRZ TX sector info, datagram version 1 (48 bytes, Rev. G).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrzTxSectorV1 {
    pub tx_sector_num: u8,
    pub tx_arr_num: u8,
    pub tx_sub_array: u8,
    pub sector_transmit_delay_sec: f32,
    pub tilt_angle_re_tx_deg: f32,
    /// Actual SL = tx_nominal_source_level_db + high_voltage_level_db,
    /// in dB re 1 microPascal.
    pub tx_nominal_source_level_db: f32,
    pub tx_focus_range_m: f32,
    pub centre_freq_hz: f32,
    pub signal_band_width_hz: f32,
    pub total_signal_length_sec: f32,
    pub pulse_shading: u8,
    pub signal_wave_form: u8,
    /// Measured high-voltage power level re nominal, in dB; includes the
    /// effect of user-selected power reduction and mammal protection.
    pub high_voltage_level_db: f32,
    /// Backscatter correction added in sector tracking mode in dB.
    pub sector_tracking_corr_db: f32,
    /// Signal length used for backscatter footprint calculation in s.
    pub effective_signal_length_sec: f32,
}

impl MrzTxSectorV1 {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let v0 = MrzTxSectorV0::parse(cursor)?;
        Ok(Self {
            tx_sector_num: v0.tx_sector_num,
            tx_arr_num: v0.tx_arr_num,
            tx_sub_array: v0.tx_sub_array,
            sector_transmit_delay_sec: v0.sector_transmit_delay_sec,
            tilt_angle_re_tx_deg: v0.tilt_angle_re_tx_deg,
            tx_nominal_source_level_db: v0.tx_nominal_source_level_db,
            tx_focus_range_m: v0.tx_focus_range_m,
            centre_freq_hz: v0.centre_freq_hz,
            signal_band_width_hz: v0.signal_band_width_hz,
            total_signal_length_sec: v0.total_signal_length_sec,
            pulse_shading: v0.pulse_shading,
            signal_wave_form: v0.signal_wave_form,
            high_voltage_level_db: cursor.read_f32()?,
            sector_tracking_corr_db: cursor.read_f32()?,
            effective_signal_length_sec: cursor.read_f32()?,
        })
    }
}

/// TX sector table, selected by the header's datagram version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MrzTxSectors {
    V0(Vec<MrzTxSectorV0>),
    V1(Vec<MrzTxSectorV1>),
}

/// MRZ RX info (32 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrzRxInfo {
    /// Number of bytes in the current struct.
    pub num_bytes_rx_info: u16,
    /// Maximum number of main soundings in this datagram (Nrx), extra
    /// detections excluded.
    pub num_soundings_max_main: u16,
    /// Number of main soundings of valid quality.
    pub num_soundings_valid_main: u16,
    /// Number of bytes per sounding entry.
    pub num_bytes_per_sounding: u16,
    /// Sample frequency divided by the water column decimation factor,
    /// in Hz.
    pub wc_sample_rate_hz: f32,
    /// Sample frequency divided by the seabed image decimation factor,
    /// in Hz.
    pub seabed_image_sample_rate_hz: f32,
    /// Backscatter level at normal incidence in dB.
    pub bs_normal_db: f32,
    /// Backscatter level at oblique incidence in dB.
    pub bs_oblique_db: f32,
    /// Sum of alarm flags (0-10).
    pub extra_detection_alarm_flag: u16,
    /// Sum of extra detections from all classes (Nd).
    pub num_extra_detections: u16,
    /// Number of extra detection classes (0-10).
    pub num_extra_detection_classes: u16,
    /// Number of bytes per extra detection class entry.
    pub num_bytes_per_class: u16,
}

impl MrzRxInfo {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        let start = cursor.position();
        let info = Self {
            num_bytes_rx_info: cursor.read_u16()?,
            num_soundings_max_main: cursor.read_u16()?,
            num_soundings_valid_main: cursor.read_u16()?,
            num_bytes_per_sounding: cursor.read_u16()?,
            wc_sample_rate_hz: cursor.read_f32()?,
            seabed_image_sample_rate_hz: cursor.read_f32()?,
            bs_normal_db: cursor.read_f32()?,
            bs_oblique_db: cursor.read_f32()?,
            extra_detection_alarm_flag: cursor.read_u16()?,
            num_extra_detections: cursor.read_u16()?,
            num_extra_detection_classes: cursor.read_u16()?,
            num_bytes_per_class: cursor.read_u16()?,
        };
        cursor.seek_to(start + info.num_bytes_rx_info as usize)?;
        Ok(info)
    }
}

/// MRZ extra detection class info (4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrzExtraDetClassInfo {
    /// Number of extra detections in this class.
    pub num_extra_det_in_class: u16,
    /// Alarm: 0 - no alarm, 1 - alarm.
    pub alarm_flag: u8,
}

/// MRZ sounding entry (120 bytes declared).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrzSounding {
    /// Sounding index; cross reference for seabed image.
    pub sounding_index: u16,
    /// Transmitting sector number, 0-(Ntx-1).
    pub tx_sector_num: u8,
    /// Bottom detection type: 0 - normal, 1 - extra, 2 - rejected.
    pub detection_type: u8,
    /// Detection method: 0 - none, 1 - amplitude, 2 - phase.
    pub detection_method: u8,
    /// For Kongsberg use.
    pub rejection_info1: u8,
    /// For Kongsberg use.
    pub rejection_info2: u8,
    /// For Kongsberg use.
    pub post_processing_info: u8,
    /// Detection class, used by extra detections only.
    pub detection_class: u8,
    /// Detection confidence level.
    pub detection_confidence_level: u8,
    /// Range factor in percent; 100% for a main detection.
    pub range_factor: f32,
    /// Estimated standard deviation as % of the detected depth,
    /// QF = Est(dz)/z = 100 * 10^-IQF.
    pub quality_factor: f32,
    /// Vertical uncertainty based on QF, in meters.
    pub detection_uncertainty_ver_m: f32,
    /// Horizontal uncertainty based on QF, in meters.
    pub detection_uncertainty_hor_m: f32,
    /// Detection window length in seconds.
    pub detection_window_length_sec: f32,
    /// Measured echo length in seconds.
    pub echo_length_sec: f32,
    /// Water column beam number.
    pub wc_beam_num: u16,
    /// Range of bottom detection in water column samples.
    pub wc_range_samples: u16,
    /// Water column nominal beam angle across re vertical.
    pub wc_nom_beam_angle_across_deg: f32,
    /// Mean absorption coefficient used in the TVG calculation, dB/km.
    pub mean_abs_coeff_db_per_km: f32,
    /// Beam intensity using the traditional KM special TVG; -100 dB
    /// appears as an invalid value.
    pub reflectivity1_db: f32,
    /// Beam intensity (BS) using TVG = X log(R) + 2 alpha R; NaNs have
    /// been seen in EM124 data.
    pub reflectivity2_db: f32,
    /// Receiver sensitivity (M) in dB, compensated for the RX beam
    /// pattern.
    pub receiver_sensitivity_applied_db: f32,
    /// Source level (SL) applied in dB.
    pub source_level_applied_db: f32,
    /// Backscatter calibration offset applied in dB (default 0).
    pub bs_calibration_db: f32,
    /// Time varying gain used when correcting reflectivity, in dB.
    pub tvg_db: f32,
    /// Angle relative to the RX transducer array (horizontal plane for
    /// the ME70).
    pub beam_angle_re_rx_deg: f32,
    /// Applied beam pointing angle correction.
    pub beam_angle_correction_deg: f32,
    /// Two-way travel time (range) in seconds.
    pub two_way_travel_time_sec: f32,
    /// Applied two-way travel time correction in seconds.
    pub two_way_travel_time_correction_sec: f32,
    /// Latitudinal distance from the vessel reference point to the
    /// depth point in decimal degrees.
    pub delta_latitude_deg: f32,
    /// Longitudinal distance from the vessel reference point to the
    /// depth point in decimal degrees.
    pub delta_longitude_deg: f32,
    /// Vertical distance z from the vessel reference point, in the SCS.
    pub z_re_ref_point_m: f32,
    /// Horizontal distance y from the vessel reference point, in the
    /// SCS.
    pub y_re_ref_point_m: f32,
    /// Horizontal distance x from the vessel reference point, in the
    /// SCS.
    pub x_re_ref_point_m: f32,
    /// Beam incidence angle adjustment (IBA) in degrees.
    pub beam_inc_angle_adj_deg: f32,
    /// For future use.
    pub real_time_clean_info: u16,
    /// Seabed image start range in samples from the transducer.
    pub si_start_range_samples: u16,
    /// Number of the center seabed image sample for this beam.
    pub si_centre_sample: u16,
    /// Number of seabed image range samples from this beam.
    pub si_num_samples: u16,
}

impl MrzSounding {
    fn parse(cursor: &mut BodyCursor<'_>) -> Result<Self, DgmError> {
        Ok(Self {
            sounding_index: cursor.read_u16()?,
            tx_sector_num: cursor.read_u8()?,
            detection_type: cursor.read_u8()?,
            detection_method: cursor.read_u8()?,
            rejection_info1: cursor.read_u8()?,
            rejection_info2: cursor.read_u8()?,
            post_processing_info: cursor.read_u8()?,
            detection_class: cursor.read_u8()?,
            detection_confidence_level: {
                let value = cursor.read_u8()?;
                cursor.skip(2)?; // padding
                value
            },
            range_factor: cursor.read_f32()?,
            quality_factor: cursor.read_f32()?,
            detection_uncertainty_ver_m: cursor.read_f32()?,
            detection_uncertainty_hor_m: cursor.read_f32()?,
            detection_window_length_sec: cursor.read_f32()?,
            echo_length_sec: cursor.read_f32()?,
            wc_beam_num: cursor.read_u16()?,
            wc_range_samples: cursor.read_u16()?,
            wc_nom_beam_angle_across_deg: cursor.read_f32()?,
            mean_abs_coeff_db_per_km: cursor.read_f32()?,
            reflectivity1_db: cursor.read_f32()?,
            reflectivity2_db: cursor.read_f32()?,
            receiver_sensitivity_applied_db: cursor.read_f32()?,
            source_level_applied_db: cursor.read_f32()?,
            bs_calibration_db: cursor.read_f32()?,
            tvg_db: cursor.read_f32()?,
            beam_angle_re_rx_deg: cursor.read_f32()?,
            beam_angle_correction_deg: cursor.read_f32()?,
            two_way_travel_time_sec: cursor.read_f32()?,
            two_way_travel_time_correction_sec: cursor.read_f32()?,
            delta_latitude_deg: cursor.read_f32()?,
            delta_longitude_deg: cursor.read_f32()?,
            z_re_ref_point_m: cursor.read_f32()?,
            y_re_ref_point_m: cursor.read_f32()?,
            x_re_ref_point_m: cursor.read_f32()?,
            beam_inc_angle_adj_deg: cursor.read_f32()?,
            real_time_clean_info: cursor.read_u16()?,
            si_start_range_samples: cursor.read_u16()?,
            si_centre_sample: cursor.read_u16()?,
            si_num_samples: cursor.read_u16()?,
        })
    }
}

/// Multibeam raw range and depth datagram ('#MRZ').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mrz {
    pub partition: MPartition,
    pub common: MCommon,
    pub ping_info: MrzPingInfo,
    pub tx_sectors: MrzTxSectors,
    pub rx_info: MrzRxInfo,
    /// Extra detection classes; empty when none.
    pub extra_det_info: Vec<MrzExtraDetClassInfo>,
    /// Soundings (main plus extra detections); empty when none.
    pub soundings: Vec<MrzSounding>,
    /// Seabed image sample amplitudes in 0.1 dB; the per-beam counts are
    /// the soundings' si_num_samples fields.  The first sample of each
    /// beam has the lowest range; the center sample is georeferenced.
    pub seabed_image_samples: Vec<i16>,
}

impl Mrz {
    pub(crate) fn parse(cursor: &mut BodyCursor<'_>, dgm_version: u8) -> Result<Self, DgmError> {
        let partition = MPartition::parse(cursor)?;
        partition.require_single()?;

        let common = MCommon::parse(cursor)?;
        let ping_info = MrzPingInfo::parse(cursor)?;

        let num_sectors = ping_info.num_tx_sectors as usize;
        let sector_stride = ping_info.num_bytes_per_tx_sector as usize;
        let tx_sectors = if dgm_version == 0 {
            let mut sectors = Vec::with_capacity(num_sectors);
            for _ in 0..num_sectors {
                let start = cursor.position();
                sectors.push(MrzTxSectorV0::parse(cursor)?);
                cursor.seek_to(start + sector_stride)?;
            }
            MrzTxSectors::V0(sectors)
        } else {
            let mut sectors = Vec::with_capacity(num_sectors);
            for _ in 0..num_sectors {
                let start = cursor.position();
                sectors.push(MrzTxSectorV1::parse(cursor)?);
                cursor.seek_to(start + sector_stride)?;
            }
            MrzTxSectors::V1(sectors)
        };

        let rx_info = MrzRxInfo::parse(cursor)?;

        let mut extra_det_info = Vec::with_capacity(rx_info.num_extra_detection_classes as usize);
        for _ in 0..rx_info.num_extra_detection_classes {
            let start = cursor.position();
            extra_det_info.push(MrzExtraDetClassInfo {
                num_extra_det_in_class: cursor.read_u16()?,
                alarm_flag: {
                    cursor.skip(1)?; // padding
                    cursor.read_u8()?
                },
            });
            cursor.seek_to(start + rx_info.num_bytes_per_class as usize)?;
        }

        let num_soundings =
            rx_info.num_soundings_max_main as usize + rx_info.num_extra_detections as usize;
        let mut soundings = Vec::with_capacity(num_soundings);
        for _ in 0..num_soundings {
            let start = cursor.position();
            soundings.push(MrzSounding::parse(cursor)?);
            cursor.seek_to(start + rx_info.num_bytes_per_sounding as usize)?;
        }

        let num_samples: usize = soundings.iter().map(|s| s.si_num_samples as usize).sum();
        let seabed_image_samples = cursor.read_i16_array(num_samples)?;

        Ok(Self {
            partition,
            common,
            ping_info,
            tx_sectors,
            rx_info,
            extra_det_info,
            soundings,
            seabed_image_samples,
        })
    }
}
