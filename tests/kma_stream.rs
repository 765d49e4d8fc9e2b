//! End-to-end tests for the KMA decoder over synthetic streams.

use std::io::Cursor;
use swathstream::kma::{self, KmaDatagram, KmaDatagramType, KmaReader, MrzTxSectors, MwcPhase};
use swathstream::DgmError;

/// Assemble one complete KMA datagram frame around `payload`.
fn kma_datagram(dgm_type: &[u8; 4], dgm_version: u8, payload: &[u8]) -> Vec<u8> {
    let num_bytes_dgm = (20 + payload.len() + 4) as u32;

    let mut frame = Vec::new();
    frame.extend_from_slice(&num_bytes_dgm.to_le_bytes());
    frame.extend_from_slice(dgm_type);
    frame.push(dgm_version);
    frame.push(0); // system_id
    frame.extend_from_slice(&2040u16.to_le_bytes()); // echo_sounder_id
    frame.extend_from_slice(&1_600_000_000u32.to_le_bytes()); // time_sec
    frame.extend_from_slice(&250_000_000u32.to_le_bytes()); // time_nanosec
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&num_bytes_dgm.to_le_bytes());
    frame
}

fn reader_over(stream: Vec<u8>) -> KmaReader<Cursor<Vec<u8>>> {
    KmaReader::from_reader(Cursor::new(stream))
}

fn partition(num_of_dgms: u16, dgm_num: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&num_of_dgms.to_le_bytes());
    bytes.extend_from_slice(&dgm_num.to_le_bytes());
    bytes
}

fn m_common() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&12u16.to_le_bytes()); // num_bytes_cmn_part
    bytes.extend_from_slice(&42u16.to_le_bytes()); // ping_cnt
    bytes.extend_from_slice(&[1, 0, 1, 0, 0, 0, 1, 0]);
    bytes
}

/// MRZ ping info block with the given TX sector table shape.
fn mrz_ping_info(num_tx_sectors: u16, num_bytes_per_tx_sector: u16) -> Vec<u8> {
    let mut info = vec![0u8; 152];
    info[0..2].copy_from_slice(&152u16.to_le_bytes()); // num_bytes_info_data
    info[4..8].copy_from_slice(&1.5f32.to_le_bytes()); // ping_rate_hz
    info[92..94].copy_from_slice(&num_tx_sectors.to_le_bytes());
    info[94..96].copy_from_slice(&num_bytes_per_tx_sector.to_le_bytes());
    info[124..132].copy_from_slice(&59.5f64.to_le_bytes()); // latitude
    info[132..140].copy_from_slice(&10.25f64.to_le_bytes()); // longitude
    info[144..148].copy_from_slice(&(-1.25f32).to_le_bytes()); // bs offset
    info
}

/// RX info block declaring `num_soundings` soundings and no extra
/// detections.
fn mrz_rx_info(num_soundings: u16) -> Vec<u8> {
    let mut info = vec![0u8; 32];
    info[0..2].copy_from_slice(&32u16.to_le_bytes()); // num_bytes_rx_info
    info[2..4].copy_from_slice(&num_soundings.to_le_bytes());
    info[4..6].copy_from_slice(&num_soundings.to_le_bytes());
    info[6..8].copy_from_slice(&120u16.to_le_bytes()); // num_bytes_per_sounding
    info[8..12].copy_from_slice(&20000.0f32.to_le_bytes()); // wc sample rate
    info
}

/// One zeroed sounding with an index and a seabed image sample count.
fn mrz_sounding(index: u16, si_num_samples: u16) -> Vec<u8> {
    let mut sounding = vec![0u8; 120];
    sounding[0..2].copy_from_slice(&index.to_le_bytes());
    sounding[84..88].copy_from_slice(&0.42f32.to_le_bytes()); // travel time
    sounding[118..120].copy_from_slice(&si_num_samples.to_le_bytes());
    sounding
}

#[test]
fn minimal_iip_stream() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&10u16.to_le_bytes()); // num_bytes_cmn_part
    payload.extend_from_slice(&0u16.to_le_bytes()); // info
    payload.extend_from_slice(&0u16.to_le_bytes()); // status
    payload.extend_from_slice(b"OSV,"); // four bytes of install text

    let stream = kma_datagram(b"#IIP", 0, &payload);
    assert_eq!(stream.len(), 34);

    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().expect("one record");
    assert_eq!(record.header.num_bytes_dgm, 34);
    assert_eq!(record.header.datagram_type(), KmaDatagramType::Iip);
    match &record.datagram {
        KmaDatagram::Iip(iip) => {
            assert_eq!(iip.data.num_bytes_cmn_part, 10);
            assert_eq!(iip.install_text, b"OSV,");
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn mrz_partition_must_be_one_of_one() {
    let mut payload = partition(2, 1); // 2 datagrams: not reassembled here
    payload.extend(m_common());
    let stream = kma_datagram(b"#MRZ", 1, &payload);
    let mut reader = reader_over(stream);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn mrz_round_trip() {
    let mut payload = partition(1, 1);
    payload.extend(m_common());
    payload.extend(mrz_ping_info(1, 48));

    // One version-1 TX sector (48 bytes).
    let mut sector = vec![0u8; 48];
    sector[0] = 0; // tx_sector_num
    sector[4..8].copy_from_slice(&0.001f32.to_le_bytes()); // transmit delay
    sector[20..24].copy_from_slice(&300_000.0f32.to_le_bytes()); // centre freq
    sector[36..40].copy_from_slice(&(-3.0f32).to_le_bytes()); // high voltage
    payload.extend_from_slice(&sector);

    payload.extend(mrz_rx_info(2));
    payload.extend(mrz_sounding(0, 2));
    payload.extend(mrz_sounding(1, 1));
    for sample in [-100i16, -200, -300] {
        payload.extend_from_slice(&sample.to_le_bytes());
    }

    let stream = kma_datagram(b"#MRZ", 1, &payload);
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();
    match record.datagram {
        KmaDatagram::Mrz(mrz) => {
            assert_eq!(mrz.common.ping_cnt, 42);
            assert_eq!(mrz.ping_info.latitude_deg, 59.5);
            assert_eq!(mrz.ping_info.bs_correction_offset_db, -1.25);
            match mrz.tx_sectors {
                MrzTxSectors::V1(sectors) => {
                    assert_eq!(sectors.len(), 1);
                    assert_eq!(sectors[0].centre_freq_hz, 300_000.0);
                    assert_eq!(sectors[0].high_voltage_level_db, -3.0);
                }
                other => panic!("unexpected sector table: {:?}", other),
            }
            assert_eq!(mrz.soundings.len(), 2);
            assert_eq!(mrz.soundings[1].sounding_index, 1);
            assert_eq!(mrz.soundings[0].two_way_travel_time_sec, 0.42);
            assert_eq!(mrz.seabed_image_samples, vec![-100, -200, -300]);
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
}

#[test]
fn mwc_round_trip_with_low_resolution_phase() {
    let mut payload = partition(1, 1);
    payload.extend(m_common());

    // TX info: one sector, 16 bytes per sector entry.
    payload.extend_from_slice(&12u16.to_le_bytes());
    payload.extend_from_slice(&1u16.to_le_bytes());
    payload.extend_from_slice(&16u16.to_le_bytes());
    payload.extend_from_slice(&0u16.to_le_bytes()); // padding
    payload.extend_from_slice(&0.25f32.to_le_bytes()); // heave

    // TX sector.
    payload.extend_from_slice(&2.0f32.to_le_bytes()); // tilt
    payload.extend_from_slice(&200_000.0f32.to_le_bytes()); // freq
    payload.extend_from_slice(&1.0f32.to_le_bytes()); // beamwidth
    payload.extend_from_slice(&0u16.to_le_bytes()); // sector number
    payload.extend_from_slice(&0u16.to_le_bytes()); // padding

    // RX info: two beams, 16-byte entries, low resolution phase.
    payload.extend_from_slice(&16u16.to_le_bytes());
    payload.extend_from_slice(&2u16.to_le_bytes());
    payload.push(16); // num_bytes_per_beam_entry
    payload.push(1); // phase_flag = low
    payload.push(30); // tvg function
    payload.push(0); // tvg offset
    payload.extend_from_slice(&20000.0f32.to_le_bytes());
    payload.extend_from_slice(&1500.0f32.to_le_bytes());

    for (angle, num_samples) in [(-60.0f32, 3u16), (60.0, 2)] {
        payload.extend_from_slice(&angle.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes()); // start range
        payload.extend_from_slice(&0u16.to_le_bytes()); // detected range
        payload.extend_from_slice(&0u16.to_le_bytes()); // tx sector
        payload.extend_from_slice(&num_samples.to_le_bytes());
        payload.extend_from_slice(&0.0f32.to_le_bytes()); // high-res range
        payload.extend(std::iter::repeat((-50i8) as u8).take(num_samples as usize));
        payload.extend(std::iter::repeat(3u8).take(num_samples as usize)); // phase
    }

    let stream = kma_datagram(b"#MWC", 1, &payload);
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();
    match record.datagram {
        KmaDatagram::Mwc(mwc) => {
            assert_eq!(mwc.tx_info.heave_m, 0.25);
            assert_eq!(mwc.tx_sectors.len(), 1);
            assert_eq!(mwc.rx_info.num_beams, 2);
            assert_eq!(mwc.rx_beams.len(), 2);
            assert_eq!(mwc.rx_beams[0].sample_amplitude_05db.len(), 3);
            assert_eq!(mwc.rx_beams[1].beam_point_ang_re_vertical_deg, 60.0);
            assert_eq!(mwc.rx_beams[1].phase, MwcPhase::Low(vec![3, 3]));
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
}

#[test]
fn filters_skip_bulky_datagrams_without_decoding() {
    // Garbage bodies prove the skip path seeks instead of decoding.
    let mwc = kma_datagram(b"#MWC", 1, &[0xA5u8; 64]);
    let mrz = kma_datagram(b"#MRZ", 1, &[0x5Au8; 64]);
    let scl = {
        let mut payload = Vec::new();
        payload.extend_from_slice(&8u16.to_le_bytes()); // s-common
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.extend_from_slice(&0.5f32.to_le_bytes()); // offset_sec
        payload.extend_from_slice(&(-250i32).to_le_bytes()); // clock deviation
        payload.extend_from_slice(b"$ZDA,");
        kma_datagram(b"#SCL", 0, &payload)
    };

    let mut stream = Vec::new();
    stream.extend(&mwc);
    stream.extend(&mrz);
    stream.extend(&scl);

    let mut reader = reader_over(stream);
    reader.set_ignore_water_column(true);
    reader.set_ignore_soundings(true);

    let record = reader.read().unwrap().expect("the clock record");
    assert_eq!(record.header.datagram_type(), KmaDatagramType::Scl);
    match record.datagram {
        KmaDatagram::Scl(scl) => {
            assert_eq!(scl.data.offset_sec, 0.5);
            assert_eq!(scl.data.clock_dev_pu_nanosec, -250);
            assert_eq!(scl.data_from_sensor, b"$ZDA,");
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn empty_file_is_clean_eof() {
    let mut reader = reader_over(Vec::new());
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn truncated_header_is_bad_data() {
    let full = kma_datagram(b"#SCL", 0, &[0u8; 16]);
    let mut reader = reader_over(full[..10].to_vec());
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn truncated_body_is_bad_data() {
    let full = kma_datagram(b"#IIP", 0, &[0u8; 16]);
    let mut reader = reader_over(full[..full.len() - 6].to_vec());
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn header_validation_failures() {
    // Missing '#' magic.
    let mut frame = kma_datagram(b"#SCL", 0, &[0u8; 16]);
    frame[4] = b'X';
    let mut reader = reader_over(frame);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));

    // Nanoseconds out of range.
    let mut frame = kma_datagram(b"#SCL", 0, &[0u8; 16]);
    frame[16..20].copy_from_slice(&1_000_000_000u32.to_le_bytes());
    let mut reader = reader_over(frame);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));

    // Datagram size below the header-plus-length minimum.
    let mut frame = kma_datagram(b"#SCL", 0, &[0u8; 16]);
    frame[0..4].copy_from_slice(&23u32.to_le_bytes());
    let mut reader = reader_over(frame);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn removed_heading_datagram_is_kept_raw() {
    let stream = kma_datagram(b"#SHA", 0, &[1, 2, 3, 4]);
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();
    assert_eq!(record.header.datagram_type(), KmaDatagramType::Sha);
    match record.datagram {
        KmaDatagram::Opaque(body) => assert_eq!(body.len(), 8), // payload + length
        other => panic!("unexpected datagram: {:?}", other),
    }
}

#[test]
fn identify_accepts_kma_and_rejects_noise() {
    let dir = std::env::temp_dir();
    let kma_path = dir.join(format!("swathstream-kma-{}.kmall", std::process::id()));
    let noise_path = dir.join(format!("swathstream-kma-noise-{}.bin", std::process::id()));

    std::fs::write(&kma_path, kma_datagram(b"#SCL", 0, &[0u8; 16])).unwrap();
    std::fs::write(&noise_path, [0x33u8; 64]).unwrap();

    assert!(kma::identify(&kma_path).unwrap());
    assert!(!kma::identify(&noise_path).unwrap());

    std::fs::remove_file(&kma_path).ok();
    std::fs::remove_file(&noise_path).ok();
}

#[test]
fn oversized_declared_common_part_is_skipped() {
    // A future-revision SPO with a grown common part still decodes.
    let mut payload = Vec::new();
    payload.extend_from_slice(&12u16.to_le_bytes()); // declared 12 bytes
    payload.extend_from_slice(&0u16.to_le_bytes());
    payload.extend_from_slice(&1u16.to_le_bytes());
    payload.extend_from_slice(&0u16.to_le_bytes()); // padding
    payload.extend_from_slice(&[0xEE; 4]); // revision-added tail
    payload.extend_from_slice(&1_600_000_000u32.to_le_bytes());
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload.extend_from_slice(&1.0f32.to_le_bytes());
    payload.extend_from_slice(&60.0f64.to_le_bytes());
    payload.extend_from_slice(&5.0f64.to_le_bytes());
    payload.extend_from_slice(&2.5f32.to_le_bytes());
    payload.extend_from_slice(&90.0f32.to_le_bytes());
    payload.extend_from_slice(&10.0f32.to_le_bytes());

    let stream = kma_datagram(b"#SPO", 0, &payload);
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();
    match record.datagram {
        KmaDatagram::Spo(spo) => {
            assert_eq!(spo.common.num_bytes_cmn_part, 12);
            assert_eq!(spo.data.corrected_lat_deg, 60.0);
            assert_eq!(spo.data.speed_over_ground_m_per_sec, 2.5);
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
}
