//! End-to-end tests for the EMX decoder over synthetic streams.

use std::io::Cursor;
use swathstream::byte_order::ByteOrder;
use swathstream::emx::{self, EmxDatagram, EmxDatagramType, EmxReader};
use swathstream::DgmError;

const STX: u8 = 0x02;
const ETX: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checksum {
    Computed,
    Zero,
    Bad,
}

fn put_u16(buf: &mut Vec<u8>, order: ByteOrder, value: u16) {
    match order {
        ByteOrder::LittleEndian => buf.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => buf.extend_from_slice(&value.to_be_bytes()),
    }
}

fn put_u32(buf: &mut Vec<u8>, order: ByteOrder, value: u32) {
    match order {
        ByteOrder::LittleEndian => buf.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => buf.extend_from_slice(&value.to_be_bytes()),
    }
}

/// Assemble one complete EMX datagram frame.
///
/// `payload` is the record content between the header and the
/// ETX/checksum trailer.
fn emx_datagram(
    order: ByteOrder,
    type_code: u8,
    date: u32,
    time_ms: u32,
    payload: &[u8],
    checksum: Checksum,
) -> Vec<u8> {
    let bytes_in_datagram = (16 + payload.len() + 3) as u32;

    let mut frame = Vec::new();
    put_u32(&mut frame, order, bytes_in_datagram);
    frame.push(STX);
    frame.push(type_code);
    put_u16(&mut frame, order, 710); // em_model_number
    put_u32(&mut frame, order, date);
    put_u32(&mut frame, order, time_ms);
    put_u16(&mut frame, order, 1); // counter
    put_u16(&mut frame, order, 123); // serial_number

    frame.extend_from_slice(payload);
    frame.push(ETX);

    // The checksum covers the bytes strictly between STX and ETX.
    let mut sum: u16 = 0;
    for &byte in &frame[5..20] {
        sum = sum.wrapping_add(byte as u16);
    }
    for &byte in payload {
        sum = sum.wrapping_add(byte as u16);
    }

    match checksum {
        Checksum::Computed => put_u16(&mut frame, order, sum),
        Checksum::Zero => put_u16(&mut frame, order, 0),
        Checksum::Bad => put_u16(&mut frame, order, sum.wrapping_add(1)),
    }

    frame
}

/// Clock payload padded to the 13 payload bytes of the minimal 32-byte
/// clock datagram.
fn clock_payload(order: ByteOrder, date: u32, time_ms: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    put_u32(&mut payload, order, date);
    put_u32(&mut payload, order, time_ms);
    payload.push(1); // PPS
    payload.extend_from_slice(&[0; 4]); // spare up to the even length
    payload
}

/// Minimal water column payload: info only, no TX sectors or beams.
fn water_column_payload(order: ByteOrder) -> Vec<u8> {
    let mut payload = Vec::new();
    put_u16(&mut payload, order, 1); // num_datagrams
    put_u16(&mut payload, order, 1); // datagram_number
    put_u16(&mut payload, order, 0); // tx_sectors
    put_u16(&mut payload, order, 0); // num_beams
    put_u16(&mut payload, order, 0); // datagram_beams
    put_u16(&mut payload, order, 15000); // sound_speed
    put_u32(&mut payload, order, 1_000_000); // sample_rate
    put_u16(&mut payload, order, 0); // tx_heave
    payload.extend_from_slice(&[30, 0, 0]); // tvg_function, tvg_offset, scanning
    payload.extend_from_slice(&[0; 3]); // spare
    payload
}

fn reader_over(stream: Vec<u8>) -> EmxReader<Cursor<Vec<u8>>> {
    EmxReader::from_reader(Cursor::new(stream))
}

#[test]
fn minimal_clock_stream() {
    let stream = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        3_600_000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 3_600_000),
        Checksum::Zero,
    );
    assert_eq!(stream.len(), 36); // bytes_in_datagram = 32 plus its own field

    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().expect("one record");
    assert_eq!(record.header.datagram_type(), EmxDatagramType::Clock);
    assert_eq!(record.header.bytes_in_datagram, 32);
    assert_eq!(record.header.date, 20200101);
    assert_eq!(record.header.time_ms, 3_600_000);
    match &record.datagram {
        EmxDatagram::Clock(clock) => {
            assert_eq!(clock.info.date, 20200101);
            assert_eq!(clock.info.time_ms, 3_600_000);
            assert_eq!(clock.info.pps, 1);
        }
        other => panic!("unexpected datagram: {:?}", other),
    }

    assert!(reader.read().unwrap().is_none()); // clean EOF
}

#[test]
fn endianness_is_transparent() {
    let native = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        3_600_000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 3_600_000),
        Checksum::Computed,
    );
    let swapped = emx_datagram(
        ByteOrder::BigEndian,
        b'C',
        20200101,
        3_600_000,
        &clock_payload(ByteOrder::BigEndian, 20200101, 3_600_000),
        Checksum::Computed,
    );

    let mut le_reader = reader_over(native);
    let mut be_reader = reader_over(swapped);
    let le_record = le_reader.read().unwrap().unwrap();
    let be_record = be_reader.read().unwrap().unwrap();

    assert_eq!(le_reader.byte_order(), Some(ByteOrder::LittleEndian));
    assert_eq!(be_reader.byte_order(), Some(ByteOrder::BigEndian));
    assert_eq!(le_record, be_record);
}

#[test]
fn bad_checksum_discards_frame() {
    let mut stream = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Bad,
    );
    stream.extend(emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        2000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 2000),
        Checksum::Computed,
    ));

    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().expect("the valid record");
    assert_eq!(record.header.time_ms, 2000);
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn ignore_checksum_accepts_bad_frame() {
    let stream = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Bad,
    );
    let mut reader = reader_over(stream);
    reader.set_ignore_checksum(true);
    let record = reader.read().unwrap().expect("accepted record");
    assert_eq!(record.header.time_ms, 1000);
}

#[test]
fn water_column_filter_skips_exactly_water_column() {
    let order = ByteOrder::LittleEndian;
    let mut stream = Vec::new();
    stream.extend(emx_datagram(
        order,
        b'C',
        20200101,
        1000,
        &clock_payload(order, 20200101, 1000),
        Checksum::Computed,
    ));
    stream.extend(emx_datagram(
        order,
        b'k',
        20200101,
        1500,
        &water_column_payload(order),
        Checksum::Computed,
    ));
    stream.extend(emx_datagram(
        order,
        b'C',
        20200101,
        2000,
        &clock_payload(order, 20200101, 2000),
        Checksum::Computed,
    ));
    stream.extend(emx_datagram(
        order,
        b'k',
        20200101,
        2500,
        &water_column_payload(order),
        Checksum::Computed,
    ));

    // Unfiltered: all four records, in file order.
    let mut reader = reader_over(stream.clone());
    let mut types = Vec::new();
    while let Some(record) = reader.read().unwrap() {
        types.push(record.header.datagram_type());
    }
    assert_eq!(
        types,
        vec![
            EmxDatagramType::Clock,
            EmxDatagramType::WaterColumn,
            EmxDatagramType::Clock,
            EmxDatagramType::WaterColumn,
        ]
    );

    // Filtered: only the clocks remain.
    let mut reader = reader_over(stream);
    reader.set_ignore_water_column(true);
    let mut times = Vec::new();
    while let Some(record) = reader.read().unwrap() {
        assert_eq!(record.header.datagram_type(), EmxDatagramType::Clock);
        times.push(record.header.time_ms);
    }
    assert_eq!(times, vec![1000, 2000]);
}

#[test]
fn empty_file_is_clean_eof() {
    let mut reader = reader_over(Vec::new());
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn truncated_header_is_bad_data() {
    let full = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Computed,
    );
    let mut reader = reader_over(full[..10].to_vec());
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn truncated_body_is_bad_data() {
    let full = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Computed,
    );
    let mut reader = reader_over(full[..full.len() - 4].to_vec());
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn out_of_range_sizes_are_bad_data() {
    // Size below the minimum header size.
    let mut small = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Computed,
    );
    small[0..4].copy_from_slice(&8u32.to_le_bytes());
    let mut reader = reader_over(small);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));

    // Size above the sanity ceiling.
    let mut huge = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Computed,
    );
    huge[0..4].copy_from_slice(&((1u32 << 27) + 1).to_le_bytes());
    let mut reader = reader_over(huge);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn undetectable_byte_order_is_bad_data() {
    let mut frame = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        1000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
        Checksum::Computed,
    );
    // Corrupt the date and the model number beyond recognition.
    frame[6..8].copy_from_slice(&[0xAB, 0xCD]);
    frame[8..12].copy_from_slice(&[0xAB, 0xAB, 0xAB, 0xAB]);
    let mut reader = reader_over(frame);
    assert!(matches!(reader.read(), Err(DgmError::BadData { .. })));
}

#[test]
fn directory_record_is_tolerated() {
    let order = ByteOrder::LittleEndian;
    // The 0x74 record carries a bogus timestamp and checksum.
    let mut frame = Vec::new();
    let payload = [0xAAu8; 9];
    put_u32(&mut frame, order, (16 + payload.len() + 3) as u32);
    frame.push(STX);
    frame.push(0x74);
    put_u16(&mut frame, order, 710);
    put_u32(&mut frame, order, 0xFFFF_FFFF); // invalid date
    put_u32(&mut frame, order, 0xFFFF_FFFF); // invalid time
    put_u16(&mut frame, order, 1);
    put_u16(&mut frame, order, 123);
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&[0x55, 0x66, 0x77]); // no ETX, junk checksum

    let clock = emx_datagram(
        order,
        b'C',
        20200101,
        1000,
        &clock_payload(order, 20200101, 1000),
        Checksum::Computed,
    );
    // The directory record must not fix the byte order wrongly; lead
    // with a clock record to pin it.
    let mut stream = clock.clone();
    stream.extend(frame);
    stream.extend(clock);

    let mut reader = reader_over(stream);
    let first = reader.read().unwrap().unwrap();
    assert_eq!(first.header.datagram_type(), EmxDatagramType::Clock);
    let directory = reader.read().unwrap().unwrap();
    assert_eq!(directory.header.datagram_type(), EmxDatagramType::Directory);
    assert!(matches!(directory.datagram, EmxDatagram::Opaque(_)));
    let last = reader.read().unwrap().unwrap();
    assert_eq!(last.header.datagram_type(), EmxDatagramType::Clock);
}

#[test]
fn attitude_stream_decodes_entries() {
    let order = ByteOrder::BigEndian;
    let mut payload = Vec::new();
    put_u16(&mut payload, order, 2); // num_entries
    for (time, roll) in [(0u16, -150i16), (100, 75)] {
        put_u16(&mut payload, order, time);
        put_u16(&mut payload, order, 0x9000); // status
        put_u16(&mut payload, order, roll as u16);
        put_u16(&mut payload, order, 20); // pitch
        put_u16(&mut payload, order, 5); // heave
        put_u16(&mut payload, order, 18000); // heading
    }
    payload.push(0x11); // sensor_system_descriptor

    let stream = emx_datagram(order, b'A', 20200101, 1000, &payload, Checksum::Computed);
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();
    match record.datagram {
        EmxDatagram::Attitude(attitude) => {
            assert_eq!(attitude.info.num_entries, 2);
            assert_eq!(attitude.data[0].roll, -150);
            assert_eq!(attitude.data[1].record_time, 100);
            assert_eq!(attitude.data[1].heading, 18000);
            assert_eq!(attitude.sensor_system_descriptor, 0x11);
        }
        other => panic!("unexpected datagram: {:?}", other),
    }
}

#[test]
fn identify_accepts_emx_and_rejects_noise() {
    let dir = std::env::temp_dir();
    let emx_path = dir.join(format!("swathstream-emx-{}.all", std::process::id()));
    let noise_path = dir.join(format!("swathstream-noise-{}.bin", std::process::id()));
    let empty_path = dir.join(format!("swathstream-empty-{}.all", std::process::id()));

    std::fs::write(
        &emx_path,
        emx_datagram(
            ByteOrder::LittleEndian,
            b'C',
            20200101,
            1000,
            &clock_payload(ByteOrder::LittleEndian, 20200101, 1000),
            Checksum::Computed,
        ),
    )
    .unwrap();
    std::fs::write(&noise_path, [0xA5u8; 64]).unwrap();
    std::fs::write(&empty_path, []).unwrap();

    assert!(emx::identify(&emx_path).unwrap());
    assert!(!emx::identify(&noise_path).unwrap());
    assert!(!emx::identify(&empty_path).unwrap());

    std::fs::remove_file(&emx_path).ok();
    std::fs::remove_file(&noise_path).ok();
    std::fs::remove_file(&empty_path).ok();
}

#[test]
fn records_round_trip_through_json() {
    let stream = emx_datagram(
        ByteOrder::LittleEndian,
        b'C',
        20200101,
        3_600_000,
        &clock_payload(ByteOrder::LittleEndian, 20200101, 3_600_000),
        Checksum::Computed,
    );
    let mut reader = reader_over(stream);
    let record = reader.read().unwrap().unwrap();

    let json = serde_json::to_string(&record).unwrap();
    let parsed: swathstream::emx::EmxRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, record);
}
