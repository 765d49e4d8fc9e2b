//! Benchmarks for datagram decoding throughput.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use swathstream::emx::EmxReader;
use swathstream::kma::KmaReader;

const STX: u8 = 0x02;
const ETX: u8 = 0x03;

/// One little-endian EMX attitude datagram with `num_entries` samples.
fn emx_attitude_datagram(num_entries: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&num_entries.to_le_bytes());
    for i in 0..num_entries {
        payload.extend_from_slice(&(i * 10).to_le_bytes()); // record_time
        payload.extend_from_slice(&0x9000u16.to_le_bytes()); // status
        payload.extend_from_slice(&(-150i16).to_le_bytes()); // roll
        payload.extend_from_slice(&75i16.to_le_bytes()); // pitch
        payload.extend_from_slice(&5i16.to_le_bytes()); // heave
        payload.extend_from_slice(&18000u16.to_le_bytes()); // heading
    }
    payload.push(0x11); // sensor_system_descriptor

    let bytes_in_datagram = (16 + payload.len() + 3) as u32;
    let mut frame = Vec::new();
    frame.extend_from_slice(&bytes_in_datagram.to_le_bytes());
    frame.push(STX);
    frame.push(b'A');
    frame.extend_from_slice(&710u16.to_le_bytes());
    frame.extend_from_slice(&20200101u32.to_le_bytes());
    frame.extend_from_slice(&3_600_000u32.to_le_bytes());
    frame.extend_from_slice(&1u16.to_le_bytes());
    frame.extend_from_slice(&123u16.to_le_bytes());
    frame.extend_from_slice(&payload);
    frame.push(ETX);

    let mut sum: u16 = 0;
    for &byte in &frame[5..20] {
        sum = sum.wrapping_add(byte as u16);
    }
    for &byte in &payload {
        sum = sum.wrapping_add(byte as u16);
    }
    frame.extend_from_slice(&sum.to_le_bytes());
    frame
}

/// One KMA SVP datagram with `num_samples` profile samples.
fn kma_svp_datagram(num_samples: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&28u16.to_le_bytes());
    payload.extend_from_slice(&num_samples.to_le_bytes());
    payload.extend_from_slice(b"S00\0");
    payload.extend_from_slice(&1_600_000_000u32.to_le_bytes());
    payload.extend_from_slice(&59.5f64.to_le_bytes());
    payload.extend_from_slice(&10.25f64.to_le_bytes());
    for i in 0..num_samples {
        payload.extend_from_slice(&(i as f32).to_le_bytes());
        payload.extend_from_slice(&1480.0f32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&4.0f32.to_le_bytes());
        payload.extend_from_slice(&35.0f32.to_le_bytes());
    }

    let num_bytes_dgm = (20 + payload.len() + 4) as u32;
    let mut frame = Vec::new();
    frame.extend_from_slice(&num_bytes_dgm.to_le_bytes());
    frame.extend_from_slice(b"#SVP");
    frame.push(1);
    frame.push(0);
    frame.extend_from_slice(&2040u16.to_le_bytes());
    frame.extend_from_slice(&1_600_000_000u32.to_le_bytes());
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&num_bytes_dgm.to_le_bytes());
    frame
}

fn benchmark_emx_stream(c: &mut Criterion) {
    let mut stream = Vec::new();
    for _ in 0..1000 {
        stream.extend(emx_attitude_datagram(100));
    }

    c.bench_function("emx_read_1000_attitude", |b| {
        b.iter(|| {
            let mut reader = EmxReader::from_reader(Cursor::new(&stream[..]));
            let mut count = 0;
            while let Ok(Some(_)) = reader.read() {
                count += 1;
            }
            black_box(count)
        })
    });
}

fn benchmark_kma_stream(c: &mut Criterion) {
    let mut stream = Vec::new();
    for _ in 0..1000 {
        stream.extend(kma_svp_datagram(200));
    }

    c.bench_function("kma_read_1000_svp", |b| {
        b.iter(|| {
            let mut reader = KmaReader::from_reader(Cursor::new(&stream[..]));
            let mut count = 0;
            while let Ok(Some(_)) = reader.read() {
                count += 1;
            }
            black_box(count)
        })
    });
}

criterion_group!(benches, benchmark_emx_stream, benchmark_kma_stream);
criterion_main!(benches);
