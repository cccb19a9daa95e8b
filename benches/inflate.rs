//! Benchmarks for rinflate decompression throughput.
//!
//! Compares against flate2 on a few data patterns and compression levels.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use rinflate::{decompress_batch, decompress_bytes, BatchConfig};
use std::io::{Read, Write};

/// Generate random (incompressible) data
fn generate_random_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for _ in 0..size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate repetitive (highly compressible) data
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    b"ABCDABCDABCDABCD".iter().cycle().take(size).copied().collect()
}

/// Generate document-like data: markup with repeated keywords and numbers
fn generate_document_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut i = 0u64;
    while data.len() < size {
        let line = format!(
            "{} 0 obj << /Type /XObject /Width {} /Length {} >>\n",
            i,
            i * 7 % 1000,
            i * 131 % 65536
        );
        data.extend_from_slice(line.as_bytes());
        i += 1;
    }
    data.truncate(size);
    data
}

/// Compress data to a raw DEFLATE stream
fn compress(data: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), level);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sizes");

    for size in [1024, 64 * 1024, 1024 * 1024].iter() {
        let data = generate_document_data(*size);
        let compressed = compress(&data, Compression::default());

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("document", size), &compressed, |b, compressed| {
            b.iter(|| decompress_bytes(compressed).unwrap());
        });
    }

    group.finish();
}

fn bench_data_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_patterns");
    let size = 256 * 1024;

    let patterns = [
        ("random", generate_random_data(size)),
        ("repetitive", generate_repetitive_data(size)),
        ("document", generate_document_data(size)),
    ];

    group.throughput(Throughput::Bytes(size as u64));

    for (name, data) in &patterns {
        for (level_name, level) in [("stored", Compression::none()), ("best", Compression::best())] {
            let compressed = compress(data, level);
            group.bench_with_input(
                BenchmarkId::new(*name, level_name),
                &compressed,
                |b, compressed| b.iter(|| decompress_bytes(compressed).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_vs_flate2(c: &mut Criterion) {
    let mut group = c.benchmark_group("vs_flate2");
    let size = 1024 * 1024;
    let compressed = compress(&generate_document_data(size), Compression::default());

    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("rinflate", |b| {
        b.iter(|| decompress_bytes(&compressed).unwrap());
    });

    group.bench_function("flate2", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(size);
            DeflateDecoder::new(&compressed[..]).read_to_end(&mut output).unwrap();
            output
        });
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    // 64 independent 64KB streams
    let streams: Vec<Vec<u8>> = (0..64)
        .map(|i| compress(&generate_document_data(64 * 1024 + i), Compression::default()))
        .collect();
    let total: usize = (0..64).map(|i| 64 * 1024 + i).sum();

    group.throughput(Throughput::Bytes(total as u64));

    for threads in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), &streams, |b, streams| {
            let config = BatchConfig { num_threads: *threads };
            b.iter(|| decompress_batch(streams, config.clone()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sizes, bench_data_patterns, bench_vs_flate2, bench_batch);
criterion_main!(benches);
