#![no_main]

use flate2::write::DeflateEncoder;
use flate2::Compression;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Compress the fuzz input with flate2, then decode it back.
    // Valid streams must always decode to exactly the input.

    // Limit data size to avoid slowdowns
    let data = if data.len() > 64 * 1024 { &data[..64 * 1024] } else { data };

    // First byte picks the compression level
    let level = data.first().map_or(6, |b| u32::from(b % 10));

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    if encoder.write_all(data).is_err() {
        return;
    }
    let compressed = match encoder.finish() {
        Ok(d) => d,
        Err(_) => return,
    };

    let decompressed = rinflate::decompress_bytes(&compressed).expect("valid stream failed");
    assert_eq!(decompressed, data, "Round-trip mismatch");
});
