//! Self-contained RFC 1951 DEFLATE decompressor.
//!
//! Decodes raw DEFLATE bitstreams (no zlib or gzip framing) such as the
//! compressed image and font resources embedded in documents. The decoder is
//! built from small parts: a bit reader, canonical Huffman code trees, a 32 KiB
//! circular dictionary and the block-level [`Inflater`].
//!
//! ```
//! // Fixed-Huffman encoding of "a"
//! let data = rinflate::decompress_bytes(&[0x4B, 0x04, 0x00]).unwrap();
//! assert_eq!(data, b"a");
//! ```

pub mod batch;
pub mod bits;
pub mod deflate;
pub mod dictionary;
pub mod error;
pub mod huffman;

pub use batch::{decompress_batch, BatchConfig, BatchInflater};
pub use bits::{BitReader, BitSource};
pub use deflate::{BlockSummary, BlockType, InflateStats, Inflater};
pub use dictionary::CircularDictionary;
pub use error::{Error, Result};
pub use huffman::{CanonicalCode, CodeTree};

use std::io::{BufReader, BufWriter, Read, Write};

/// Decompress a raw DEFLATE stream read from `reader`
pub fn decompress<R: Read>(reader: R) -> Result<Vec<u8>> {
    decompress_bits(BitReader::new(BufReader::new(reader)))
}

/// Decompress a raw DEFLATE stream held in memory
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Inflater::new(BitReader::new(data));
    let mut out = Vec::with_capacity(data.len().saturating_mul(3));
    inflater.inflate_to(&mut out)?;
    Ok(out)
}

/// Decompress from a caller-supplied bit source
///
/// Pass `&mut source` to keep the source and inspect it afterwards.
pub fn decompress_bits<S: BitSource>(bits: S) -> Result<Vec<u8>> {
    let mut inflater = Inflater::new(bits);
    let mut out = Vec::new();
    inflater.inflate_to(&mut out)?;
    Ok(out)
}

/// Decompress a raw DEFLATE stream from `reader` into `writer`
///
/// Both sides are buffered. Output is written as it is decoded, so `writer`
/// may already hold part of the data when an error is returned.
pub fn decompress_to<R: Read, W: Write>(reader: R, writer: W) -> Result<InflateStats> {
    let mut bits = BitReader::new(BufReader::new(reader));
    let mut output = BufWriter::new(writer);
    let mut stats = Inflater::new(&mut bits).inflate_to(&mut output)?.clone();
    stats.input_bytes = bits.bytes_read();
    output.flush()?;
    Ok(stats)
}
